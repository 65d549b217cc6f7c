//! Public URLs derived from the current request.

const SCHEME: &str = "http://";

/// URL constants for one request.
///
/// Computed once from the request's host and script path, then read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    root: String,
    public: String,
    app: String,
    view: String,
}

impl Urls {
    /// Derives the URLs for `app` from the host header and script path.
    ///
    /// Backslashes are normalized to forward slashes. The root URL is the
    /// directory containing the script.
    pub fn derive(host: &str, script_name: &str, app: &str) -> Self {
        let entry = format!("{SCHEME}{host}{script_name}").replace('\\', "/");
        let root = dirname(&entry).to_string();
        let public = format!("{root}/Public");
        let app = format!("{root}/{app}");
        let view = format!("{app}/View");

        Self {
            root,
            public,
            app,
            view,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn public(&self) -> &str {
        &self.public
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn view(&self) -> &str {
        &self.view
    }
}

/// Parent of the last path segment, never cutting into the scheme or host.
fn dirname(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) if idx >= SCHEME.len() => &trimmed[..idx],
        _ => trimmed,
    }
}
