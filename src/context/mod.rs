//! Per-request application context.

use std::collections::BTreeSet;

use crate::config::{CoreSettings, Settings};
use crate::router::RequestTarget;
use crate::session::Session;
use crate::urls::Urls;
use crate::Error;

/// Everything a request reads after bootstrap: merged settings, the routed
/// target, derived URLs and the session.
///
/// Built once per request and passed by reference to the components that
/// need it. Settings and URLs are read-only after [`build`](AppContextBuilder::build).
///
/// ## Example
///
/// ```
/// use dragon_mvc::{AppContext, Config, RequestTarget, Urls};
///
/// let settings = Config::builder().with_framework_defaults().build()?;
/// let ctx = AppContext::builder()
///     .with_settings(settings)
///     .with_target(RequestTarget::new("Home", "Index", "index"))
///     .with_urls(Urls::derive("example.com", "/index.php", "Home"))
///     .build()?;
///
/// assert_eq!(ctx.time_zone(), "UTC");
/// # Ok::<(), dragon_mvc::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext {
    settings: Settings,
    core: CoreSettings,
    target: RequestTarget,
    urls: Urls,
    session: Option<Session>,
    libraries: BTreeSet<String>,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn core(&self) -> &CoreSettings {
        &self.core
    }

    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    pub fn urls(&self) -> &Urls {
        &self.urls
    }

    /// The configured `DEFAULT_TIME_ZONE` for this request.
    pub fn time_zone(&self) -> &str {
        &self.core.time_zone
    }

    pub fn debug(&self) -> bool {
        self.core.debug
    }

    /// The session, present only when `SESSION_AUTO_START` is on.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Marks a user library as loaded. Returns `false` if it already was.
    pub(crate) fn mark_library_loaded(&mut self, file: &str) -> bool {
        self.libraries.insert(file.to_string())
    }

    pub fn library_loaded(&self, file: &str) -> bool {
        self.libraries.contains(file)
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    settings: Option<Settings>,
    target: Option<RequestTarget>,
    urls: Option<Urls>,
    session_id: Option<String>,
}

impl AppContextBuilder {
    /// Attaches the fully merged settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_target(mut self, target: RequestTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_urls(mut self, urls: Urls) -> Self {
        self.urls = Some(urls);
        self
    }

    /// Session id carried by the request, resumed if a session is started.
    pub fn with_session_id(mut self, id: Option<String>) -> Self {
        self.session_id = id;
        self
    }

    /// Builds the `AppContext`.
    ///
    /// Reads the core settings and starts a session if `SESSION_AUTO_START`
    /// is set. Returns an error if a part is missing or a core key is invalid.
    pub fn build(self) -> Result<AppContext, Error> {
        let settings = self.settings.ok_or(Error::MissingContext("settings"))?;
        let target = self.target.ok_or(Error::MissingContext("a request target"))?;
        let urls = self.urls.ok_or(Error::MissingContext("request urls"))?;
        let core = settings.core()?;

        let session = core
            .session_auto_start
            .then(|| Session::start(self.session_id.as_deref()));

        Ok(AppContext {
            settings,
            core,
            target,
            urls,
            session,
            libraries: BTreeSet::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn settings(toml_str: &str) -> Settings {
        Config::builder()
            .with_framework_defaults()
            .with_table(toml::from_str(toml_str).unwrap())
            .build()
            .unwrap()
    }

    fn build(settings: Settings) -> Result<AppContext, Error> {
        AppContext::builder()
            .with_settings(settings)
            .with_target(RequestTarget::new("Home", "Index", "index"))
            .with_urls(Urls::derive("example.com", "/index.php", "Home"))
            .with_session_id(Some("sess-1".into()))
            .build()
    }

    #[test]
    fn test_session_started_when_enabled() {
        let ctx = build(settings("SESSION_AUTO_START = true")).unwrap();
        assert_eq!(ctx.session().map(Session::id), Some("sess-1"));
    }

    #[test]
    fn test_no_session_when_disabled() {
        let ctx = build(settings("SESSION_AUTO_START = false")).unwrap();
        assert!(ctx.session().is_none());
    }

    #[test]
    fn test_time_zone_from_settings() {
        let ctx = build(settings(r#"DEFAULT_TIME_ZONE = "Asia/Shanghai""#)).unwrap();
        assert_eq!(ctx.time_zone(), "Asia/Shanghai");
    }

    #[test]
    fn test_missing_target() {
        let result = AppContext::builder()
            .with_settings(settings(""))
            .with_urls(Urls::derive("example.com", "/index.php", "Home"))
            .build();
        assert!(matches!(result, Err(Error::MissingContext(_))));
    }

    #[test]
    fn test_invalid_core_key_is_config_error() {
        let result = build(settings("SESSION_AUTO_START = \"yes\""));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
