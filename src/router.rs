//! Request input and the router seam.
//!
//! Routing itself lives outside the framework core. A [`Router`] runs after the
//! shared config layer is loaded and before the user layer, so it can read
//! configuration but the application it picks decides which user layer applies.

use std::collections::BTreeMap;

use crate::config::Settings;
use crate::Error;

/// The parts of an incoming request the bootstrap reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub host: String,
    pub script_name: String,
    pub query: BTreeMap<String, String>,
    pub session_id: Option<String>,
}

impl Request {
    pub fn new(host: impl Into<String>, script_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            script_name: script_name.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }
}

/// Application, controller and action chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    app: String,
    controller: String,
    action: String,
}

impl RequestTarget {
    pub fn new(
        app: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            app: app.into(),
            controller: controller.into(),
            action: action.into(),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Controller name with the `Controller` suffix, e.g. `User` -> `UserController`.
    pub fn controller_class(&self) -> String {
        format!("{}Controller", self.controller)
    }
}

/// Picks the target for a request.
pub trait Router {
    fn route(&self, request: &Request, settings: &Settings) -> Result<RequestTarget, Error>;
}

impl<F> Router for F
where
    F: Fn(&Request, &Settings) -> Result<RequestTarget, Error>,
{
    fn route(&self, request: &Request, settings: &Settings) -> Result<RequestTarget, Error> {
        self(request, settings)
    }
}

/// A fixed target routes every request to itself.
impl Router for RequestTarget {
    fn route(&self, _request: &Request, _settings: &Settings) -> Result<RequestTarget, Error> {
        Ok(self.clone())
    }
}
