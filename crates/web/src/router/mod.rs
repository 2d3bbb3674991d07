//! Path based routing.
//!
//! The [`Router`] keeps routes in registration order and resolves a path to the
//! first route whose pattern matches it entirely. Patterns are registered once, a
//! second registration of the same pattern string is rejected.

mod pattern;

pub use pattern::PathPattern;

use crate::PathParams;
use crate::handler::Endpoint;
use http::Method;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("route `{pattern}` is already registered")]
    DuplicateRoute { pattern: String },

    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl RegistrationError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: &str) -> Self {
        Self::InvalidPattern { pattern: pattern.to_owned(), reason: reason.to_owned() }
    }
}

/// The HTTP verbs a function handler accepts.
///
/// Verbs are compared case-insensitively with the request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods {
    methods: Vec<Method>,
}

impl Default for AllowedMethods {
    fn default() -> Self {
        Self::from(DEFAULT_METHODS)
    }
}

const DEFAULT_METHODS: [Method; 6] =
    [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS];

impl AllowedMethods {
    /// Builds the set from verb names such as `"get"` or `"POST"`, unknown tokens are skipped
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().filter_map(|name| Method::from_bytes(name.to_ascii_uppercase().as_bytes()).ok()).collect()
    }

    pub fn contains(&self, method: &Method) -> bool {
        self.methods.iter().any(|allowed| allowed.as_str().eq_ignore_ascii_case(method.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }
}

impl FromIterator<Method> for AllowedMethods {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut methods = Vec::new();
        for method in iter {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        Self { methods }
    }
}

impl<const N: usize> From<[Method; N]> for AllowedMethods {
    fn from(methods: [Method; N]) -> Self {
        methods.into_iter().collect()
    }
}

/// One registered route
pub struct RouteEntry {
    pattern: PathPattern,
    endpoint: Endpoint,
    allowed_methods: AllowedMethods,
}

impl RouteEntry {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn allowed_methods(&self) -> &AllowedMethods {
        &self.allowed_methods
    }
}

/// Result of matching a path: the winning route and what its placeholders captured
pub struct RouteMatch<'router> {
    pub entry: &'router RouteEntry,
    pub params: PathParams,
}

/// Ordered route table
#[derive(Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `endpoint` under `pattern`.
    ///
    /// `None` for `allowed_methods` means GET, POST, PUT, PATCH, DELETE and OPTIONS.
    pub fn register(
        &mut self,
        pattern: impl Into<String>,
        endpoint: Endpoint,
        allowed_methods: Option<AllowedMethods>,
    ) -> Result<(), RegistrationError> {
        let pattern = pattern.into();
        if self.routes.iter().any(|route| route.pattern.as_str() == pattern) {
            return Err(RegistrationError::DuplicateRoute { pattern });
        }

        let pattern = PathPattern::parse(pattern)?;
        trace!(pattern = pattern.as_str(), "register route");

        self.routes.push(RouteEntry { pattern, endpoint, allowed_methods: allowed_methods.unwrap_or_default() });
        Ok(())
    }

    /// Finds the first registered route matching `path`
    pub fn at(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find_map(|entry| entry.pattern.matches(path).map(|params| RouteMatch { entry, params }))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered patterns in registration order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.pattern.as_str())
    }
}
