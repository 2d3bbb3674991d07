//! Request handling module that provides access to HTTP request information and path parameters.
//!
//! - [`Request`]: the inbound request as handlers and middleware see it
//! - [`PathParams`]: named segments captured from the matched route pattern

use bytes::Bytes;
use http::{Extensions, HeaderMap, Method, Uri, Version};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// An inbound request with a fully buffered body.
///
/// Middleware receives it mutably in [`crate::middleware::Middleware::before`] and
/// may rewrite headers or attach typed data through [`Request::extensions_mut`].
#[derive(Debug)]
pub struct Request {
    inner: http::Request<Bytes>,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("request has no query string")]
    MissingQuery,

    #[error("invalid query string: {source}")]
    Query {
        #[from]
        source: serde_qs::Error,
    },

    #[error("invalid form body: {source}")]
    Form {
        #[from]
        source: serde_urlencoded::de::Error,
    },

    #[error("invalid json body: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("request body is not utf8")]
    NotUtf8,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self { inner }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Returns the path component of the request URI
    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    /// Returns the raw request body
    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    pub fn extensions(&self) -> &Extensions {
        self.inner.extensions()
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        self.inner.extensions_mut()
    }

    /// Deserializes the query string, e.g. `?name=sprout&page=2`
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        let query = self.inner.uri().query().ok_or(ExtractError::MissingQuery)?;
        Ok(serde_qs::from_str(query)?)
    }

    /// Deserializes an `application/x-www-form-urlencoded` body
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        Ok(serde_urlencoded::from_bytes(self.body())?)
    }

    /// Deserializes an `application/json` body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        Ok(serde_json::from_slice(self.body())?)
    }

    /// Returns the body as utf8 text
    pub fn text(&self) -> Result<&str, ExtractError> {
        std::str::from_utf8(self.body()).map_err(|_utf8_error| ExtractError::NotUtf8)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(inner: http::Request<Bytes>) -> Self {
        Self::new(inner)
    }
}

/// Represents path parameters extracted from the URL path of an HTTP request.
///
/// For the pattern `/users/{id}` and the path `/users/42`, `get("id")` is `Some("42")`.
/// Parameters keep the order in which they appear in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: Vec<(String, String)>,
}

impl PathParams {
    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Gets the value of a path parameter by its name
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.params.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
