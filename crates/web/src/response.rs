//! The response a handler fills in.
//!
//! A [`Response`] is created fresh for every dispatched request. Handlers describe the
//! outcome by setting one of the convenience fields ([`Response::json`],
//! [`Response::html`], [`Response::text`]) or by writing [`Response::body`] and
//! [`Response::content_type`] directly. Nothing is serialized until
//! [`Response::emit`] resolves the fields into exactly one body and content type.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use tracing::warn;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";

/// Mutable outcome of one request.
#[derive(Debug, Clone)]
pub struct Response {
    pub json: Option<serde_json::Value>,
    pub html: Option<String>,
    pub text: Option<String>,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub status_code: StatusCode,
    pub headers: HeaderMap,
}

/// The resolved form of a [`Response`], ready to be written to the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    pub body: Bytes,
    pub content_type: String,
    pub status_code: StatusCode,
    pub headers: HeaderMap,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// An empty `200 OK` outcome
    pub fn new() -> Self {
        Self {
            json: None,
            html: None,
            text: None,
            body: Bytes::new(),
            content_type: None,
            status_code: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }

    /// Serializes `value` into [`Response::json`]
    pub fn set_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        self.json = Some(serde_json::to_value(value)?);
        Ok(())
    }

    pub fn set_status(&mut self, status_code: StatusCode) -> &mut Self {
        self.status_code = status_code;
        self
    }

    /// Inserts an additional response header
    pub fn header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Turns this outcome into the `404 Not Found` response
    pub fn not_found(&mut self) {
        self.status_code = StatusCode::NOT_FOUND;
        self.text = Some("Not Found".into());
    }

    /// Resolves the convenience fields into one body and content type.
    ///
    /// The fields are checked in the order json, html, text and every field that is set
    /// overwrites what an earlier one produced, so when a handler sets several of them
    /// text wins over html, and html wins over json. With none of them set, the raw
    /// body and content type are kept; a missing content type becomes `text/html`.
    pub fn emit(mut self) -> Emitted {
        if let Some(json) = &self.json {
            self.body = Bytes::from(json.to_string());
            self.content_type = Some(APPLICATION_JSON.into());
        }

        if let Some(html) = self.html.take() {
            self.body = Bytes::from(html);
            self.content_type = Some(TEXT_HTML.into());
        }

        if let Some(text) = self.text.take() {
            self.body = Bytes::from(text);
            self.content_type = Some(TEXT_PLAIN.into());
        }

        Emitted {
            body: self.body,
            content_type: self.content_type.unwrap_or_else(|| TEXT_HTML.into()),
            status_code: self.status_code,
            headers: self.headers,
        }
    }

    /// Emits the outcome as a wire response
    pub fn into_http(self) -> http::Response<Bytes> {
        self.emit().into()
    }
}

impl From<Emitted> for http::Response<Bytes> {
    fn from(emitted: Emitted) -> Self {
        let mut response = http::Response::new(emitted.body);
        *response.status_mut() = emitted.status_code;
        *response.headers_mut() = emitted.headers;

        match HeaderValue::from_str(&emitted.content_type) {
            Ok(value) => {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            Err(e) => warn!(cause = %e, content_type = %emitted.content_type, "drop invalid content type"),
        }

        response
    }
}
