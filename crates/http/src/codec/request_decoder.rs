//! HTTP request decoder
//!
//! The decoder works in two phases:
//!
//! 1. parse the request line and headers with `httparse`
//! 2. wait until the whole `Content-Length` body is buffered
//!
//! Only then is a request yielded, so handlers always see a complete body.

use std::mem;

use bytes::{Buf, Bytes, BytesMut};
use http::request::Parts;
use http::{HeaderName, HeaderValue, Request, header};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Maximum size in bytes allowed for a request body
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// A decoder for HTTP requests with `Content-Length` delimited bodies
///
/// # State Machine
///
/// - `Header`: waiting for a complete header section
/// - `Body`: header parsed, waiting for `remaining` body bytes
#[derive(Debug, Default)]
pub struct RequestDecoder {
    state: DecodeState,
}

#[derive(Debug, Default)]
enum DecodeState {
    #[default]
    Header,
    Body {
        parts: Parts,
        length: usize,
    },
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for RequestDecoder {
    type Item = Request<Bytes>;
    type Error = ParseError;

    /// Attempts to decode one HTTP request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: header and body are complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: the request is malformed or exceeds a limit
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match mem::take(&mut self.state) {
            DecodeState::Header => match decode_header(src)? {
                Some((parts, 0)) => Ok(Some(Request::from_parts(parts, Bytes::new()))),
                Some((parts, length)) => {
                    self.state = DecodeState::Body { parts, length };
                    self.decode(src)
                }
                None => Ok(None),
            },

            DecodeState::Body { parts, length } => {
                if src.len() >= length {
                    let body = src.split_to(length).freeze();
                    trace!(body_size = length, "request body received");
                    return Ok(Some(Request::from_parts(parts, body)));
                }

                src.reserve(length - src.len());
                self.state = DecodeState::Body { parts, length };
                Ok(None)
            }
        }
    }
}

/// Parses the header section, consuming it from `src` on success.
///
/// Returns the request parts together with the announced body length.
fn decode_header(src: &mut BytesMut) -> Result<Option<(Parts, usize)>, ParseError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
    let mut req = httparse::Request::new(&mut headers);

    let parsed = req.parse(src).map_err(|e| match e {
        Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
        e => ParseError::invalid_header(e.to_string()),
    })?;

    let header_size = match parsed {
        Status::Complete(header_size) => header_size,
        Status::Partial => {
            ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
            return Ok(None);
        }
    };

    ensure!(header_size <= MAX_HEADER_BYTES, ParseError::too_large_header(header_size, MAX_HEADER_BYTES));

    let version = match req.version {
        Some(0) => http::Version::HTTP_10,
        Some(1) => http::Version::HTTP_11,
        v => return Err(ParseError::InvalidVersion(v)),
    };

    let mut builder = Request::builder()
        .method(req.method.ok_or(ParseError::InvalidMethod)?)
        .uri(req.path.ok_or(ParseError::InvalidUri)?)
        .version(version);

    for h in req.headers.iter() {
        let name = HeaderName::from_bytes(h.name.as_bytes()).map_err(ParseError::invalid_header)?;
        let value = HeaderValue::from_bytes(h.value).map_err(ParseError::invalid_header)?;
        builder = builder.header(name, value);
    }

    let (parts, ()) = builder.body(()).map_err(ParseError::invalid_header)?.into_parts();

    if let Some(encoding) = parts.headers.get(header::TRANSFER_ENCODING) {
        let encoding = String::from_utf8_lossy(encoding.as_bytes());
        return Err(ParseError::unsupported_transfer_encoding(encoding));
    }

    let length = content_length(&parts)?;
    ensure!(length <= MAX_BODY_BYTES, ParseError::too_large_body(length, MAX_BODY_BYTES));

    trace!(header_size, body_size = length, "parsed request header");
    src.advance(header_size);
    Ok(Some((parts, length)))
}

fn content_length(parts: &Parts) -> Result<usize, ParseError> {
    let Some(value) = parts.headers.get(header::CONTENT_LENGTH) else {
        return Ok(0);
    };

    value
        .to_str()
        .map_err(ParseError::invalid_content_length)?
        .trim()
        .parse::<usize>()
        .map_err(ParseError::invalid_content_length)
}
