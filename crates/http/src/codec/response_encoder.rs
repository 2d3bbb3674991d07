//! HTTP response encoder
//!
//! Serializes the status line, the headers and the buffered body of an
//! `http::Response<Bytes>`. The `Content-Length` header always reflects the body
//! actually written, whatever the handler put there.

use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderValue, Response, header};
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

use crate::protocol::SendError;

/// Initial buffer size reserved for the status line and headers
const INIT_HEADER_SIZE: usize = 4 * 1024;

#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<Response<Bytes>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut head, body) = item.into_parts();

        dst.reserve(INIT_HEADER_SIZE + body.len());
        write!(
            FastWrite(dst),
            "HTTP/1.1 {} {}\r\n",
            head.status.as_str(),
            head.status.canonical_reason().unwrap_or("Unknown")
        )?;

        head.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));

        for (header_name, header_value) in &head.headers {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        dst.put_slice(&body);
        Ok(())
    }
}

/// Writes formatted output straight into a `BytesMut`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
