//! HTTP codec module for decoding requests and encoding responses
//!
//! - [`RequestDecoder`]: turns raw bytes into a buffered `http::Request<Bytes>`
//! - [`ResponseEncoder`]: turns an `http::Response<Bytes>` into raw bytes
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use sprout_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.uri().path(), "/hello");
//! ```

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
