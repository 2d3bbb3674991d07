//! A small asynchronous HTTP/1.1 transport
//!
//! This crate is the transport layer underneath `sprout-web`. It reads requests off a
//! byte stream, hands each one to a [`handler::Handler`] as a fully buffered
//! `http::Request<Bytes>`, and writes the returned `http::Response<Bytes>` back.
//!
//! It deliberately stays small: request bodies are read by `Content-Length` only,
//! responses are always sent with a `Content-Length`, and connections are kept alive
//! until the peer closes them or asks for `Connection: close`.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::{Request, Response, StatusCode};
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use sprout_http::connection::HttpConnection;
//! use sprout_http::handler::make_handler;
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = Arc::clone(&handler);
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process(handler).await {
//!                 error!("service has error, cause {}, connection shutdown", e);
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request<Bytes>) -> Result<Response<Bytes>, Infallible> {
//!     info!(path = request.uri().path(), "request received");
//!     Ok(Response::builder().status(StatusCode::OK).body(Bytes::from_static(b"Hello World!\r\n")).unwrap())
//! }
//! ```
//!
//! # Modules
//!
//! - [`connection`]: the per-connection read/dispatch/write loop
//! - [`codec`]: request decoding and response encoding
//! - [`handler`]: the [`handler::Handler`] trait the connection dispatches to
//! - [`protocol`]: error types
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - no chunked request bodies
//! - maximum header size: 8KB, maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
