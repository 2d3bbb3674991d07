//! HTTP connection handling
//!
//! [`HttpConnection`] drives one client connection: it decodes requests, dispatches
//! each to a [`crate::handler::Handler`] and writes the responses back in order,
//! until the peer goes away or asks to close.

mod http_connection;

pub use http_connection::HttpConnection;
