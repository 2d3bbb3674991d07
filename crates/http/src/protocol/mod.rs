//! Protocol level types shared by the codec and the connection.
//!
//! - [`HttpError`]: top-level error returned by a connection
//! - [`ParseError`]: failures while decoding a request
//! - [`SendError`]: failures while encoding or writing a response

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
