//! The request handler a connection dispatches to.

use async_trait::async_trait;
use bytes::Bytes;
use std::error::Error;
use std::future::Future;

use http::{Request, Response};

/// Handles one fully buffered request.
///
/// An `Err` is not sent to the peer as is: the connection logs it and answers
/// with `500 Internal Server Error`.
#[async_trait]
pub trait Handler: Send + Sync {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Self::Error>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<Err, F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Response<Bytes>, Err>> + Send,
{
    type Error = Err;

    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Self::Error> {
        (self.f)(req).await
    }
}

pub fn make_handler<F, Err, Ret>(f: F) -> HandlerFn<F>
where
    Err: Into<Box<dyn Error + Send + Sync>>,
    Ret: Future<Output = Result<Response<Bytes>, Err>>,
    F: Fn(Request<Bytes>) -> Ret,
{
    HandlerFn { f }
}
