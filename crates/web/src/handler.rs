//! Request handlers.
//!
//! A handler receives the request, the per-request [`Response`] it should fill in and
//! the parameters captured by the route. Two shapes can be registered on a route:
//!
//! - a function handler, usually a closure wrapped with [`handler_fn`], or with
//!   [`async_handler_fn`] when it has to await
//! - a [`ClassHandler`], a table of one handler per HTTP verb
//!
//! Both are unified by [`Endpoint`], which the router stores.

use crate::{PathParams, Request, Response};
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Method;
use std::error::Error;

/// Failure raised by a handler, surfaced to the exception hook
pub type HandlerError = Box<dyn Error + Send + Sync>;

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: &Request, resp: &mut Response, params: &PathParams) -> Result<(), HandlerError>;
}

/// What a handler closure may return: `()` or a `Result`
pub trait HandlerOutcome {
    fn into_result(self) -> Result<(), HandlerError>;
}

impl HandlerOutcome for () {
    #[inline]
    fn into_result(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<E: Into<HandlerError>> HandlerOutcome for Result<(), E> {
    #[inline]
    fn into_result(self) -> Result<(), HandlerError> {
        self.map_err(Into::into)
    }
}

/// A closure holder which implements [`RequestHandler`]
pub struct FnHandler<F> {
    f: F,
}

/// Wraps `f` so it can be registered as a route endpoint.
///
/// ```
/// use sprout_web::{PathParams, Request, Response, handler_fn};
///
/// let hello = handler_fn(|_req: &Request, resp: &mut Response, params: &PathParams| {
///     resp.text = Some(format!("Hello, {}", params.get("name").unwrap_or("world")));
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<F, R>(f: F) -> FnHandler<F>
where
    F: Fn(&Request, &mut Response, &PathParams) -> R + Send + Sync,
    R: HandlerOutcome,
{
    FnHandler { f }
}

#[async_trait]
impl<F, R> RequestHandler for FnHandler<F>
where
    F: Fn(&Request, &mut Response, &PathParams) -> R + Send + Sync,
    R: HandlerOutcome + 'static,
{
    async fn invoke(&self, req: &Request, resp: &mut Response, params: &PathParams) -> Result<(), HandlerError> {
        (self.f)(req, resp, params).into_result()
    }
}

/// An async closure holder which implements [`RequestHandler`]
pub struct AsyncFnHandler<F> {
    f: F,
}

/// Wraps a closure returning a boxed future, for handlers that await I/O.
///
/// ```
/// use sprout_web::{HandlerError, async_handler_fn};
///
/// let hello = async_handler_fn(|_req, resp, _params| {
///     Box::pin(async move {
///         resp.text = Some("Hello".into());
///         Ok::<(), HandlerError>(())
///     })
/// });
/// # let _ = hello;
/// ```
pub fn async_handler_fn<F>(f: F) -> AsyncFnHandler<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Response, &'a PathParams) -> BoxFuture<'a, Result<(), HandlerError>>
        + Send
        + Sync,
{
    AsyncFnHandler { f }
}

#[async_trait]
impl<F> RequestHandler for AsyncFnHandler<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Response, &'a PathParams) -> BoxFuture<'a, Result<(), HandlerError>>
        + Send
        + Sync,
{
    async fn invoke(&self, req: &Request, resp: &mut Response, params: &PathParams) -> Result<(), HandlerError> {
        (self.f)(req, resp, params).await
    }
}

/// A handler object exposing one capability per HTTP verb.
///
/// Dispatch picks the capability named after the request method; a verb without one
/// is reported as method not allowed.
#[derive(Default)]
pub struct ClassHandler {
    methods: Vec<(Method, Box<dyn RequestHandler>)>,
}

/// Starts an empty [`ClassHandler`]
pub fn class_handler() -> ClassHandler {
    ClassHandler::default()
}

macro_rules! class_handler_method {
    ($name:ident, $method:ident) => {
        #[doc = concat!("Handles `", stringify!($method), "` requests with `handler`")]
        pub fn $name<H: RequestHandler + 'static>(self, handler: H) -> Self {
            self.method(Method::$method, handler)
        }
    };
}

impl ClassHandler {
    /// Handles `method` requests with `handler`, replacing a previous capability for it
    pub fn method<H: RequestHandler + 'static>(mut self, method: Method, handler: H) -> Self {
        self.methods.retain(|(existing, _)| *existing != method);
        self.methods.push((method, Box::new(handler)));
        self
    }

    class_handler_method!(get, GET);
    class_handler_method!(post, POST);
    class_handler_method!(put, PUT);
    class_handler_method!(patch, PATCH);
    class_handler_method!(delete, DELETE);
    class_handler_method!(options, OPTIONS);
    class_handler_method!(head, HEAD);

    /// The capability for `method`, matched case-insensitively
    pub fn handler_for(&self, method: &Method) -> Option<&dyn RequestHandler> {
        self.methods
            .iter()
            .find(|(verb, _)| verb.as_str().eq_ignore_ascii_case(method.as_str()))
            .map(|(_, handler)| handler.as_ref())
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().map(|(method, _)| method)
    }
}

/// What a route resolves to
pub enum Endpoint {
    Function(Box<dyn RequestHandler>),
    Class(ClassHandler),
}

pub trait IntoEndpoint {
    fn into_endpoint(self) -> Endpoint;
}

impl<H: RequestHandler + 'static> IntoEndpoint for H {
    fn into_endpoint(self) -> Endpoint {
        Endpoint::Function(Box::new(self))
    }
}

impl IntoEndpoint for ClassHandler {
    fn into_endpoint(self) -> Endpoint {
        Endpoint::Class(self)
    }
}

impl IntoEndpoint for Endpoint {
    fn into_endpoint(self) -> Endpoint {
        self
    }
}
