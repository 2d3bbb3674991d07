//! Turns a request into a [`Response`] using the route table.
//!
//! The [`Dispatcher`] is the innermost target of the middleware chain. A path without
//! a route is answered with `404 Not Found`; a verb the route does not accept and any
//! handler failure become a [`DispatchError`], which is handed to the exception hook
//! when one is installed and returned to the caller otherwise.

use crate::handler::{Endpoint, HandlerError, RequestHandler};
use crate::router::Router;
use crate::{Request, Response};
use async_trait::async_trait;
use http::Method;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("method `{method}` is not allowed for `{path}`")]
    MethodNotAllowed { method: Method, path: String },

    #[error("handler failed: {0}")]
    Handler(HandlerError),
}

/// Something that can answer a request: the dispatcher itself or a middleware link
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn handle(&self, req: &mut Request) -> Result<Response, DispatchError>;
}

/// The application wide exception hook.
///
/// It receives every fault raised while dispatching and may shape the response, e.g.
/// setting `resp.text`. Any `Fn(&Request, &mut Response, &DispatchError)` qualifies.
pub trait ExceptionHandler: Send + Sync {
    fn handle(&self, req: &Request, resp: &mut Response, err: &DispatchError);
}

impl<F> ExceptionHandler for F
where
    F: Fn(&Request, &mut Response, &DispatchError) + Send + Sync,
{
    fn handle(&self, req: &Request, resp: &mut Response, err: &DispatchError) {
        (self)(req, resp, err)
    }
}

pub struct Dispatcher {
    router: Arc<Router>,
    exception_handler: Option<Arc<dyn ExceptionHandler>>,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>, exception_handler: Option<Arc<dyn ExceptionHandler>>) -> Self {
        Self { router, exception_handler }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    async fn dispatch(&self, req: &Request, resp: &mut Response) -> Result<(), DispatchError> {
        let Some(matched) = self.router.at(req.path()) else {
            debug!(path = req.path(), "no route matched");
            resp.not_found();
            return Ok(());
        };

        debug!(path = req.path(), pattern = matched.entry.pattern().as_str(), "route matched");

        let handler: &dyn RequestHandler = match matched.entry.endpoint() {
            Endpoint::Class(class) => class.handler_for(req.method()),
            Endpoint::Function(handler) => {
                matched.entry.allowed_methods().contains(req.method()).then_some(handler.as_ref())
            }
        }
        .ok_or_else(|| DispatchError::MethodNotAllowed { method: req.method().clone(), path: req.path().to_owned() })?;

        handler.invoke(req, resp, &matched.params).await.map_err(DispatchError::Handler)
    }
}

#[async_trait]
impl Dispatch for Dispatcher {
    async fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        let mut resp = Response::new();

        match self.dispatch(req, &mut resp).await {
            Ok(()) => Ok(resp),
            Err(err) => match &self.exception_handler {
                Some(exception_handler) => {
                    warn!(cause = %err, path = req.path(), "dispatch failed, pass to exception handler");
                    exception_handler.handle(req, &mut resp, &err);
                    Ok(resp)
                }
                None => Err(err),
            },
        }
    }
}
