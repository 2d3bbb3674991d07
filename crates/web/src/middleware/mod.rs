//! Middleware wrapping the dispatcher.
//!
//! A [`Middleware`] gets a look at the request before it is dispatched and at the
//! response afterwards. The application composes its middleware once, at build time,
//! into a chain of [`MiddlewareLink`]s. The middleware added last is the outermost
//! link: its `before` runs first and its `after` runs last.
//!
//! ```text
//!   add(A), add(B)
//!
//!   B.before -> A.before -> dispatcher -> A.after -> B.after
//! ```

mod logger;

pub use logger::RequestLogger;

use crate::dispatcher::{Dispatch, DispatchError};
use crate::{Request, Response};
use async_trait::async_trait;

#[async_trait]
pub trait Middleware: Send + Sync {
    /// Runs before the request reaches the inner target
    async fn before(&self, _req: &mut Request) {}

    /// Runs after the inner target produced a response
    async fn after(&self, _req: &Request, _resp: &mut Response) {}
}

/// One middleware bound to the target it wraps
pub struct MiddlewareLink {
    middleware: Box<dyn Middleware>,
    inner: Box<dyn Dispatch>,
}

impl MiddlewareLink {
    pub fn new(middleware: Box<dyn Middleware>, inner: Box<dyn Dispatch>) -> Self {
        Self { middleware, inner }
    }
}

#[async_trait]
impl Dispatch for MiddlewareLink {
    async fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        self.middleware.before(req).await;
        // an error skips `after` and travels up the chain untouched
        let mut resp = self.inner.handle(req).await?;
        self.middleware.after(req, &mut resp).await;
        Ok(resp)
    }
}

/// Folds `middlewares` around `target` in insertion order, so the last one ends up outermost
pub fn compose(target: Box<dyn Dispatch>, middlewares: Vec<Box<dyn Middleware>>) -> Box<dyn Dispatch> {
    middlewares
        .into_iter()
        .fold(target, |inner, middleware| Box::new(MiddlewareLink::new(middleware, inner)) as Box<dyn Dispatch>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        journal: Journal,
    }

    #[async_trait]
    impl Middleware for Recording {
        async fn before(&self, _req: &mut Request) {
            self.journal.lock().unwrap().push(format!("before {}", self.name));
        }

        async fn after(&self, _req: &Request, _resp: &mut Response) {
            self.journal.lock().unwrap().push(format!("after {}", self.name));
        }
    }

    struct Target {
        journal: Journal,
        fail: bool,
    }

    #[async_trait]
    impl Dispatch for Target {
        async fn handle(&self, _req: &mut Request) -> Result<Response, DispatchError> {
            self.journal.lock().unwrap().push("dispatch".into());
            if self.fail {
                return Err(DispatchError::Handler("boom".into()));
            }
            Ok(Response::new())
        }
    }

    fn chain(journal: &Journal, fail: bool) -> Box<dyn Dispatch> {
        let a = Box::new(Recording { name: "A", journal: journal.clone() });
        let b = Box::new(Recording { name: "B", journal: journal.clone() });
        compose(Box::new(Target { journal: journal.clone(), fail }), vec![a, b])
    }

    fn request() -> Request {
        http::Request::new(Bytes::new()).into()
    }

    #[tokio::test]
    async fn last_added_is_outermost() {
        let journal = Journal::default();

        chain(&journal, false).handle(&mut request()).await.unwrap();

        assert_eq!(*journal.lock().unwrap(), ["before B", "before A", "dispatch", "after A", "after B"]);
    }

    #[tokio::test]
    async fn error_skips_after_hooks() {
        let journal = Journal::default();

        let result = chain(&journal, true).handle(&mut request()).await;

        assert!(matches!(result, Err(DispatchError::Handler(_))));
        assert_eq!(*journal.lock().unwrap(), ["before B", "before A", "dispatch"]);
    }

    #[tokio::test]
    async fn default_hooks_are_noops() {
        struct Silent;
        impl Middleware for Silent {}

        let target = Box::new(Target { journal: Journal::default(), fail: false });
        let resp = compose(target, vec![Box::new(Silent)]).handle(&mut request()).await.unwrap();
        assert_eq!(resp.status_code, http::StatusCode::OK);
    }
}
