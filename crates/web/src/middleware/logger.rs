use crate::middleware::Middleware;
use crate::{Request, Response};
use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

#[derive(Clone, Copy)]
struct Started(Instant);

/// Logs one line per request with its method, path, status and elapsed time
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn before(&self, req: &mut Request) {
        req.extensions_mut().insert(Started(Instant::now()));
    }

    async fn after(&self, req: &Request, resp: &mut Response) {
        let elapsed = req.extensions().get::<Started>().map(|started| started.0.elapsed()).unwrap_or_default();
        info!(
            method = %req.method(),
            path = req.path(),
            status = resp.status_code.as_u16(),
            elapsed = ?elapsed,
            "request served"
        );
    }
}
