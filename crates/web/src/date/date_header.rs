use crate::date::DateService;
use crate::middleware::Middleware;
use crate::{Request, Response};
use async_trait::async_trait;
use http::header::DATE;

/// Adds an RFC 7231 `Date` header to every response passing through it.
///
/// The value comes from the shared [`DateService`], so no time formatting happens per
/// request. The service starts with the first response stamped inside a tokio runtime;
/// outside of one the date is formatted on each call.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateHeader;

impl DateHeader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Middleware for DateHeader {
    async fn after(&self, _req: &Request, resp: &mut Response) {
        let date = match tokio::runtime::Handle::try_current() {
            Ok(_) => DateService::global().http_date(),
            Err(_) => DateService::uncached_http_date(),
        };
        if let Some(date) = date {
            resp.headers.insert(DATE, date);
        }
    }
}
