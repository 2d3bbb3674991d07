//! Cached HTTP `Date` header values.
//!
//! Formatting the current time for every response is wasteful, so a [`DateService`]
//! keeps the formatted value in an [`ArcSwap`] and refreshes it from a background
//! task. [`DateHeader`] is the middleware that stamps responses with it.

use arc_swap::ArcSwap;
use bytes::Bytes;
use http::HeaderValue;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

mod date_header;

pub use date_header::DateHeader;

/// Maintains the current HTTP date string, refreshed every `update_interval`.
pub struct DateService {
    current: Arc<ArcSwap<Bytes>>,
    handle: tokio::task::JoinHandle<()>,
}

static DATE_SERVICE: Lazy<DateService> = Lazy::new(|| DateService::with_update_interval(Duration::from_millis(800)));

fn now() -> Bytes {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    Bytes::from_owner(buf)
}

impl DateService {
    /// The process wide instance, started on first use.
    ///
    /// Must be first called from within a tokio runtime.
    pub fn global() -> &'static DateService {
        &DATE_SERVICE
    }

    pub fn with_update_interval(update_interval: Duration) -> Self {
        let current = Arc::new(ArcSwap::from_pointee(now()));
        let current_arc = Arc::clone(&current);

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(update_interval).await;
                current_arc.store(Arc::new(now()));
            }
        });

        DateService { current, handle }
    }

    /// The current date as a header value, `None` if it could not be encoded
    pub fn http_date(&self) -> Option<HeaderValue> {
        to_header_value(self.current.load().as_ref().clone())
    }

    /// Formats the date right now, bypassing the cache
    pub fn uncached_http_date() -> Option<HeaderValue> {
        to_header_value(now())
    }
}

fn to_header_value(date: Bytes) -> Option<HeaderValue> {
    HeaderValue::from_maybe_shared(date).map_err(|e| warn!(cause = %e, "invalid http date")).ok()
}

impl Drop for DateService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
