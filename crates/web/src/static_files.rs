//! Static asset serving.
//!
//! Requests whose path starts with the application's static prefix bypass routing and
//! are answered by a [`StaticFiles`] implementation with the prefix already stripped.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Response, StatusCode};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaticFiles: Send + Sync {
    /// Answers the asset at `path`, e.g. `/css/main.css`
    async fn serve(&self, path: &str) -> Response<Bytes>;
}

/// Serves files below a root directory
#[derive(Debug, Clone)]
pub struct StaticDir {
    root: PathBuf,
}

impl StaticDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // None when the file is missing, a directory, or resolves outside of the root.
    // `path` is still percent-encoded; the traversal check runs on the decoded form.
    async fn resolve(&self, path: &str) -> Option<PathBuf> {
        let decoded = percent_decode_path(path)?;

        let root = match fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) => {
                warn!(cause = %e, root = %self.root.display(), "static directory is not accessible");
                return None;
            }
        };

        let file = fs::canonicalize(self.root.join(decoded.trim_start_matches('/'))).await.ok()?;
        if !file.starts_with(&root) {
            warn!(path, resolved = %file.display(), "path traversal attempt blocked");
            return None;
        }

        fs::metadata(&file).await.ok().filter(|meta| meta.is_file()).map(|_| file)
    }
}

#[async_trait]
impl StaticFiles for StaticDir {
    async fn serve(&self, path: &str) -> Response<Bytes> {
        let Some(file) = self.resolve(path).await else {
            debug!(path, "static file not found");
            return not_found();
        };

        match fs::read(&file).await {
            Ok(content) => {
                let mut response = Response::new(Bytes::from(content));
                match HeaderValue::from_str(content_type(&file).as_ref()) {
                    Ok(value) => {
                        response.headers_mut().insert(CONTENT_TYPE, value);
                    }
                    Err(e) => warn!(cause = %e, file = %file.display(), "can't encode content type"),
                }
                response
            }
            Err(e) => {
                warn!(cause = %e, file = %file.display(), "failed to read static file");
                not_found()
            }
        }
    }
}

/// Decodes `%XX` escapes in a URL path. `+` stays literal since it only means space in
/// query strings. Malformed escapes are kept as is; `None` if the result isn't UTF-8.
fn percent_decode_path(path: &str) -> Option<Cow<'_, str>> {
    if !path.contains('%') {
        return Some(Cow::Borrowed(path));
    }

    let bytes = path.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            decoded.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(decoded).ok().map(Cow::Owned)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn not_found() -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(b"Not Found"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

/// Content type by file extension
pub fn content_type(file: &Path) -> mime::Mime {
    let extension = file.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("html" | "htm") => mime::TEXT_HTML_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("txt" | "md") => mime::TEXT_PLAIN_UTF_8,
        Some("csv") => mime::TEXT_CSV_UTF_8,
        Some("xml") => mime::TEXT_XML,
        Some("js" | "mjs") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("json") => mime::APPLICATION_JSON,
        Some("pdf") => mime::APPLICATION_PDF,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("bmp") => mime::IMAGE_BMP,
        Some("svg") => mime::IMAGE_SVG,
        Some("woff") => mime::FONT_WOFF,
        Some("woff2") => mime::FONT_WOFF2,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
