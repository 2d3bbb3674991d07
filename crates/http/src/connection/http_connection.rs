use bytes::Bytes;
use std::error::Error;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use http::{Request, Response, StatusCode, Version, header};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::HttpError;

/// An HTTP connection that reads requests and writes responses
///
/// # Type Parameters
///
/// * `R`: The async readable half
/// * `W`: The async writable half
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        loop {
            match self.framed_read.next().await {
                Some(Ok(request)) => {
                    let keep_alive = is_keep_alive(&request);
                    let response = match handler.call(request).await {
                        Ok(response) => response,
                        Err(e) => {
                            let e: Box<dyn Error + Send + Sync> = e.into();
                            error!(cause = %e, "handler failed, respond with internal server error");
                            build_error_response(StatusCode::INTERNAL_SERVER_ERROR)
                        }
                    };

                    self.framed_write.send(response).await?;

                    if !keep_alive {
                        info!("client asked to close, connection shutdown");
                        return Ok(());
                    }
                }

                Some(Err(e)) => {
                    error!("can't receive next request, cause {}", e);
                    let error_response = build_error_response(StatusCode::BAD_REQUEST);
                    self.framed_write.send(error_response).await?;
                    return Err(e.into());
                }

                None => {
                    info!("cant read more request, break this connection down");
                    return Ok(());
                }
            }
        }
    }
}

fn is_keep_alive(request: &Request<Bytes>) -> bool {
    let connection = request.headers().get(header::CONNECTION).and_then(|v| v.to_str().ok());
    match connection {
        Some(value) if value.eq_ignore_ascii_case("close") => false,
        Some(value) if value.eq_ignore_ascii_case("keep-alive") => true,
        _ => request.version() != Version::HTTP_10,
    }
}

fn build_error_response(status_code: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(status_code.canonical_reason().unwrap_or_default()));
    *response.status_mut() = status_code;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::make_handler;
    use std::convert::Infallible;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn echo_path(req: Request<Bytes>) -> Result<Response<Bytes>, Infallible> {
        Ok(Response::new(Bytes::from(req.uri().path().to_string())))
    }

    async fn failing(_req: Request<Bytes>) -> Result<Response<Bytes>, std::io::Error> {
        Err(std::io::Error::other("boom"))
    }

    async fn roundtrip<H: Handler + 'static>(handler: H, raw: &'static [u8]) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let task = tokio::spawn(HttpConnection::new(server_read, server_write).process(Arc::new(handler)));

        let (mut client_read, mut client_write) = tokio::io::split(client);
        client_write.write_all(raw).await.unwrap();
        client_write.shutdown().await.unwrap();

        let mut out = String::new();
        client_read.read_to_string(&mut out).await.unwrap();
        let _ = task.await.unwrap();
        out
    }

    #[tokio::test]
    async fn serves_keep_alive_requests_in_order() {
        let out = roundtrip(make_handler(echo_path), b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n").await;

        let first = out.find("\r\n\r\n/a").unwrap();
        let second = out.find("\r\n\r\n/b").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn closes_when_asked() {
        let out = roundtrip(
            make_handler(echo_path),
            b"GET /a HTTP/1.1\r\nConnection: close\r\n\r\nGET /b HTTP/1.1\r\n\r\n",
        )
        .await;

        assert!(out.ends_with("/a"));
    }

    #[tokio::test]
    async fn handler_error_is_internal_server_error() {
        let out = roundtrip(make_handler(failing), b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        assert!(out.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    }

    #[tokio::test]
    async fn malformed_request_is_bad_request() {
        let out = roundtrip(make_handler(echo_path), b"POST / HTTP/1.1\r\nContent-Length: x\r\n\r\n").await;
        assert!(out.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }
}
