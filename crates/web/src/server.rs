//! TCP server running an [`App`].
//!
//! ```no_run
//! use sprout_web::{App, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = App::builder().build();
//!     let server = match Server::builder().app(app).address("127.0.0.1:8080").build() {
//!         Ok(server) => server,
//!         Err(e) => return eprintln!("{e}"),
//!     };
//!     if let Err(e) = server.start().await {
//!         eprintln!("{e}");
//!     }
//! }
//! ```

use crate::app::App;
use sprout_http::connection::HttpConnection;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

pub struct ServerBuilder {
    app: Option<App>,
    address: Option<String>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { app: None, address: None }
    }

    /// Listen address; without it the app settings' `address` is used
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn app(mut self, app: App) -> Self {
        self.app = Some(app);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let app = self.app.ok_or(ServerBuildError::MissingApp)?;
        let address = self.address.unwrap_or_else(|| app.settings().address.clone());

        let resolved = address
            .to_socket_addrs()
            .map_err(|source| ServerBuildError::InvalidAddress { address: address.clone(), source })?
            .collect::<Vec<_>>();
        if resolved.is_empty() {
            return Err(ServerBuildError::InvalidAddress {
                address,
                source: io::Error::new(io::ErrorKind::AddrNotAvailable, "no address resolved"),
            });
        }

        Ok(Server { app: Arc::new(app), address: resolved })
    }
}

pub struct Server {
    app: Arc<App>,
    address: Vec<SocketAddr>,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("app must be set")]
    MissingApp,

    #[error("invalid address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: io::Error,
    },
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn address(&self) -> &[SocketAddr] {
        &self.address
    }

    /// Installs the log subscriber, binds and serves until the process stops.
    ///
    /// Only a failed bind returns; faults on single connections are logged.
    pub async fn start(self) -> io::Result<()> {
        init_logging(&self.app.settings().log_level);

        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e);
            }
        };

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let app = Arc::clone(&self.app);

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer);
                match connection.process(app).await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, "service has error, cause {}, connection shutdown", e);
                    }
                }
            });
        }
    }
}

fn init_logging(log_level: &str) {
    let parsed = log_level.parse::<Level>();

    let subscriber = FmtSubscriber::builder().with_max_level(*parsed.as_ref().unwrap_or(&Level::INFO)).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        warn!(cause = %e, "a global subscriber is already installed, keep it");
    }

    if let Err(e) = parsed {
        warn!(cause = %e, log_level, "invalid log level, fallback to info");
    }
}
