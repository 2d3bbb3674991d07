//! A small web framework on top of `sprout-http`.
//!
//! Requests flow through three layers:
//!
//! 1. the [`App`] facade, which answers static assets directly and hands everything
//!    else to
//! 2. the middleware chain, built once from the registered [`middleware::Middleware`]s,
//!    whose innermost target is
//! 3. the [`Dispatcher`], which matches the path against the [`Router`] and invokes the
//!    route's handler with a fresh [`Response`].
//!
//! The filled in response is turned into bytes by [`Response::emit`].
//!
//! # Example
//!
//! ```no_run
//! use http::Method;
//! use sprout_web::{App, PathParams, Request, Response, Server, class_handler, handler_fn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut builder = App::builder();
//!
//!     builder
//!         .route("/home", handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
//!             resp.text = Some("Hello from the HOME page".into());
//!         }))?
//!         .add_route(
//!             "/hello/{name}",
//!             handler_fn(|_: &Request, resp: &mut Response, params: &PathParams| {
//!                 resp.text = Some(format!("Hello, {}", params.get("name").unwrap_or_default()));
//!             }),
//!             [Method::GET],
//!         )?
//!         .route(
//!             "/book",
//!             class_handler().get(handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
//!                 resp.text = Some("Books Page".into());
//!             })),
//!         )?;
//!
//!     Server::builder().app(builder.build()).address("127.0.0.1:8080").build()?.start().await?;
//!     Ok(())
//! }
//! ```

mod app;
mod dispatcher;
mod handler;
mod request;
mod response;
mod server;

pub mod date;
pub mod middleware;
pub mod router;
pub mod settings;
pub mod static_files;
pub mod template;

pub use app::App;
pub use app::AppBuilder;
pub use dispatcher::Dispatch;
pub use dispatcher::DispatchError;
pub use dispatcher::Dispatcher;
pub use dispatcher::ExceptionHandler;
pub use handler::AsyncFnHandler;
pub use handler::ClassHandler;
pub use handler::Endpoint;
pub use handler::FnHandler;
pub use handler::HandlerError;
pub use handler::HandlerOutcome;
pub use handler::IntoEndpoint;
pub use handler::RequestHandler;
pub use handler::async_handler_fn;
pub use handler::class_handler;
pub use handler::handler_fn;
pub use request::ExtractError;
pub use request::PathParams;
pub use request::Request;
pub use response::Emitted;
pub use response::Response;
pub use router::AllowedMethods;
pub use router::RegistrationError;
pub use router::Router;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
pub use settings::Settings;
