use http::{Method, StatusCode};
use serde_json::json;
use sprout_web::date::DateHeader;
use sprout_web::middleware::RequestLogger;
use sprout_web::template::{TemplateError, TemplateRenderer, render_with};
use sprout_web::{
    App, AppBuilder, DispatchError, PathParams, RegistrationError, Request, Response, Server, class_handler,
    handler_fn,
};
use std::io;
use std::sync::Arc;
use tracing::error;

fn custom_exception(_req: &Request, resp: &mut Response, _err: &DispatchError) {
    resp.text = Some("Ups, something went wrong!".into());
    resp.status_code = StatusCode::NOT_FOUND;
}

fn routes(builder: &mut AppBuilder, renderer: Arc<dyn TemplateRenderer>) -> Result<(), RegistrationError> {
    builder
        .route(
            "/home",
            handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                resp.text = Some("This is home page".into());
            }),
        )?
        .add_route(
            "/about",
            handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                resp.text = Some("This is about page".into());
            }),
            [Method::POST],
        )?
        .route(
            "/hello/{name}",
            handler_fn(|_: &Request, resp: &mut Response, params: &PathParams| {
                resp.text = Some(format!("Hello, {}", params.get("name").unwrap_or_default()));
            }),
        )?
        .route(
            "/do_staff",
            class_handler()
                .get(handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                    resp.text = Some("Doing the staff".into());
                }))
                .post(handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                    resp.text = Some("Posting the staff".into());
                })),
        )?
        .route(
            "/template",
            handler_fn(move |_: &Request, resp: &mut Response, _: &PathParams| -> Result<(), TemplateError> {
                resp.html = Some(render_with(renderer.as_ref(), "index.html", json!({"title": "Sprout", "name": "Eli"}))?);
                Ok(())
            }),
        )?
        .route(
            "/exception",
            handler_fn(|_: &Request, _: &mut Response, _: &PathParams| -> Result<(), io::Error> {
                Err(io::Error::other("raised on purpose"))
            }),
        )?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let mut builder = App::builder();
    builder.add_exception_handler(custom_exception).add_middleware(RequestLogger).add_middleware(DateHeader::new());

    let renderer = builder.renderer();
    if let Err(e) = routes(&mut builder, renderer) {
        error!(cause = %e, "failed to register routes");
        return;
    }

    let server = match Server::builder().app(builder.build()).address("127.0.0.1:3000").build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "failed to build server");
            return;
        }
    };

    if let Err(e) = server.start().await {
        error!(cause = %e, "server stopped");
    }
}
