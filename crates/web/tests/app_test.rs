use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, DATE};
use http::{Method, StatusCode};
use serde_json::json;
use sprout_web::date::DateHeader;
use sprout_web::middleware::Middleware;
use sprout_web::static_files::StaticDir;
use sprout_web::template::{TemplateError, Templates};
use sprout_web::{
    App, AppBuilder, DispatchError, HandlerError, PathParams, RegistrationError, Request, Response, Settings,
    async_handler_fn, class_handler, handler_fn,
};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn request(method: Method, path: &str) -> http::Request<Bytes> {
    http::Request::builder().method(method).uri(path).body(Bytes::new()).unwrap()
}

async fn get(app: &App, path: &str) -> http::Response<Bytes> {
    app.serve(request(Method::GET, path)).await.unwrap()
}

fn text(response: &http::Response<Bytes>) -> &str {
    std::str::from_utf8(response.body()).unwrap()
}

fn text_handler(body: &'static str) -> impl sprout_web::RequestHandler {
    handler_fn(move |_: &Request, resp: &mut Response, _: &PathParams| {
        resp.text = Some(body.into());
    })
}

fn raising() -> impl sprout_web::RequestHandler {
    handler_fn(|_: &Request, _: &mut Response, _: &PathParams| -> Result<(), io::Error> {
        Err(io::Error::other("raised"))
    })
}

fn ups(_: &Request, resp: &mut Response, _: &DispatchError) {
    resp.text = Some("Ups!".into());
}

#[test]
fn duplicate_route_is_rejected() {
    let mut builder = App::builder();
    builder.route("/about", text_handler("This is about page")).unwrap();

    let err = builder.route("/about", class_handler()).err().unwrap();
    assert_eq!(err, RegistrationError::DuplicateRoute { pattern: "/about".into() });
}

#[tokio::test]
async fn client_can_send_requests() {
    let mut builder = App::builder();
    builder.route("/about", text_handler("This is about page")).unwrap();
    let app = builder.build();

    let response = get(&app, "/about").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(&response), "This is about page");
}

#[tokio::test]
async fn requests_with_parameter() {
    let mut builder = App::builder();
    builder
        .route(
            "/hello/{name}",
            handler_fn(|_: &Request, resp: &mut Response, params: &PathParams| {
                resp.text = Some(format!("Hello, {}", params.get("name").unwrap_or_default()));
            }),
        )
        .unwrap();
    let app = builder.build();

    assert_eq!(text(&get(&app, "/hello/Elsevar").await), "Hello, Elsevar");
    assert_eq!(text(&get(&app, "/hello/Eli").await), "Hello, Eli");
}

#[tokio::test]
async fn page_not_found() {
    let app = App::builder().build();

    let response = get(&app, "/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(text(&response), "Not Found");
}

#[tokio::test]
async fn class_based_handlers() {
    let mut builder = App::builder();
    builder
        .route("/do_staff", class_handler().get(text_handler("Doing the staff")).post(text_handler("Posting the staff")))
        .unwrap();
    let app = builder.build();

    assert_eq!(text(&get(&app, "/do_staff").await), "Doing the staff");
    assert_eq!(text(&app.serve(request(Method::POST, "/do_staff")).await.unwrap()), "Posting the staff");
}

#[tokio::test]
async fn wrong_http_method_on_class_handler() {
    let mut builder = App::builder();
    builder.route("/do_staff", class_handler().post(text_handler("Posting the staff"))).unwrap();
    let app = builder.build();

    let result = app.serve(request(Method::GET, "/do_staff")).await;
    assert!(matches!(result, Err(DispatchError::MethodNotAllowed { .. })));
}

#[tokio::test]
async fn allowed_methods() {
    let mut builder = App::builder();
    builder.add_route("/do", text_handler("Allowed methods"), [Method::POST]).unwrap();
    let app = builder.build();

    assert!(matches!(app.serve(request(Method::GET, "/do")).await, Err(DispatchError::MethodNotAllowed { .. })));
    assert_eq!(text(&app.serve(request(Method::POST, "/do")).await.unwrap()), "Allowed methods");
}

#[tokio::test]
async fn custom_exception_handler() {
    let mut builder = App::builder();
    builder.add_exception_handler(ups);
    builder.route("/do", raising()).unwrap();
    builder.add_route("/post-only", text_handler("posted"), [Method::POST]).unwrap();
    builder.route("/class-post-only", class_handler().post(text_handler("posted"))).unwrap();
    let app = builder.build();

    assert_eq!(text(&get(&app, "/do").await), "Ups!");
    assert_eq!(text(&get(&app, "/post-only").await), "Ups!");

    let response = get(&app, "/class-post-only").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(&response), "Ups!");
    assert_eq!(text(&app.serve(request(Method::POST, "/class-post-only")).await.unwrap()), "posted");
}

#[tokio::test]
async fn async_handler_route() {
    let mut builder = App::builder();
    builder
        .route(
            "/later/{name}",
            async_handler_fn(|_, resp, params| {
                Box::pin(async move {
                    tokio::task::yield_now().await;
                    resp.text = Some(format!("Later, {}", params.get("name").unwrap_or_default()));
                    Ok::<(), HandlerError>(())
                })
            }),
        )
        .unwrap();
    let app = builder.build();

    assert_eq!(text(&get(&app, "/later/Eli").await), "Later, Eli");
}

#[tokio::test]
async fn fault_without_exception_handler_propagates() {
    let mut builder = App::builder();
    builder.route("/do", raising()).unwrap();
    let app = builder.build();

    let err = app.serve(request(Method::GET, "/do")).await.unwrap_err();
    assert!(matches!(err, DispatchError::Handler(_)));
}

#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct Recording {
    name: &'static str,
    journal: Journal,
}

#[async_trait]
impl Middleware for Recording {
    async fn before(&self, _req: &mut Request) {
        self.journal.push(format!("before {}", self.name));
    }

    async fn after(&self, _req: &Request, _resp: &mut Response) {
        self.journal.push(format!("after {}", self.name));
    }
}

#[tokio::test]
async fn middleware_wraps_dispatch() {
    let journal = Journal::default();
    let mut builder = App::builder();
    builder.route("/do", text_handler("Middleware test")).unwrap();
    builder
        .add_middleware(Recording { name: "A", journal: journal.clone() })
        .add_middleware(Recording { name: "B", journal: journal.clone() });
    let app = builder.build();

    assert_eq!(text(&get(&app, "/do").await), "Middleware test");
    assert_eq!(journal.entries(), ["before B", "before A", "after A", "after B"]);
}

struct Tagging;

#[async_trait]
impl Middleware for Tagging {
    async fn before(&self, req: &mut Request) {
        req.extensions_mut().insert("tagged");
    }
}

#[tokio::test]
async fn middleware_can_annotate_request() {
    let mut builder = App::builder();
    builder
        .route(
            "/tag",
            handler_fn(|req: &Request, resp: &mut Response, _: &PathParams| {
                resp.text = req.extensions().get::<&'static str>().map(|tag| (*tag).to_owned());
            }),
        )
        .unwrap();
    builder.add_middleware(Tagging);
    let app = builder.build();

    assert_eq!(text(&get(&app, "/tag").await), "tagged");
}

#[tokio::test]
async fn json_response() {
    let mut builder = App::builder();
    builder
        .route(
            "/json",
            handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                resp.json = Some(json!({"key1": "value1", "key2": "value2"}));
            }),
        )
        .unwrap();
    let app = builder.build();

    let response = get(&app, "/json").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    let parsed: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(parsed, json!({"key1": "value1", "key2": "value2"}));
}

#[tokio::test]
async fn text_response_and_raw_body() {
    let mut builder = App::builder();
    builder
        .route("/text", text_handler("Just simple text"))
        .unwrap()
        .route(
            "/body",
            handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                resp.body = Bytes::from_static(b"Just simple text");
                resp.content_type = Some("text/plain".into());
            }),
        )
        .unwrap()
        .route(
            "/untyped",
            handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                resp.body = Bytes::from_static(b"<p>raw</p>");
            }),
        )
        .unwrap();
    let app = builder.build();

    for path in ["/text", "/body"] {
        let response = get(&app, path).await;
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(text(&response), "Just simple text");
    }

    let response = get(&app, "/untyped").await;
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
    assert_eq!(text(&response), "<p>raw</p>");
}

#[tokio::test]
async fn text_wins_when_everything_is_set() {
    let mut builder = App::builder();
    builder
        .route(
            "/all",
            handler_fn(|_: &Request, resp: &mut Response, _: &PathParams| {
                resp.json = Some(json!({"a": 1}));
                resp.html = Some("<p>x</p>".into());
                resp.text = Some("y".into());
            }),
        )
        .unwrap();
    let app = builder.build();

    let response = get(&app, "/all").await;
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(text(&response), "y");
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sprout-app-test-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn html_response_from_template() {
    let template_dir = temp_dir("templates");
    std::fs::write(template_dir.join("test_template.html"), "<h1>{{ hello }}</h1>").unwrap();

    let mut builder = App::builder();
    builder.templates(Templates::new(&template_dir));
    let renderer = builder.renderer();
    builder
        .route(
            "/html",
            handler_fn(move |_: &Request, resp: &mut Response, _: &PathParams| -> Result<(), TemplateError> {
                resp.html = Some(sprout_web::template::render_with(
                    renderer.as_ref(),
                    "test_template.html",
                    json!({"hello": "hello"}),
                )?);
                Ok(())
            }),
        )
        .unwrap();
    let app = builder.build();

    let response = get(&app, "/html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().contains("text/html"));
    assert!(text(&response).contains("hello"));
    assert_eq!(app.template("test_template.html", json!({"hello": "Eli"})).unwrap(), "<h1>Eli</h1>");
}

fn static_app(static_dir: PathBuf) -> App {
    let mut builder: AppBuilder = App::builder();
    builder.with_settings(Settings { static_dir, ..Settings::default() });
    builder.build()
}

#[tokio::test]
async fn static_file_fetched() {
    let static_dir = temp_dir("static");
    std::fs::create_dir_all(static_dir.join("css")).unwrap();
    std::fs::write(static_dir.join("css/main.css"), "body {background-color: red}").unwrap();

    let app = static_app(static_dir);

    let response = get(&app, "/static/css/main.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(&response), "body {background-color: red}");
}

#[tokio::test]
async fn static_file_not_found() {
    let app = static_app(temp_dir("static-empty"));

    assert_eq!(get(&app, "/main.css").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/static/main.css").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn explicit_static_dir() {
    let static_dir = temp_dir("static-explicit");
    std::fs::write(static_dir.join("robots.txt"), "User-agent: *").unwrap();

    let mut builder = App::builder();
    builder.static_files(StaticDir::new(&static_dir));
    let app = builder.build();

    assert_eq!(text(&get(&app, "/static/robots.txt").await), "User-agent: *");
}

#[tokio::test]
async fn static_file_with_encoded_name() {
    let static_dir = temp_dir("static-encoded");
    std::fs::write(static_dir.join("my file.css"), "h1 {}").unwrap();

    let app = static_app(static_dir);

    let response = get(&app, "/static/my%20file.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(&response), "h1 {}");
    assert_eq!(get(&app, "/static/%2e%2e/Cargo.toml").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn date_header_middleware() {
    let mut builder = App::builder();
    builder.route("/home", text_handler("home")).unwrap();
    builder.add_middleware(DateHeader::new());
    let app = builder.build();

    let response = get(&app, "/home").await;
    assert!(response.headers().get(DATE).is_some());
}
