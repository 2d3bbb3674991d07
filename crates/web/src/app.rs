//! The application facade.
//!
//! An [`App`] owns everything a request needs: the route table, the composed
//! middleware chain, the exception hook and the static file and template
//! collaborators. It is assembled with an [`AppBuilder`] and immutable afterwards, so
//! one `Arc<App>` is shared by every connection.
//!
//! ```
//! use sprout_web::{App, PathParams, Request, Response, handler_fn};
//!
//! # fn main() -> Result<(), sprout_web::RegistrationError> {
//! let mut builder = App::builder();
//! builder.route(
//!     "/hello/{name}",
//!     handler_fn(|_: &Request, resp: &mut Response, params: &PathParams| {
//!         resp.text = Some(format!("Hello, {}", params.get("name").unwrap_or_default()));
//!     }),
//! )?;
//! let app = builder.build();
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

use crate::dispatcher::{Dispatch, DispatchError, Dispatcher, ExceptionHandler};
use crate::handler::IntoEndpoint;
use crate::middleware::{self, Middleware};
use crate::router::{AllowedMethods, RegistrationError, Router};
use crate::settings::Settings;
use crate::static_files::{StaticDir, StaticFiles};
use crate::template::{TemplateError, TemplateRenderer, Templates, render_with};
use crate::{Request, Response};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use sprout_http::handler::Handler;
use std::sync::Arc;
use tracing::{debug, info};

pub struct App {
    chain: Box<dyn Dispatch>,
    router: Arc<Router>,
    settings: Settings,
    static_files: Arc<dyn StaticFiles>,
    templates: Arc<dyn TemplateRenderer>,
}

pub struct AppBuilder {
    settings: Settings,
    router: Router,
    middlewares: Vec<Box<dyn Middleware>>,
    exception_handler: Option<Arc<dyn ExceptionHandler>>,
    static_files: Option<Arc<dyn StaticFiles>>,
    templates: Option<Arc<dyn TemplateRenderer>>,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Answers one request.
    ///
    /// Paths under the static prefix go to the static file server with the prefix
    /// stripped, everything else runs through the middleware chain and the dispatcher.
    /// An `Err` is a fault no exception hook took care of.
    pub async fn serve(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>, DispatchError> {
        if let Some(asset) = req.uri().path().strip_prefix(self.settings.static_prefix.as_str()) {
            debug!(asset, "serve static file");
            return Ok(self.static_files.serve(asset).await);
        }

        let mut req = Request::new(req);
        let resp = self.handle(&mut req).await?;
        Ok(resp.into_http())
    }

    /// Runs `req` through the middleware chain and returns the unemitted response
    pub async fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        self.chain.handle(req).await
    }

    /// Renders the template `name` with `context`
    pub fn template<C: Serialize>(&self, name: &str, context: C) -> Result<String, TemplateError> {
        render_with(self.templates.as_ref(), name, context)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[async_trait]
impl Handler for App {
    type Error = DispatchError;

    async fn call(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>, Self::Error> {
        self.serve(req).await
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppBuilder {
    fn new() -> Self {
        Self {
            settings: Settings::default(),
            router: Router::new(),
            middlewares: Vec::new(),
            exception_handler: None,
            static_files: None,
            templates: None,
        }
    }

    /// Replaces the settings; static and template directories are read from them at build time
    pub fn with_settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = settings;
        self
    }

    /// Registers `endpoint` under `pattern` accepting the default verbs
    pub fn route(&mut self, pattern: &str, endpoint: impl IntoEndpoint) -> Result<&mut Self, RegistrationError> {
        self.router.register(pattern, endpoint.into_endpoint(), None)?;
        Ok(self)
    }

    /// Registers `endpoint` under `pattern` accepting only `allowed_methods`
    pub fn add_route(
        &mut self,
        pattern: &str,
        endpoint: impl IntoEndpoint,
        allowed_methods: impl Into<AllowedMethods>,
    ) -> Result<&mut Self, RegistrationError> {
        self.router.register(pattern, endpoint.into_endpoint(), Some(allowed_methods.into()))?;
        Ok(self)
    }

    /// Appends `middleware`; the middleware added last runs outermost
    pub fn add_middleware(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Installs the exception hook, replacing a previous one
    pub fn add_exception_handler(&mut self, exception_handler: impl ExceptionHandler + 'static) -> &mut Self {
        self.exception_handler = Some(Arc::new(exception_handler));
        self
    }

    pub fn static_files(&mut self, static_files: impl StaticFiles + 'static) -> &mut Self {
        self.static_files = Some(Arc::new(static_files));
        self
    }

    pub fn templates(&mut self, templates: impl TemplateRenderer + 'static) -> &mut Self {
        self.templates = Some(Arc::new(templates));
        self
    }

    /// A renderer handle for handlers that render templates.
    ///
    /// Without an explicit [`AppBuilder::templates`] call this loads from the
    /// configured template directory, so configure settings first.
    pub fn renderer(&mut self) -> Arc<dyn TemplateRenderer> {
        let settings = &self.settings;
        Arc::clone(self.templates.get_or_insert_with(|| Arc::new(Templates::new(&settings.template_dir))))
    }

    pub fn build(self) -> App {
        let Self { settings, router, middlewares, exception_handler, static_files, templates } = self;

        info!(routes = ?router.patterns().collect::<Vec<_>>(), middlewares = middlewares.len(), "build app");

        let router = Arc::new(router);
        let dispatcher = Dispatcher::new(Arc::clone(&router), exception_handler);
        let chain = middleware::compose(Box::new(dispatcher), middlewares);

        let static_files = static_files.unwrap_or_else(|| Arc::new(StaticDir::new(&settings.static_dir)));
        let templates = templates.unwrap_or_else(|| Arc::new(Templates::new(&settings.template_dir)));

        App { chain, router, settings, static_files, templates }
    }
}
