//! Template rendering.
//!
//! [`Templates`] loads Jinja2 compatible templates from a directory through
//! [`minijinja`]. Handlers render through [`TemplateRenderer`], usually with the handle
//! returned by [`crate::AppBuilder::renderer`], and put the result into `resp.html`.

use minijinja::{Environment, path_loader};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template error: {source}")]
    Render {
        #[from]
        source: minijinja::Error,
    },

    #[error("can't serialize template context: {source}")]
    Context {
        #[from]
        source: serde_json::Error,
    },
}

#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, TemplateError>;
}

/// Renders `name` with any serializable `context`
pub fn render_with<R, C>(renderer: &R, name: &str, context: C) -> Result<String, TemplateError>
where
    R: TemplateRenderer + ?Sized,
    C: Serialize,
{
    let context = serde_json::to_value(context)?;
    renderer.render(name, &context)
}

/// Templates loaded lazily from a directory
#[derive(Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir.into()));
        Self { env: Arc::new(env) }
    }

    /// Templates from in-memory sources, keyed by name
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        for (name, source) in sources {
            env.add_template_owned(name.to_owned(), source.to_owned())?;
        }
        Ok(Self { env: Arc::new(env) })
    }
}

impl TemplateRenderer for Templates {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, TemplateError> {
        trace!(name, "render template");
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}
