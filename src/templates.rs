use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to compile template: {0}")]
    Compile(#[from] handlebars::TemplateError),
    #[error("failed to read template file: {0}")]
    Io(#[from] std::io::Error),
}

/// Template-render capability handed to the handlers. Swappable without
/// touching handler logic.
pub trait PageRenderer: Send + Sync {
    fn render_page(
        &self,
        name: &str,
        context: &Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// handlebars registry loaded from the templates directory: `index.hbs`,
/// `post.hbs`, and a `layout.hbs` partial the pages wrap themselves in.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_template_file("index", dir.join("index.hbs"))?;
        registry.register_template_file("post", dir.join("post.hbs"))?;
        registry.register_partial("layout", fs::read_to_string(dir.join("layout.hbs"))?)?;
        Ok(Self { registry })
    }
}

impl PageRenderer for HandlebarsRenderer {
    fn render_page(
        &self,
        name: &str,
        context: &Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.registry.render(name, context)?)
    }
}
