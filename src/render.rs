//! Landing page rendering.
//!
//! The page handler receives a [`PageRenderer`] at construction time and
//! hands it one [`RenderContext`] per request. Output is rendered into a
//! `String` before anything is sent, so a template failure can still turn
//! into a clean 500.

use std::fs;
use std::path::Path;

use log::info;
use minijinja::value::ViaDeserialize;
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Money, Product};
use crate::settings::TemplateSettings;

/// Name of the landing page template
pub const HOME_TEMPLATE: &str = "home.html";

const BUILTIN_HOME: &str = include_str!("../templates/home.html");

/// Data handed to the landing page template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub user_currency: String,
    pub currencies: Vec<String>,
    pub products: Vec<Product>,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("template {template} failed: {source}")]
    Template {
        template: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Turns a render context into markup
pub trait PageRenderer: Send + Sync {
    /// Render `template` with `context`
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or fails while rendering
    fn render(&self, template: &str, context: &RenderContext) -> Result<String, RenderError>;
}

/// Jinja-style renderer holding the parsed templates for the process lifetime
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Renderer using the landing page template compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in template fails to parse
    pub fn builtin() -> Result<Self, RenderError> {
        let mut env = Self::environment();
        env.add_template(HOME_TEMPLATE, BUILTIN_HOME)
            .map_err(|source| template_error(HOME_TEMPLATE, source))?;
        Ok(Self { env })
    }

    /// Renderer preferring `home.html` from `folder`, falling back to the built-in page
    ///
    /// # Errors
    ///
    /// Returns an error if the template file exists but cannot be read or parsed
    pub fn from_folder(folder: &Path) -> Result<Self, RenderError> {
        let path = folder.join(HOME_TEMPLATE);
        if !path.is_file() {
            info!(
                "No {HOME_TEMPLATE} in {}, using built-in landing page",
                folder.display()
            );
            return Self::builtin();
        }

        let source = fs::read_to_string(&path).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut env = Self::environment();
        env.add_template_owned(HOME_TEMPLATE, source)
            .map_err(|source| template_error(HOME_TEMPLATE, source))?;
        info!("Loaded landing page template from {}", path.display());
        Ok(Self { env })
    }

    /// Build the renderer described by the settings
    ///
    /// # Errors
    ///
    /// Returns an error if a configured template cannot be read or parsed
    pub fn from_settings(settings: &TemplateSettings) -> Result<Self, RenderError> {
        Self::from_folder(Path::new(&settings.folder))
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.add_filter("money", money);
        env
    }
}

impl PageRenderer for TemplateRenderer {
    fn render(&self, template: &str, context: &RenderContext) -> Result<String, RenderError> {
        self.env
            .get_template(template)
            .and_then(|tmpl| tmpl.render(context))
            .map_err(|source| template_error(template, source))
    }
}

fn template_error(template: &str, source: minijinja::Error) -> RenderError {
    RenderError::Template {
        template: template.to_string(),
        source,
    }
}

#[allow(clippy::needless_pass_by_value)]
fn money(value: ViaDeserialize<Money>) -> String {
    value.0.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RenderContext {
        RenderContext {
            user_currency: "EUR".to_string(),
            currencies: vec!["USD".to_string(), "EUR".to_string()],
            products: vec![Product {
                id: "66VCHSJNUP".to_string(),
                name: "Tank Top <limited>".to_string(),
                description: "Perfectly cropped cotton tank.".to_string(),
                picture: "/static/img/products/tank-top.jpg".to_string(),
                price_usd: Money {
                    currency_code: "USD".to_string(),
                    units: 18,
                    nanos: 990_000_000,
                },
                categories: vec!["clothing".to_string()],
            }],
        }
    }

    #[test]
    fn test_builtin_page_renders_context() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let html = renderer.render(HOME_TEMPLATE, &context()).unwrap();

        assert!(html.contains(r#"<option value="EUR" selected>EUR</option>"#));
        assert!(html.contains(r#"<option value="USD">USD</option>"#));
        assert!(html.contains("USD 18.99"));
        assert!(html.contains("Tank Top &lt;limited&gt;"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let renderer = TemplateRenderer::builtin().unwrap();
        assert!(matches!(
            renderer.render("cart.html", &context()),
            Err(RenderError::Template { .. })
        ));
    }

    #[test]
    fn test_missing_folder_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TemplateRenderer::from_folder(&dir.path().join("nowhere")).unwrap();
        assert!(renderer.render(HOME_TEMPLATE, &context()).is_ok());
    }

    #[test]
    fn test_folder_template_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(HOME_TEMPLATE),
            "{{ user_currency }}:{{ currencies | length }}:{{ products | length }}",
        )
        .unwrap();

        let renderer = TemplateRenderer::from_folder(dir.path()).unwrap();
        assert_eq!(renderer.render(HOME_TEMPLATE, &context()).unwrap(), "EUR:2:1");
    }

    #[test]
    fn test_broken_folder_template_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(HOME_TEMPLATE), "{% for x in %}").unwrap();

        assert!(matches!(
            TemplateRenderer::from_folder(dir.path()),
            Err(RenderError::Template { .. })
        ));
    }
}
