//! Named mail templates rendered with a key/value model.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Deserialize;
use serde_json::Value;

use super::MailError;

/// Renders a named template with a model into a mail body.
pub trait TemplateRenderer: Send + Sync + 'static {
    fn render(&self, name: &str, model: &Value) -> Result<String, MailError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Directory scanned (recursively) for templates. Unset means no file templates.
    pub dir: Option<PathBuf>,

    /// Extension of template files, with the leading dot. Default: `.hbs`.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    ".hbs".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig {
            dir: None,
            extension: default_extension(),
        }
    }
}

/// Handlebars-backed renderer.
///
/// File templates are registered by their path relative to the template
/// directory, without the extension: `welcome.hbs` is `"welcome"`,
/// `orders/shipped.hbs` is `"orders/shipped"`. Strict mode is on, so a
/// model missing a referenced key fails the render.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// A renderer with no templates registered.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        HandlebarsRenderer { registry }
    }

    pub fn from_config(config: &TemplateConfig) -> Result<Self, MailError> {
        let mut renderer = Self::new();
        if let Some(dir) = &config.dir {
            let count = renderer.register_dir(dir, dir, &config.extension)?;
            tracing::info!(dir = %dir.display(), count, "mail templates loaded");
        }
        Ok(renderer)
    }

    fn register_dir(&mut self, root: &Path, dir: &Path, extension: &str) -> Result<usize, MailError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| MailError::Template(format!("reading {}: {e}", dir.display())))?;

        let mut count = 0;
        for entry in entries {
            let entry =
                entry.map_err(|e| MailError::Template(format!("reading {}: {e}", dir.display())))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| MailError::Template(format!("reading {}: {e}", path.display())))?;
            if file_type.is_dir() {
                count += self.register_dir(root, &path, extension)?;
                continue;
            }
            // Symlinked directories are not followed.
            if file_type.is_symlink() && path.is_dir() {
                tracing::debug!(path = %path.display(), "skipping symlinked template directory");
                continue;
            }
            let Some(name) = template_name(root, &path, extension) else {
                continue;
            };
            self.registry
                .register_template_file(&name, &path)
                .map_err(|e| MailError::Template(format!("{}: {e}", path.display())))?;
            count += 1;
        }
        Ok(count)
    }

    /// Register a template from source text.
    pub fn register(&mut self, name: &str, source: &str) -> Result<(), MailError> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| MailError::Template(format!("{name}: {e}")))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}

/// `root/orders/shipped.hbs` -> `orders/shipped`; `None` for other extensions.
fn template_name(root: &Path, path: &Path, extension: &str) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.to_str()?;
    let name = relative.strip_suffix(extension)?;
    (!name.is_empty()).then(|| name.replace(std::path::MAIN_SEPARATOR, "/"))
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, name: &str, model: &Value) -> Result<String, MailError> {
        if !self.registry.has_template(name) {
            return Err(MailError::Template(format!("template not found: {name}")));
        }
        self.registry
            .render(name, model)
            .map_err(|e| MailError::Template(format!("{name}: {e}")))
    }
}
