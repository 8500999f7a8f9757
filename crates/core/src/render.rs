//! Markup rendering through a Tera template.
//!
//! The template sees a single variable, `slides`: an array whose items expose
//! `type`, `title` and `body` as strings.

use crate::{Deck, Error, Result};
use std::path::Path;
use tera::{Context, Tera};

/// Renders a deck to HTML with one named template.
#[derive(Debug)]
pub struct MarkupRenderer {
    tera: Tera,
    template: String,
}

impl MarkupRenderer {
    /// Load `template` from `template_dir`.
    ///
    /// Siblings sharing the template's extension are loaded too, so the
    /// template can `extends` or `include` them. Other files are ignored.
    pub fn new(template_dir: &Path, template: &str) -> Result<Self> {
        let not_found = || Error::TemplateNotFound {
            name: template.to_string(),
            dir: template_dir.to_path_buf(),
        };

        if !template_dir.join(template).is_file() {
            return Err(not_found());
        }

        let tera = match Path::new(template).extension() {
            Some(ext) => {
                let glob = template_dir
                    .join("**")
                    .join(format!("*.{}", ext.to_string_lossy()));
                Tera::new(&glob.to_string_lossy())?
            }
            None => {
                let mut tera = Tera::default();
                tera.add_template_file(template_dir.join(template), Some(template))?;
                tera
            }
        };

        if !tera.get_template_names().any(|name| name == template) {
            return Err(not_found());
        }

        log::debug!(
            "Loaded template '{}' from {}",
            template,
            template_dir.display()
        );

        Ok(Self {
            tera,
            template: template.to_string(),
        })
    }

    /// Build a renderer from an in-memory template.
    ///
    /// Auto-escaping follows the name's extension, as with file templates.
    pub fn from_source(name: &str, source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(name, source)?;
        Ok(Self {
            tera,
            template: name.to_string(),
        })
    }

    /// Name of the template used for rendering.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the deck. Output is deterministic for a given deck and template.
    pub fn render(&self, deck: &Deck) -> Result<String> {
        let mut context = Context::new();
        context.insert("slides", deck.slides());
        Ok(self.tera.render(&self.template, &context)?)
    }
}
