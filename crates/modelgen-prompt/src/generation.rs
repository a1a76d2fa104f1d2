//! Default [`PromptRenderer`]: Markdown instructions built with
//! [`PromptBuilder`].
//!
//! The built-in `generate_model` template asks for one record of the entity
//! and lists the seed values that must be used verbatim. Further templates can
//! be registered by name; an entity picks one through
//! [`Generatable::generation_prompt`](modelgen_core::entity::Generatable::generation_prompt).
//!
//! ```rust
//! use modelgen_core::{seed::Seed, template::{PromptRef, PromptRenderer}};
//! use modelgen_prompt::MarkdownRenderer;
//! use serde_json::json;
//!
//! let mut seed = Seed::new();
//! seed.insert("title".into(), json!("Dune"));
//!
//! let text = MarkdownRenderer::new()
//!     .render(&PromptRef::generate_model("Book"), &seed)
//!     .unwrap();
//!
//! assert!(text.starts_with("# Generate a Book"));
//! assert!(text.contains("**title**: Dune"));
//! ```
use std::{collections::BTreeMap, fmt, sync::Arc};

use modelgen_core::{
    error::{GenerationError, Result},
    seed::Seed,
    template::{PromptRef, PromptRenderer},
};
use serde_json::Value;

use crate::builder::PromptBuilder;

type Template = Arc<dyn Fn(&PromptRef, &Seed) -> String + Send + Sync>;

#[derive(Clone)]
pub struct MarkdownRenderer {
    templates: BTreeMap<String, Template>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert(
            PromptRef::GENERATE_MODEL.to_owned(),
            Arc::new(generate_model) as Template,
        );
        Self { templates }
    }
}

impl fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownRenderer")
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the template called `name`.
    pub fn with_template<F>(mut self, name: impl Into<String>, template: F) -> Self
    where
        F: Fn(&PromptRef, &Seed) -> String + Send + Sync + 'static,
    {
        self.templates.insert(name.into(), Arc::new(template));
        self
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl PromptRenderer for MarkdownRenderer {
    fn render(&self, prompt: &PromptRef, seed: &Seed) -> Result<String> {
        let template = self.templates.get(prompt.template.as_ref()).ok_or_else(|| {
            GenerationError::Invalid(format!(
                "no prompt template named `{}` (requested for `{}`)",
                prompt.template, prompt.entity
            ))
        })?;

        Ok(template(prompt, seed))
    }
}

fn generate_model(prompt: &PromptRef, seed: &Seed) -> String {
    let mut builder = PromptBuilder::new()
        .add_section_h1(format_args!("Generate a {}", prompt.entity))
        .add_blank_line()
        .add_line(format_args!(
            "Invent one realistic `{}` record and fill in every field of the response schema.",
            prompt.entity
        ));

    if !seed.is_empty() {
        builder = builder
            .add_blank_line()
            .add_section_h2("Given values")
            .add_line("Use these values exactly as given and keep the rest consistent with them:");
        for (key, value) in seed {
            builder = builder.add_key_value(key, display_value(value));
        }
    }

    builder
        .add_blank_line()
        .add_section_h2("Rules")
        .add_list_item("Respond with a single JSON object that matches the schema.")
        .add_list_item("Generate related records in the same response.")
        .add_list_item("Use an empty string for any value you cannot determine.")
        .finalize()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
