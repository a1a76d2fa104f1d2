//! The prompt boundary.
//!
//! An entity only names *which* prompt it wants ([`PromptRef`]); turning that
//! reference plus the seed into instruction text is the job of a
//! [`PromptRenderer`]. The core never interprets the rendering mechanism, so
//! a renderer can be a Markdown builder, a template engine, or a closure:
//!
//! ```rust
//! use modelgen_core::{error::Result, seed::Seed, template::{PromptRef, PromptRenderer}};
//!
//! let renderer = |prompt: &PromptRef, seed: &Seed| -> Result<String> {
//!     Ok(format!("Generate a {} using {} seed values.", prompt.entity, seed.len()))
//! };
//!
//! let text = renderer.render(&PromptRef::generate_model("Book"), &Seed::new()).unwrap();
//! assert_eq!(text, "Generate a Book using 0 seed values.");
//! ```
use std::borrow::Cow;

use crate::{error::Result, seed::Seed};

/// Reference to a prompt template for a given entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRef {
    pub template: Cow<'static, str>,
    pub entity: &'static str,
}

impl PromptRef {
    /// Name of the built-in generation template.
    pub const GENERATE_MODEL: &'static str = "generate_model";

    pub fn new(template: impl Into<Cow<'static, str>>, entity: &'static str) -> Self {
        Self {
            template: template.into(),
            entity,
        }
    }

    pub fn generate_model(entity: &'static str) -> Self {
        Self::new(Self::GENERATE_MODEL, entity)
    }
}

/// Produces the system instruction sent to the backend.
pub trait PromptRenderer: Send + Sync {
    fn render(&self, prompt: &PromptRef, seed: &Seed) -> Result<String>;
}

impl<F> PromptRenderer for F
where
    F: Fn(&PromptRef, &Seed) -> Result<String> + Send + Sync,
{
    fn render(&self, prompt: &PromptRef, seed: &Seed) -> Result<String> {
        self(prompt, seed)
    }
}
