//! Prompt side of **modelgen**: a fluent Markdown [`PromptBuilder`] and the
//! default [`MarkdownRenderer`] used to turn a seed into the generation
//! instruction.
pub mod builder;
pub mod generation;

pub use builder::PromptBuilder;
pub use generation::MarkdownRenderer;
