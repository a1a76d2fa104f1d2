//! Builder-style helper for constructing **Markdown prompts**.
//!
//! Every method takes and returns `self`, so instructions read top to bottom:
//!
//! ```rust
//! use modelgen_prompt::builder::PromptBuilder;
//!
//! let md = PromptBuilder::new()
//!     .add_section_h1("Generate a Book")
//!     .add_blank_line()
//!     .add_line("Use these values as given:")
//!     .add_key_value("title", "Dune")
//!     .add_list_item("Respond with JSON only.")
//!     .finalize();
//!
//! assert!(md.starts_with("# Generate a Book"));
//! assert!(md.contains("**title**: Dune"));
//! ```
//!
//! Newlines and whitespace are emitted exactly as requested; the builder does
//! no reflowing.

use std::fmt::{Display, Write as _};

/// Fluent helper to produce markdown fragments.
#[derive(Debug, Default, Clone)]
pub struct PromptBuilder {
    buffer: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a level-1 (`#`) heading.
    pub fn add_section_h1(self, line: impl Display) -> Self {
        self.add_line(format_args!("# {line}"))
    }

    /// Add a level-2 (`##`) heading.
    pub fn add_section_h2(self, line: impl Display) -> Self {
        self.add_line(format_args!("## {line}"))
    }

    /// Add a plain line of text and a trailing newline.
    pub fn add_line(mut self, line: impl Display) -> Self {
        // Writing into a `String` cannot fail.
        let _ = writeln!(self.buffer, "{line}");
        self
    }

    pub fn add_line_bold(self, line: impl Display) -> Self {
        self.add_line(format_args!("**{line}**"))
    }

    /// `**Key**: Value`
    pub fn add_key_value(self, key: impl Display, value: impl Display) -> Self {
        self.add_line(format_args!("**{key}**: {value}"))
    }

    /// `- item`
    pub fn add_list_item(self, item: impl Display) -> Self {
        self.add_line(format_args!("- {item}"))
    }

    /// Embed a code block fenced as `json`.
    pub fn add_text_json(self, content: impl Display) -> Self {
        self.add_line("```json").add_line(content).add_line("```")
    }

    pub fn add_blank_line(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Insert a "---" delimiter.
    pub fn add_delimiter(self) -> Self {
        self.add_line("---")
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Retrieve the accumulated markdown and consume the builder.
    pub fn finalize(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_lines_verbatim() {
        let md = PromptBuilder::new()
            .add_section_h2("Seed")
            .add_key_value("genre", "sci-fi")
            .add_blank_line()
            .add_delimiter()
            .add_text_json(r#"{"a":1}"#)
            .finalize();

        assert_eq!(md, "## Seed\n**genre**: sci-fi\n\n---\n```json\n{\"a\":1}\n```\n");
    }

    #[test]
    fn starts_empty() {
        assert!(PromptBuilder::new().is_empty());
        assert!(!PromptBuilder::new().add_line_bold("x").is_empty());
    }
}
