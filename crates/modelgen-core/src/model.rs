//! Model identifiers used throughout the **modelgen** workspace.
//!
//! Provider crates map the variants onto their own naming scheme, so the
//! generation config never has to carry literal strings such as `"gpt-4o"`
//! unless the model is not covered by an enum variant.
//!
//! ```rust
//! use modelgen_core::model::{Model, OpenAiModel};
//! assert_eq!(Model::from(OpenAiModel::Gpt4o),
//!            Model::OpenAi(OpenAiModel::Gpt4o));
//! ```

use std::{borrow::Cow, fmt::Display, str::FromStr};

/// Universal identifier for an LLM model.
///
/// * `OpenAi` – Enumerated list of officially supported OpenAI models.
/// * `Custom` – Any provider / model name not yet covered by a dedicated enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Built-in OpenAI models (chat completion API).
    OpenAi(OpenAiModel),
    /// Provider-specific model name passed through verbatim.
    Custom(Cow<'static, str>),
}

/// Models known to support `response_format = json_schema` with `strict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt4o,
    Gpt4oMini,
    Gpt4_1,
    Gpt4_1Mini,
    Gpt5,
    Gpt5Mini,
}

impl OpenAiModel {
    pub const ALL: [OpenAiModel; 6] = [
        OpenAiModel::Gpt4o,
        OpenAiModel::Gpt4oMini,
        OpenAiModel::Gpt4_1,
        OpenAiModel::Gpt4_1Mini,
        OpenAiModel::Gpt5,
        OpenAiModel::Gpt5Mini,
    ];

    /// Canonical API name of the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenAiModel::Gpt4o => "gpt-4o",
            OpenAiModel::Gpt4oMini => "gpt-4o-mini",
            OpenAiModel::Gpt4_1 => "gpt-4.1",
            OpenAiModel::Gpt4_1Mini => "gpt-4.1-mini",
            OpenAiModel::Gpt5 => "gpt-5",
            OpenAiModel::Gpt5Mini => "gpt-5-mini",
        }
    }
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::OpenAi(model) => f.write_str(model.as_str()),
            Model::Custom(name) => f.write_str(name),
        }
    }
}

/// Known OpenAI names resolve to their enum variant, anything else becomes
/// [`Model::Custom`].
impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let model = OpenAiModel::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .map(Model::OpenAi)
            .unwrap_or_else(|| Model::Custom(Cow::Owned(s.to_owned())));
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_custom_names() {
        assert_eq!("gpt-4o".parse::<Model>().unwrap(), Model::OpenAi(OpenAiModel::Gpt4o));
        assert_eq!(
            "llama3:70b".parse::<Model>().unwrap(),
            Model::Custom(Cow::Borrowed("llama3:70b"))
        );
    }

    #[test]
    fn display_uses_api_name() {
        assert_eq!(Model::from(OpenAiModel::Gpt4_1Mini).to_string(), "gpt-4.1-mini");
    }
}
