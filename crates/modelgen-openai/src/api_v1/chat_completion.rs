use modelgen_core::error::GenerationError;
use modelgen_core::generic::{GenericMessage, GenericRole};
use modelgen_core::provider::ChatCompleteParameters;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt;

use crate::model_map::map_model;

use super::common;

pub(crate) const PROVIDER: &str = "openai";

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

impl<M> TryFrom<ChatCompleteParameters<M>> for ChatCompletionRequest
where
    M: Into<ChatCompletionMessage> + Clone,
{
    type Error = GenerationError;

    fn try_from(value: ChatCompleteParameters<M>) -> Result<Self, Self::Error> {
        let model = map_model(&value.model).ok_or_else(|| GenerationError::ModelNotSupported {
            provider: PROVIDER,
            model: value.model.to_string(),
        })?;

        Ok(Self {
            model: model.into_owned(),
            messages: value.messages.into_iter().map(Into::into).collect(),
            temperature: value.temperature,
            response_format: value.response_format,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    System,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
}

impl serde::Serialize for Content {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            Content::Text(ref text) => {
                if text.is_empty() {
                    serializer.serialize_none()
                } else {
                    serializer.serialize_str(text)
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D>(deserializer: D) -> Result<Content, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContentVisitor;

        impl<'de> Visitor<'de> for ContentVisitor {
            type Value = Content;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid content type")
            }

            fn visit_str<E>(self, value: &str) -> Result<Content, E>
            where
                E: de::Error,
            {
                Ok(Content::Text(value.to_string()))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Content::Text(String::new()))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Content::Text(String::new()))
            }
        }

        deserializer.deserialize_any(ContentVisitor)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionMessageForResponse {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
    /// Set instead of `content` when the model declines a strict schema
    /// request.
    #[serde(default)]
    pub refusal: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ChatCompletionMessageForResponse> for GenericMessage {
    fn from(value: ChatCompletionMessageForResponse) -> Self {
        GenericMessage {
            content: value.content,
            role: value.role.into(),
            name: value.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: i64,
    pub message: ChatCompletionMessageForResponse,
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    pub usage: Option<common::Usage>,
    pub system_fingerprint: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    /// Any reason this client does not know by name.
    #[serde(other)]
    Other,
}

impl From<GenericRole> for MessageRole {
    fn from(value: GenericRole) -> Self {
        match value {
            GenericRole::System => MessageRole::System,
            GenericRole::Assistant => MessageRole::Assistant,
            GenericRole::User => MessageRole::User,
        }
    }
}

impl From<MessageRole> for GenericRole {
    fn from(value: MessageRole) -> Self {
        match value {
            MessageRole::User => GenericRole::User,
            MessageRole::System => GenericRole::System,
            MessageRole::Assistant => GenericRole::Assistant,
        }
    }
}

impl From<GenericMessage> for ChatCompletionMessage {
    fn from(value: GenericMessage) -> Self {
        Self {
            role: value.role.into(),
            content: value.content.map(Content::Text),
            name: value.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use modelgen_core::model::{Model, OpenAiModel};
    use serde_json::json;

    use super::*;

    fn params(model: Model) -> ChatCompleteParameters<GenericMessage> {
        ChatCompleteParameters::new(
            vec![GenericMessage::new("Generate a Book.".into(), GenericRole::System)],
            model,
        )
        .with_temperature(1.0)
        .with_response_format(json!({"type": "json_schema"}))
    }

    #[test]
    fn request_carries_schema_and_skips_unset_fields() {
        let request = ChatCompletionRequest::try_from(params(OpenAiModel::Gpt4o.into())).unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "system", "content": "Generate a Book."}],
                "temperature": 1.0,
                "response_format": {"type": "json_schema"},
            })
        );
    }

    #[test]
    fn blank_custom_model_is_not_supported() {
        assert!(matches!(
            ChatCompletionRequest::try_from(params(Model::Custom("".into()))),
            Err(GenerationError::ModelNotSupported { provider: "openai", .. })
        ));
    }

    #[test]
    fn parses_response_without_usage() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"title\":\"Dune\"}", "refusal": null},
                "finish_reason": "stop",
            }],
        }))
        .unwrap();

        assert!(response.usage.is_none());
        assert_eq!(response.choices[0].finish_reason, Some(FinishReason::Stop));
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("{\"title\":\"Dune\"}")
        );
    }

    #[test]
    fn null_content_deserializes_as_none() {
        let message: ChatCompletionMessage =
            serde_json::from_value(json!({"role": "assistant", "content": null})).unwrap();

        assert_eq!(message.content, None);

        let message: ChatCompletionMessage =
            serde_json::from_value(json!({"role": "user", "content": "hi"})).unwrap();
        assert_eq!(message.content, Some(Content::Text("hi".into())));
    }
}
