use std::{future::Future, pin::Pin, sync::Arc};

use modelgen_core::{
    error::Result,
    generic::{GenericChatCompletionResponse, GenericMessage, GenericUsageReport},
    provider::{ChatCompleteParameters, ChatCompletionProvider},
};

use crate::{
    OpenAiAdapter,
    api_v1::{ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse, FinishReason},
    error::OpenAiError,
};

impl ChatCompletionProvider for OpenAiAdapter {
    type Message = ChatCompletionMessage;

    fn chat_complete<'p, M>(
        &self,
        params: ChatCompleteParameters<M>,
    ) -> Pin<
        Box<dyn Future<Output = Result<GenericChatCompletionResponse<GenericMessage>>> + Send + 'p>,
    >
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p,
    {
        let client = Arc::clone(&self.client);

        Box::pin(async move {
            let request = ChatCompletionRequest::try_from(params)?;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                model = %request.model,
                messages = request.messages.len(),
                "sending chat completion"
            );

            let response = client.chat_completion(request).await?;

            Ok(into_generic(response)?)
        })
    }
}

/// Only a choice that finished with `stop` carries a complete structured
/// reply; everything else is reported as a format error.
fn into_generic(
    response: ChatCompletionResponse,
) -> std::result::Result<GenericChatCompletionResponse<GenericMessage>, OpenAiError> {
    let usage = response.usage.map(|usage| GenericUsageReport {
        prompt_tokens: usage.prompt_tokens as i64,
        completion_tokens: usage.completion_tokens as i64,
        total_tokens: usage.total_tokens as i64,
    });

    let Some(first_choice) = response.choices.into_iter().next() else {
        return Err(OpenAiError::Format("response has no choices".into()));
    };

    if let Some(refusal) = &first_choice.message.refusal {
        return Err(OpenAiError::Format(format!("model refused: {refusal}")));
    }

    match first_choice.finish_reason {
        None | Some(FinishReason::Stop) => Ok(GenericChatCompletionResponse {
            content: first_choice.message.into(),
            usage,
        }),
        Some(other) => Err(OpenAiError::Format(format!(
            "unhandled finish reason on API: {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn response(choice: Value) -> ChatCompletionResponse {
        serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4o",
            "choices": [choice],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15},
        }))
        .unwrap()
    }

    #[test]
    fn stop_yields_content_and_usage() {
        let generic = into_generic(response(json!({
            "index": 0,
            "message": {"role": "assistant", "content": "{}"},
            "finish_reason": "stop",
        })))
        .unwrap();

        assert_eq!(generic.content.content.as_deref(), Some("{}"));
        assert_eq!(generic.usage.map(|usage| usage.total_tokens), Some(15));
    }

    #[test]
    fn truncated_reply_is_a_format_error() {
        let err = into_generic(response(json!({
            "index": 0,
            "message": {"role": "assistant", "content": "{\"title\": \"Du"},
            "finish_reason": "length",
        })))
        .unwrap_err();

        assert!(matches!(err, OpenAiError::Format(message) if message.contains("Length")));
    }

    #[test]
    fn unknown_finish_reason_is_a_format_error() {
        let err = into_generic(response(json!({
            "index": 0,
            "message": {"role": "assistant", "content": "{}"},
            "finish_reason": "function_call",
        })))
        .unwrap_err();

        assert!(matches!(err, OpenAiError::Format(message) if message.contains("Other")));
    }

    #[test]
    fn refusal_is_a_format_error() {
        let err = into_generic(response(json!({
            "index": 0,
            "message": {"role": "assistant", "content": null, "refusal": "I can't help with that."},
            "finish_reason": "stop",
        })))
        .unwrap_err();

        assert!(matches!(err, OpenAiError::Format(message) if message.contains("refused")));
    }
}
