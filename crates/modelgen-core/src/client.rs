//! Generic, lightweight client that performs the single structured-output
//! call of a generation request against one concrete backend.
//!
//! The client is **generic over the backend type `B`**, so the compiler
//! guarantees that the generic system message converts into whatever
//! message type the backend expects, without dynamic dispatch.
//!
//! Any backend crate (e.g. `modelgen-openai`) just implements
//! [`ChatCompletionProvider`] and the same client works out of the box.
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{GenerationError, Result},
    generic::{GenericMessage, GenericRole},
    model::Model,
    provider::{ChatCompleteParameters, ChatCompletionProvider},
};

/// A client bound to a single provider.
///
/// Clone the client if you need to share it across tasks; the backend sits
/// behind an `Arc`.
#[derive(Debug)]
pub struct GenerativeClient<B> {
    backend: Arc<B>,
}

impl<B> Clone for GenerativeClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B> GenerativeClient<B>
where
    B: ChatCompletionProvider,
    GenericMessage: Into<B::Message>,
{
    /// Create a new client that delegates all calls to `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Access the underlying backend (e.g. to tweak provider-specific settings).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Send `instruction` as the system message, constrained by
    /// `response_format`, and return the raw JSON text of the reply.
    ///
    /// # Errors
    ///
    /// * Whatever the backend reports.
    /// * [`GenerationError::MalformedResponse`] if the reply has no content.
    pub async fn complete(
        &self,
        instruction: String,
        response_format: Value,
        model: Model,
        temperature: f64,
    ) -> Result<String> {
        let messages = vec![GenericMessage::new(instruction, GenericRole::System)];
        let params = ChatCompleteParameters::new(messages, model.clone())
            .with_temperature(temperature)
            .with_response_format(response_format);

        let response = self.backend.chat_complete(params).await?;

        if let Some(usage) = &response.usage {
            debug!(
                %model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "backend call finished"
            );
        }

        response
            .content
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse("backend returned no content".into()))
    }
}
