//! OpenAI chat-completions backend for **modelgen**.
//!
//! [`OpenAiAdapter`] implements
//! [`ChatCompletionProvider`](modelgen_core::provider::ChatCompletionProvider)
//! and forwards the derived `response_format` untouched, so the strict JSON
//! schema reaches the API as generated.
mod adapter;
mod model_map;
mod provider_impl_chat;

pub use adapter::{API_KEY_ENV, BASE_URL_ENV, OpenAiAdapter, OpenAiAdapterBuilder};
pub mod api_v1;
mod client;
pub mod error;

pub use client::OpenAiClient;
