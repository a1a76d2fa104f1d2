use std::{env, sync::Arc, time::Duration};

use modelgen_core::error::{GenerationError, Result};

use crate::client::{DEFAULT_TIMEOUT, OpenAiClient};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Thin wrapper that wires the HTTP client [`OpenAiClient`] into a value that
/// implements [`modelgen_core::provider::ChatCompletionProvider`].
///
/// The type exposes no generation methods of its own; plug it into a
/// [`modelgen_core::ModelFactory`] or [`modelgen_core::GenerativeClient`].
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

impl OpenAiAdapter {
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// ```rust,no_run
/// use std::time::Duration;
/// use modelgen_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env()
///     .with_timeout(Duration::from_secs(90))
///     .build()
///     .expect("OPENAI_API_KEY must be set");
/// ```
#[derive(Debug, Default, Clone)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) timeout: Option<Duration>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `OPENAI_API_KEY` and the optional `OPENAI_BASE_URL`.
    ///
    /// Missing keys only surface during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|value: &String| !value.trim().is_empty());
        Self {
            api_key: present(API_KEY_ENV),
            base_url: present(BASE_URL_ENV),
            timeout: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point the adapter at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Deadline for a single backend call (default 60 s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`GenerationError::Invalid`] – if the API key is missing.
    /// * [`GenerationError::Backend`] – if the HTTP client cannot be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self.api_key.ok_or_else(|| {
            GenerationError::Invalid(format!("missing env variable: `{API_KEY_ENV}`"))
        })?;

        let client = OpenAiClient::new(
            api_key,
            self.base_url,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?;

        Ok(OpenAiAdapter {
            client: Arc::new(client),
        })
    }
}
