//! The generation pipeline, end to end.
//!
//! ```text
//! input ──► seed ──► prompt ──► backend ──► normalize ──► validate ──► morph
//!                                  ▲                                    │
//!                         root schema (strict)                materialize ─┬─► make
//!                                                                          └─► persist ─► create
//! ```
//!
//! [`ModelFactory::make`] stops after materialization and never writes;
//! [`ModelFactory::create`] additionally saves the root and its related
//! records inside one transaction.

use tracing::debug;

use crate::{
    client::GenerativeClient,
    config::GenerationConfig,
    entity::Generatable,
    error::Result,
    generic::GenericMessage,
    materialize::{Generated, materialize},
    normalize::normalize,
    persist::{Persisted, Store, persist},
    provider::ChatCompletionProvider,
    schema::{ResponseFormat, root_schema, validate_required},
    seed::{Payload, Seed, build_seed, prompt_seed},
    template::PromptRenderer,
};

/// Generates entities through one backend and one prompt renderer.
pub struct ModelFactory<B, R> {
    client: GenerativeClient<B>,
    renderer: R,
    config: GenerationConfig,
}

impl<B, R> ModelFactory<B, R>
where
    B: ChatCompletionProvider,
    GenericMessage: Into<B::Message>,
    R: PromptRenderer,
{
    pub fn new(backend: B, renderer: R) -> Self {
        Self {
            client: GenerativeClient::new(backend),
            renderer,
            config: GenerationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn client(&self) -> &GenerativeClient<B> {
        &self.client
    }

    /// The response format sent for `T`.
    pub fn schema<T: Generatable>(&self) -> Result<ResponseFormat> {
        root_schema::<T>()
    }

    /// Generate `T` and its related records without persisting anything.
    pub async fn make<T: Generatable>(&self, input: Option<Seed>) -> Result<Generated<T>> {
        let payload = self.payload::<T>(input).await?;
        materialize::<T>(payload)
    }

    /// Generate `T` and save it with its related records atomically.
    pub async fn create<T: Generatable, S: Store>(
        &self,
        store: &S,
        input: Option<Seed>,
    ) -> Result<Persisted<T>> {
        let generated = self.make::<T>(input).await?;
        persist(store, generated)
    }

    /// Alias for [`Self::create`].
    pub async fn generate<T: Generatable, S: Store>(
        &self,
        store: &S,
        input: Option<Seed>,
    ) -> Result<Persisted<T>> {
        self.create::<T, S>(store, input).await
    }

    /// Run the pipeline up to the morphed payload.
    pub async fn payload<T: Generatable>(&self, input: Option<Seed>) -> Result<Payload> {
        let seed = build_seed::<T>(input);
        let prompt = T::generation_prompt(&seed);
        let instruction = self.renderer.render(&prompt, &prompt_seed(&seed))?;
        let format = root_schema::<T>()?;

        debug!(
            entity = T::ENTITY,
            template = %prompt.template,
            seed_keys = seed.len(),
            "requesting generation"
        );

        let raw = self
            .client
            .complete(
                instruction,
                format.to_value()?,
                self.config.model.clone(),
                self.config.temperature,
            )
            .await?;

        let payload = normalize(&raw, &seed)?;
        validate_required(format.schema(), &payload)?;

        T::morph(payload)
    }
}
