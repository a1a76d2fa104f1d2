//! # `modelgen` – The umbrella crate
//!
//! One-stop import for the workspace:
//!
//! | Crate                 | What it provides                                                                         |
//! |-----------------------|------------------------------------------------------------------------------------------|
//! | **`modelgen-core`**   | `Generatable` contract, schema deriver, normalizer, materializer, persistence, factory   |
//! | **`modelgen-prompt`** | `PromptBuilder` and the default `MarkdownRenderer`                                       |
//! | **`modelgen-openai`** | OpenAI chat-completions backend *(feature `openai`, on by default)*                      |
//!
//! Enabling `tracing` turns on request logging inside the OpenAI backend; the
//! core pipeline always logs through `tracing`.
//!
//! ```toml
//! [dependencies]
//! modelgen = { version = "0.1", features = ["tracing"] }
//! ```
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use modelgen::{
//!     ModelFactory,
//!     config::GenerationConfig,
//!     entity::Generatable,
//!     persist::MemoryStore,
//!     prompt::MarkdownRenderer,
//! };
//!
//! #[derive(serde::Deserialize)]
//! struct Planet {
//!     name: Option<String>,
//! }
//!
//! impl Generatable for Planet {
//!     const ENTITY: &'static str = "Planet";
//!
//!     fn fillable() -> &'static [&'static str] {
//!         &["name"]
//!     }
//!
//!     fn field_descriptions() -> Vec<(&'static str, &'static str)> {
//!         vec![("name", "name of a fictional planet")]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = modelgen::openai::OpenAiAdapterBuilder::new_from_env().build()?;
//!     let factory = ModelFactory::new(backend, MarkdownRenderer::new())
//!         .with_config(GenerationConfig::from_env()?);
//!
//!     let store = MemoryStore::new();
//!     let planet = factory.create::<Planet, _>(&store, None).await?;
//!     println!("{} {:?}", planet.id, planet.model.name);
//!     Ok(())
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/modelgen/latest")]

pub use modelgen_core::*;
pub use modelgen_prompt as prompt;

#[cfg(feature = "openai")]
pub use modelgen_openai as openai;
