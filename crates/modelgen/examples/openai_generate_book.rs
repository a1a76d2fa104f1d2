//! # Generate a book with chapters
//!
//! Derives a strict JSON schema for `Book` (including its `chapters`),
//! asks OpenAI for one matching object and saves the root plus every chapter
//! in one transaction.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-…                 # mandatory
//! export MODELGEN_MODEL=gpt-4o-mini          # optional
//! RUST_LOG=modelgen_core=debug cargo run -p modelgen --example openai_generate_book --features tracing
//! ```

use modelgen::{
    ModelFactory,
    config::GenerationConfig,
    entity::{BackedEnum, EnumBacking, FieldCast, Generatable, GeneratableRelation, Relation},
    openai::OpenAiAdapterBuilder,
    persist::MemoryStore,
    prompt::MarkdownRenderer,
    seed::Seed,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Deserialize)]
enum Genre {
    Fantasy,
    SciFi,
    Mystery,
}

impl BackedEnum for Genre {
    const BACKING: EnumBacking = EnumBacking::String;

    fn cases() -> &'static [Self] {
        &[Genre::Fantasy, Genre::SciFi, Genre::Mystery]
    }

    fn backing_value(&self) -> Value {
        json!(format!("{self:?}"))
    }
}

#[derive(Debug, Deserialize)]
struct Book {
    title: Option<String>,
    genre: Option<Genre>,
}

impl Generatable for Book {
    const ENTITY: &'static str = "Book";

    fn fillable() -> &'static [&'static str] {
        &["title", "genre"]
    }

    fn field_descriptions() -> Vec<(&'static str, &'static str)> {
        vec![("title", "book title"), ("genre", "fiction genre")]
    }

    fn casts() -> Vec<(&'static str, FieldCast)> {
        vec![("genre", FieldCast::enumeration::<Genre>())]
    }

    fn relations() -> Vec<Relation> {
        vec![Relation::has_many::<Chapter>("chapters")]
    }

    fn generatable_relations() -> Vec<GeneratableRelation> {
        vec![("chapters", "three to five chapters in reading order").into()]
    }
}

#[derive(Debug, Deserialize)]
struct Chapter {}

impl Generatable for Chapter {
    const ENTITY: &'static str = "Chapter";

    fn fillable() -> &'static [&'static str] {
        &["name", "summary", "book_id"]
    }

    fn field_descriptions() -> Vec<(&'static str, &'static str)> {
        vec![("name", "chapter name"), ("summary", "one sentence summary")]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let backend = OpenAiAdapterBuilder::new_from_env().build()?;
    let factory = ModelFactory::new(backend, MarkdownRenderer::new())
        .with_config(GenerationConfig::from_env()?);

    println!(
        "{}",
        serde_json::to_string_pretty(&factory.schema::<Book>()?.to_value()?)?
    );

    let mut seed = Seed::new();
    seed.insert("title".into(), json!("Dune"));

    let store = MemoryStore::new();
    let book = factory.create::<Book, _>(&store, Some(seed)).await?;

    println!("saved {} {:?} ({:?})", book.id, book.model.title, book.model.genre);
    for chapter in store.rows("Chapter")? {
        println!("  {} {}", chapter.id, Value::Object(chapter.fields));
    }

    Ok(())
}
