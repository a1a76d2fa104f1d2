//! The capability contract every generatable entity implements, plus the
//! metadata types it is described with.
//!
//! An entity declares, statically:
//!
//! * which fields may be assigned from outside ([`Generatable::fillable`]),
//! * which of those the model should produce and what they mean
//!   ([`Generatable::field_descriptions`]),
//! * how some fields are typed ([`Generatable::casts`]),
//! * its relation accessors ([`Generatable::relations`]) and which of them
//!   are generated alongside it ([`Generatable::generatable_relations`]).
//!
//! ```rust
//! use modelgen_core::entity::{EnumCast, FieldCast, Generatable, GeneratableRelation, Relation};
//! # use serde::Deserialize;
//! # #[derive(Deserialize)] struct Chapter { name: Option<String> }
//! # impl Generatable for Chapter {
//! #     const ENTITY: &'static str = "Chapter";
//! #     fn fillable() -> &'static [&'static str] { &["name"] }
//! #     fn field_descriptions() -> Vec<(&'static str, &'static str)> { vec![("name", "chapter name")] }
//! # }
//!
//! #[derive(Deserialize)]
//! struct Book {
//!     title: Option<String>,
//!     genre: Option<String>,
//! }
//!
//! impl Generatable for Book {
//!     const ENTITY: &'static str = "Book";
//!
//!     fn fillable() -> &'static [&'static str] {
//!         &["title", "genre"]
//!     }
//!
//!     fn field_descriptions() -> Vec<(&'static str, &'static str)> {
//!         vec![("title", "book title"), ("genre", "fiction genre")]
//!     }
//!
//!     fn casts() -> Vec<(&'static str, FieldCast)> {
//!         vec![("genre", FieldCast::Enum(EnumCast::strings(["Fantasy", "SciFi", "Mystery"])))]
//!     }
//!
//!     fn relations() -> Vec<Relation> {
//!         vec![Relation::has_many::<Chapter>("chapters")]
//!     }
//!
//!     fn generatable_relations() -> Vec<GeneratableRelation> {
//!         vec!["chapters".into()]
//!     }
//! }
//! ```

use std::borrow::Cow;

use convert_case::{Case, Casing};
use schemars::schema::SchemaObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{GenerationError, Result},
    persist::RecordId,
    schema,
    seed::{Payload, Seed},
    template::PromptRef,
};

/// Capability contract of a type that can generate itself.
pub trait Generatable: DeserializeOwned + Send + 'static {
    /// Type name, e.g. `"Book"`.
    const ENTITY: &'static str;

    /// Fields that may be assigned from a generated payload.
    fn fillable() -> &'static [&'static str];

    /// Ordered field name → description. Every key must be fillable.
    fn field_descriptions() -> Vec<(&'static str, &'static str)>;

    fn casts() -> Vec<(&'static str, FieldCast)> {
        Vec::new()
    }

    /// Relation accessors, consulted by name.
    fn relations() -> Vec<Relation> {
        Vec::new()
    }

    /// Relations generated together with the entity, in schema order.
    fn generatable_relations() -> Vec<GeneratableRelation> {
        Vec::new()
    }

    /// Default seed values merged below caller input.
    fn generation_seed() -> Seed {
        Seed::new()
    }

    fn generation_prompt(seed: &Seed) -> PromptRef {
        let _ = seed;
        PromptRef::generate_model(Self::ENTITY)
    }

    /// Last chance to reshape a normalized payload before an instance is
    /// built from it.
    fn morph(payload: Payload) -> Result<Payload> {
        Ok(payload)
    }
}

/// Semantic type of a field, refining the default `string` schema.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCast {
    String,
    Integer,
    /// Array of strings. Arrays of objects are not supported.
    StringArray,
    Enum(EnumCast),
}

impl FieldCast {
    pub fn enumeration<E: BackedEnum>() -> Self {
        FieldCast::Enum(EnumCast::of::<E>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumBacking {
    Integer,
    String,
}

/// Ordered set of permitted values for an enum-cast field.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumCast {
    cases: Vec<Value>,
    backing: EnumBacking,
}

impl EnumCast {
    pub fn strings<I, S>(cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cases: cases.into_iter().map(|case| Value::String(case.into())).collect(),
            backing: EnumBacking::String,
        }
    }

    pub fn integers(cases: impl IntoIterator<Item = i64>) -> Self {
        Self {
            cases: cases.into_iter().map(Value::from).collect(),
            backing: EnumBacking::Integer,
        }
    }

    pub fn of<E: BackedEnum>() -> Self {
        Self {
            cases: E::cases().iter().map(BackedEnum::backing_value).collect(),
            backing: E::BACKING,
        }
    }

    pub fn cases(&self) -> &[Value] {
        &self.cases
    }

    pub fn backing(&self) -> EnumBacking {
        self.backing
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// A Rust enum whose variants are persisted as primitive values.
pub trait BackedEnum: Sized + 'static {
    const BACKING: EnumBacking;

    /// All variants in declaration order.
    fn cases() -> &'static [Self];

    fn backing_value(&self) -> Value;
}

/// Whether a relation yields one related instance or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// Hooks available when the type implements [`Generatable`].
#[derive(Debug, Clone, Copy)]
struct GenerationHooks {
    schema: fn() -> Result<SchemaObject>,
    fields_schema: fn() -> Result<SchemaObject>,
    morph: fn(Payload) -> Result<Payload>,
}

/// Type-erased descriptor of an entity type, built once at registration.
///
/// Types that implement [`Generatable`] carry their schema and morph hooks;
/// plain storage types only carry a name and their fillable fields.
#[derive(Debug, Clone)]
pub struct EntityType {
    name: &'static str,
    fillable: &'static [&'static str],
    generation: Option<GenerationHooks>,
}

impl EntityType {
    pub fn of<T: Generatable>() -> Self {
        Self {
            name: T::ENTITY,
            fillable: T::fillable(),
            generation: Some(GenerationHooks {
                schema: schema::derive_schema::<T>,
                fields_schema: schema::derive_fields_schema::<T>,
                morph: T::morph,
            }),
        }
    }

    /// A type that is stored but does not implement the generation contract.
    pub fn plain(name: &'static str, fillable: &'static [&'static str]) -> Self {
        Self {
            name,
            fillable,
            generation: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fillable(&self) -> &'static [&'static str] {
        self.fillable
    }

    pub fn is_generatable(&self) -> bool {
        self.generation.is_some()
    }

    /// Full schema, including the entity's own generatable relations.
    pub fn schema(&self) -> Result<SchemaObject> {
        (self.hooks()?.schema)()
    }

    /// Schema of the declared fields only.
    pub fn fields_schema(&self) -> Result<SchemaObject> {
        (self.hooks()?.fields_schema)()
    }

    /// Apply the entity's morph hook; identity for plain types.
    pub fn morph(&self, payload: Payload) -> Result<Payload> {
        match &self.generation {
            Some(hooks) => (hooks.morph)(payload),
            None => Ok(payload),
        }
    }

    fn hooks(&self) -> Result<&GenerationHooks> {
        self.generation
            .as_ref()
            .ok_or_else(|| GenerationError::UnsupportedType {
                entity: self.name.to_owned(),
            })
    }
}

/// Relation accessor: how a related entity hangs off its owner.
#[derive(Debug, Clone)]
pub struct Relation {
    name: &'static str,
    cardinality: Cardinality,
    related: EntityType,
    foreign_key: Option<Cow<'static, str>>,
}

impl Relation {
    pub fn new(name: &'static str, cardinality: Cardinality, related: EntityType) -> Self {
        Self {
            name,
            cardinality,
            related,
            foreign_key: None,
        }
    }

    pub fn has_one<R: Generatable>(name: &'static str) -> Self {
        Self::new(name, Cardinality::One, EntityType::of::<R>())
    }

    pub fn has_many<R: Generatable>(name: &'static str) -> Self {
        Self::new(name, Cardinality::Many, EntityType::of::<R>())
    }

    /// Override the owner key column set on related records.
    pub fn with_foreign_key(mut self, foreign_key: impl Into<Cow<'static, str>>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn related(&self) -> &EntityType {
        &self.related
    }

    /// Owner key column; defaults to `<owner in snake_case>_id`.
    pub fn foreign_key(&self, owner: &str) -> Cow<'static, str> {
        match &self.foreign_key {
            Some(key) => key.clone(),
            None => Cow::Owned(format!("{}_id", owner.to_case(Case::Snake))),
        }
    }

    /// Point a related record at its persisted owner.
    pub fn attach(&self, owner: &str, owner_id: RecordId, fields: &mut Payload) {
        fields.insert(self.foreign_key(owner).into_owned(), Value::from(owner_id.0));
    }
}

/// A relation generated together with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratableRelation {
    pub name: &'static str,
    pub description: Option<&'static str>,
}

impl From<&'static str> for GeneratableRelation {
    fn from(name: &'static str) -> Self {
        Self {
            name,
            description: None,
        }
    }
}

impl From<(&'static str, &'static str)> for GeneratableRelation {
    fn from((name, description): (&'static str, &'static str)) -> Self {
        Self {
            name,
            description: Some(description),
        }
    }
}

/// Look up the accessor for a generatable relation.
pub fn resolve_relation<'a>(
    entity: &'static str,
    accessors: &'a [Relation],
    name: &str,
) -> Result<&'a Relation> {
    accessors
        .iter()
        .find(|relation| relation.name == name)
        .ok_or_else(|| GenerationError::RelationResolution {
            entity,
            relation: name.to_owned(),
        })
}
