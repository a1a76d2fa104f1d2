//! Name-keyed lookup of entity types, for callers that only know an entity
//! by name (configuration, tooling, admin endpoints).

use std::collections::BTreeMap;

use schemars::schema::SchemaObject;

use crate::{
    entity::{EntityType, Generatable},
    error::{GenerationError, Result},
    schema::ResponseFormat,
};

#[derive(Debug, Default, Clone)]
pub struct EntityRegistry {
    entities: BTreeMap<&'static str, EntityType>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Generatable>(mut self) -> Self {
        self.entities.insert(T::ENTITY, EntityType::of::<T>());
        self
    }

    /// Register a stored type that cannot generate itself.
    pub fn register_plain(mut self, name: &'static str, fillable: &'static [&'static str]) -> Self {
        self.entities.insert(name, EntityType::plain(name, fillable));
        self
    }

    pub fn get(&self, name: &str) -> Result<&EntityType> {
        self.entities
            .get(name)
            .ok_or_else(|| GenerationError::UnknownEntity {
                entity: name.to_owned(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entities.keys().copied()
    }

    /// Derived schema of the named entity.
    ///
    /// # Errors
    ///
    /// * [`GenerationError::UnknownEntity`] if nothing is registered under `name`.
    /// * [`GenerationError::UnsupportedType`] if it was registered as plain.
    pub fn schema(&self, name: &str) -> Result<SchemaObject> {
        self.get(name)?.schema()
    }

    pub fn root_schema(&self, name: &str) -> Result<ResponseFormat> {
        let entity = self.get(name)?;
        Ok(ResponseFormat::new(entity.name(), entity.schema()?))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct Planet;

    impl Generatable for Planet {
        const ENTITY: &'static str = "Planet";

        fn fillable() -> &'static [&'static str] {
            &["name"]
        }

        fn field_descriptions() -> Vec<(&'static str, &'static str)> {
            vec![("name", "planet name")]
        }
    }

    fn registry() -> EntityRegistry {
        EntityRegistry::new()
            .register::<Planet>()
            .register_plain("Moon", &["name"])
    }

    #[test]
    fn derives_schema_by_name() {
        let format = registry().root_schema("Planet").unwrap().to_value().unwrap();

        assert_eq!(format["json_schema"]["name"], json!("planet_response"));
        assert_eq!(format["json_schema"]["schema"]["required"], json!(["name"]));
    }

    #[test]
    fn plain_entities_are_unsupported() {
        assert!(matches!(
            registry().schema("Moon"),
            Err(GenerationError::UnsupportedType { entity }) if entity == "Moon"
        ));
    }

    #[test]
    fn unknown_names_are_reported() {
        assert!(matches!(
            registry().schema("Comet"),
            Err(GenerationError::UnknownEntity { .. })
        ));
    }

    #[test]
    fn lists_registered_names() {
        assert_eq!(registry().names().collect::<Vec<_>>(), vec!["Moon", "Planet"]);
    }
}
