//! Build entity instances from a normalized payload.
//!
//! Materialization never touches storage. It yields the typed root model,
//! the root's record (its fillable fields), and one group of unsaved
//! related records per generatable relation.

use serde_json::Value;
use tracing::debug;

use crate::{
    entity::{EntityType, Generatable, Relation, resolve_relation},
    error::{GenerationError, Result},
    normalize::map_sentinels,
    seed::Payload,
};

/// Field values of one entity instance, restricted to its fillable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity: &'static str,
    pub fields: Payload,
}

impl Record {
    pub fn new(entity: &EntityType, payload: &Payload) -> Self {
        let fields = payload
            .iter()
            .filter(|(key, _)| entity.fillable().contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            entity: entity.name(),
            fields,
        }
    }
}

/// Related records produced for a single relation.
#[derive(Debug, Clone)]
pub struct RelatedGroup {
    pub relation: Relation,
    pub records: Vec<Record>,
}

/// An entity graph that has been generated but not saved.
#[derive(Debug)]
pub struct Generated<T> {
    pub model: T,
    pub record: Record,
    pub relations: Vec<RelatedGroup>,
}

impl<T> Generated<T> {
    /// Records generated for `relation`, empty if none.
    pub fn related(&self, relation: &str) -> &[Record] {
        self.relations
            .iter()
            .find(|group| group.relation.name() == relation)
            .map(|group| group.records.as_slice())
            .unwrap_or_default()
    }
}

/// Materialize `T` and one level of its generatable relations.
///
/// A relation given as a single object yields one related record, an array
/// of `k` objects yields `k`. An absent or `null` relation key yields none.
pub fn materialize<T: Generatable>(payload: Payload) -> Result<Generated<T>> {
    let entity = EntityType::of::<T>();
    let record = Record::new(&entity, &payload);
    let model: T = serde_json::from_value(Value::Object(record.fields.clone())).map_err(|err| {
        GenerationError::MalformedResponse(format!("cannot build `{}`: {err}", T::ENTITY))
    })?;

    let accessors = T::relations();
    let mut relations = Vec::new();

    for generatable in T::generatable_relations() {
        let relation = resolve_relation(T::ENTITY, &accessors, generatable.name)?;
        let related = relation.related();

        let records = related_items(generatable.name, payload.get(generatable.name))?
            .into_iter()
            .map(|mut item| -> Result<Record> {
                map_sentinels(&mut item);
                let item = related.morph(item)?;
                Ok(Record::new(related, &item))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            entity = T::ENTITY,
            relation = generatable.name,
            count = records.len(),
            "materialized related records"
        );

        relations.push(RelatedGroup {
            relation: relation.clone(),
            records,
        });
    }

    Ok(Generated {
        model,
        record,
        relations,
    })
}

fn related_items(relation: &str, value: Option<&Value>) -> Result<Vec<Payload>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(item)) => Ok(vec![item.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Object(item) => Ok(item.clone()),
                _ => Err(GenerationError::MalformedResponse(format!(
                    "relation `{relation}` contains a non-object item"
                ))),
            })
            .collect(),
        Some(_) => Err(GenerationError::MalformedResponse(format!(
            "relation `{relation}` must be an object or an array of objects"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::entity::{Cardinality, GeneratableRelation};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Recipe {
        name: Option<String>,
        servings: Option<u32>,
    }

    impl Generatable for Recipe {
        const ENTITY: &'static str = "Recipe";

        fn fillable() -> &'static [&'static str] {
            &["name", "servings"]
        }

        fn field_descriptions() -> Vec<(&'static str, &'static str)> {
            vec![("name", "dish name"), ("servings", "number of servings")]
        }

        fn relations() -> Vec<Relation> {
            vec![
                Relation::has_many::<Step>("steps"),
                Relation::has_one::<Step>("garnish"),
                Relation::new(
                    "photo",
                    Cardinality::One,
                    EntityType::plain("Photo", &["caption"]),
                ),
            ]
        }

        fn generatable_relations() -> Vec<GeneratableRelation> {
            vec!["steps".into(), "garnish".into(), "photo".into()]
        }
    }

    #[derive(Debug, Deserialize)]
    struct Step;

    impl Generatable for Step {
        const ENTITY: &'static str = "Step";

        fn fillable() -> &'static [&'static str] {
            &["text", "position"]
        }

        fn field_descriptions() -> Vec<(&'static str, &'static str)> {
            vec![("text", "instruction")]
        }

        fn morph(mut payload: Payload) -> Result<Payload> {
            if let Some(Value::String(text)) = payload.get_mut("text") {
                *text = text.trim().to_owned();
            }
            Ok(payload)
        }
    }

    #[derive(Debug, Deserialize)]
    struct Orphaned {}

    impl Generatable for Orphaned {
        const ENTITY: &'static str = "Orphaned";

        fn fillable() -> &'static [&'static str] {
            &[]
        }

        fn field_descriptions() -> Vec<(&'static str, &'static str)> {
            Vec::new()
        }

        fn generatable_relations() -> Vec<GeneratableRelation> {
            vec!["children".into()]
        }
    }

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn root_keeps_only_fillable_fields() {
        let generated = materialize::<Recipe>(payload(json!({
            "name": "Pho",
            "servings": 4,
            "secret": "msg",
            "steps": [],
        })))
        .unwrap();

        assert_eq!(
            generated.model,
            Recipe {
                name: Some("Pho".into()),
                servings: Some(4)
            }
        );
        assert_eq!(Value::Object(generated.record.fields), json!({"name": "Pho", "servings": 4}));
        assert_eq!(generated.record.entity, "Recipe");
    }

    #[test]
    fn arrays_yield_one_record_per_item() {
        let generated = materialize::<Recipe>(payload(json!({
            "name": "Pho",
            "steps": [{"text": "boil"}, {"text": "slice"}, {"text": "serve"}],
        })))
        .unwrap();

        assert_eq!(generated.related("steps").len(), 3);
        assert!(generated.related("steps").iter().all(|step| step.entity == "Step"));
    }

    #[test]
    fn single_object_yields_exactly_one_record() {
        let generated = materialize::<Recipe>(payload(json!({
            "name": "Pho",
            "steps": {"text": "boil"},
            "garnish": {"text": "basil"},
        })))
        .unwrap();

        assert_eq!(generated.related("steps").len(), 1);
        assert_eq!(generated.related("garnish").len(), 1);
    }

    #[test]
    fn absent_relation_yields_no_records() {
        let generated = materialize::<Recipe>(payload(json!({"name": "Pho"}))).unwrap();

        assert_eq!(generated.relations.len(), 3);
        assert!(generated.related("steps").is_empty());
        assert!(generated.related("photo").is_empty());
    }

    #[test]
    fn related_items_are_cleaned_morphed_and_restricted() {
        let generated = materialize::<Recipe>(payload(json!({
            "name": "Pho",
            "steps": [{"text": "  boil  ", "position": "-", "extra": true}],
        })))
        .unwrap();

        assert_eq!(
            Value::Object(generated.related("steps")[0].fields.clone()),
            json!({"text": "boil", "position": null})
        );
    }

    #[test]
    fn plain_related_entities_are_still_materialized() {
        let generated = materialize::<Recipe>(payload(json!({
            "name": "Pho",
            "photo": {"caption": "steaming bowl", "url": "x"},
        })))
        .unwrap();

        let photo = &generated.related("photo")[0];
        assert_eq!(photo.entity, "Photo");
        assert_eq!(Value::Object(photo.fields.clone()), json!({"caption": "steaming bowl"}));
    }

    #[test]
    fn scalar_relation_value_is_malformed() {
        assert!(matches!(
            materialize::<Recipe>(payload(json!({"name": "Pho", "steps": "boil"}))),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn wrongly_typed_root_field_is_malformed() {
        assert!(matches!(
            materialize::<Recipe>(payload(json!({"name": "Pho", "servings": "four"}))),
            Err(GenerationError::MalformedResponse(reason)) if reason.contains("Recipe")
        ));
    }

    #[test]
    fn undeclared_relation_accessor_fails() {
        assert!(matches!(
            materialize::<Orphaned>(Payload::new()),
            Err(GenerationError::RelationResolution { entity: "Orphaned", .. })
        ));
    }
}
