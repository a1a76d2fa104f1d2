//! Strict JSON Schema derivation from entity metadata.
//!
//! The derived document is the contract handed to the backend: a closed
//! object (`additionalProperties: false`) where every declared field and
//! every schema-capable generatable relation is required. Schemas are
//! assembled from [`schemars`] schema objects and serialized once, when the
//! request is built.
//!
//! ```rust,ignore
//! let format = modelgen_core::schema::root_schema::<Book>()?;
//! println!("{}", serde_json::to_string_pretty(&format)?);
//! ```

use schemars::schema::{InstanceType, Schema, SchemaObject, SingleOrVec};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    entity::{Cardinality, EnumBacking, FieldCast, Generatable, resolve_relation},
    error::{GenerationError, Result},
    seed::Payload,
};

/// Enums with more cases than this are emitted as plain strings.
pub const ENUM_CASE_LIMIT: usize = 10;

/// `response_format` wrapper sent alongside the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: JsonSchemaFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub schema: SchemaObject,
    pub strict: bool,
}

impl ResponseFormat {
    pub fn new(entity: &str, schema: SchemaObject) -> Self {
        Self {
            kind: "json_schema",
            json_schema: JsonSchemaFormat {
                name: response_name(entity),
                schema,
                strict: true,
            },
        }
    }

    pub fn schema(&self) -> &SchemaObject {
        &self.json_schema.schema
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// `"<lowercased entity>_response"`.
pub fn response_name(entity: &str) -> String {
    format!("{}_response", entity.to_lowercase())
}

/// Wrap [`derive_schema`] in a strict `json_schema` response format.
pub fn root_schema<T: Generatable>() -> Result<ResponseFormat> {
    Ok(ResponseFormat::new(T::ENTITY, derive_schema::<T>()?))
}

/// Derive the schema of `T`: its described fields plus one level of
/// generatable relations.
///
/// Related entities contribute their fields only; their own relations are
/// not expanded. Relations whose target does not implement the generation
/// contract are left out entirely.
pub fn derive_schema<T: Generatable>() -> Result<SchemaObject> {
    let mut schema = derive_fields_schema::<T>()?;
    let accessors = T::relations();

    for generatable in T::generatable_relations() {
        let relation = resolve_relation(T::ENTITY, &accessors, generatable.name)?;
        let related = relation.related();

        if !related.is_generatable() {
            debug!(
                entity = T::ENTITY,
                relation = generatable.name,
                related = related.name(),
                "skipping relation without generation support"
            );
            continue;
        }

        let related_schema = related.fields_schema()?;
        let property = match relation.cardinality() {
            Cardinality::One => related_schema,
            Cardinality::Many => array_of(related_schema),
        };

        let object = schema.object();
        object
            .properties
            .insert(generatable.name.to_owned(), Schema::Object(property));
        object.required.insert(generatable.name.to_owned());
    }

    Ok(schema)
}

/// Schema of the described fields of `T`, without relations.
///
/// # Errors
///
/// [`GenerationError::Configuration`] if a described field is not fillable.
pub fn derive_fields_schema<T: Generatable>() -> Result<SchemaObject> {
    let fillable = T::fillable();
    let casts = T::casts();

    let mut schema = SchemaObject {
        instance_type: Some(InstanceType::Object.into()),
        ..Default::default()
    };
    schema.object().additional_properties = Some(Box::new(Schema::Bool(false)));

    for (field, description) in T::field_descriptions() {
        if !fillable.contains(&field) {
            return Err(GenerationError::Configuration {
                entity: T::ENTITY,
                field: field.to_owned(),
            });
        }

        let cast = casts
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, cast)| cast);

        let object = schema.object();
        object
            .properties
            .insert(field.to_owned(), Schema::Object(field_schema(description, cast)));
        object.required.insert(field.to_owned());
    }

    Ok(schema)
}

fn field_schema(description: &str, cast: Option<&FieldCast>) -> SchemaObject {
    let mut property = typed(InstanceType::String);
    property.metadata().description = Some(description.to_owned());

    match cast {
        Some(FieldCast::StringArray) => {
            property.instance_type = Some(InstanceType::Array.into());
            property.array().items = Some(SingleOrVec::Single(Box::new(Schema::Object(typed(
                InstanceType::String,
            )))));
        }
        Some(FieldCast::Enum(cast)) if cast.len() <= ENUM_CASE_LIMIT => {
            property.enum_values = Some(cast.cases().to_vec());
            property.instance_type = Some(
                match cast.backing() {
                    EnumBacking::Integer => InstanceType::Integer,
                    EnumBacking::String => InstanceType::String,
                }
                .into(),
            );
        }
        Some(FieldCast::Integer) => {
            property.instance_type = Some(InstanceType::Integer.into());
        }
        Some(FieldCast::Enum(_)) | Some(FieldCast::String) | None => {}
    }

    property
}

fn typed(instance_type: InstanceType) -> SchemaObject {
    SchemaObject {
        instance_type: Some(instance_type.into()),
        ..Default::default()
    }
}

fn array_of(items: SchemaObject) -> SchemaObject {
    let mut schema = typed(InstanceType::Array);
    schema.array().items = Some(SingleOrVec::Single(Box::new(Schema::Object(items))));
    schema
}

/// Check `payload` against the required-field closure of `schema`.
///
/// Only key presence is verified, recursively through object-typed
/// properties and arrays of objects. A single object where an array of
/// objects is expected is accepted, mirroring how relations are
/// materialized.
pub fn validate_required(schema: &SchemaObject, payload: &Payload) -> Result<()> {
    check_object(schema, payload, "$")
}

fn check_object(schema: &SchemaObject, payload: &Payload, path: &str) -> Result<()> {
    let Some(object) = schema.object.as_deref() else {
        return Ok(());
    };

    for key in &object.required {
        let value = payload.get(key).ok_or_else(|| {
            GenerationError::MalformedResponse(format!("{path}: missing required key `{key}`"))
        })?;

        if let Some(Schema::Object(property)) = object.properties.get(key) {
            check_value(property, value, &format!("{path}.{key}"))?;
        }
    }

    Ok(())
}

fn check_value(schema: &SchemaObject, value: &Value, path: &str) -> Result<()> {
    if schema.has_type(InstanceType::Object) {
        let Value::Object(map) = value else {
            return Err(GenerationError::MalformedResponse(format!(
                "{path}: expected an object"
            )));
        };
        return check_object(schema, map, path);
    }

    let items = schema
        .array
        .as_deref()
        .and_then(|array| array.items.as_ref());
    if let Some(SingleOrVec::Single(item)) = items {
        let Schema::Object(item) = item.as_ref() else {
            return Ok(());
        };
        if !item.has_type(InstanceType::Object) {
            return Ok(());
        }

        return match value {
            Value::Array(elements) => elements
                .iter()
                .enumerate()
                .try_for_each(|(index, element)| check_value(item, element, &format!("{path}[{index}]"))),
            Value::Object(_) => check_value(item, value, path),
            _ => Err(GenerationError::MalformedResponse(format!(
                "{path}: expected an array of objects"
            ))),
        };
    }

    Ok(())
}
