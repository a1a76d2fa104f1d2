//! Generation seeds: caller overrides merged on top of an entity's defaults.
//!
//! A seed is a flat JSON object. Whatever ends up in the seed is
//! authoritative: generated values for the same keys are discarded later
//! during normalization.

use serde_json::{Map, Value};

use crate::entity::Generatable;

/// Flat mapping from field name to literal value.
pub type Seed = Map<String, Value>;

/// Post-normalization field values of a single entity, including nested
/// relation payloads keyed by relation name.
pub type Payload = Map<String, Value>;

/// Merge the entity's default seed with `input`. Caller values win on key
/// collision.
pub fn build_seed<T: Generatable>(input: Option<Seed>) -> Seed {
    let mut seed = T::generation_seed();
    if let Some(input) = input {
        seed.extend(input);
    }
    seed
}

/// The subset of `seed` worth showing to the model: blank values carry no
/// information for the prompt.
///
/// Only empty values count as blank. `0` and `"0"` are real values and stay.
pub fn prompt_seed(seed: &Seed) -> Seed {
    seed.iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(true) | Value::Number(_) => false,
    }
}
