//! Generation settings shared by every request a factory issues.
//!
//! Model and temperature are constants of the factory, not derived per
//! entity. Defaults match the classic setup (`gpt-4o` at temperature `1.0`)
//! and can be overridden in code or from the environment:
//!
//! | Variable               | Effect                              |
//! |------------------------|-------------------------------------|
//! | `MODELGEN_MODEL`       | Model name, e.g. `gpt-4o-mini`      |
//! | `MODELGEN_TEMPERATURE` | Sampling temperature in `0.0..=2.0` |

use std::env;

use crate::{
    error::{GenerationError, Result},
    model::{Model, OpenAiModel},
};

pub const MODEL_ENV: &str = "MODELGEN_MODEL";
pub const TEMPERATURE_ENV: &str = "MODELGEN_TEMPERATURE";

pub const DEFAULT_TEMPERATURE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: Model,
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: Model::OpenAi(OpenAiModel::Gpt4o),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Defaults overridden by `MODELGEN_MODEL` / `MODELGEN_TEMPERATURE`.
    ///
    /// # Errors
    ///
    /// [`GenerationError::Invalid`] if the temperature is not a number in
    /// `0.0..=2.0`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(model) = lookup(MODEL_ENV).filter(|value| !value.trim().is_empty()) {
            let Ok(model) = model.trim().parse::<Model>();
            config.model = model;
        }

        if let Some(raw) = lookup(TEMPERATURE_ENV) {
            let temperature: f64 = raw.trim().parse().map_err(|_| {
                GenerationError::Invalid(format!("`{TEMPERATURE_ENV}` is not a number: {raw}"))
            })?;
            config.temperature = temperature;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GenerationError::Invalid(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, collections::HashMap};

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(GenerationConfig::from_lookup(lookup(&[])).unwrap(), GenerationConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = GenerationConfig::from_lookup(lookup(&[
            (MODEL_ENV, "my-finetune"),
            (TEMPERATURE_ENV, "0.2"),
        ]))
        .unwrap();

        assert_eq!(config.model, Model::Custom(Cow::Borrowed("my-finetune")));
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn rejects_unparsable_temperature() {
        assert!(matches!(
            GenerationConfig::from_lookup(lookup(&[(TEMPERATURE_ENV, "warm")])),
            Err(GenerationError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        assert!(GenerationConfig::new().with_temperature(3.5).validate().is_err());
    }
}
