//! Named scalar parameters of an equation (γ for Euler, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::euler::DEFAULT_GAMMA;
use crate::error::{FvmError, Result};

/// Registry of named equation parameters.
///
/// Each name can be registered once; lookups of unregistered names fail.
/// Deserialising goes through [`register`](Self::register), so a name
/// repeated in a JSON map is rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EquationParameters {
    values: BTreeMap<String, f64>,
}

impl EquationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for the Euler equations with γ = 5/3.
    pub fn euler_defaults() -> Self {
        let mut parameters = Self::new();
        parameters.values.insert("gamma".to_string(), DEFAULT_GAMMA);
        parameters
    }

    /// Register a new parameter.
    pub fn register(&mut self, name: &str, value: f64) -> Result<()> {
        if self.values.contains_key(name) {
            return Err(FvmError::DuplicateParameter(name.to_string()));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with(mut self, name: &str, value: f64) -> Result<Self> {
        self.register(name, value)?;
        Ok(self)
    }

    /// Overwrite an already registered parameter.
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FvmError::UnknownParameter(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| FvmError::UnknownParameter(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

struct ParametersVisitor;

impl<'de> Visitor<'de> for ParametersVisitor {
    type Value = EquationParameters;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of parameter names to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut parameters = EquationParameters::new();
        while let Some((name, value)) = map.next_entry::<String, f64>()? {
            parameters.register(&name, value).map_err(de::Error::custom)?;
        }
        Ok(parameters)
    }
}

impl<'de> Deserialize<'de> for EquationParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(ParametersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut parameters = EquationParameters::new();
        parameters.register("gamma", 1.4).unwrap();
        assert_eq!(parameters.get("gamma").unwrap(), 1.4);

        parameters.set("gamma", 1.67).unwrap();
        assert_eq!(parameters.get("gamma").unwrap(), 1.67);
    }

    #[test]
    fn test_unknown_parameter() {
        let parameters = EquationParameters::new();
        let err = parameters.get("gamma").unwrap_err();
        assert_eq!(err.to_string(), "Unknown parameter gamma");
        assert!(EquationParameters::new().set("gamma", 1.0).is_err());
    }

    #[test]
    fn test_duplicate_parameter() {
        let parameters = EquationParameters::euler_defaults();
        let err = parameters.with("gamma", 1.4).unwrap_err();
        assert!(matches!(err, FvmError::DuplicateParameter(name) if name == "gamma"));
    }

    #[test]
    fn test_json_is_a_plain_map() {
        let parameters: EquationParameters = serde_json::from_str(r#"{"gamma": 1.4}"#).unwrap();
        assert_eq!(parameters.get("gamma").unwrap(), 1.4);
        assert_eq!(parameters.names().collect::<Vec<_>>(), vec!["gamma"]);
    }

    #[test]
    fn test_json_rejects_repeated_name() {
        let result = serde_json::from_str::<EquationParameters>(r#"{"gamma": 1.4, "gamma": 1.6}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("gamma"), "{err}");
    }
}
