//! Declarative shapes loaded from JSON documents.
//!
//! ```json
//! {
//!   "name": "ComplexNS",
//!   "required_fields": "id",
//!   "optional_fields": ["name", "description", "extra"],
//!   "mutable_fields": ["description", "extra"],
//!   "default_values": { "description": "None available" },
//!   "default_value_factories": { "id": "next_id" },
//!   "config": { "unset_policy": "return_absent" }
//! }
//! ```
//!
//! Factories cannot live in JSON, so `default_value_factories` maps each
//! field to the name of a factory registered in a [`FactoryRegistry`].

use super::builder::ShapeBuilder;
use super::record_shape::RecordShape;
use crate::error::{RecordError, ShapeError};
use crate::record::Record;
use crate::types::{FastMap, Factory, FieldNames, ShapeConfig};
use crate::value::Value;
use serde_json::Map;
use smol_str::SmolStr;
use std::sync::Arc;

const KNOWN_KEYS: [&str; 7] = [
    "name",
    "required_fields",
    "optional_fields",
    "mutable_fields",
    "default_values",
    "default_value_factories",
    "config",
];

/// Named default value factories that declarations can refer to.
#[derive(Default, Clone)]
pub struct FactoryRegistry {
    factories: FastMap<SmolStr, Factory>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<SmolStr>, factory: F) -> &mut Self
    where
        F: Fn(&Record) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Factory> {
        self.factories.get(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Parse `text` as JSON and compile the declared shape.
pub fn shape_from_json_str(
    text: &str,
    registry: &FactoryRegistry,
) -> Result<Arc<RecordShape>, ShapeError> {
    let doc: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ShapeError::InvalidSpecArgument {
            argument: "declaration",
            reason: e.to_string(),
        })?;
    shape_from_json(&doc, registry)
}

/// Compile the shape described by a JSON declaration.
pub fn shape_from_json(
    doc: &serde_json::Value,
    registry: &FactoryRegistry,
) -> Result<Arc<RecordShape>, ShapeError> {
    let obj = doc
        .as_object()
        .ok_or_else(|| invalid("declaration", "declaration must be a JSON object"))?;

    if let Some(key) = obj.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        return Err(invalid("declaration", format!("unknown key '{}'", key)));
    }

    let name = match obj.get("name") {
        Some(serde_json::Value::String(s)) => s.as_str(),
        _ => return Err(invalid("typename", "'name' must be a string")),
    };

    let mut builder = ShapeBuilder::new(name)
        .required(field_names(obj, "required_fields")?)
        .optional(field_names(obj, "optional_fields")?)
        .mutable(field_names(obj, "mutable_fields")?);

    for (field, value) in mapping(obj, "default_values")? {
        builder = builder.default_value(field.as_str(), Value::from(value.clone()));
    }

    for (field, target) in mapping(obj, "default_value_factories")? {
        let factory = target.as_str().and_then(|name| registry.get(name));
        builder = match factory {
            Some(f) => builder.shared_factory(field.as_str(), Arc::clone(f)),
            None => builder.uninvocable_factory(field.as_str()),
        };
    }

    if let Some(config) = obj.get("config") {
        let config: ShapeConfig = serde_json::from_value(config.clone())
            .map_err(|e| invalid("config", e.to_string()))?;
        builder = builder.config(config);
    }

    builder.build()
}

fn invalid(argument: &'static str, reason: impl Into<String>) -> ShapeError {
    ShapeError::InvalidSpecArgument {
        argument,
        reason: reason.into(),
    }
}

fn field_names(
    obj: &Map<String, serde_json::Value>,
    argument: &'static str,
) -> Result<FieldNames, ShapeError> {
    match obj.get(argument) {
        None | Some(serde_json::Value::Null) => Ok(FieldNames::none()),
        Some(serde_json::Value::String(s)) => Ok(FieldNames::from(s.as_str())),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(SmolStr::from)
                    .ok_or_else(|| invalid(argument, "items of the container must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldNames::Many),
        Some(_) => Err(invalid(
            argument,
            "must be a string or container of strings",
        )),
    }
}

fn mapping<'a>(
    obj: &'a Map<String, serde_json::Value>,
    argument: &'static str,
) -> Result<impl Iterator<Item = (&'a String, &'a serde_json::Value)> + 'a, ShapeError> {
    match obj.get(argument) {
        None | Some(serde_json::Value::Null) => {
            Ok(None::<serde_json::map::Iter<'a>>.into_iter().flatten())
        }
        Some(serde_json::Value::Object(map)) => Ok(Some(map.iter()).into_iter().flatten()),
        Some(_) => Err(invalid(argument, "must be a mapping")),
    }
}
