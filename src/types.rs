use crate::error::RecordError;
use crate::record::Record;
use crate::value::Value;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

pub type FastMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;
pub type FastHashSet<T> = HashSet<T, BuildHasherDefault<FxHasher>>;

/// Default value factory. Receives the record being resolved, so a factory
/// may derive its value from other fields.
pub type Factory = Arc<dyn Fn(&Record) -> Result<Value, RecordError> + Send + Sync>;

// ─── FieldNames ─────────────────────────────────────────────────────────────

/// A single field name or a collection of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNames {
    One(SmolStr),
    Many(Vec<SmolStr>),
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames::Many(Vec::new())
    }
}

impl FieldNames {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<SmolStr> {
        match self {
            FieldNames::One(name) => vec![name],
            FieldNames::Many(names) => names,
        }
    }
}

impl From<&str> for FieldNames {
    fn from(name: &str) -> Self {
        FieldNames::One(SmolStr::from(name))
    }
}

impl From<String> for FieldNames {
    fn from(name: String) -> Self {
        FieldNames::One(SmolStr::from(name))
    }
}

impl From<SmolStr> for FieldNames {
    fn from(name: SmolStr) -> Self {
        FieldNames::One(name)
    }
}

impl From<&[&str]> for FieldNames {
    fn from(names: &[&str]) -> Self {
        FieldNames::Many(names.iter().map(|n| SmolStr::from(*n)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldNames {
    fn from(names: [&str; N]) -> Self {
        FieldNames::Many(names.iter().map(|n| SmolStr::from(*n)).collect())
    }
}

impl From<Vec<&str>> for FieldNames {
    fn from(names: Vec<&str>) -> Self {
        FieldNames::Many(names.into_iter().map(SmolStr::from).collect())
    }
}

impl From<Vec<String>> for FieldNames {
    fn from(names: Vec<String>) -> Self {
        FieldNames::Many(names.into_iter().map(SmolStr::from).collect())
    }
}

impl From<Vec<SmolStr>> for FieldNames {
    fn from(names: Vec<SmolStr>) -> Self {
        FieldNames::Many(names)
    }
}

// ─── Config ─────────────────────────────────────────────────────────────────

/// What a read of an optional field with no value, default or factory yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsetPolicy {
    /// Fail with `RecordError::FieldUnset`.
    #[default]
    Fail,
    /// Quietly return `Value::Null`.
    ReturnAbsent,
}

/// Which values count as "no value" when checking required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// `Null` and `""` both fail the required check.
    #[default]
    NullOrEmptyString,
    /// Only `Null` fails; an empty string is a legitimate value.
    NullOnly,
}

impl EmptyPolicy {
    #[inline]
    pub fn is_missing(self, value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(v) => self == EmptyPolicy::NullOrEmptyString && v.is_empty_str(),
        }
    }
}

/// Per-shape behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShapeConfig {
    pub unset_policy: UnsetPolicy,
    pub empty_policy: EmptyPolicy,
}

// ─── FieldSpec ──────────────────────────────────────────────────────────────

/// One compiled field of a shape.
#[derive(Clone)]
pub struct FieldSpec {
    pub name: SmolStr,
    pub required: bool,
    pub mutable: bool,
    pub default_value: Option<Value>,
    pub default_factory: Option<Factory>,
}

impl FieldSpec {
    #[inline]
    pub fn has_default(&self) -> bool {
        self.default_value.is_some() || self.default_factory.is_some()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("mutable", &self.mutable)
            .field("default_value", &self.default_value)
            .field("default_factory", &self.default_factory.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
