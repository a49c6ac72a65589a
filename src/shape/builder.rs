//! Shape compilation: argument validation and the fluent builder.

use super::record_shape::RecordShape;
use crate::error::{RecordError, ShapeError};
use crate::record::Record;
use crate::types::*;
use crate::value::Value;
use smol_str::SmolStr;
use std::sync::Arc;

/// Compile a record shape from its field lists and defaults.
///
/// `required`, `optional` and `mutable` each take a single name or a
/// collection of names. Every violation is reported here, never later at
/// construction time.
pub fn compile<KV, KF>(
    type_name: impl Into<SmolStr>,
    required: impl Into<FieldNames>,
    optional: impl Into<FieldNames>,
    mutable: impl Into<FieldNames>,
    default_values: impl IntoIterator<Item = (KV, Value)>,
    default_factories: impl IntoIterator<Item = (KF, Factory)>,
) -> Result<Arc<RecordShape>, ShapeError>
where
    KV: Into<SmolStr>,
    KF: Into<SmolStr>,
{
    let mut builder = ShapeBuilder::new(type_name)
        .required(required)
        .optional(optional)
        .mutable(mutable);
    for (name, value) in default_values {
        builder = builder.default_value(name, value);
    }
    for (name, factory) in default_factories {
        builder = builder.shared_factory(name, factory);
    }
    builder.build()
}

/// Fluent front end over [`compile`].
///
/// Repeated calls to `required` / `optional` / `mutable` append; a repeated
/// default for the same field replaces the earlier one.
#[derive(Default)]
pub struct ShapeBuilder {
    name: SmolStr,
    required: Vec<SmolStr>,
    optional: Vec<SmolStr>,
    mutable: Vec<SmolStr>,
    default_values: Vec<(SmolStr, Value)>,
    // `None` marks a factory reference that could not be resolved to a callable.
    default_factories: Vec<(SmolStr, Option<Factory>)>,
    config: ShapeConfig,
}

impl ShapeBuilder {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self, names: impl Into<FieldNames>) -> Self {
        self.required.extend(names.into().into_vec());
        self
    }

    pub fn optional(mut self, names: impl Into<FieldNames>) -> Self {
        self.optional.extend(names.into().into_vec());
        self
    }

    pub fn mutable(mut self, names: impl Into<FieldNames>) -> Self {
        self.mutable.extend(names.into().into_vec());
        self
    }

    pub fn default_value(mut self, name: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.default_values.push((name.into(), value.into()));
        self
    }

    /// Register a factory `(record) -> value`. Only consulted when the field
    /// has no fixed default.
    pub fn default_factory<F>(self, name: impl Into<SmolStr>, factory: F) -> Self
    where
        F: Fn(&Record) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        self.shared_factory(name, Arc::new(factory))
    }

    pub fn shared_factory(mut self, name: impl Into<SmolStr>, factory: Factory) -> Self {
        self.default_factories.push((name.into(), Some(factory)));
        self
    }

    pub(crate) fn uninvocable_factory(mut self, name: impl Into<SmolStr>) -> Self {
        self.default_factories.push((name.into(), None));
        self
    }

    pub fn unset_policy(mut self, policy: UnsetPolicy) -> Self {
        self.config.unset_policy = policy;
        self
    }

    pub fn empty_policy(mut self, policy: EmptyPolicy) -> Self {
        self.config.empty_policy = policy;
        self
    }

    pub fn config(mut self, config: ShapeConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate everything and produce the shape.
    pub fn build(self) -> Result<Arc<RecordShape>, ShapeError> {
        if self.name.trim().is_empty() {
            return Err(ShapeError::InvalidSpecArgument {
                argument: "typename",
                reason: "type name must be a non-empty string".into(),
            });
        }

        check_names("required_fields", &self.required)?;
        check_names("optional_fields", &self.optional)?;
        check_names("mutable_fields", &self.mutable)?;

        if self.required.is_empty() && self.optional.is_empty() {
            return Err(ShapeError::EmptyFieldSet);
        }

        let mut positions: FastMap<SmolStr, usize> = FastMap::default();
        for name in self.required.iter().chain(self.optional.iter()) {
            let pos = positions.len();
            if positions.insert(name.clone(), pos).is_some() {
                return Err(ShapeError::DuplicateFieldName {
                    argument: "optional_fields",
                    field: name.clone(),
                });
            }
        }

        if let Some(name) = self.mutable.iter().find(|n| !positions.contains_key(*n)) {
            return Err(ShapeError::UndeclaredMutableField(name.clone()));
        }

        check_targets(
            "default_values",
            self.default_values.iter().map(|(n, _)| n),
            &positions,
        )?;
        check_targets(
            "default_value_factories",
            self.default_factories.iter().map(|(n, _)| n),
            &positions,
        )?;

        let mut factories: FastMap<SmolStr, Factory> = FastMap::default();
        for (name, factory) in self.default_factories {
            match factory {
                Some(f) => {
                    factories.insert(name, f);
                }
                None => return Err(ShapeError::NonInvocableFactory(name)),
            }
        }
        let mut values: FastMap<SmolStr, Value> = self.default_values.into_iter().collect();
        let mutable: FastHashSet<SmolStr> = self.mutable.into_iter().collect();

        let required_count = self.required.len();
        let fields: Vec<FieldSpec> = self
            .required
            .into_iter()
            .chain(self.optional)
            .enumerate()
            .map(|(pos, name)| FieldSpec {
                required: pos < required_count,
                mutable: mutable.contains(&name),
                default_value: values.remove(&name),
                default_factory: factories.remove(&name),
                name,
            })
            .collect();

        let shape = RecordShape {
            name: self.name,
            mutable_count: mutable.len(),
            required_count,
            positions,
            fields,
            config: self.config,
        };
        log::debug!(
            "compiled namedspace {} ({} fields, {} required, {} mutable)",
            shape.name,
            shape.fields.len(),
            shape.required_count,
            shape.mutable_count
        );
        Ok(Arc::new(shape))
    }
}

fn check_names(argument: &'static str, names: &[SmolStr]) -> Result<(), ShapeError> {
    let mut seen: FastHashSet<&str> = FastHashSet::default();
    for name in names {
        if name.trim().is_empty() {
            return Err(ShapeError::InvalidSpecArgument {
                argument,
                reason: "field names must be non-empty strings".into(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ShapeError::DuplicateFieldName {
                argument,
                field: name.clone(),
            });
        }
    }
    Ok(())
}

fn check_targets<'a>(
    argument: &'static str,
    targets: impl Iterator<Item = &'a SmolStr>,
    positions: &FastMap<SmolStr, usize>,
) -> Result<(), ShapeError> {
    let mut unknown: Vec<&str> = targets
        .filter(|name| !positions.contains_key(*name))
        .map(SmolStr::as_str)
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    unknown.dedup();
    Err(ShapeError::UnknownDefaultTarget {
        argument,
        fields: unknown.join(", "),
    })
}
