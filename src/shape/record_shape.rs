use super::builder::ShapeBuilder;
use crate::error::RecordError;
use crate::record::Record;
use crate::types::{FastMap, FieldSpec, ShapeConfig};
use crate::value::Value;
use smol_str::SmolStr;
use std::sync::Arc;

// ─── RecordShape (compiled type) ───────────────────────────────────────────

/// A validated record type. Immutable once compiled; instances share it
/// through an `Arc`.
///
/// Field order is the required names in declaration order followed by the
/// optional names in declaration order.
#[derive(Debug)]
pub struct RecordShape {
    pub(crate) name: SmolStr,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) positions: FastMap<SmolStr, usize>,
    pub(crate) required_count: usize,
    pub(crate) mutable_count: usize,
    pub(crate) config: ShapeConfig,
}

impl RecordShape {
    pub fn builder(name: impl Into<SmolStr>) -> ShapeBuilder {
        ShapeBuilder::new(name)
    }

    /// Create an instance from `(field name, value)` pairs.
    pub fn construct<I, K, V>(self: &Arc<Self>, values: I) -> Result<Record, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Record::new(self, values)
    }

    /// Construct with no explicit values; everything comes from defaults.
    pub fn construct_default(self: &Arc<Self>) -> Result<Record, RecordError> {
        Record::new(self, std::iter::empty::<(&str, Value)>())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn config(&self) -> ShapeConfig {
        self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: a shape has at least one field.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.position(name).map(|pos| &self.fields[pos])
    }

    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields[..self.required_count]
            .iter()
            .map(|f| f.name.as_str())
    }

    pub fn optional_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields[self.required_count..]
            .iter()
            .map(|f| f.name.as_str())
    }

    pub fn mutable_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.mutable)
            .map(|f| f.name.as_str())
    }

    /// `Err(UnknownField)` for undeclared names.
    pub fn is_field_read_only(&self, name: &str) -> Result<bool, RecordError> {
        self.field(name)
            .map(|f| !f.mutable)
            .ok_or_else(|| self.unknown_field(name))
    }

    /// True when no field is mutable.
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.mutable_count == 0
    }

    /// Instances are hashable exactly when the whole shape is read-only.
    #[inline]
    pub fn is_hashable(&self) -> bool {
        self.is_read_only()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Error constructors
    // ════════════════════════════════════════════════════════════════════════

    pub(crate) fn unknown_field(&self, name: &str) -> RecordError {
        RecordError::UnknownField {
            shape: self.name.clone(),
            field: SmolStr::from(name),
        }
    }

    pub(crate) fn field_unset(&self, pos: usize) -> RecordError {
        RecordError::FieldUnset {
            shape: self.name.clone(),
            field: self.fields[pos].name.clone(),
        }
    }

    pub(crate) fn required_missing(&self, pos: usize) -> RecordError {
        RecordError::RequiredFieldMissing {
            shape: self.name.clone(),
            field: self.fields[pos].name.clone(),
        }
    }

    /// Position of `name` if it may be written, otherwise the gate's error.
    pub(crate) fn writable_position(&self, name: &str) -> Result<usize, RecordError> {
        let pos = self.position(name).ok_or_else(|| self.unknown_field(name))?;
        if self.fields[pos].mutable {
            return Ok(pos);
        }
        if self.is_read_only() {
            Err(RecordError::ShapeIsReadOnly {
                shape: self.name.clone(),
            })
        } else {
            Err(RecordError::FieldIsReadOnly {
                shape: self.name.clone(),
                field: self.fields[pos].name.clone(),
            })
        }
    }
}
