use super::instance::Record;
use crate::error::RecordError;
use crate::shape::RecordShape;
use crate::types::UnsetPolicy;
use crate::value::Value;
use smol_str::SmolStr;
use std::borrow::Cow;
use std::sync::Arc;

/// Read access shared by [`Record`] and [`FrozenRecord`](super::FrozenRecord).
pub trait RecordReadable {
    fn record(&self) -> &Record;

    #[inline]
    fn shape(&self) -> &Arc<RecordShape> {
        &self.record().shape
    }

    #[inline]
    fn type_name(&self) -> &str {
        self.shape().name()
    }

    /// Whether `name` is a declared field (set or not).
    #[inline]
    fn contains(&self, name: &str) -> bool {
        self.shape().contains(name)
    }

    /// Number of declared fields.
    #[inline]
    fn len(&self) -> usize {
        self.shape().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.shape().is_empty()
    }

    fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.shape().field_names()
    }

    /// Resolve a field: stored value, fixed default, factory, in that order.
    ///
    /// Fails with `UnknownField` for undeclared names. A field with nothing to
    /// resolve to fails with `FieldUnset`, or yields `Value::Null` when the
    /// shape uses `UnsetPolicy::ReturnAbsent`.
    fn resolve(&self, name: &str) -> Result<Cow<'_, Value>, RecordError> {
        let shape = self.shape();
        let pos = shape.position(name).ok_or_else(|| shape.unknown_field(name))?;
        match self.record().resolve_at(pos)? {
            Some(value) => Ok(value),
            None => match shape.config().unset_policy {
                UnsetPolicy::Fail => Err(shape.field_unset(pos)),
                UnsetPolicy::ReturnAbsent => Ok(Cow::Owned(Value::Null)),
            },
        }
    }

    /// Owned variant of [`resolve`](Self::resolve).
    #[inline]
    fn get(&self, name: &str) -> Result<Value, RecordError> {
        self.resolve(name).map(Cow::into_owned)
    }

    /// The explicitly stored value, without falling back to defaults.
    fn stored(&self, name: &str) -> Result<Option<&Value>, RecordError> {
        let shape = self.shape();
        let pos = shape.position(name).ok_or_else(|| shape.unknown_field(name))?;
        Ok(self.record().slots[pos].as_ref())
    }

    #[inline]
    fn is_set(&self, name: &str) -> Result<bool, RecordError> {
        self.stored(name).map(|v| v.is_some())
    }

    /// Lazily resolved `(name, value)` pairs in declared order.
    fn items(&self) -> Items<'_> {
        Items {
            record: self.record(),
            pos: 0,
        }
    }

    fn field_values(&self) -> Vec<Option<Value>> {
        self.items().map(|(_, v)| v.map(Cow::into_owned)).collect()
    }

    fn field_items(&self) -> Vec<(SmolStr, Option<Value>)> {
        self.items()
            .map(|(name, v)| (SmolStr::from(name), v.map(Cow::into_owned)))
            .collect()
    }

    /// Like [`field_values`](Self::field_values), but factory failures other
    /// than an unset field are returned instead of read as absent.
    fn try_field_values(&self) -> Result<Vec<Option<Value>>, RecordError> {
        let record = self.record();
        (0..record.slots.len())
            .map(|pos| match record.resolve_at(pos) {
                Ok(v) => Ok(v.map(Cow::into_owned)),
                Err(e) if e.is_unset() => Ok(None),
                Err(e) => Err(e),
            })
            .collect()
    }
}

impl RecordReadable for Record {
    #[inline]
    fn record(&self) -> &Record {
        self
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

/// Iterator returned by [`RecordReadable::items`].
///
/// A field that does not resolve (unset, or its factory failed) yields `None`.
pub struct Items<'a> {
    record: &'a Record,
    pos: usize,
}

impl<'a> Iterator for Items<'a> {
    type Item = (&'a str, Option<Cow<'a, Value>>);

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.record;
        let field = record.shape.fields().get(self.pos)?;
        let value = record.resolve_at(self.pos).ok().flatten();
        self.pos += 1;
        Some((field.name.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.slots.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Items<'_> {}
