use crate::error::RecordError;
use crate::shape::RecordShape;
use crate::value::Value;
use std::borrow::Cow;
use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

// ─── Record (instance) ─────────────────────────────────────────────────────

/// One instance of a [`RecordShape`].
///
/// Storage is sparse: `slots[i]` is `None` until field `i` has been assigned,
/// either explicitly or by snapshotting its default during construction.
#[derive(Clone)]
pub struct Record {
    pub(crate) shape: Arc<RecordShape>,
    pub(crate) slots: Vec<Option<Value>>,
    // Factory outcomes memoized while `new` runs; `None` afterwards.
    pending: Option<Box<[OnceLock<Result<Value, RecordError>>]>>,
}

impl Record {
    /// Build and validate an instance.
    ///
    /// Undeclared names fail with `UnknownField` before anything else runs.
    /// Every field without an explicit value is then resolved in declared
    /// order and the result is stored. A default factory runs at most once
    /// per field here, even when another factory reads that field first, and
    /// later reads see the same value. A required field that resolves to
    /// nothing (or an empty value, per the shape's `EmptyPolicy`) fails with
    /// `RequiredFieldMissing`.
    pub fn new<I, K, V>(shape: &Arc<RecordShape>, values: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Record {
            shape: Arc::clone(shape),
            slots: vec![None; shape.len()],
            pending: Some((0..shape.len()).map(|_| OnceLock::new()).collect()),
        };

        for (name, value) in values {
            let name = name.as_ref();
            let pos = shape
                .position(name)
                .ok_or_else(|| shape.unknown_field(name))?;
            record.slots[pos] = Some(value.into());
        }

        let empty_policy = shape.config.empty_policy;
        for (pos, field) in shape.fields().iter().enumerate() {
            if let Some(stored) = &record.slots[pos] {
                if field.required && empty_policy.is_missing(Some(stored)) {
                    return Err(shape.required_missing(pos));
                }
                continue;
            }

            let resolved = match record.resolve_at(pos) {
                Ok(value) => value.map(Cow::into_owned),
                Err(e) if e.is_unset() => None,
                Err(e) => return Err(e),
            };
            if field.required && empty_policy.is_missing(resolved.as_ref()) {
                return Err(shape.required_missing(pos));
            }
            if let Some(value) = resolved {
                log::trace!("{}: snapshot default for field '{}'", shape.name(), field.name);
                record.slots[pos] = Some(value);
            }
        }

        record.pending = None;
        Ok(record)
    }

    /// Stored value, then fixed default, then factory. `None` when the field
    /// has none of them.
    pub(crate) fn resolve_at(&self, pos: usize) -> Result<Option<Cow<'_, Value>>, RecordError> {
        if let Some(value) = &self.slots[pos] {
            return Ok(Some(Cow::Borrowed(value)));
        }
        let field = &self.shape.fields()[pos];
        if let Some(value) = &field.default_value {
            return Ok(Some(Cow::Borrowed(value)));
        }
        let Some(factory) = &field.default_factory else {
            return Ok(None);
        };

        let Some(pending) = &self.pending else {
            let _guard = FactoryGuard::enter(self, pos)?;
            return factory(self).map(|v| Some(Cow::Owned(v)));
        };
        let cell = &pending[pos];
        let outcome = match cell.get() {
            Some(outcome) => outcome,
            None => {
                let produced = {
                    let _guard = FactoryGuard::enter(self, pos)?;
                    factory(self)
                };
                cell.get_or_init(|| produced)
            }
        };
        match outcome {
            Ok(value) => Ok(Some(Cow::Borrowed(value))),
            Err(e) => Err(e.clone()),
        }
    }
}

// ─── Re-entrancy guard ──────────────────────────────────────────────────────

thread_local! {
    // (record address, field position) for every factory running on this thread.
    static ACTIVE_FACTORIES: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a factory as running so a factory that (directly or through other
/// factories) reads its own field fails instead of recursing forever.
struct FactoryGuard {
    key: (usize, usize),
}

impl FactoryGuard {
    fn enter(record: &Record, pos: usize) -> Result<Self, RecordError> {
        let key = (record as *const Record as usize, pos);
        ACTIVE_FACTORIES.with_borrow_mut(|active| {
            if active.contains(&key) {
                return Err(RecordError::factory(
                    record.shape.fields()[pos].name.clone(),
                    "factory depends on its own field",
                ));
            }
            active.push(key);
            Ok(FactoryGuard { key })
        })
    }
}

impl Drop for FactoryGuard {
    fn drop(&mut self) {
        ACTIVE_FACTORIES.with_borrow_mut(|active| {
            if let Some(i) = active.iter().rposition(|k| *k == self.key) {
                active.remove(i);
            }
        });
    }
}
