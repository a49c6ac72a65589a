use super::instance::Record;
use super::read_op::RecordReadable;
use crate::error::RecordError;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use xxhash_rust::xxh64::Xxh64;

// ─── Equality ───────────────────────────────────────────────────────────────

/// Equal when both records come from the same compiled shape and resolve to
/// the same ordered values (unset fields compare as absent).
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shape, &other.shape)
            && self.items().zip(other.items()).all(|((_, a), (_, b))| a == b)
    }
}

impl Eq for Record {}

// ─── Hashing ────────────────────────────────────────────────────────────────

impl Record {
    /// xxh64 fingerprint of the ordered resolved values.
    ///
    /// Fails with `NotHashable` whenever the shape declares any mutable
    /// field, whether or not this instance was ever modified.
    pub fn try_hash(&self) -> Result<u64, RecordError> {
        if !self.shape.is_hashable() {
            return Err(RecordError::NotHashable {
                shape: self.shape.name.clone(),
            });
        }
        let mut hasher = Xxh64::new(0);
        for value in self.try_field_values()? {
            value.hash(&mut hasher);
        }
        Ok(hasher.digest())
    }

    /// Turn the record into a map key. Only possible for read-only shapes.
    pub fn freeze(self) -> Result<FrozenRecord, RecordError> {
        let fingerprint = self.try_hash()?;
        Ok(FrozenRecord {
            record: self,
            fingerprint,
        })
    }
}

// ─── FrozenRecord ───────────────────────────────────────────────────────────

/// A record of a read-only shape, usable in `HashMap` / `HashSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenRecord {
    record: Record,
    fingerprint: u64,
}

impl FrozenRecord {
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

impl Hash for FrozenRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint);
    }
}

impl RecordReadable for FrozenRecord {
    #[inline]
    fn record(&self) -> &Record {
        &self.record
    }
}
