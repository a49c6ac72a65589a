use super::hash_op::FrozenRecord;
use super::instance::Record;
use super::read_op::RecordReadable;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Marker printed for fields that resolve to nothing.
pub const UNSET_MARKER: &str = "<unset>";

/// `TypeName(field=value, ...)` in declared order.
fn render(record: &Record, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}(", record.type_name())?;
    for (i, (name, value)) in record.items().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match value {
            Some(v) => write!(f, "{}={}", name, v.repr())?,
            None => write!(f, "{}={}", name, UNSET_MARKER)?,
        }
    }
    f.write_str(")")
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f)
    }
}

impl fmt::Display for FrozenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.record(), f)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("shape", &self.shape.name())
            .field("slots", &self.slots)
            .finish()
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

/// Ordered map of resolved values; unset fields serialize as null.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.items() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

impl Serialize for FrozenRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}
