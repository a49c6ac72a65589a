use super::instance::Record;
use crate::error::RecordError;
use crate::value::Value;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Mutation gate
    // ════════════════════════════════════════════════════════════════════════
    //
    // Every write goes through `RecordShape::writable_position`:
    //   undeclared name          → UnknownField
    //   shape has no mutable set → ShapeIsReadOnly
    //   field not mutable        → FieldIsReadOnly
    // Storage is untouched when the gate fails.

    /// Assign a mutable field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let pos = self.shape.writable_position(name)?;
        self.slots[pos] = Some(value.into());
        Ok(())
    }

    /// Drop the stored value of a mutable field so reads fall back to its
    /// default again. Returns the previous stored value, if any.
    pub fn clear(&mut self, name: &str) -> Result<Option<Value>, RecordError> {
        let pos = self.shape.writable_position(name)?;
        Ok(self.slots[pos].take())
    }

    /// Assign several fields at once. Nothing is written unless every pair
    /// passes the gate.
    pub fn update<I, K, V>(&mut self, values: I) -> Result<(), RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let staged = values
            .into_iter()
            .map(|(name, value)| {
                self.shape
                    .writable_position(name.as_ref())
                    .map(|pos| (pos, value.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (pos, value) in staged {
            self.slots[pos] = Some(value);
        }
        Ok(())
    }
}
