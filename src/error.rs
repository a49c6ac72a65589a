// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

/// Raised while compiling a shape. No partial shape is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("Value for argument '{argument}' is invalid: {reason}")]
    InvalidSpecArgument {
        argument: &'static str,
        reason: String,
    },
    #[error("Value for argument '{argument}' contains duplicate field '{field}'")]
    DuplicateFieldName {
        argument: &'static str,
        field: SmolStr,
    },
    #[error("Mutable field '{0}' is not a required or optional field")]
    UndeclaredMutableField(SmolStr),
    #[error("Value for argument '{argument}' contains invalid field(s) '{fields}'")]
    UnknownDefaultTarget {
        argument: &'static str,
        fields: String,
    },
    #[error("Default value factory for '{0}' is not callable")]
    NonInvocableFactory(SmolStr),
    #[error("At least one required or optional field must be provided")]
    EmptyFieldSet,
}

/// Raised by record construction, reads, writes and hashing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Field '{field}' does not exist in the {shape} namedspace")]
    UnknownField { shape: SmolStr, field: SmolStr },
    #[error("A value for field '{field}' of {shape} is required")]
    RequiredFieldMissing { shape: SmolStr, field: SmolStr },
    #[error("Field '{field}' does not yet exist in this {shape} namedspace instance")]
    FieldUnset { shape: SmolStr, field: SmolStr },
    #[error("Field '{field}' of {shape} namedspace is read-only")]
    FieldIsReadOnly { shape: SmolStr, field: SmolStr },
    #[error("{shape} namedspace is read-only")]
    ShapeIsReadOnly { shape: SmolStr },
    #[error("Mutable {shape} namedspace instance is not hashable")]
    NotHashable { shape: SmolStr },
    #[error("Default value factory for '{field}' failed: {reason}")]
    Factory { field: SmolStr, reason: String },
}

impl RecordError {
    /// Convenience for user factories that need to report their own failure.
    pub fn factory(field: impl Into<SmolStr>, reason: impl Into<String>) -> Self {
        RecordError::Factory {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, RecordError::FieldUnset { .. })
    }
}
