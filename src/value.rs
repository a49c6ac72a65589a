use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Object payloads keep their keys sorted so hashing and rendering are stable.
pub type ObjectMap = BTreeMap<SmolStr, Value>;

// ─── Number ─────────────────────────────────────────────────────────────────

/// Floats compare and hash by bit pattern, which keeps `Eq` lawful
/// (`NaN == NaN`, `0.0 != -0.0`).
#[derive(Clone, Copy)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(i) => write!(f, "I64({})", i),
            Number::U64(u) => write!(f, "U64({})", u),
            Number::F64(v) => write!(f, "F64({})", v),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(i) => write!(f, "{}", i),
            Number::U64(u) => write!(f, "{}", u),
            // Debug keeps the trailing ".0" on whole floats
            Number::F64(v) => write!(f, "{:?}", v),
        }
    }
}

/// `I64` and `U64` holding the same integer are the same number.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::F64(a), Number::F64(b)) => a.to_bits() == b.to_bits(),
            (Number::F64(_), _) | (_, Number::F64(_)) => false,
            (a, b) => a.integer() == b.integer(),
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match *self {
            Number::F64(f) => {
                state.write_u8(1);
                state.write_u64(f.to_bits());
            }
            n => {
                state.write_u8(0);
                state.write_i128(n.integer().unwrap_or_default());
            }
        }
    }
}

impl Number {
    /// Integer variants widened to a common type; `None` for floats.
    #[inline]
    fn integer(self) -> Option<i128> {
        match self {
            Number::I64(i) => Some(i128::from(i)),
            Number::U64(u) => Some(i128::from(u)),
            Number::F64(_) => None,
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        n.as_i64()
            .map(Number::I64)
            .or_else(|| n.as_u64().map(Number::U64))
            .unwrap_or_else(|| Number::F64(n.as_f64().unwrap_or(f64::NAN)))
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::I64(i) => serializer.serialize_i64(i),
            Number::U64(u) => serializer.serialize_u64(u),
            Number::F64(f) => serializer.serialize_f64(f),
        }
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// A field value. `Null` is the "no value" marker for required-field checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Str(SmolStr),
    Array(Vec<Value>),
    Object(ObjectMap),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_empty_str(&self) -> bool {
        matches!(self, Value::Str(s) if s.is_empty())
    }

    /// Canonical text form used when rendering records.
    pub fn repr(&self) -> Repr<'_> {
        Repr(self)
    }
}

// ─── Repr ───────────────────────────────────────────────────────────────────

/// Borrowing renderer returned by [`Value::repr`].
pub struct Repr<'a>(&'a Value);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
            Value::Array(arr) => {
                f.write_str("[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v.repr())?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", k.as_str(), v.repr())?;
                }
                f.write_str("}")
            }
        }
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::F64(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::I64(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::I64(n as i64))
    }
}

/// Values that fit an `i64` are stored as `I64`, matching JSON input.
impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Value::Number(Number::I64(i)),
            Err(_) => Value::Number(Number::U64(n)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for Value {
    fn from(s: SmolStr) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

// ─── From serde_json::Value ─────────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(Number::from(&n)),
            serde_json::Value::String(s) => Value::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn std_hash(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        let nan = Value::from(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(std_hash(&nan), std_hash(&nan.clone()));
        assert_ne!(Value::from(0.0f64), Value::from(-0.0f64));
    }

    #[test]
    fn test_integer_kinds_compare_by_value() {
        assert_eq!(Value::from(5u64), Value::from(5i64));
        assert_eq!(Value::Number(Number::U64(5)), Value::Number(Number::I64(5)));
        assert_eq!(
            std_hash(&Value::Number(Number::U64(5))),
            std_hash(&Value::Number(Number::I64(5)))
        );
        assert_ne!(Value::from(-1i64), Value::from(u64::MAX));
        assert_ne!(Value::from(2i64), Value::from(2.0f64));
    }

    #[test]
    fn test_repr() {
        assert_eq!(Value::Null.repr().to_string(), "null");
        assert_eq!(Value::from("a\"b").repr().to_string(), r#""a\"b""#);
        assert_eq!(Value::from(3.0f64).repr().to_string(), "3.0");
        assert_eq!(Value::from(vec![1i64, 2]).repr().to_string(), "[1, 2]");

        let json = serde_json::json!({"b": true, "a": [null]});
        assert_eq!(
            Value::from(json).repr().to_string(),
            r#"{"a": [null], "b": true}"#
        );
    }

    #[test]
    fn test_json_numbers_match_native_conversions() {
        assert_eq!(Value::from(serde_json::json!(5)), Value::from(5u64));
        assert_eq!(Value::from(serde_json::json!(-5)), Value::from(-5i64));
        assert_eq!(Value::from(serde_json::json!(u64::MAX)), Value::from(u64::MAX));
        assert_eq!(Value::from(serde_json::json!(0.5)), Value::from(0.5f64));

        let back = serde_json::to_value(Value::from(5u64)).unwrap();
        assert_eq!(back, serde_json::json!(5));
    }

    #[test]
    fn test_empty_markers() {
        assert!(Value::from("").is_empty_str());
        assert!(!Value::from(" ").is_empty_str());
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_ne!(Value::from(false), Value::Null);
    }
}
