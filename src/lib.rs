//! Runtime record types ("namedspaces").
//!
//! A [`RecordShape`] is compiled once from a type name and a field
//! specification: required and optional names, which of them are mutable,
//! fixed default values and default value factories. Instances
//! ([`Record`]) are then built against the shape, validated on
//! construction, read by name, written only through the mutability gate,
//! and hashable only when the shape has no mutable field.
//!
//! ```
//! use namedspace::{RecordReadable, RecordShape, Value};
//!
//! let shape = RecordShape::builder("Item")
//!     .required("id")
//!     .optional(["name", "extra"])
//!     .mutable("extra")
//!     .default_factory("name", |r| {
//!         let id = r.get("id")?;
//!         Ok(Value::from(format!("auto-{}", id.as_str().unwrap_or_default())))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut item = shape.construct([("id", "x1")]).unwrap();
//! assert_eq!(item.get("name").unwrap(), Value::from("auto-x1"));
//! item.set("extra", "v").unwrap();
//! assert!(item.set("id", "x2").is_err());
//! assert!(item.try_hash().is_err());
//! ```

pub mod error;
pub mod record;
pub mod shape;
pub mod types;
pub mod value;

pub use error::{RecordError, ShapeError};
pub use record::{FrozenRecord, Items, Record, RecordReadable};
pub use shape::{
    FactoryRegistry, RecordShape, ShapeBuilder, compile, shape_from_json, shape_from_json_str,
};
pub use types::{EmptyPolicy, Factory, FieldNames, FieldSpec, ShapeConfig, UnsetPolicy};
pub use value::{Number, Value};
