mod builder;
mod declaration;
mod record_shape;

pub use builder::{ShapeBuilder, compile};
pub use declaration::{FactoryRegistry, shape_from_json, shape_from_json_str};
pub use record_shape::RecordShape;
