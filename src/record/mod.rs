mod hash_op;
mod instance;
mod read_op;
mod render;
mod write_op;

pub use hash_op::FrozenRecord;
pub use instance::Record;
pub use read_op::{Items, RecordReadable};
pub use render::UNSET_MARKER;
