mod node;
mod types;

pub use node::{describe_op, display_label};
pub use types::{AttrValue, Device, NetDef, OpAttr, OpDef};
