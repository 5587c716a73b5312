mod attribute;
mod collection;
mod types;

pub use attribute::{encode_attributes, Attribute};
pub use collection::Attributes;
pub use types::AttributeType;
