//! Search data model: normalized entities and the wire formats they are decoded from.

pub mod types;
pub mod wire;
