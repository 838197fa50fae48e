//! Conversions between domain results and the wire DTOs of the `shared` crate.

pub mod draft_mapper;
pub mod wish_mapper;
