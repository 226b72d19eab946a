//! Integration tests through the public API.

pub mod compliance;
pub mod inheritance;
pub mod registry;
pub mod rendering;
