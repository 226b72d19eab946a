//! Property-based tests for identifiers and names.

pub mod identifiers;
