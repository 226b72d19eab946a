//! Descriptor lists (`NAME` clauses).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::oid::is_descriptor;
use crate::render::quote;

/// An ordered, duplicate-free list of descriptors.
///
/// Duplicates are detected case-insensitively. Values that are not valid
/// descriptors are silently dropped on insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(Vec<String>);

impl Name {
    /// Create an empty name list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append descriptors, skipping invalid values and duplicates.
    pub fn push<S: AsRef<str>>(&mut self, values: impl IntoIterator<Item = S>) {
        for value in values {
            let value = value.as_ref();
            if is_descriptor(value) && !self.contains(value) {
                self.0.push(value.to_string());
            }
        }
    }

    /// Case-insensitive exact match against each stored descriptor.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|name| name.eq_ignore_ascii_case(value))
    }

    /// First registered descriptor, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Owned copy of the descriptors.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Name {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut name = Self::new();
        name.push(iter);
        name
    }
}

/// Renders the `qdescrs` form: `'cn'` or `( 'cn' 'commonName' )`.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => Ok(()),
            [single] => f.write_str(&quote(single)),
            many => {
                f.write_str("(")?;
                for name in many {
                    write!(f, " {}", quote(name))?;
                }
                f.write_str(" )")
            }
        }
    }
}
