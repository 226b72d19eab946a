//! Object identifiers, descriptors and structure rule IDs.
//!
//! RFC 4512 §1.4 identifies schema elements either by a dotted numeric OID
//! (`2.5.4.3`) or by a short descriptor (`cn`). [`NumericOid`] holds the
//! validated numeric form; [`Oid`] is either form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{SchemaError, SchemaResult};

/// A validated dotted-decimal object identifier.
///
/// Arcs are held as `u128` so that `2.25.<uuid>` identifiers fit. The
/// default value has no arcs and is the zero OID.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NumericOid {
    arcs: Vec<u128>,
}

impl NumericOid {
    /// Parse a numeric OID such as `1.3.6.1.4.1.1466.115.121.1.15`.
    ///
    /// At least two arcs are required and arcs may not carry leading zeros.
    pub fn parse(value: &str) -> SchemaResult<Self> {
        let mut arcs = Vec::new();
        for part in value.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SchemaError::invalid_oid(value));
            }
            if part.len() > 1 && part.starts_with('0') {
                return Err(SchemaError::invalid_oid(value));
            }
            let arc = part
                .parse::<u128>()
                .map_err(|_| SchemaError::invalid_oid(value))?;
            arcs.push(arc);
        }
        if arcs.len() < 2 {
            return Err(SchemaError::invalid_oid(value));
        }
        Ok(Self { arcs })
    }

    /// Check whether a string is a well-formed numeric OID.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// Get the arcs as a slice.
    #[must_use]
    pub fn arcs(&self) -> &[u128] {
        &self.arcs
    }

    /// Check if this is the zero OID.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Create a child OID by appending arcs parsed from a dotted suffix.
    pub fn join(&self, suffix: &str) -> SchemaResult<Self> {
        if suffix.is_empty() {
            return Ok(self.clone());
        }
        let dotted = format!("{self}.{suffix}");
        Self::parse(&dotted)
    }

    /// Check if this OID is a prefix of another.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.arcs.starts_with(&self.arcs)
    }
}

impl fmt::Display for NumericOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for NumericOid {
    type Err = SchemaError;

    fn from_str(s: &str) -> SchemaResult<Self> {
        Self::parse(s)
    }
}

impl Serialize for NumericOid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NumericOid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// An identifier in either numeric or descriptor form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Oid {
    /// Dotted-decimal form
    Numeric(NumericOid),
    /// Short textual alias (`cn`, `person`)
    Descriptor(String),
}

impl Oid {
    /// Classify a string as numeric OID or descriptor.
    ///
    /// Returns an error if it is neither.
    pub fn parse(value: &str) -> SchemaResult<Self> {
        if let Ok(numeric) = NumericOid::parse(value) {
            return Ok(Self::Numeric(numeric));
        }
        if is_descriptor(value) {
            return Ok(Self::Descriptor(value.to_string()));
        }
        Err(SchemaError::invalid_oid(value))
    }

    /// Get the numeric form, if this is one.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&NumericOid> {
        match self {
            Self::Numeric(oid) => Some(oid),
            Self::Descriptor(_) => None,
        }
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(oid) => write!(f, "{oid}"),
            Self::Descriptor(descr) => f.write_str(descr),
        }
    }
}

/// Compare two numeric OIDs arc for arc.
///
/// Both sides are normalized to numeric form first, so `"2.5.4.3"` and
/// `"2.5.4.3"` match while a malformed value on either side never does.
#[must_use]
pub fn oid_eq(a: &str, b: &str) -> bool {
    match (NumericOid::parse(a), NumericOid::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check whether a string is an RFC 4512 `descr` (`keystring`).
///
/// A descriptor starts with a letter followed by letters, digits or hyphens.
#[must_use]
pub fn is_descriptor(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Identifier of a DIT structure rule (RFC 4512 §4.1.7.1 `ruleid`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(u32);

impl RuleId {
    /// Create a rule ID.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RuleId {
    type Err = SchemaError;

    fn from_str(s: &str) -> SchemaResult<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SchemaError::invalid_oid(s));
        }
        s.parse::<u32>()
            .map(Self)
            .map_err(|_| SchemaError::invalid_oid(s))
    }
}

impl From<u32> for RuleId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
