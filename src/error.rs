//! Error types for schema operations.
//!
//! Every fallible operation in the crate reports a [`SchemaError`]. Compliance
//! checks are deliberately not part of this taxonomy: they answer with a plain
//! `bool` and callers needing a reason re-run the individual clause checks.

use crate::schema::DefinitionKind;

/// Main error type for schema construction, parsing and registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A definition has no usable identifier (numeric OID or rule ID)
    #[error("{kind} has no identifier")]
    MissingIdentifier { kind: DefinitionKind },

    /// A string that should be a numeric OID is malformed
    #[error("Invalid numeric OID: '{oid}'")]
    InvalidOid { oid: String },

    /// Two clauses that may not appear together were both set
    #[error("{kind} {id}: {first} and {second} are mutually exclusive")]
    MutuallyExclusive {
        kind: DefinitionKind,
        id: String,
        first: &'static str,
        second: &'static str,
    },

    /// A mandatory clause is absent
    #[error("{kind} {id}: missing required {clause} clause")]
    MissingClause {
        kind: DefinitionKind,
        id: String,
        clause: &'static str,
    },

    /// An object class of the wrong kind was referenced
    #[error("{kind} {id}: object class '{class}' must be {expected}")]
    InvalidKind {
        kind: DefinitionKind,
        id: String,
        class: String,
        expected: &'static str,
    },

    /// A clause references a definition that is not loaded in the schema
    #[error("{kind} {id}: {clause} reference '{reference}' not found")]
    UnknownReference {
        kind: DefinitionKind,
        id: String,
        clause: &'static str,
        reference: String,
    },

    /// A definition with the same identifier is already registered
    #[error("{kind} {id} is not unique")]
    NotUnique { kind: DefinitionKind, id: String },

    /// Assigning a super type or superior would create a cycle
    #[error("{kind} {id}: assigning '{target}' would create a cycle")]
    Cycle {
        kind: DefinitionKind,
        id: String,
        target: String,
    },

    /// Replacing a registered definition requires the `allow_override` option
    #[error("{kind} {id}: replacement is not allowed by schema options")]
    OverrideDisallowed { kind: DefinitionKind, id: String },

    /// A replacement does not carry the identifier of any registered definition
    #[error("{kind} {id} is not registered and cannot be replaced")]
    IdentifierMismatch { kind: DefinitionKind, id: String },

    /// The definition already carries a different numeric OID
    #[error("{kind} {id}: OID is already set and differs from '{oid}'")]
    OidConflict {
        kind: DefinitionKind,
        id: String,
        oid: String,
    },

    /// The definition text could not be parsed
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// The requested operation is not available for this kind
    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },
}

impl SchemaError {
    /// Create a missing identifier error
    pub fn missing_identifier(kind: DefinitionKind) -> Self {
        Self::MissingIdentifier { kind }
    }

    /// Create an invalid OID error
    pub fn invalid_oid(oid: impl Into<String>) -> Self {
        Self::InvalidOid { oid: oid.into() }
    }

    /// Create a missing clause error
    pub fn missing_clause(
        kind: DefinitionKind,
        id: impl Into<String>,
        clause: &'static str,
    ) -> Self {
        Self::MissingClause {
            kind,
            id: id.into(),
            clause,
        }
    }

    /// Create an unknown reference error
    pub fn unknown_reference(
        kind: DefinitionKind,
        id: impl Into<String>,
        clause: &'static str,
        reference: impl Into<String>,
    ) -> Self {
        Self::UnknownReference {
            kind,
            id: id.into(),
            clause,
            reference: reference.into(),
        }
    }

    /// Create a not unique error
    pub fn not_unique(kind: DefinitionKind, id: impl Into<String>) -> Self {
        Self::NotUnique {
            kind,
            id: id.into(),
        }
    }

    /// Create a cycle error
    pub fn cycle(kind: DefinitionKind, id: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Cycle {
            kind,
            id: id.into(),
            target: target.into(),
        }
    }

    /// Create a parse error
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
