//! Schema-level type definitions.
//!
//! This module contains the enumerations shared by all definition kinds and
//! the options that govern a [`Schema`](super::Schema).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::render::RenderOptions;

/// The eight kinds of definition a schema holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefinitionKind {
    /// RFC 4512 §4.1.5
    LdapSyntax,
    /// RFC 4512 §4.1.3
    MatchingRule,
    /// RFC 4512 §4.1.2
    AttributeType,
    /// RFC 4512 §4.1.4, derived
    MatchingRuleUse,
    /// RFC 4512 §4.1.1
    ObjectClass,
    /// RFC 4512 §4.1.7.2
    NameForm,
    /// RFC 4512 §4.1.6
    DitContentRule,
    /// RFC 4512 §4.1.7.1
    DitStructureRule,
}

impl DefinitionKind {
    /// All kinds, in dependency (load) order.
    pub const ALL: [DefinitionKind; 8] = [
        Self::LdapSyntax,
        Self::MatchingRule,
        Self::AttributeType,
        Self::MatchingRuleUse,
        Self::ObjectClass,
        Self::NameForm,
        Self::DitContentRule,
        Self::DitStructureRule,
    ];

    /// The `subschema` attribute name for this kind (RFC 4512 §4.2).
    #[must_use]
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Self::LdapSyntax => "ldapSyntaxes",
            Self::MatchingRule => "matchingRules",
            Self::AttributeType => "attributeTypes",
            Self::MatchingRuleUse => "matchingRuleUse",
            Self::ObjectClass => "objectClasses",
            Self::NameForm => "nameForms",
            Self::DitContentRule => "dITContentRules",
            Self::DitStructureRule => "dITStructureRules",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LdapSyntax => "LDAP syntax",
            Self::MatchingRule => "matching rule",
            Self::AttributeType => "attribute type",
            Self::MatchingRuleUse => "matching rule use",
            Self::ObjectClass => "object class",
            Self::NameForm => "name form",
            Self::DitContentRule => "DIT content rule",
            Self::DitStructureRule => "DIT structure rule",
        };
        f.write_str(label)
    }
}

impl FromStr for DefinitionKind {
    type Err = SchemaError;

    /// Accepts the `subschema` attribute names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.attribute_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::unsupported(format!("unknown definition kind '{s}'")))
    }
}

/// Object class kind (RFC 4512 §2.4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Kind {
    /// May not be instantiated directly; only derived from
    Abstract,
    /// The class that defines an entry's structure
    #[default]
    Structural,
    /// Adds attributes to entries of a structural class
    Auxiliary,
}

impl Kind {
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Abstract => "ABSTRACT",
            Self::Structural => "STRUCTURAL",
            Self::Auxiliary => "AUXILIARY",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Kind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ABSTRACT" => Ok(Self::Abstract),
            "STRUCTURAL" => Ok(Self::Structural),
            "AUXILIARY" => Ok(Self::Auxiliary),
            _ => Err(SchemaError::unsupported(format!("unknown object class kind '{s}'"))),
        }
    }
}

/// Attribute type usage (RFC 4512 §4.1.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Usage {
    /// Ordinary user attribute
    #[default]
    UserApplications,
    /// Operational attribute
    DirectoryOperation,
    /// Operational attribute shared between DSAs
    DistributedOperation,
    /// Operational attribute local to a DSA
    DsaOperation,
}

impl Usage {
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::UserApplications => "userApplications",
            Self::DirectoryOperation => "directoryOperation",
            Self::DistributedOperation => "distributedOperation",
            Self::DsaOperation => "dSAOperation",
        }
    }

    /// Whether attributes with this usage are operational.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::UserApplications)
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Usage {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::UserApplications,
            Self::DirectoryOperation,
            Self::DistributedOperation,
            Self::DsaOperation,
        ]
        .into_iter()
        .find(|usage| usage.keyword().eq_ignore_ascii_case(s))
        .ok_or_else(|| SchemaError::unsupported(format!("unknown usage '{s}'")))
    }
}

/// Options governing a schema instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOptions {
    /// Permit `Collection::replace` to overwrite registered definitions
    #[serde(default)]
    pub allow_override: bool,
    /// Default layout for `Display`
    #[serde(default)]
    pub hanging_indent: bool,
}

impl SchemaOptions {
    /// Rendering options derived from these schema options.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            hanging_indent: self.hanging_indent,
        }
    }
}
