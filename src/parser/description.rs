//! Typed descriptions produced by the parser.
//!
//! A description is the parsed form of one definition: clause values as
//! written, with references still unresolved. Building a description
//! against a schema turns it into a registered definition.

use crate::oid::RuleId;
use crate::schema::{Kind, Usage};

/// Clauses shared by every description kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub names: Vec<String>,
    pub description: Option<String>,
    pub obsolete: bool,
    /// `X-` extensions in declaration order
    pub extensions: Vec<(String, Vec<String>)>,
}

/// `SyntaxDescription`, RFC 4512 §4.1.5.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LdapSyntaxDescription {
    pub oid: String,
    pub header: Header,
}

/// `MatchingRuleDescription`, RFC 4512 §4.1.3.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchingRuleDescription {
    pub oid: String,
    pub header: Header,
    pub syntax: Option<String>,
}

/// `AttributeTypeDescription`, RFC 4512 §4.1.2.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeTypeDescription {
    pub oid: String,
    pub header: Header,
    pub super_type: Option<String>,
    pub equality: Option<String>,
    pub ordering: Option<String>,
    pub substring: Option<String>,
    pub syntax: Option<String>,
    /// Length bound from `SYNTAX oid{len}`
    pub min_upper_bounds: Option<u32>,
    pub single_value: bool,
    pub collective: bool,
    pub no_user_modification: bool,
    pub usage: Option<Usage>,
}

/// `ObjectClassDescription`, RFC 4512 §4.1.1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectClassDescription {
    pub oid: String,
    pub header: Header,
    pub super_classes: Vec<String>,
    pub kind: Option<Kind>,
    pub must: Vec<String>,
    pub may: Vec<String>,
}

/// `NameFormDescription`, RFC 4512 §4.1.7.2.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameFormDescription {
    pub oid: String,
    pub header: Header,
    pub structural_class: Option<String>,
    pub must: Vec<String>,
    pub may: Vec<String>,
}

/// `DITContentRuleDescription`, RFC 4512 §4.1.6.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DitContentRuleDescription {
    pub oid: String,
    pub header: Header,
    pub aux: Vec<String>,
    pub must: Vec<String>,
    pub may: Vec<String>,
    pub not: Vec<String>,
}

/// `DITStructureRuleDescription`, RFC 4512 §4.1.7.1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DitStructureRuleDescription {
    pub rule_id: RuleId,
    pub header: Header,
    pub form: Option<String>,
    pub superiors: Vec<RuleId>,
}
