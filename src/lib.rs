//! RFC 4512 directory schema library for Rust.
//!
//! Models, parses, validates and renders LDAP/X.500 schema definitions:
//! attribute types, object classes, matching rules, matching rule uses,
//! LDAP syntaxes, name forms, DIT content rules and DIT structure rules.
//!
//! # Core Components
//!
//! - [`Schema`] - Owner of one collection per definition kind and entry
//!   point for parsing and bulk loading
//! - [`Definition`] - Capabilities shared by every definition kind
//! - [`parser`] - RFC 4512 text to typed descriptions
//!
//! Definitions refer to each other by lookup key and resolve through their
//! owning schema, so a schema is loaded in dependency order: syntaxes,
//! matching rules, attribute types, object classes, then name forms,
//! content rules and structure rules.
//!
//! # Quick Start
//!
//! ```rust
//! use ldap_schema::{Definition, DefinitionKind, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::new();
//! schema.load(
//!     DefinitionKind::LdapSyntax,
//!     ["( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )"],
//! )?;
//! schema.parse_matching_rule(
//!     "( 2.5.13.2 NAME 'caseIgnoreMatch' SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )",
//! )?;
//! let cn = schema.parse_attribute_type(
//!     "( 2.5.4.3 NAME 'cn' EQUALITY caseIgnoreMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )",
//! )?;
//!
//! assert!(cn.compliant());
//! let uses = schema.matching_rule_uses().get("caseIgnoreMatch");
//! assert!(uses.applies_to("cn"));
//! # Ok(())
//! # }
//! ```

pub mod definition;
pub mod error;
pub mod extensions;
pub mod name;
pub mod oid;
pub mod parser;
pub mod render;
pub mod schema;

// Re-export commonly used types for convenience
pub use definition::{
    AttributeType, Definition, DitContentRule, DitStructureRule, LdapSyntax, MatchingRule,
    MatchingRuleUse, NameForm, ObjectClass, Reference,
};
pub use error::{SchemaError, SchemaResult};
pub use extensions::Extensions;
pub use name::Name;
pub use oid::{NumericOid, Oid, RuleId, oid_eq};
pub use render::{DefinitionMap, RenderOptions};
pub use schema::{Collection, DefinitionKind, Inventory, Kind, Schema, SchemaOptions, Usage};
