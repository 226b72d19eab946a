//! Schema aggregate, per-kind collections and the compliance engine.
//!
//! This module provides the [`Schema`] that owns one [`Collection`] per
//! definition kind, the macro table used to resolve symbolic OIDs, and the
//! relational checks behind every `compliant()` predicate.
//!
//! # Key Types
//!
//! - [`Schema`] - owner of all definitions and entry point for parsing
//! - [`Collection`] - ordered, uniqueness-enforcing container for one kind
//! - [`Macros`] - symbolic OID prefixes (`nisSchema` → `1.3.6.1.1.1`)
//!
//! # Examples
//!
//! ```rust
//! use ldap_schema::{Definition, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::new();
//! schema.parse_ldap_syntax("( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )")?;
//! schema.parse_matching_rule(
//!     "( 2.5.13.2 NAME 'caseIgnoreMatch' SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )",
//! )?;
//! let cn = schema.parse_attribute_type(
//!     "( 2.5.4.3 NAME 'cn' EQUALITY caseIgnoreMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )",
//! )?;
//! assert!(cn.compliant());
//! assert!(schema.attribute_types().get("CN").ptr_eq(&cn));
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub(crate) mod compliance;
pub mod macros;
pub mod registry;
pub mod types;


pub use collection::{
    AttributeTypes, Collection, DitContentRules, DitStructureRules, Inventory, LdapSyntaxes,
    MatchingRuleUses, MatchingRules, NameForms, ObjectClasses,
};
pub use macros::Macros;
pub use registry::Schema;
pub(crate) use registry::SchemaRef;
pub use types::{DefinitionKind, Kind, SchemaOptions, Usage};
