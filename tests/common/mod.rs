//! Common test utilities for schema integration tests.
//!
//! Provides the definition catalogs used across the suite and helpers that
//! build schemas from them in dependency order.

use ldap_schema::{DefinitionKind, Schema, SchemaOptions};

pub mod fixtures;

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Load every catalog into `schema`, in dependency order.
pub fn load_catalogs(schema: &Schema) {
    let catalogs: [(DefinitionKind, &[&str]); 7] = [
        (DefinitionKind::LdapSyntax, fixtures::LDAP_SYNTAXES),
        (DefinitionKind::MatchingRule, fixtures::MATCHING_RULES),
        (DefinitionKind::AttributeType, fixtures::ATTRIBUTE_TYPES),
        (DefinitionKind::ObjectClass, fixtures::OBJECT_CLASSES),
        (DefinitionKind::NameForm, fixtures::NAME_FORMS),
        (DefinitionKind::DitContentRule, fixtures::DIT_CONTENT_RULES),
        (DefinitionKind::DitStructureRule, fixtures::DIT_STRUCTURE_RULES),
    ];
    for (kind, catalog) in catalogs {
        let loaded = schema
            .load(kind, catalog.iter().copied())
            .unwrap_or_else(|e| panic!("failed to load {kind} catalog: {e}"));
        assert_eq!(loaded, catalog.len());
    }
}

/// A schema holding every fixture definition.
pub fn loaded_schema() -> Schema {
    init_logging();
    let schema = Schema::new();
    load_catalogs(&schema);
    schema
}

/// A schema holding only syntaxes and matching rules.
pub fn rules_only_schema() -> Schema {
    init_logging();
    let schema = Schema::new();
    schema
        .load(DefinitionKind::LdapSyntax, fixtures::LDAP_SYNTAXES.iter().copied())
        .unwrap();
    schema
        .load(DefinitionKind::MatchingRule, fixtures::MATCHING_RULES.iter().copied())
        .unwrap();
    schema
}

/// A fully loaded schema that permits in-place replacement.
pub fn overridable_schema() -> Schema {
    init_logging();
    let schema = Schema::with_options(SchemaOptions {
        allow_override: true,
        ..SchemaOptions::default()
    });
    load_catalogs(&schema);
    schema
}
