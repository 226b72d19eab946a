//! Registration, lookup and replacement.

use ldap_schema::{Definition, DefinitionKind, RuleId, SchemaError};
use serde_json::json;

use crate::common::{fixtures, loaded_schema, overridable_schema};

#[test]
fn test_catalog_counts() {
    let schema = loaded_schema();
    assert_eq!(
        schema.count(DefinitionKind::LdapSyntax),
        fixtures::LDAP_SYNTAXES.len()
    );
    assert_eq!(
        schema.count(DefinitionKind::AttributeType),
        fixtures::ATTRIBUTE_TYPES.len()
    );
    assert_eq!(
        schema.count(DefinitionKind::MatchingRuleUse),
        fixtures::USED_MATCHING_RULES
    );
    assert_eq!(schema.count(DefinitionKind::DitStructureRule), 2);
}

#[test]
fn test_duplicate_identifier_is_rejected() {
    let schema = loaded_schema();
    let before = schema.attribute_types().len();

    let result = schema.parse_attribute_type("( 2.5.4.3 NAME 'fullName' SUP name )");
    assert!(matches!(
        result,
        Err(SchemaError::NotUnique {
            kind: DefinitionKind::AttributeType,
            ..
        })
    ));
    assert_eq!(schema.attribute_types().len(), before);
    assert!(schema.attribute_types().get("fullName").is_zero());

    let result = schema.parse_dit_structure_rule("( 1 NAME 'again' FORM personNameForm )");
    assert!(matches!(result, Err(SchemaError::NotUnique { .. })));
}

#[test]
fn test_uniqueness_is_scoped_per_kind() {
    let schema = loaded_schema();
    let person = schema.object_classes().get("person");
    let rule = schema.dit_content_rules().get("2.5.6.6");
    assert!(!person.is_zero());
    assert!(!rule.is_zero());
    assert_eq!(person.numeric_oid(), rule.numeric_oid());
    assert!(rule.structural_class().ptr_eq(&person));
}

#[test]
fn test_lookup_by_oid_and_names() {
    let schema = loaded_schema();
    let by_oid = schema.attribute_types().get("2.5.4.3");
    let by_name = schema.attribute_types().get("cn");
    let by_alias = schema.attribute_types().get("COMMONNAME");

    assert!(by_oid.ptr_eq(&by_name));
    assert!(by_oid.ptr_eq(&by_alias));
    assert_eq!(by_oid.name(), "cn");
    assert_eq!(by_oid.names().to_vec(), vec!["cn", "commonName"]);

    // Repeated lookups hand out the same shared definition.
    assert!(schema.attribute_types().get("cn").ptr_eq(&by_name));
    assert!(schema.attribute_types().contains("surname"));
    assert!(!schema.attribute_types().contains("2.5.4.999"));
    assert!(schema.attribute_types().get("mail").is_zero());
}

#[test]
fn test_structure_rules_are_looked_up_by_rule_id() {
    let schema = loaded_schema();
    let child = schema.dit_structure_rules().get("2");
    assert_eq!(child.rule_id(), Some(RuleId::new(2)));
    assert!(
        schema
            .dit_structure_rules()
            .get("childPersonStructureRule")
            .ptr_eq(&child)
    );
    assert_eq!(child.superior_rules().len(), 1);
    assert_eq!(child.superior_rules()[0].rule_id(), Some(RuleId::new(1)));
    assert!(child.form().ptr_eq(&schema.name_forms().get("personNameForm")));
}

#[test]
fn test_inventory_follows_registration_order() {
    let schema = loaded_schema();
    let inventory = schema.object_classes().inventory();
    let ids: Vec<&str> = inventory.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["2.5.6.0", "2.5.6.6", "1.3.6.1.1.3.1"]);
    assert_eq!(inventory["2.5.6.6"], vec!["person".to_string()]);

    let exported = serde_json::to_value(&inventory).unwrap();
    assert_eq!(exported["1.3.6.1.1.3.1"], json!(["uidObject"]));
}

#[test]
fn test_obsolete_is_monotonic() {
    let schema = loaded_schema();
    let given_name = schema.attribute_types().get("givenName");
    assert!(!given_name.is_obsolete());

    given_name.set_obsolete();
    given_name.set_obsolete();
    assert!(given_name.is_obsolete());
    assert!(
        schema
            .attribute_types()
            .get("2.5.4.42")
            .is_obsolete()
    );
    assert_eq!(
        given_name.to_string(),
        "( 2.5.4.42 NAME 'givenName' OBSOLETE SUP name )"
    );
}

#[test]
fn test_replace_is_seen_through_held_handles() {
    let schema = overridable_schema();
    let cn = schema.attribute_types().get("cn");
    let person = schema.object_classes().get("person");
    assert!(person.to_string().contains("MUST ( sn $ cn )"));

    let replacement = schema.new_attribute_type();
    replacement
        .set_numeric_oid("2.5.4.3")
        .set_name(["commonName"])
        .set_description("RFC 4519: common name(s) for which the entity is known by")
        .set_super_type("name");
    schema.attribute_types().replace(replacement).unwrap();

    assert_eq!(cn.name(), "commonName");
    assert!(cn.super_type().ptr_eq(&schema.attribute_types().get("name")));
    assert_eq!(schema.attribute_types().len(), fixtures::ATTRIBUTE_TYPES.len());
    assert!(person.to_string().contains("MUST ( sn $ commonName )"));
}

#[test]
fn test_replace_is_refused_by_default() {
    let schema = loaded_schema();
    let replacement = schema.new_attribute_type();
    replacement.set_numeric_oid("2.5.4.3").set_name(["commonName"]);
    let result = schema.attribute_types().replace(replacement);
    assert!(matches!(result, Err(SchemaError::OverrideDisallowed { .. })));
    assert_eq!(schema.attribute_types().get("2.5.4.3").name(), "cn");
}
