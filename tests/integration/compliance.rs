//! Structural checks at registration and semantic compliance afterwards.

use ldap_schema::{Definition, DefinitionKind, Kind, Schema, SchemaError, Usage};

use crate::common::loaded_schema;

fn assert_all_compliant<D: Definition>(definitions: Vec<D>) {
    for definition in definitions {
        assert!(
            definition.compliant(),
            "{} {} should be compliant",
            D::KIND,
            definition.identifier()
        );
    }
}

#[test]
fn test_fixture_catalogs_are_compliant() {
    let schema = loaded_schema();
    assert_all_compliant(schema.ldap_syntaxes().to_vec());
    assert_all_compliant(schema.matching_rules().to_vec());
    assert_all_compliant(schema.attribute_types().to_vec());
    assert_all_compliant(schema.matching_rule_uses().to_vec());
    assert_all_compliant(schema.object_classes().to_vec());
    assert_all_compliant(schema.name_forms().to_vec());
    assert_all_compliant(schema.dit_content_rules().to_vec());
    assert_all_compliant(schema.dit_structure_rules().to_vec());
}

#[test]
fn test_single_value_collective_is_rejected() {
    let schema = loaded_schema();
    let result = schema.parse_attribute_type(
        "( 1.3.6.1.4.1.56521.999.1.1 NAME 'broken' SUP name SINGLE-VALUE COLLECTIVE )",
    );
    assert!(matches!(result, Err(SchemaError::MutuallyExclusive { .. })));
    assert!(schema.attribute_types().get("broken").is_zero());
}

#[test]
fn test_usage_constraints() {
    let schema = loaded_schema();
    let collective = schema
        .parse_attribute_type(
            "( 1.3.6.1.4.1.56521.999.1.2 NAME 'c-opCount' SUP name COLLECTIVE \
             USAGE directoryOperation )",
        )
        .unwrap();
    assert!(collective.is_operational());
    assert!(!collective.compliant());

    let frozen = schema
        .parse_attribute_type(
            "( 1.3.6.1.4.1.56521.999.1.3 NAME 'frozen' SUP name NO-USER-MODIFICATION )",
        )
        .unwrap();
    assert_eq!(frozen.usage(), Usage::UserApplications);
    assert!(!frozen.compliant());

    frozen.set_usage(Usage::DsaOperation);
    assert!(frozen.compliant());
}

#[test]
fn test_object_class_kind_rules() {
    let schema = loaded_schema();
    let structural_from_auxiliary = schema
        .parse_object_class(
            "( 1.3.6.1.4.1.56521.999.2.1 NAME 'uidPerson' SUP uidObject STRUCTURAL MUST cn )",
        )
        .unwrap();
    assert!(!structural_from_auxiliary.compliant());

    let abstract_from_structural = schema
        .parse_object_class(
            "( 1.3.6.1.4.1.56521.999.2.2 NAME 'abstractPerson' SUP person ABSTRACT )",
        )
        .unwrap();
    assert!(!abstract_from_structural.compliant());

    let auxiliary_from_abstract = schema
        .parse_object_class(
            "( 1.3.6.1.4.1.56521.999.2.3 NAME 'contactObject' SUP top AUXILIARY \
             MAY telephoneNumber )",
        )
        .unwrap();
    assert!(auxiliary_from_abstract.compliant());

    let derived = schema
        .parse_object_class(
            "( 1.3.6.1.4.1.56521.999.2.4 NAME 'employee' SUP person MAY description )",
        )
        .unwrap();
    assert_eq!(derived.kind(), Kind::Structural);
    assert!(derived.compliant());
}

#[test]
fn test_non_compliant_attribute_spoils_its_class() {
    let schema = loaded_schema();
    schema
        .parse_attribute_type(
            "( 1.3.6.1.4.1.56521.999.1.4 NAME 'legacyFlag' SUP name NO-USER-MODIFICATION )",
        )
        .unwrap();
    let class = schema
        .parse_object_class(
            "( 1.3.6.1.4.1.56521.999.2.5 NAME 'legacyObject' SUP top AUXILIARY MAY legacyFlag )",
        )
        .unwrap();
    assert!(!class.compliant());
}

#[test]
fn test_name_form_requires_structural_class() {
    let schema = loaded_schema();
    let result = schema.parse_name_form(
        "( 1.3.6.1.4.1.56521.999.3.2 NAME 'uidForm' OC uidObject MUST uid )",
    );
    assert!(matches!(result, Err(SchemaError::InvalidKind { .. })));

    let result =
        schema.parse_name_form("( 1.3.6.1.4.1.56521.999.3.3 NAME 'emptyForm' OC person )");
    assert!(matches!(result, Err(SchemaError::MissingClause { .. })));
    assert_eq!(schema.count(DefinitionKind::NameForm), 1);
}

#[test]
fn test_content_rule_requires_structural_oid() {
    let schema = loaded_schema();
    let result = schema.parse_dit_content_rule("( 1.3.6.1.1.3.1 NAME 'uidRule' MUST uid )");
    assert!(matches!(result, Err(SchemaError::InvalidKind { .. })));

    let result = schema.parse_dit_content_rule("( 2.5.6.99 NAME 'ghostRule' )");
    assert!(matches!(result, Err(SchemaError::UnknownReference { .. })));
}

#[test]
fn test_content_rule_aux_must_be_auxiliary() {
    let schema = loaded_schema();
    let rule = schema.dit_content_rules().get("personContentRule");
    let err = rule.try_set_aux(["top"]).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidKind { .. }));
    assert_eq!(rule.aux().len(), 1);
}

/// The rule is built unregistered so it can reuse `person`'s OID alongside
/// the fixture content rule.
fn person_rule(schema: &Schema) -> ldap_schema::DitContentRule {
    let rule = schema.new_dit_content_rule();
    rule.set_structural_class("person");
    rule
}

#[test]
fn test_content_rule_compliance_end_to_end() {
    let schema = loaded_schema();
    let rule = person_rule(&schema);
    rule.try_set_must(["sn"]).unwrap();
    rule.try_set_may(["telephoneNumber"]).unwrap();
    assert!(rule.compliant());

    rule.try_set_may(["description"]).unwrap();
    assert!(!rule.compliant());
}

#[test]
fn test_content_rule_may_not_prohibit_mandatory_attributes() {
    let schema = loaded_schema();
    let rule = person_rule(&schema);
    rule.try_set_not(["userPassword"]).unwrap();
    assert!(rule.compliant());

    rule.try_set_not(["sn"]).unwrap();
    assert!(!rule.compliant());
}

#[test]
fn test_content_rule_may_not_repeat_mandatory_attributes() {
    let schema = loaded_schema();
    let rule = person_rule(&schema);
    rule.try_set_may(["cn"]).unwrap();
    assert!(!rule.compliant());
}

#[test]
fn test_content_rule_widens_through_aux_and_abstract_ancestors() {
    let schema = loaded_schema();
    let rule = person_rule(&schema);
    rule.try_set_must(["objectClass"]).unwrap();
    assert!(rule.compliant());

    rule.try_set_must(["uid"]).unwrap();
    assert!(!rule.compliant());
    rule.try_set_aux(["uidObject"]).unwrap();
    assert!(rule.compliant());
}

#[test]
fn test_content_rule_ignores_collective_attributes() {
    let schema = loaded_schema();
    schema
        .parse_attribute_type(
            "( 1.3.6.1.4.1.56521.999.1.5 NAME 'c-l' SUP name COLLECTIVE )",
        )
        .unwrap();
    let rule = person_rule(&schema);
    rule.try_set_may(["c-l"]).unwrap();
    rule.try_set_not(["c-l"]).unwrap();
    assert!(rule.compliant());
}

#[test]
fn test_unbound_definitions_are_not_compliant() {
    let orphan = ldap_schema::NameForm::default();
    orphan.set_numeric_oid("1.3.6.1.4.1.56521.999.3.9").set_name(["orphanForm"]);
    assert!(!orphan.compliant());
}
