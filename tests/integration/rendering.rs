//! Textual rendering, round-trips and clause map export.

use ldap_schema::{Definition, DefinitionKind, RenderOptions, Schema, SchemaOptions};
use serde_json::json;

use crate::common::{init_logging, loaded_schema};

fn rendered<D: Definition>(definitions: Vec<D>) -> Vec<String> {
    definitions.iter().map(ToString::to_string).collect()
}

fn assert_same<D: Definition + PartialEq>(original: Vec<D>, reparsed: &Schema) {
    assert_eq!(original.len(), D::collection(reparsed).len());
    for definition in original {
        let twin = D::collection(reparsed).get(&definition.identifier());
        assert!(!twin.is_zero(), "{} {} missing", D::KIND, definition.identifier());
        assert!(
            definition == twin,
            "{} {} differs after round-trip",
            D::KIND,
            definition.identifier()
        );
        assert_eq!(definition.to_string(), twin.to_string());
    }
}

#[test]
fn test_rendered_schema_parses_back_identically() {
    let original = loaded_schema();
    let reparsed = Schema::new();

    let catalogs = [
        (DefinitionKind::LdapSyntax, rendered(original.ldap_syntaxes().to_vec())),
        (DefinitionKind::MatchingRule, rendered(original.matching_rules().to_vec())),
        (DefinitionKind::AttributeType, rendered(original.attribute_types().to_vec())),
        (DefinitionKind::ObjectClass, rendered(original.object_classes().to_vec())),
        (DefinitionKind::NameForm, rendered(original.name_forms().to_vec())),
        (DefinitionKind::DitContentRule, rendered(original.dit_content_rules().to_vec())),
        (DefinitionKind::DitStructureRule, rendered(original.dit_structure_rules().to_vec())),
    ];
    for (kind, catalog) in catalogs {
        reparsed.load(kind, &catalog).unwrap();
    }

    assert_same(original.ldap_syntaxes().to_vec(), &reparsed);
    assert_same(original.matching_rules().to_vec(), &reparsed);
    assert_same(original.attribute_types().to_vec(), &reparsed);
    assert_same(original.matching_rule_uses().to_vec(), &reparsed);
    assert_same(original.object_classes().to_vec(), &reparsed);
    assert_same(original.name_forms().to_vec(), &reparsed);
    assert_same(original.dit_content_rules().to_vec(), &reparsed);
    assert_same(original.dit_structure_rules().to_vec(), &reparsed);
}

#[test]
fn test_render_uses_names_for_references() {
    let schema = loaded_schema();
    assert_eq!(
        schema.object_classes().get("person").to_string(),
        "( 2.5.6.6 NAME 'person' SUP top STRUCTURAL MUST ( sn $ cn ) \
         MAY ( userPassword $ telephoneNumber ) )"
    );
    assert_eq!(
        schema.attribute_types().get("subschemaSubentry").to_string(),
        "( 2.5.18.10 NAME 'subschemaSubentry' EQUALITY distinguishedNameMatch \
         SYNTAX 1.3.6.1.4.1.1466.115.121.1.12 SINGLE-VALUE NO-USER-MODIFICATION \
         USAGE directoryOperation )"
    );
    assert_eq!(
        schema.matching_rule_uses().get("2.5.13.17").to_string(),
        "( 2.5.13.17 NAME 'octetStringMatch' APPLIES userPassword )"
    );
    assert_eq!(
        schema.dit_structure_rules().get("2").to_string(),
        "( 2 NAME 'childPersonStructureRule' FORM personNameForm SUP 1 )"
    );
}

#[test]
fn test_explicit_layout_ignores_schema_default() {
    let schema = loaded_schema();
    let uid_object = schema.object_classes().get("uidObject");
    assert_eq!(
        uid_object.render(&RenderOptions::hanging()),
        "( 1.3.6.1.1.3.1\n    NAME 'uidObject'\n    SUP top\n    AUXILIARY\n    MUST uid )"
    );
    assert_eq!(
        uid_object.to_string(),
        "( 1.3.6.1.1.3.1 NAME 'uidObject' SUP top AUXILIARY MUST uid )"
    );
}

#[test]
fn test_hanging_indent_schema_round_trips() {
    init_logging();
    let schema = Schema::with_options(SchemaOptions {
        hanging_indent: true,
        ..SchemaOptions::default()
    });
    schema
        .parse_ldap_syntax("( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )")
        .unwrap();
    let rule = schema
        .parse_matching_rule(
            "( 2.5.13.2 NAME 'caseIgnoreMatch' SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )",
        )
        .unwrap();
    let text = rule.to_string();
    assert!(text.contains("\n    SYNTAX"));

    let other = Schema::new();
    other
        .parse_ldap_syntax("( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )")
        .unwrap();
    let twin = other.parse_matching_rule(&text).unwrap();
    assert!(rule == twin);
}

#[test]
fn test_attribute_type_map_export() {
    let schema = loaded_schema();
    let cn = schema.attribute_types().get("cn");
    let map = cn.map();

    assert_eq!(map.get("NUMERICOID"), Some(&["2.5.4.3".to_string()][..]));
    assert!(!map.contains_key("EQUALITY"));
    assert!(!map.contains_key("DESC"));
    assert_eq!(
        map.to_json(),
        json!({
            "NUMERICOID": ["2.5.4.3"],
            "NAME": ["cn", "commonName"],
            "SUP": ["name"],
            "X-ORIGIN": ["RFC 4519"],
        })
    );
}

#[test]
fn test_object_class_and_rule_map_export() {
    let schema = loaded_schema();
    let top = schema.object_classes().get("top").map();
    let keys: Vec<&str> = top.keys().collect();
    assert_eq!(keys, vec!["NUMERICOID", "NAME", "ABSTRACT", "MUST"]);
    assert_eq!(top.get("ABSTRACT"), Some(&["TRUE".to_string()][..]));

    let rule = schema.dit_structure_rules().get("2").map();
    assert_eq!(
        rule.to_json(),
        json!({
            "RULEID": ["2"],
            "NAME": ["childPersonStructureRule"],
            "FORM": ["personNameForm"],
            "SUP": ["1"],
        })
    );

    let serialized = serde_json::to_value(&rule).unwrap();
    assert_eq!(serialized, rule.to_json());
}
