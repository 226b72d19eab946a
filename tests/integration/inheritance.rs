//! Super type chains: cycle refusal and effective values.

use ldap_schema::{Definition, SchemaError};

use crate::common::{loaded_schema, rules_only_schema};

#[test]
fn test_attribute_type_cycles_are_refused() {
    let schema = loaded_schema();
    let name = schema.attribute_types().get("name");
    let cn = schema.attribute_types().get("cn");

    let err = name.try_set_super_type(&cn).unwrap_err();
    assert!(matches!(err, SchemaError::Cycle { .. }));

    // The fluent setter drops the assignment without reporting it.
    name.set_super_type("cn");
    assert!(name.super_type().is_zero());
    assert!(name.ancestors().is_empty());

    let err = cn.try_set_super_type("cn").unwrap_err();
    assert!(matches!(err, SchemaError::Cycle { .. }));
    assert!(cn.super_type().ptr_eq(&name));
}

#[test]
fn test_long_attribute_type_chain_cannot_close() {
    let schema = rules_only_schema();
    schema
        .parse_attribute_type(
            "( 1.1.1 NAME 'a' EQUALITY caseIgnoreMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )",
        )
        .unwrap();
    schema.parse_attribute_type("( 1.1.2 NAME 'b' SUP a )").unwrap();
    schema.parse_attribute_type("( 1.1.3 NAME 'c' SUP b )").unwrap();
    let d = schema.parse_attribute_type("( 1.1.4 NAME 'd' SUP c )").unwrap();

    let a = schema.attribute_types().get("a");
    assert!(matches!(
        a.try_set_super_type(&d),
        Err(SchemaError::Cycle { .. })
    ));
    let chain: Vec<String> = d.ancestors().iter().map(Definition::name).collect();
    assert_eq!(chain, vec!["c", "b", "a"]);
}

#[test]
fn test_object_class_cycles_are_refused() {
    let schema = loaded_schema();
    let top = schema.object_classes().get("top");
    let err = top.try_set_super_class(["person"]).unwrap_err();
    assert!(matches!(err, SchemaError::Cycle { .. }));

    top.set_super_class(["person", "top"]);
    assert!(top.super_classes().is_empty());

    let person = schema.object_classes().get("person");
    let supers: Vec<String> = person
        .all_super_classes()
        .iter()
        .map(Definition::name)
        .collect();
    assert_eq!(supers, vec!["top"]);
}

#[test]
fn test_structure_rule_loops_are_refused() {
    let schema = loaded_schema();
    let root = schema.dit_structure_rules().get("1");
    let err = root.try_set_superior_rule(["2"]).unwrap_err();
    assert!(matches!(err, SchemaError::Cycle { .. }));
    assert!(root.superior_rules().is_empty());

    // Naming itself is a permitted recursion.
    root.try_set_superior_rule(["1"]).unwrap();
    assert_eq!(root.superior_rules().len(), 1);
    assert!(root.compliant());
}

#[test]
fn test_effective_values_follow_the_chain() {
    let schema = loaded_schema();
    let cn = schema.attribute_types().get("cn");

    assert!(cn.declared_equality().is_zero());
    assert_eq!(cn.equality().name(), "caseIgnoreMatch");
    assert_eq!(cn.substring().name(), "caseIgnoreSubstringsMatch");
    assert!(cn.ordering().is_zero());

    assert!(cn.syntax().is_zero());
    assert_eq!(
        cn.effective_syntax().numeric_oid(),
        "1.3.6.1.4.1.1466.115.121.1.15"
    );
    assert_eq!(cn.effective_syntax().description(), "Directory String");
}

#[test]
fn test_super_type_rules_take_precedence() {
    let schema = loaded_schema();
    let nick = schema
        .parse_attribute_type(
            "( 1.3.6.1.4.1.56521.999.4.1 NAME 'nickName' SUP name \
             ORDERING caseIgnoreOrderingMatch EQUALITY octetStringMatch )",
        )
        .unwrap();
    assert_eq!(nick.equality().name(), "caseIgnoreMatch");
    assert!(nick.ordering().is_zero());
    assert_eq!(nick.substring().name(), "caseIgnoreSubstringsMatch");

    // Locally declared clauses are still kept and rendered.
    assert_eq!(nick.declared_equality().name(), "octetStringMatch");
    assert_eq!(nick.declared_ordering().name(), "caseIgnoreOrderingMatch");
    assert!(nick.to_string().contains("EQUALITY octetStringMatch"));

    let equality = schema.matching_rule_uses().get("caseIgnoreMatch");
    assert!(equality.applies_to("nickName"));
    let octets = schema.matching_rule_uses().get("octetStringMatch");
    assert!(octets.applies_to("userPassword"));
    assert!(!octets.applies_to("nickName"));
}

#[test]
fn test_ancestor_syntax_wins_over_local() {
    let schema = loaded_schema();
    let code = schema
        .parse_attribute_type(
            "( 1.3.6.1.4.1.56521.999.4.2 NAME 'code' SUP name \
             SYNTAX 1.3.6.1.4.1.1466.115.121.1.26 )",
        )
        .unwrap();
    assert_eq!(code.syntax().description(), "IA5 String");
    assert_eq!(code.effective_syntax().description(), "Directory String");
}
