use ldap_schema::{Definition, Name, NumericOid, Oid, RuleId, Schema, oid_eq};
use proptest::prelude::*;

fn arc() -> impl Strategy<Value = u128> {
    prop_oneof![0u128..=39, 40u128..100_000, any::<u64>().prop_map(u128::from)]
}

fn numeric_oid() -> impl Strategy<Value = String> {
    prop::collection::vec(arc(), 2..12).prop_map(|arcs| {
        arcs.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    })
}

fn descriptor() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9-]{0,24}"
}

proptest! {
    #[test]
    fn numeric_oid_display_round_trips(oid in numeric_oid()) {
        let parsed = NumericOid::parse(&oid).unwrap();
        prop_assert_eq!(parsed.to_string(), oid.clone());
        prop_assert!(oid_eq(&oid, &parsed.to_string()));
        prop_assert!(matches!(Oid::parse(&oid), Ok(Oid::Numeric(_))));
    }

    #[test]
    fn leading_zero_arcs_are_rejected(oid in numeric_oid(), pad in 1usize..3) {
        let padded = format!("{}{}", "0".repeat(pad), oid);
        prop_assert!(!NumericOid::is_valid(&padded));
        prop_assert!(!oid_eq(&padded, &oid));
    }

    #[test]
    fn oid_eq_is_symmetric(a in numeric_oid(), b in numeric_oid()) {
        prop_assert_eq!(oid_eq(&a, &b), oid_eq(&b, &a));
        prop_assert_eq!(oid_eq(&a, &b), a == b);
    }

    #[test]
    fn joined_oid_extends_prefix(base in numeric_oid(), suffix in numeric_oid()) {
        let base = NumericOid::parse(&base).unwrap();
        let joined = base.join(&suffix).unwrap();
        prop_assert!(base.is_prefix_of(&joined));
        prop_assert_eq!(joined.to_string(), format!("{base}.{suffix}"));
    }

    #[test]
    fn descriptors_are_not_numeric(name in descriptor()) {
        prop_assert!(!NumericOid::is_valid(&name));
        prop_assert!(matches!(Oid::parse(&name), Ok(Oid::Descriptor(_))));
    }

    #[test]
    fn names_match_case_insensitively(name in descriptor()) {
        let names: Name = [name.as_str()].into_iter().collect();
        prop_assert!(names.contains(&name.to_ascii_uppercase()));
        prop_assert!(names.contains(&name.to_ascii_lowercase()));
    }

    #[test]
    fn rule_ids_round_trip(id in any::<u32>()) {
        let parsed: RuleId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, RuleId::new(id));
    }

    #[test]
    fn lookup_is_idempotent(oid in numeric_oid(), name in descriptor()) {
        let schema = Schema::new();
        let at = schema.new_attribute_type();
        at.set_numeric_oid(&oid).set_name([name.as_str()]);
        schema.register(at.clone()).unwrap();

        let first = schema.attribute_types().get(&oid);
        let second = schema.attribute_types().get(&name);
        prop_assert!(first.ptr_eq(&at));
        prop_assert!(second.ptr_eq(&at));
        prop_assert!(schema.register(at).is_err());
        prop_assert_eq!(schema.attribute_types().len(), 1);
    }
}
