//! Relational consistency checks behind every `compliant()` predicate.
//!
//! Each check answers with a plain `bool`. The structural `check()` run at
//! registration covers what a definition can verify on its own; these
//! checks resolve clause references against the owning schema and apply
//! the cross-definition rules of RFC 4512.

use log::trace;
use std::collections::{HashMap, HashSet};

use crate::definition::{
    AttributeType, Definition, DitContentRule, DitStructureRule, LdapSyntax, MatchingRule,
    MatchingRuleUse, NameForm, ObjectClass,
};
use crate::oid::NumericOid;
use crate::schema::{Kind, Usage};

fn has_valid_oid<D: Definition>(definition: &D) -> bool {
    NumericOid::is_valid(&definition.numeric_oid())
}

fn verdict<D: Definition>(definition: &D, compliant: bool) -> bool {
    trace!(
        "{} {} is {}compliant",
        D::KIND,
        definition.identifier(),
        if compliant { "" } else { "not " }
    );
    compliant
}

/// Whether the graph reachable from `start` through `next` has a cycle.
fn has_cycle<D: Definition>(start: &D, next: impl Fn(&D) -> Vec<D>) -> bool {
    // identifier -> still on the current path
    fn visit<D: Definition>(
        node: &D,
        next: &dyn Fn(&D) -> Vec<D>,
        state: &mut HashMap<String, bool>,
    ) -> bool {
        let id = node.identifier();
        match state.get(&id) {
            Some(true) => return true,
            Some(false) => return false,
            None => {}
        }
        state.insert(id.clone(), true);
        let cyclic = next(node).iter().any(|child| visit(child, next, state));
        state.insert(id, false);
        cyclic
    }
    visit(start, &next, &mut HashMap::new())
}

pub(crate) fn ldap_syntax(syntax: &LdapSyntax) -> bool {
    verdict(syntax, has_valid_oid(syntax))
}

pub(crate) fn matching_rule(rule: &MatchingRule) -> bool {
    let syntax = rule.syntax();
    let compliant = has_valid_oid(rule) && !syntax.is_zero() && ldap_syntax(&syntax);
    verdict(rule, compliant)
}

/// The attribute type's own clauses, without following its super type.
fn attribute_type_clauses(at: &AttributeType) -> bool {
    if !has_valid_oid(at) || !at.references_resolve() {
        return false;
    }
    if at.is_single_value() && at.is_collective() {
        return false;
    }
    if at.is_collective() && at.usage() != Usage::UserApplications {
        return false;
    }
    if at.is_no_user_modification() && !at.usage().is_operational() {
        return false;
    }
    [at.declared_equality(), at.declared_ordering(), at.declared_substring()]
        .iter()
        .filter(|rule| !rule.is_zero())
        .all(matching_rule)
}

pub(crate) fn attribute_type(at: &AttributeType) -> bool {
    let ancestors = at.ancestors();
    // A chain ending in a resolvable super type has looped back on itself.
    let closed = ancestors
        .last()
        .map_or_else(|| at.super_type(), AttributeType::super_type)
        .is_zero();
    let syntax = at.effective_syntax();
    let compliant = closed
        && !syntax.is_zero()
        && ldap_syntax(&syntax)
        && attribute_type_clauses(at)
        && ancestors.iter().all(attribute_type_clauses);
    verdict(at, compliant)
}

fn kind_permits(class: Kind, sup: Kind) -> bool {
    match class {
        Kind::Abstract => sup == Kind::Abstract,
        Kind::Structural => sup != Kind::Auxiliary,
        Kind::Auxiliary => sup != Kind::Structural,
    }
}

/// The class's own clauses: OID, resolvable references, compliant attribute
/// types and kinds compatible with its direct super classes.
fn object_class_clauses(class: &ObjectClass) -> bool {
    if !has_valid_oid(class) || !class.references_resolve() {
        return false;
    }
    let kind = class.kind();
    class
        .super_classes()
        .iter()
        .all(|sup| kind_permits(kind, sup.kind()))
        && class.must().iter().all(attribute_type)
        && class.may().iter().all(attribute_type)
}

pub(crate) fn object_class(class: &ObjectClass) -> bool {
    let compliant = !has_cycle(class, ObjectClass::super_classes)
        && object_class_clauses(class)
        && class.all_super_classes().iter().all(object_class_clauses);
    verdict(class, compliant)
}

pub(crate) fn matching_rule_use(mru: &MatchingRuleUse) -> bool {
    let applies = mru.applies();
    let compliant = has_valid_oid(mru)
        && !applies.is_empty()
        && applies.iter().all(attribute_type)
        && !mru.matching_rule().is_zero();
    verdict(mru, compliant)
}

pub(crate) fn name_form(form: &NameForm) -> bool {
    let class = form.structural_class();
    let must = form.must();
    let compliant = has_valid_oid(form)
        && form.references_resolve()
        && !class.is_zero()
        && class.kind() == Kind::Structural
        && object_class(&class)
        && !must.is_empty()
        && must.iter().all(attribute_type)
        && form.may().iter().all(attribute_type);
    verdict(form, compliant)
}

pub(crate) fn dit_structure_rule(rule: &DitStructureRule) -> bool {
    let form = rule.form();
    let compliant = rule.rule_id().is_some()
        && rule.references_resolve()
        && !form.is_zero()
        && name_form(&form)
        && !rule.reaches(rule);
    verdict(rule, compliant)
}

/// Identifiers of attribute types, for set arithmetic.
fn ids(attributes: &[AttributeType]) -> HashSet<String> {
    attributes.iter().map(Definition::identifier).collect()
}

/// RFC 4512 §4.1.6 content rule consistency.
///
/// The permitted attribute sets start from the structural class, gain the
/// clauses of every ABSTRACT ancestor and every listed AUXILIARY class, and
/// the rule's own `NOT`, `MUST` and `MAY` clauses must then be consistent
/// with them. Collective attribute types are exempt.
pub(crate) fn dit_content_rule(rule: &DitContentRule) -> bool {
    verdict(rule, content_rule_holds(rule))
}

fn content_rule_holds(rule: &DitContentRule) -> bool {
    if !has_valid_oid(rule) || !rule.references_resolve() {
        return false;
    }

    let structural = rule.structural_class();
    if structural.is_zero()
        || structural.kind() != Kind::Structural
        || !object_class(&structural)
    {
        return false;
    }

    let mut must = ids(&structural.must());
    let mut may = ids(&structural.may());

    for ancestor in structural.all_super_classes() {
        if ancestor.kind() == Kind::Abstract {
            must.extend(ids(&ancestor.must()));
            may.extend(ids(&ancestor.may()));
        }
    }

    for aux in rule.aux() {
        if aux.kind() != Kind::Auxiliary || !object_class(&aux) {
            return false;
        }
        must.extend(ids(&aux.must()));
        may.extend(ids(&aux.may()));
    }

    let checked = |attributes: Vec<AttributeType>| -> Vec<String> {
        attributes
            .iter()
            .filter(|at| !at.is_collective())
            .map(Definition::identifier)
            .collect()
    };

    let prohibits_mandatory = checked(rule.not())
        .iter()
        .any(|id| must.contains(id) && !may.contains(id));
    if prohibits_mandatory {
        return false;
    }

    let requires_unknown = checked(rule.must())
        .iter()
        .any(|id| !must.contains(id) && !may.contains(id));
    if requires_unknown {
        return false;
    }

    checked(rule.may())
        .iter()
        .all(|id| may.contains(id) && !must.contains(id))
}
