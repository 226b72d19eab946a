//! Turning parsed descriptions into registered definitions.
//!
//! Each description kind implements [`Build`], so the schema dispatches on
//! the description type rather than inspecting parse output. Building
//! resolves every reference against the schema and fails on the first one
//! that is not loaded; nothing is registered in that case.

use super::description::{
    AttributeTypeDescription, DitContentRuleDescription, DitStructureRuleDescription, Header,
    LdapSyntaxDescription, MatchingRuleDescription, NameFormDescription, ObjectClassDescription,
};
use crate::definition::{
    AttributeType, Definition, DitContentRule, DitStructureRule, LdapSyntax, MatchingRule,
    NameForm, ObjectClass,
};
use crate::error::{SchemaError, SchemaResult};
use crate::oid::{NumericOid, is_descriptor};
use crate::schema::Schema;

/// Build capability of a parsed description.
pub trait Build {
    /// Definition kind produced.
    type Output: Definition;

    /// Create the definition in `schema` without registering it.
    fn build(self, schema: &Schema) -> SchemaResult<Self::Output>;
}

/// Apply a declared OID: numeric as is, otherwise a macro to resolve.
fn apply_oid<D: Definition>(schema: &Schema, definition: &D, oid: &str) -> SchemaResult<()> {
    if NumericOid::is_valid(oid) {
        definition.set_numeric_oid(oid);
        return Ok(());
    }
    let prefix = oid.split(['.', ':']).next().unwrap_or_default();
    if !is_descriptor(prefix) {
        return Err(SchemaError::invalid_oid(oid));
    }
    definition.set_macro_oid(oid);
    schema.resolve_by_macro(definition);
    Ok(())
}

fn apply_header<D: Definition>(definition: &D, header: Header) {
    definition.set_name(&header.names);
    if let Some(description) = header.description {
        definition.set_description(&description);
    }
    if header.obsolete {
        definition.set_obsolete();
    }
    for (label, values) in header.extensions {
        definition.set_extension(&label, values);
    }
}

impl Build for LdapSyntaxDescription {
    type Output = LdapSyntax;

    fn build(self, schema: &Schema) -> SchemaResult<LdapSyntax> {
        let syntax = schema.new_ldap_syntax();
        apply_oid(schema, &syntax, &self.oid)?;
        apply_header(&syntax, self.header);
        Ok(syntax)
    }
}

impl Build for MatchingRuleDescription {
    type Output = MatchingRule;

    fn build(self, schema: &Schema) -> SchemaResult<MatchingRule> {
        let rule = schema.new_matching_rule();
        apply_oid(schema, &rule, &self.oid)?;
        apply_header(&rule, self.header);
        if let Some(syntax) = &self.syntax {
            rule.try_set_syntax(syntax)?;
        }
        Ok(rule)
    }
}

impl Build for AttributeTypeDescription {
    type Output = AttributeType;

    fn build(self, schema: &Schema) -> SchemaResult<AttributeType> {
        let at = schema.new_attribute_type();
        apply_oid(schema, &at, &self.oid)?;
        apply_header(&at, self.header);
        if let Some(sup) = &self.super_type {
            at.try_set_super_type(sup)?;
        }
        if let Some(rule) = &self.equality {
            at.try_set_equality(rule)?;
        }
        if let Some(rule) = &self.ordering {
            at.try_set_ordering(rule)?;
        }
        if let Some(rule) = &self.substring {
            at.try_set_substring(rule)?;
        }
        if let Some(syntax) = &self.syntax {
            at.try_set_syntax(syntax)?;
        }
        if let Some(bound) = self.min_upper_bounds {
            at.set_min_upper_bounds(bound);
        }
        if self.single_value {
            at.set_single_value();
        }
        if self.collective {
            at.set_collective();
        }
        if self.no_user_modification {
            at.set_no_user_modification();
        }
        if let Some(usage) = self.usage {
            at.set_usage(usage);
        }
        Ok(at)
    }
}

impl Build for ObjectClassDescription {
    type Output = ObjectClass;

    fn build(self, schema: &Schema) -> SchemaResult<ObjectClass> {
        let class = schema.new_object_class();
        apply_oid(schema, &class, &self.oid)?;
        apply_header(&class, self.header);
        class.set_kind(self.kind.unwrap_or_default());
        class.try_set_super_class(&self.super_classes)?;
        class.try_set_must(&self.must)?;
        class.try_set_may(&self.may)?;
        Ok(class)
    }
}

impl Build for NameFormDescription {
    type Output = NameForm;

    fn build(self, schema: &Schema) -> SchemaResult<NameForm> {
        let form = schema.new_name_form();
        apply_oid(schema, &form, &self.oid)?;
        apply_header(&form, self.header);
        if let Some(class) = &self.structural_class {
            form.try_set_structural_class(class)?;
        }
        form.try_set_must(&self.must)?;
        form.try_set_may(&self.may)?;
        Ok(form)
    }
}

impl Build for DitContentRuleDescription {
    type Output = DitContentRule;

    fn build(self, schema: &Schema) -> SchemaResult<DitContentRule> {
        let rule = schema.new_dit_content_rule();
        apply_oid(schema, &rule, &self.oid)?;
        // The rule's OID must name a loaded STRUCTURAL class.
        let oid = rule.numeric_oid();
        rule.try_set_structural_class(&oid)?;
        apply_header(&rule, self.header);
        rule.try_set_aux(&self.aux)?;
        rule.try_set_must(&self.must)?;
        rule.try_set_may(&self.may)?;
        rule.try_set_not(&self.not)?;
        Ok(rule)
    }
}

impl Build for DitStructureRuleDescription {
    type Output = DitStructureRule;

    fn build(self, schema: &Schema) -> SchemaResult<DitStructureRule> {
        let rule = schema.new_dit_structure_rule();
        rule.set_rule_id(self.rule_id);
        apply_header(&rule, self.header);
        if let Some(form) = &self.form {
            rule.try_set_form(form)?;
        }
        for superior in self.superiors {
            if superior == self.rule_id {
                rule.try_set_superior_rule([&rule])?;
            } else {
                rule.try_set_superior_rule([superior.to_string().as_str()])?;
            }
        }
        Ok(rule)
    }
}
