//! Attribute type definitions (RFC 4512 §4.1.2).
//!
//! An attribute type may derive from a super type, inheriting its syntax and
//! matching rules. Super types are stored as lookup keys and resolved through
//! the owning schema, so chains are walked rather than followed through
//! owned pointers.

use log::{trace, warn};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use super::sealed::Common;
use super::{
    Definition, LdapSyntax, MatchingRule, Reference, common_map, display_key, keys_resolve,
    reference_key, resolve,
};
use crate::error::{SchemaError, SchemaResult};
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{AttributeTypes, DefinitionKind, Schema, Usage, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
    super_type: String,
    equality: String,
    ordering: String,
    substring: String,
    syntax: String,
    min_upper_bounds: u32,
    single_value: bool,
    collective: bool,
    no_user_modification: bool,
    usage: Usage,
}

/// Handle to an attribute type definition.
#[derive(Clone, Debug, Default)]
pub struct AttributeType(Arc<RwLock<Record>>);

impl_handle!(AttributeType);

impl AttributeType {
    fn try_set_key<'a, D: Definition>(
        &self,
        clause: &'static str,
        reference: Reference<'a, D>,
        field: fn(&mut Record) -> &mut String,
    ) -> SchemaResult<&Self> {
        let key = reference_key(self, clause, reference)?;
        self.update(|r| *field(r) = key);
        Ok(self)
    }

    /// Resolved super type; zero when none is declared or it is not loaded.
    pub fn super_type(&self) -> AttributeType {
        let key = self.0.read().super_type.clone();
        resolve(self.schema().as_ref(), &key)
    }

    /// Super type chain, nearest first. Stops at the first repeated entry.
    pub fn ancestors(&self) -> Vec<AttributeType> {
        let mut seen = HashSet::new();
        seen.insert(self.identifier());
        let mut chain = Vec::new();
        let mut current = self.super_type();
        while !current.is_zero() && seen.insert(current.identifier()) {
            let next = current.super_type();
            chain.push(current);
            current = next;
        }
        chain
    }

    /// Assign the super type. Unknown references and cycles are ignored.
    pub fn set_super_type<'a>(&self, sup: impl Into<Reference<'a, AttributeType>>) -> &Self {
        if let Err(e) = self.try_set_super_type(sup) {
            trace!("Ignored SUP on {}: {e}", self.identifier());
        }
        self
    }

    /// Assign the super type, reporting why it was refused.
    pub fn try_set_super_type<'a>(
        &self,
        sup: impl Into<Reference<'a, AttributeType>>,
    ) -> SchemaResult<&Self> {
        let reference = sup.into();
        let described = reference.describe();
        let sup = reference.resolve(self.schema().as_ref());
        if sup.is_zero() {
            return Err(SchemaError::unknown_reference(
                Self::KIND,
                self.identifier(),
                "SUP",
                described,
            ));
        }
        self.verify_super_type(&sup)?;
        let key = sup.identifier();
        self.update(|r| r.super_type = key);
        Ok(self)
    }

    /// Check that `sup` can become this type's super type.
    ///
    /// `sup` must have a numeric OID, must not be this type, and must not
    /// reach this type through its own super type chain.
    pub fn verify_super_type(&self, sup: &AttributeType) -> SchemaResult<()> {
        if sup.numeric_oid().is_empty() {
            return Err(SchemaError::missing_identifier(Self::KIND));
        }
        let refuse = |target: &AttributeType| {
            warn!(
                "Refused SUP {} on {}: cycle",
                target.identifier(),
                self.identifier()
            );
            SchemaError::cycle(Self::KIND, self.identifier(), sup.identifier())
        };
        if sup.ptr_eq(self) || self.matches_identifier(&sup.numeric_oid()) {
            return Err(refuse(sup));
        }
        let mut seen = HashSet::new();
        let mut current = sup.super_type();
        while !current.is_zero() && seen.insert(current.identifier()) {
            if current.ptr_eq(self) || self.matches_identifier(&current.identifier()) {
                return Err(refuse(sup));
            }
            current = current.super_type();
        }
        Ok(())
    }

    /// Matching rule taken from the root of the super type chain.
    ///
    /// The local clause only counts when there is no super type at all.
    fn effective_rule(&self, field: fn(&Record) -> &String) -> MatchingRule {
        let root = self.ancestors().pop().unwrap_or_else(|| self.clone());
        let key = field(&root.0.read()).clone();
        resolve(self.schema().as_ref(), &key)
    }

    /// Effective EQUALITY rule, delegated to the super type when one is set.
    pub fn equality(&self) -> MatchingRule {
        self.effective_rule(|r| &r.equality)
    }

    /// Effective ORDERING rule, delegated to the super type when one is set.
    pub fn ordering(&self) -> MatchingRule {
        self.effective_rule(|r| &r.ordering)
    }

    /// Effective SUBSTR rule, delegated to the super type when one is set.
    pub fn substring(&self) -> MatchingRule {
        self.effective_rule(|r| &r.substring)
    }

    pub fn declared_equality(&self) -> MatchingRule {
        let key = self.0.read().equality.clone();
        resolve(self.schema().as_ref(), &key)
    }

    pub fn declared_ordering(&self) -> MatchingRule {
        let key = self.0.read().ordering.clone();
        resolve(self.schema().as_ref(), &key)
    }

    pub fn declared_substring(&self) -> MatchingRule {
        let key = self.0.read().substring.clone();
        resolve(self.schema().as_ref(), &key)
    }

    pub fn set_equality<'a>(&self, rule: impl Into<Reference<'a, MatchingRule>>) -> &Self {
        let _ = self.try_set_equality(rule);
        self
    }

    pub fn try_set_equality<'a>(
        &self,
        rule: impl Into<Reference<'a, MatchingRule>>,
    ) -> SchemaResult<&Self> {
        self.try_set_key("EQUALITY", rule.into(), |r| &mut r.equality)
    }

    pub fn set_ordering<'a>(&self, rule: impl Into<Reference<'a, MatchingRule>>) -> &Self {
        let _ = self.try_set_ordering(rule);
        self
    }

    pub fn try_set_ordering<'a>(
        &self,
        rule: impl Into<Reference<'a, MatchingRule>>,
    ) -> SchemaResult<&Self> {
        self.try_set_key("ORDERING", rule.into(), |r| &mut r.ordering)
    }

    pub fn set_substring<'a>(&self, rule: impl Into<Reference<'a, MatchingRule>>) -> &Self {
        let _ = self.try_set_substring(rule);
        self
    }

    pub fn try_set_substring<'a>(
        &self,
        rule: impl Into<Reference<'a, MatchingRule>>,
    ) -> SchemaResult<&Self> {
        self.try_set_key("SUBSTR", rule.into(), |r| &mut r.substring)
    }

    /// Locally declared syntax.
    pub fn syntax(&self) -> LdapSyntax {
        let key = self.0.read().syntax.clone();
        resolve(self.schema().as_ref(), &key)
    }

    /// Syntax in effect for values of this type.
    ///
    /// The furthest ancestor declaring a syntax wins over nearer and local
    /// declarations; the local syntax applies only when no ancestor has one.
    pub fn effective_syntax(&self) -> LdapSyntax {
        let local = self.0.read().syntax.clone();
        let key = self
            .ancestors()
            .iter()
            .rev()
            .map(|ancestor| ancestor.0.read().syntax.clone())
            .find(|key| !key.is_empty())
            .unwrap_or(local);
        resolve(self.schema().as_ref(), &key)
    }

    pub fn set_syntax<'a>(&self, syntax: impl Into<Reference<'a, LdapSyntax>>) -> &Self {
        let _ = self.try_set_syntax(syntax);
        self
    }

    pub fn try_set_syntax<'a>(
        &self,
        syntax: impl Into<Reference<'a, LdapSyntax>>,
    ) -> SchemaResult<&Self> {
        self.try_set_key("SYNTAX", syntax.into(), |r| &mut r.syntax)
    }

    /// Suggested maximum value length from `SYNTAX oid{len}`; 0 means unbounded.
    pub fn min_upper_bounds(&self) -> u32 {
        self.0.read().min_upper_bounds
    }

    pub fn set_min_upper_bounds(&self, bound: u32) -> &Self {
        self.update(|r| r.min_upper_bounds = bound);
        self
    }

    pub fn is_single_value(&self) -> bool {
        self.0.read().single_value
    }

    pub fn set_single_value(&self) -> &Self {
        self.update(|r| r.single_value = true);
        self
    }

    pub fn is_collective(&self) -> bool {
        self.0.read().collective
    }

    pub fn set_collective(&self) -> &Self {
        self.update(|r| r.collective = true);
        self
    }

    pub fn is_no_user_modification(&self) -> bool {
        self.0.read().no_user_modification
    }

    pub fn set_no_user_modification(&self) -> &Self {
        self.update(|r| r.no_user_modification = true);
        self
    }

    pub fn usage(&self) -> Usage {
        self.0.read().usage
    }

    pub fn set_usage(&self, usage: Usage) -> &Self {
        self.update(|r| r.usage = usage);
        self
    }

    /// Whether the usage is one of the operational ones.
    pub fn is_operational(&self) -> bool {
        self.usage().is_operational()
    }

    /// Whether every declared reference resolves in the owning schema.
    pub(crate) fn references_resolve(&self) -> bool {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        keys_resolve::<AttributeType>(schema, std::slice::from_ref(&record.super_type))
            && keys_resolve::<MatchingRule>(
                schema,
                &[record.equality, record.ordering, record.substring],
            )
            && keys_resolve::<LdapSyntax>(schema, std::slice::from_ref(&record.syntax))
    }

    fn syntax_text(schema: Option<&Schema>, record: &Record) -> String {
        if record.syntax.is_empty() {
            return String::new();
        }
        let syntax = display_key::<LdapSyntax>(schema, &record.syntax);
        if record.min_upper_bounds > 0 {
            format!("{syntax}{{{}}}", record.min_upper_bounds)
        } else {
            syntax
        }
    }
}

impl Definition for AttributeType {
    const KIND: DefinitionKind = DefinitionKind::AttributeType;

    fn collection(schema: &Schema) -> &AttributeTypes {
        schema.attribute_types()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn check(&self) -> SchemaResult<()> {
        let record = self.snapshot();
        if record.common.oid.is_zero() {
            return Err(match record.common.macro_oid {
                Some(declared) => SchemaError::invalid_oid(declared),
                None => SchemaError::missing_identifier(Self::KIND),
            });
        }
        if record.single_value && record.collective {
            return Err(SchemaError::MutuallyExclusive {
                kind: Self::KIND,
                id: record.common.identifier(),
                first: "SINGLE-VALUE",
                second: "COLLECTIVE",
            });
        }
        Ok(())
    }

    fn compliant(&self) -> bool {
        compliance::attribute_type(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        let key = |key: &str| display_key::<MatchingRule>(schema, key);

        let mut map = DefinitionMap::new();
        common_map(&record.common, &mut map);
        map.insert("SUP", [display_key::<AttributeType>(schema, &record.super_type)]);
        map.insert("EQUALITY", [key(&record.equality)]);
        map.insert("ORDERING", [key(&record.ordering)]);
        map.insert("SUBSTR", [key(&record.substring)]);
        map.insert("SYNTAX", [Self::syntax_text(schema, &record)]);
        map.insert_flag("SINGLE-VALUE", record.single_value);
        map.insert_flag("COLLECTIVE", record.collective);
        map.insert_flag("NO-USER-MODIFICATION", record.no_user_modification);
        if record.usage != Usage::default() {
            map.insert("USAGE", [record.usage.keyword()]);
        }
        map.insert_extensions(&record.common.extensions);
        map
    }

    fn render(&self, options: &RenderOptions) -> String {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        let key = |key: &str| {
            if key.is_empty() {
                String::new()
            } else {
                display_key::<MatchingRule>(schema, key)
            }
        };
        let sup = if record.super_type.is_empty() {
            Vec::new()
        } else {
            vec![display_key::<AttributeType>(schema, &record.super_type)]
        };
        let usage = if record.usage == Usage::default() {
            ""
        } else {
            record.usage.keyword()
        };

        ClauseWriter::new(&record.common.identifier(), options)
            .names(&record.common.names)
            .description(&record.common.description)
            .flag("OBSOLETE", record.common.obsolete)
            .oids("SUP", &sup)
            .clause("EQUALITY", &key(&record.equality))
            .clause("ORDERING", &key(&record.ordering))
            .clause("SUBSTR", &key(&record.substring))
            .clause("SYNTAX", &Self::syntax_text(schema, &record))
            .flag("SINGLE-VALUE", record.single_value)
            .flag("COLLECTIVE", record.collective)
            .flag("NO-USER-MODIFICATION", record.no_user_modification)
            .clause("USAGE", usage)
            .extensions(&record.common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
