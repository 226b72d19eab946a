//! DIT structure rule definitions (RFC 4512 §4.1.7.1).
//!
//! Structure rules are identified by an integer rule ID instead of an OID.
//! Each names the form entries must be named by and the rules that may
//! govern their superior entries.

use log::{trace, warn};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use super::sealed::Common;
use super::{
    Definition, NameForm, Reference, common_map, display_key, keys_resolve, push_key, resolve,
    resolve_all,
};
use crate::error::{SchemaError, SchemaResult};
use crate::oid::RuleId;
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{DefinitionKind, DitStructureRules, Schema, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
    rule_id: Option<RuleId>,
    form: String,
    superiors: Vec<String>,
}

/// Handle to a DIT structure rule.
#[derive(Clone, Debug, Default)]
pub struct DitStructureRule(Arc<RwLock<Record>>);

impl_handle!(DitStructureRule);

impl DitStructureRule {
    pub fn rule_id(&self) -> Option<RuleId> {
        self.0.read().rule_id
    }

    /// Set the rule ID. Ignored once set.
    pub fn set_rule_id(&self, id: impl Into<RuleId>) -> &Self {
        let id = id.into();
        self.update(|r| {
            if r.rule_id.is_none() {
                r.rule_id = Some(id);
            }
        });
        self
    }

    /// The name form named by `FORM`.
    pub fn form(&self) -> NameForm {
        let key = self.0.read().form.clone();
        resolve(self.schema().as_ref(), &key)
    }

    pub fn set_form<'a>(&self, form: impl Into<Reference<'a, NameForm>>) -> &Self {
        let _ = self.try_set_form(form);
        self
    }

    pub fn try_set_form<'a>(
        &self,
        form: impl Into<Reference<'a, NameForm>>,
    ) -> SchemaResult<&Self> {
        let reference = form.into();
        let described = reference.describe();
        let form = reference.resolve(self.schema().as_ref());
        if form.is_zero() {
            return Err(SchemaError::unknown_reference(
                Self::KIND,
                self.identifier(),
                "FORM",
                described,
            ));
        }
        let key = form.identifier();
        self.update(|r| r.form = key);
        Ok(self)
    }

    /// Rules permitted for superior entries, in declaration order.
    pub fn superior_rules(&self) -> Vec<DitStructureRule> {
        let keys = self.0.read().superiors.clone();
        resolve_all(self.schema().as_ref(), &keys)
    }

    /// Append superior rules. Unknown references and loops are skipped.
    pub fn set_superior_rule<'a, R>(&self, rules: impl IntoIterator<Item = R>) -> &Self
    where
        R: Into<Reference<'a, DitStructureRule>>,
    {
        for rule in rules {
            if let Err(e) = self.try_set_superior_rule([rule.into()]) {
                trace!("Ignored SUP on rule {}: {e}", self.identifier());
            }
        }
        self
    }

    /// Append superior rules, all or nothing.
    ///
    /// A rule may name itself, which permits recursive structures of one
    /// rule. A superior whose own superiors lead back to this rule is
    /// refused.
    pub fn try_set_superior_rule<'a, R>(
        &self,
        rules: impl IntoIterator<Item = R>,
    ) -> SchemaResult<&Self>
    where
        R: Into<Reference<'a, DitStructureRule>>,
    {
        let schema = self.schema();
        let mut keys = Vec::new();
        for rule in rules {
            let reference = rule.into();
            let described = reference.describe();
            let superior = reference.resolve(schema.as_ref());
            if superior.is_zero() {
                return Err(SchemaError::unknown_reference(
                    Self::KIND,
                    self.identifier(),
                    "SUP",
                    described,
                ));
            }
            if !superior.ptr_eq(self) && superior.reaches(self) {
                warn!(
                    "Refused SUP {} on rule {}: cycle",
                    superior.identifier(),
                    self.identifier()
                );
                return Err(SchemaError::cycle(
                    Self::KIND,
                    self.identifier(),
                    superior.identifier(),
                ));
            }
            push_key(&mut keys, superior.identifier());
        }
        self.update(|r| keys.into_iter().for_each(|key| push_key(&mut r.superiors, key)));
        Ok(self)
    }

    /// Whether `target` is reachable through superior rules, ignoring
    /// self-references.
    pub(crate) fn reaches(&self, target: &DitStructureRule) -> bool {
        let target_id = target.identifier();
        let mut seen = HashSet::new();
        seen.insert(self.identifier());
        let mut pending = vec![self.clone()];
        while let Some(rule) = pending.pop() {
            for superior in rule.superior_rules() {
                if superior.ptr_eq(&rule) {
                    continue;
                }
                if superior.ptr_eq(target) || superior.matches_identifier(&target_id) {
                    return true;
                }
                if seen.insert(superior.identifier()) {
                    pending.push(superior);
                }
            }
        }
        false
    }

    pub(crate) fn references_resolve(&self) -> bool {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        keys_resolve::<NameForm>(schema, std::slice::from_ref(&record.form))
            && keys_resolve::<DitStructureRule>(schema, &record.superiors)
    }
}

impl Definition for DitStructureRule {
    const KIND: DefinitionKind = DefinitionKind::DitStructureRule;

    fn collection(schema: &Schema) -> &DitStructureRules {
        schema.dit_structure_rules()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn identifier(&self) -> String {
        self.rule_id().map(|id| id.to_string()).unwrap_or_default()
    }

    fn is_zero(&self) -> bool {
        let record = self.0.read();
        record.rule_id.is_none() && record.common.names.is_empty()
    }

    fn matches_identifier(&self, id: &str) -> bool {
        match (self.rule_id(), id.parse::<RuleId>()) {
            (Some(own), Ok(other)) => own == other,
            _ => false,
        }
    }

    fn check(&self) -> SchemaResult<()> {
        let record = self.snapshot();
        let Some(rule_id) = record.rule_id else {
            return Err(SchemaError::missing_identifier(Self::KIND));
        };
        if record.form.is_empty() {
            return Err(SchemaError::missing_clause(
                Self::KIND,
                rule_id.to_string(),
                "FORM",
            ));
        }
        Ok(())
    }

    fn compliant(&self) -> bool {
        compliance::dit_structure_rule(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let schema = self.schema();
        let mut map = DefinitionMap::new();
        map.insert("RULEID", [self.identifier()]);
        common_map(&record.common, &mut map);
        map.insert("FORM", [display_key::<NameForm>(schema.as_ref(), &record.form)]);
        map.insert("SUP", record.superiors.clone());
        map.insert_extensions(&record.common.extensions);
        map
    }

    fn render(&self, options: &RenderOptions) -> String {
        let record = self.snapshot();
        let schema = self.schema();
        let form = if record.form.is_empty() {
            String::new()
        } else {
            display_key::<NameForm>(schema.as_ref(), &record.form)
        };
        let id = record.rule_id.map(|id| id.to_string()).unwrap_or_default();
        ClauseWriter::new(&id, options)
            .names(&record.common.names)
            .description(&record.common.description)
            .flag("OBSOLETE", record.common.obsolete)
            .clause("FORM", &form)
            .list("SUP", &record.superiors)
            .extensions(&record.common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
