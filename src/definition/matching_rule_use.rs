//! Matching rule use definitions (RFC 4512 §4.1.4).
//!
//! A matching rule use lists the attribute types a matching rule applies to.
//! It is derived by the schema from the loaded attribute types and is never
//! parsed from text.

use parking_lot::RwLock;
use std::sync::Arc;

use super::sealed::{Common, Record as _};
use super::{
    AttributeType, Definition, MatchingRule, Reference, common_map, display_keys, push_key,
    reference_key, resolve, resolve_all,
};
use crate::error::{SchemaError, SchemaResult};
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{DefinitionKind, MatchingRuleUses, Schema, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
    applies: Vec<String>,
}

/// Handle to a matching rule use.
#[derive(Clone, Debug, Default)]
pub struct MatchingRuleUse(Arc<RwLock<Record>>);

impl_handle!(MatchingRuleUse);

impl MatchingRuleUse {
    /// Seed a use from the matching rule it describes.
    ///
    /// Copies the rule's OID, names, description, obsolete flag and
    /// extensions, and binds the use to the rule's schema.
    pub fn from_matching_rule(rule: &MatchingRule) -> Self {
        let mut common = rule.read_common(Common::clone);
        common.rendered = None;
        Self(Arc::new(RwLock::new(Record {
            common,
            applies: Vec::new(),
        })))
    }

    /// The matching rule this use describes.
    pub fn matching_rule(&self) -> MatchingRule {
        resolve(self.schema().as_ref(), &self.numeric_oid())
    }

    /// Attribute types the rule applies to, in the order they were added.
    pub fn applies(&self) -> Vec<AttributeType> {
        let keys = self.0.read().applies.clone();
        resolve_all(self.schema().as_ref(), &keys)
    }

    /// Whether an attribute type is listed in `APPLIES`.
    pub fn applies_to(&self, id: &str) -> bool {
        self.applies()
            .iter()
            .any(|at| at.matches_identifier(id) || at.matches_name(id))
    }

    /// Add an attribute type to `APPLIES`. Unknown references are ignored.
    pub fn add_applies<'a>(&self, at: impl Into<Reference<'a, AttributeType>>) -> &Self {
        let _ = self.try_add_applies(at);
        self
    }

    pub fn try_add_applies<'a>(
        &self,
        at: impl Into<Reference<'a, AttributeType>>,
    ) -> SchemaResult<&Self> {
        let key = reference_key(self, "APPLIES", at.into())?;
        self.update(|r| push_key(&mut r.applies, key));
        Ok(self)
    }
}

impl Definition for MatchingRuleUse {
    const KIND: DefinitionKind = DefinitionKind::MatchingRuleUse;

    fn collection(schema: &Schema) -> &MatchingRuleUses {
        schema.matching_rule_uses()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn check(&self) -> SchemaResult<()> {
        if self.numeric_oid().is_empty() {
            return Err(SchemaError::missing_identifier(Self::KIND));
        }
        Ok(())
    }

    fn compliant(&self) -> bool {
        compliance::matching_rule_use(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let schema = self.schema();
        let mut map = DefinitionMap::new();
        common_map(&record.common, &mut map);
        map.insert(
            "APPLIES",
            display_keys::<AttributeType>(schema.as_ref(), &record.applies),
        );
        map.insert_extensions(&record.common.extensions);
        map
    }

    fn render(&self, options: &RenderOptions) -> String {
        let record = self.snapshot();
        let schema = self.schema();
        ClauseWriter::new(&record.common.identifier(), options)
            .names(&record.common.names)
            .description(&record.common.description)
            .flag("OBSOLETE", record.common.obsolete)
            .oids(
                "APPLIES",
                &display_keys::<AttributeType>(schema.as_ref(), &record.applies),
            )
            .extensions(&record.common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
