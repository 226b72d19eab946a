//! Matching rule definitions (RFC 4512 §4.1.3).

use parking_lot::RwLock;
use std::sync::Arc;

use super::sealed::Common;
use super::{Definition, LdapSyntax, Reference, common_map, display_key, reference_key, resolve};
use crate::error::{SchemaError, SchemaResult};
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{DefinitionKind, MatchingRules, Schema, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
    syntax: String,
}

/// Handle to a matching rule definition.
#[derive(Clone, Debug, Default)]
pub struct MatchingRule(Arc<RwLock<Record>>);

impl_handle!(MatchingRule);

impl MatchingRule {
    /// Assertion syntax of the rule.
    pub fn syntax(&self) -> LdapSyntax {
        let key = self.0.read().syntax.clone();
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
        let key = reference_key(self, "SYNTAX", syntax.into())?;
        self.update(|r| r.syntax = key);
        Ok(self)
    }
}

impl Definition for MatchingRule {
    const KIND: DefinitionKind = DefinitionKind::MatchingRule;

    fn collection(schema: &Schema) -> &MatchingRules {
        schema.matching_rules()
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
        if record.syntax.is_empty() {
            return Err(SchemaError::missing_clause(
                Self::KIND,
                record.common.identifier(),
                "SYNTAX",
            ));
        }
        Ok(())
    }

    fn compliant(&self) -> bool {
        compliance::matching_rule(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let schema = self.schema();
        let mut map = DefinitionMap::new();
        common_map(&record.common, &mut map);
        map.insert(
            "SYNTAX",
            [display_key::<LdapSyntax>(schema.as_ref(), &record.syntax)],
        );
        map.insert_extensions(&record.common.extensions);
        map
    }

    fn render(&self, options: &RenderOptions) -> String {
        let record = self.snapshot();
        let schema = self.schema();
        let syntax = if record.syntax.is_empty() {
            String::new()
        } else {
            display_key::<LdapSyntax>(schema.as_ref(), &record.syntax)
        };
        ClauseWriter::new(&record.common.identifier(), options)
            .names(&record.common.names)
            .description(&record.common.description)
            .flag("OBSOLETE", record.common.obsolete)
            .clause("SYNTAX", &syntax)
            .extensions(&record.common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
