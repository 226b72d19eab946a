//! Per-kind definition collections.
//!
//! A [`Collection`] is an ordered, append-only container enforcing
//! identifier uniqueness for one definition kind. Uniqueness is scoped to
//! the collection: an attribute type and an object class may share a
//! numeric OID, and a DIT content rule reuses its structural class's OID by
//! definition. Lookups are linear scans; this is a load-time structure.

use indexmap::IndexMap;
use log::{debug, trace, warn};
use parking_lot::RwLock;
use std::fmt;

use super::registry::SchemaRef;
use crate::definition::{
    AttributeType, Definition, DitContentRule, DitStructureRule, LdapSyntax, MatchingRule,
    MatchingRuleUse, NameForm, ObjectClass,
};
use crate::error::{SchemaError, SchemaResult};

/// Identifier to names snapshot of a collection, for enumeration.
pub type Inventory = IndexMap<String, Vec<String>>;

/// Ordered container of one definition kind.
pub struct Collection<D> {
    owner: SchemaRef,
    members: RwLock<Vec<D>>,
}

pub type LdapSyntaxes = Collection<LdapSyntax>;
pub type MatchingRules = Collection<MatchingRule>;
pub type AttributeTypes = Collection<AttributeType>;
pub type MatchingRuleUses = Collection<MatchingRuleUse>;
pub type ObjectClasses = Collection<ObjectClass>;
pub type NameForms = Collection<NameForm>;
pub type DitContentRules = Collection<DitContentRule>;
pub type DitStructureRules = Collection<DitStructureRule>;

impl<D: Definition> Collection<D> {
    pub(crate) fn new(owner: SchemaRef) -> Self {
        Self {
            owner,
            members: RwLock::new(Vec::new()),
        }
    }

    /// Append a definition after validating it.
    ///
    /// Rejects zero-valued definitions, definitions failing their structural
    /// `check()`, and definitions whose identifier is already registered. On
    /// error the collection is unchanged. A definition without an owning
    /// schema is bound to this collection's schema.
    pub fn push(&self, definition: D) -> SchemaResult<()> {
        if definition.is_zero() {
            warn!("Rejected zero-valued {}", D::KIND);
            return Err(SchemaError::missing_identifier(D::KIND));
        }
        if definition.schema().is_none() {
            if let Some(owner) = self.owner.upgrade() {
                definition.set_schema(&owner);
            }
        }
        if let Err(e) = definition.check() {
            warn!("Rejected {}: {}", D::KIND, e);
            return Err(e);
        }

        let id = definition.identifier();
        let mut members = self.members.write();
        if members
            .iter()
            .any(|member| member.ptr_eq(&definition) || member.matches_identifier(&id))
        {
            warn!("Rejected duplicate {} {}", D::KIND, id);
            return Err(SchemaError::not_unique(D::KIND, id));
        }
        members.push(definition);
        debug!("Registered {} {} ({} total)", D::KIND, id, members.len());
        Ok(())
    }

    /// Look up by identifier or name.
    ///
    /// Identifier equality is tried across all members first, then name
    /// containment, each in registration order. A miss yields the zero
    /// value; test it with `is_zero()`.
    pub fn get(&self, id: &str) -> D {
        let members = self.members.read();
        let found = members
            .iter()
            .find(|member| member.matches_identifier(id))
            .or_else(|| members.iter().find(|member| member.matches_name(id)))
            .cloned();
        let outcome = if found.is_some() { "hit" } else { "miss" };
        trace!("Lookup {} '{}': {outcome}", D::KIND, id);
        found.unwrap_or_default()
    }

    pub fn contains(&self, id: &str) -> bool {
        !self.get(id).is_zero()
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Member at a position; out of range yields the zero value.
    pub fn index(&self, index: usize) -> D {
        self.members.read().get(index).cloned().unwrap_or_default()
    }

    /// Snapshot of the members in registration order.
    pub fn to_vec(&self) -> Vec<D> {
        self.members.read().clone()
    }

    /// Identifier to names snapshot.
    pub fn inventory(&self) -> Inventory {
        self.to_vec()
            .iter()
            .map(|member| (member.identifier(), member.names().to_vec()))
            .collect()
    }

    /// Overwrite a registered definition in place.
    ///
    /// The replacement must pass `check()` and carry the identifier of a
    /// registered member, and the owning schema must allow overrides. Handles
    /// already held for the member observe the new content.
    pub fn replace(&self, definition: D) -> SchemaResult<()> {
        let id = definition.identifier();
        let owner = self.owner.upgrade();
        if !owner
            .as_ref()
            .is_some_and(|schema| schema.options().allow_override)
        {
            return Err(SchemaError::OverrideDisallowed { kind: D::KIND, id });
        }
        definition.check()?;

        let existing = {
            let members = self.members.read();
            members
                .iter()
                .find(|member| member.matches_identifier(&id))
                .cloned()
        };
        let Some(existing) = existing else {
            return Err(SchemaError::IdentifierMismatch { kind: D::KIND, id });
        };
        if !existing.ptr_eq(&definition) {
            existing.replace_record(&definition);
        }
        if let Some(schema) = owner {
            schema.invalidate_renderings();
        }
        debug!("Replaced {} {}", D::KIND, id);
        Ok(())
    }

    pub(crate) fn clear_renderings(&self) {
        for member in self.members.read().iter() {
            member.update_common(|_| ());
        }
    }
}

impl<D: Definition> fmt::Debug for Collection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("kind", &D::KIND)
            .field("len", &self.len())
            .finish()
    }
}
