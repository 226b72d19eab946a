//! Object class definitions (RFC 4512 §4.1.1).
//!
//! Object classes form a multiple-inheritance graph through their `SUP`
//! clause. As with attribute types, super classes are stored as lookup keys,
//! and assignment refuses any super class whose own ancestry already
//! reaches the receiving class.

use log::{trace, warn};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use super::sealed::Common;
use super::{
    AttributeType, Definition, Reference, common_map, display_keys, keys_resolve, push_key,
    reference_key, reference_keys, resolve_all,
};
use crate::error::{SchemaError, SchemaResult};
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{DefinitionKind, Kind, ObjectClasses, Schema, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
    kind: Kind,
    super_classes: Vec<String>,
    must: Vec<String>,
    may: Vec<String>,
}

/// Handle to an object class definition.
#[derive(Clone, Debug, Default)]
pub struct ObjectClass(Arc<RwLock<Record>>);

impl_handle!(ObjectClass);

impl ObjectClass {
    pub fn kind(&self) -> Kind {
        self.0.read().kind
    }

    pub fn set_kind(&self, kind: Kind) -> &Self {
        self.update(|r| r.kind = kind);
        self
    }

    /// Direct super classes, in declaration order.
    pub fn super_classes(&self) -> Vec<ObjectClass> {
        let keys = self.0.read().super_classes.clone();
        resolve_all(self.schema().as_ref(), &keys)
    }

    /// Every class reachable through `SUP`, breadth first, without repeats.
    pub fn all_super_classes(&self) -> Vec<ObjectClass> {
        let mut seen = HashSet::new();
        seen.insert(self.identifier());
        let mut found = Vec::new();
        let mut pending = self.super_classes();
        while !pending.is_empty() {
            let mut next = Vec::new();
            for class in pending {
                if seen.insert(class.identifier()) {
                    next.extend(class.super_classes());
                    found.push(class);
                }
            }
            pending = next;
        }
        found
    }

    /// Append super classes. References that are unknown or would create a
    /// cycle are skipped.
    pub fn set_super_class<'a, R>(&self, classes: impl IntoIterator<Item = R>) -> &Self
    where
        R: Into<Reference<'a, ObjectClass>>,
    {
        for class in classes {
            if let Err(e) = self.try_add_super_class(class) {
                trace!("Ignored SUP on {}: {e}", self.identifier());
            }
        }
        self
    }

    /// Append super classes, all or nothing.
    pub fn try_set_super_class<'a, R>(
        &self,
        classes: impl IntoIterator<Item = R>,
    ) -> SchemaResult<&Self>
    where
        R: Into<Reference<'a, ObjectClass>>,
    {
        let schema = self.schema();
        let mut keys = Vec::new();
        for class in classes {
            let reference = class.into();
            let described = reference.describe();
            let sup = reference.resolve(schema.as_ref());
            if sup.is_zero() {
                return Err(SchemaError::unknown_reference(
                    Self::KIND,
                    self.identifier(),
                    "SUP",
                    described,
                ));
            }
            self.verify_super_class(&sup)?;
            push_key(&mut keys, sup.identifier());
        }
        self.update(|r| {
            for key in keys {
                push_key(&mut r.super_classes, key);
            }
        });
        Ok(self)
    }

    fn try_add_super_class<'a>(
        &self,
        class: impl Into<Reference<'a, ObjectClass>>,
    ) -> SchemaResult<&Self> {
        self.try_set_super_class([class.into()])
    }

    /// Check that `sup` can become a super class of this class.
    ///
    /// `sup` must have a numeric OID, must not be this class, and none of
    /// its ancestors may be this class.
    pub fn verify_super_class(&self, sup: &ObjectClass) -> SchemaResult<()> {
        if sup.numeric_oid().is_empty() {
            return Err(SchemaError::missing_identifier(Self::KIND));
        }
        let reaches_self = sup.ptr_eq(self)
            || self.matches_identifier(&sup.numeric_oid())
            || sup
                .all_super_classes()
                .iter()
                .any(|class| class.ptr_eq(self) || self.matches_identifier(&class.identifier()));
        if reaches_self {
            warn!(
                "Refused SUP {} on {}: cycle",
                sup.identifier(),
                self.identifier()
            );
            return Err(SchemaError::cycle(
                Self::KIND,
                self.identifier(),
                sup.identifier(),
            ));
        }
        Ok(())
    }

    /// Attribute types listed in `MUST`.
    pub fn must(&self) -> Vec<AttributeType> {
        let keys = self.0.read().must.clone();
        resolve_all(self.schema().as_ref(), &keys)
    }

    /// Attribute types listed in `MAY`.
    pub fn may(&self) -> Vec<AttributeType> {
        let keys = self.0.read().may.clone();
        resolve_all(self.schema().as_ref(), &keys)
    }

    pub fn set_must<'a, R>(&self, attributes: impl IntoIterator<Item = R>) -> &Self
    where
        R: Into<Reference<'a, AttributeType>>,
    {
        for attribute in attributes {
            if let Ok(key) = reference_key(self, "MUST", attribute.into()) {
                self.update(|r| push_key(&mut r.must, key));
            }
        }
        self
    }

    pub fn try_set_must<'a, R>(
        &self,
        attributes: impl IntoIterator<Item = R>,
    ) -> SchemaResult<&Self>
    where
        R: Into<Reference<'a, AttributeType>>,
    {
        let keys = reference_keys(self, "MUST", attributes)?;
        self.update(|r| keys.into_iter().for_each(|key| push_key(&mut r.must, key)));
        Ok(self)
    }

    pub fn set_may<'a, R>(&self, attributes: impl IntoIterator<Item = R>) -> &Self
    where
        R: Into<Reference<'a, AttributeType>>,
    {
        for attribute in attributes {
            if let Ok(key) = reference_key(self, "MAY", attribute.into()) {
                self.update(|r| push_key(&mut r.may, key));
            }
        }
        self
    }

    pub fn try_set_may<'a, R>(&self, attributes: impl IntoIterator<Item = R>) -> SchemaResult<&Self>
    where
        R: Into<Reference<'a, AttributeType>>,
    {
        let keys = reference_keys(self, "MAY", attributes)?;
        self.update(|r| keys.into_iter().for_each(|key| push_key(&mut r.may, key)));
        Ok(self)
    }

    /// Whether every `SUP`, `MUST` and `MAY` key resolves.
    pub(crate) fn references_resolve(&self) -> bool {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        keys_resolve::<ObjectClass>(schema, &record.super_classes)
            && keys_resolve::<AttributeType>(schema, &record.must)
            && keys_resolve::<AttributeType>(schema, &record.may)
    }
}

impl Definition for ObjectClass {
    const KIND: DefinitionKind = DefinitionKind::ObjectClass;

    fn collection(schema: &Schema) -> &ObjectClasses {
        schema.object_classes()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn check(&self) -> SchemaResult<()> {
        let common = self.snapshot().common;
        if common.oid.is_zero() {
            return Err(match common.macro_oid {
                Some(declared) => SchemaError::invalid_oid(declared),
                None => SchemaError::missing_identifier(Self::KIND),
            });
        }
        Ok(())
    }

    fn compliant(&self) -> bool {
        compliance::object_class(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        let mut map = DefinitionMap::new();
        common_map(&record.common, &mut map);
        map.insert("SUP", display_keys::<ObjectClass>(schema, &record.super_classes));
        map.insert_flag(record.kind.keyword(), true);
        map.insert("MUST", display_keys::<AttributeType>(schema, &record.must));
        map.insert("MAY", display_keys::<AttributeType>(schema, &record.may));
        map.insert_extensions(&record.common.extensions);
        map
    }

    fn render(&self, options: &RenderOptions) -> String {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        ClauseWriter::new(&record.common.identifier(), options)
            .names(&record.common.names)
            .description(&record.common.description)
            .flag("OBSOLETE", record.common.obsolete)
            .oids(
                "SUP",
                &display_keys::<ObjectClass>(schema, &record.super_classes),
            )
            .flag(record.kind.keyword(), true)
            .oids("MUST", &display_keys::<AttributeType>(schema, &record.must))
            .oids("MAY", &display_keys::<AttributeType>(schema, &record.may))
            .extensions(&record.common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
