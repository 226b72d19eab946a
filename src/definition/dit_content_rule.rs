//! DIT content rule definitions (RFC 4512 §4.1.6).
//!
//! A content rule shares its numeric OID with the structural object class it
//! governs. It names the auxiliary classes entries of that class may carry
//! and adjusts the attributes they must, may or may not contain.

use parking_lot::RwLock;
use std::sync::Arc;

use super::sealed::Common;
use super::{
    AttributeType, Definition, ObjectClass, Reference, common_map, display_keys, keys_resolve,
    push_key, reference_key, reference_keys, resolve, resolve_all,
};
use crate::error::{SchemaError, SchemaResult};
use crate::oid::NumericOid;
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{DefinitionKind, DitContentRules, Kind, Schema, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
    aux: Vec<String>,
    must: Vec<String>,
    may: Vec<String>,
    not: Vec<String>,
}

/// Handle to a DIT content rule.
#[derive(Clone, Debug, Default)]
pub struct DitContentRule(Arc<RwLock<Record>>);

impl_handle!(DitContentRule);

/// Fluent and strict setters for one attribute list clause.
macro_rules! attribute_clause {
    ($field:ident, $clause:literal, $getter:ident, $set:ident, $try_set:ident) => {
        pub fn $getter(&self) -> Vec<AttributeType> {
            let keys = self.0.read().$field.clone();
            resolve_all(self.schema().as_ref(), &keys)
        }

        pub fn $set<'a, R>(&self, attributes: impl IntoIterator<Item = R>) -> &Self
        where
            R: Into<Reference<'a, AttributeType>>,
        {
            for attribute in attributes {
                if let Ok(key) = reference_key(self, $clause, attribute.into()) {
                    self.update(|r| push_key(&mut r.$field, key));
                }
            }
            self
        }

        pub fn $try_set<'a, R>(
            &self,
            attributes: impl IntoIterator<Item = R>,
        ) -> SchemaResult<&Self>
        where
            R: Into<Reference<'a, AttributeType>>,
        {
            let keys = reference_keys(self, $clause, attributes)?;
            self.update(|r| keys.into_iter().for_each(|key| push_key(&mut r.$field, key)));
            Ok(self)
        }
    };
}

impl DitContentRule {
    /// The structural class sharing this rule's OID.
    pub fn structural_class(&self) -> ObjectClass {
        resolve(self.schema().as_ref(), &self.numeric_oid())
    }

    pub fn set_structural_class<'a>(&self, class: impl Into<Reference<'a, ObjectClass>>) -> &Self {
        let _ = self.try_set_structural_class(class);
        self
    }

    /// Bind the rule to a STRUCTURAL class by adopting its numeric OID.
    ///
    /// Fails with `OidConflict` when the rule already has a different OID.
    pub fn try_set_structural_class<'a>(
        &self,
        class: impl Into<Reference<'a, ObjectClass>>,
    ) -> SchemaResult<&Self> {
        let reference = class.into();
        let described = reference.describe();
        let class = reference.resolve(self.schema().as_ref());
        let oid = class.numeric_oid();
        if class.is_zero() || oid.is_empty() {
            return Err(SchemaError::unknown_reference(
                Self::KIND,
                self.identifier(),
                "OID",
                described,
            ));
        }
        if class.kind() != Kind::Structural {
            return Err(SchemaError::InvalidKind {
                kind: Self::KIND,
                id: self.identifier(),
                class: oid,
                expected: Kind::Structural.keyword(),
            });
        }
        let parsed = NumericOid::parse(&oid)?;
        let current = self.0.read().common.oid.clone();
        if current == parsed {
            return Ok(self);
        }
        if !current.is_zero() {
            return Err(SchemaError::OidConflict {
                kind: Self::KIND,
                id: self.identifier(),
                oid,
            });
        }
        self.update(|r| {
            r.common.oid = parsed;
            r.common.macro_oid = None;
        });
        Ok(self)
    }

    /// Auxiliary classes permitted for entries of the structural class.
    pub fn aux(&self) -> Vec<ObjectClass> {
        let keys = self.0.read().aux.clone();
        resolve_all(self.schema().as_ref(), &keys)
    }

    pub fn set_aux<'a, R>(&self, classes: impl IntoIterator<Item = R>) -> &Self
    where
        R: Into<Reference<'a, ObjectClass>>,
    {
        for class in classes {
            let _ = self.try_set_aux([class.into()]);
        }
        self
    }

    /// Append auxiliary classes, all or nothing. Each must be AUXILIARY.
    pub fn try_set_aux<'a, R>(&self, classes: impl IntoIterator<Item = R>) -> SchemaResult<&Self>
    where
        R: Into<Reference<'a, ObjectClass>>,
    {
        let keys = reference_keys(self, "AUX", classes)?;
        let schema = self.schema();
        for key in &keys {
            let class: ObjectClass = resolve(schema.as_ref(), key);
            if class.kind() != Kind::Auxiliary {
                return Err(SchemaError::InvalidKind {
                    kind: Self::KIND,
                    id: self.identifier(),
                    class: key.clone(),
                    expected: Kind::Auxiliary.keyword(),
                });
            }
        }
        self.update(|r| keys.into_iter().for_each(|key| push_key(&mut r.aux, key)));
        Ok(self)
    }

    attribute_clause!(must, "MUST", must, set_must, try_set_must);
    attribute_clause!(may, "MAY", may, set_may, try_set_may);
    attribute_clause!(not, "NOT", not, set_not, try_set_not);

    pub(crate) fn references_resolve(&self) -> bool {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        keys_resolve::<ObjectClass>(schema, &record.aux)
            && keys_resolve::<AttributeType>(schema, &record.must)
            && keys_resolve::<AttributeType>(schema, &record.may)
            && keys_resolve::<AttributeType>(schema, &record.not)
    }
}

impl Definition for DitContentRule {
    const KIND: DefinitionKind = DefinitionKind::DitContentRule;

    fn collection(schema: &Schema) -> &DitContentRules {
        schema.dit_content_rules()
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
        compliance::dit_content_rule(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        let mut map = DefinitionMap::new();
        common_map(&record.common, &mut map);
        map.insert("AUX", display_keys::<ObjectClass>(schema, &record.aux));
        map.insert("MUST", display_keys::<AttributeType>(schema, &record.must));
        map.insert("MAY", display_keys::<AttributeType>(schema, &record.may));
        map.insert("NOT", display_keys::<AttributeType>(schema, &record.not));
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
            .oids("AUX", &display_keys::<ObjectClass>(schema, &record.aux))
            .oids("MUST", &display_keys::<AttributeType>(schema, &record.must))
            .oids("MAY", &display_keys::<AttributeType>(schema, &record.may))
            .oids("NOT", &display_keys::<AttributeType>(schema, &record.not))
            .extensions(&record.common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
