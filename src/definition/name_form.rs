//! Name form definitions (RFC 4512 §4.1.7.2).

use parking_lot::RwLock;
use std::sync::Arc;

use super::sealed::Common;
use super::{
    AttributeType, Definition, ObjectClass, Reference, common_map, display_key, display_keys,
    keys_resolve, push_key, reference_key, reference_keys, resolve, resolve_all,
};
use crate::error::{SchemaError, SchemaResult};
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{DefinitionKind, Kind, NameForms, Schema, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
    structural_class: String,
    must: Vec<String>,
    may: Vec<String>,
}

/// Handle to a name form: the RDN attributes permitted for entries of one
/// structural object class.
#[derive(Clone, Debug, Default)]
pub struct NameForm(Arc<RwLock<Record>>);

impl_handle!(NameForm);

impl NameForm {
    /// The structural class named by the `OC` clause.
    pub fn structural_class(&self) -> ObjectClass {
        let key = self.0.read().structural_class.clone();
        resolve(self.schema().as_ref(), &key)
    }

    pub fn set_structural_class<'a>(&self, class: impl Into<Reference<'a, ObjectClass>>) -> &Self {
        let _ = self.try_set_structural_class(class);
        self
    }

    /// Set the `OC` clause. The class must be STRUCTURAL.
    pub fn try_set_structural_class<'a>(
        &self,
        class: impl Into<Reference<'a, ObjectClass>>,
    ) -> SchemaResult<&Self> {
        let reference = class.into();
        let described = reference.describe();
        let class = reference.resolve(self.schema().as_ref());
        if class.is_zero() {
            return Err(SchemaError::unknown_reference(
                Self::KIND,
                self.identifier(),
                "OC",
                described,
            ));
        }
        if class.kind() != Kind::Structural {
            return Err(SchemaError::InvalidKind {
                kind: Self::KIND,
                id: self.identifier(),
                class: class.identifier(),
                expected: Kind::Structural.keyword(),
            });
        }
        let key = class.identifier();
        self.update(|r| r.structural_class = key);
        Ok(self)
    }

    /// Mandatory naming attributes.
    pub fn must(&self) -> Vec<AttributeType> {
        let keys = self.0.read().must.clone();
        resolve_all(self.schema().as_ref(), &keys)
    }

    /// Optional naming attributes.
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

    pub(crate) fn references_resolve(&self) -> bool {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        keys_resolve::<ObjectClass>(schema, std::slice::from_ref(&record.structural_class))
            && keys_resolve::<AttributeType>(schema, &record.must)
            && keys_resolve::<AttributeType>(schema, &record.may)
    }
}

impl Definition for NameForm {
    const KIND: DefinitionKind = DefinitionKind::NameForm;

    fn collection(schema: &Schema) -> &NameForms {
        schema.name_forms()
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
        let id = record.common.identifier();
        if record.structural_class.is_empty() {
            return Err(SchemaError::missing_clause(Self::KIND, id, "OC"));
        }
        if record.must.is_empty() {
            return Err(SchemaError::missing_clause(Self::KIND, id, "MUST"));
        }
        Ok(())
    }

    fn compliant(&self) -> bool {
        compliance::name_form(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        let mut map = DefinitionMap::new();
        common_map(&record.common, &mut map);
        map.insert(
            "OC",
            [display_key::<ObjectClass>(schema, &record.structural_class)],
        );
        map.insert("MUST", display_keys::<AttributeType>(schema, &record.must));
        map.insert("MAY", display_keys::<AttributeType>(schema, &record.may));
        map.insert_extensions(&record.common.extensions);
        map
    }

    fn render(&self, options: &RenderOptions) -> String {
        let record = self.snapshot();
        let schema = self.schema();
        let schema = schema.as_ref();
        let class = if record.structural_class.is_empty() {
            String::new()
        } else {
            display_key::<ObjectClass>(schema, &record.structural_class)
        };
        ClauseWriter::new(&record.common.identifier(), options)
            .names(&record.common.names)
            .description(&record.common.description)
            .flag("OBSOLETE", record.common.obsolete)
            .clause("OC", &class)
            .oids("MUST", &display_keys::<AttributeType>(schema, &record.must))
            .oids("MAY", &display_keys::<AttributeType>(schema, &record.may))
            .extensions(&record.common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
