//! LDAP syntax definitions (RFC 4512 §4.1.5).

use parking_lot::RwLock;
use std::sync::Arc;

use super::sealed::Common;
use super::{Definition, common_map};
use crate::error::{SchemaError, SchemaResult};
use crate::render::{ClauseWriter, DefinitionMap, RenderOptions};
use crate::schema::{DefinitionKind, LdapSyntaxes, Schema, compliance};

#[derive(Clone, Debug, Default, PartialEq)]
struct Record {
    common: Common,
}

/// Handle to an LDAP syntax definition.
///
/// Syntaxes carry neither names nor an obsolete flag; the corresponding
/// setters are no-ops.
#[derive(Clone, Debug, Default)]
pub struct LdapSyntax(Arc<RwLock<Record>>);

impl_handle!(LdapSyntax);

impl Definition for LdapSyntax {
    const KIND: DefinitionKind = DefinitionKind::LdapSyntax;
    const HAS_NAME: bool = false;
    const HAS_OBSOLETE: bool = false;

    fn collection(schema: &Schema) -> &LdapSyntaxes {
        schema.ldap_syntaxes()
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
        compliance::ldap_syntax(self)
    }

    fn map(&self) -> DefinitionMap {
        let record = self.snapshot();
        let mut map = DefinitionMap::new();
        common_map(&record.common, &mut map);
        map.insert_extensions(&record.common.extensions);
        map
    }

    fn render(&self, options: &RenderOptions) -> String {
        let common = self.snapshot().common;
        ClauseWriter::new(&common.identifier(), options)
            .description(&common.description)
            .extensions(&common.extensions)
            .finish()
    }

    fn replace_record(&self, other: &Self) {
        self.overwrite(other);
    }
}
