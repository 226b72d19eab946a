//! Symbolic OID macros.
//!
//! Schema files in the OpenLDAP tradition abbreviate long arcs with named
//! prefixes (`objectIdentifier nisSchema 1.3.6.1.1.1`) and declare
//! definitions as `nisSchema.1.0`. The table maps each prefix to its numeric
//! OID; definitions carrying such a declaration are resolved against it once
//! their siblings are loaded.

use indexmap::IndexMap;
use log::debug;
use parking_lot::RwLock;

use crate::error::{SchemaError, SchemaResult};
use crate::oid::{NumericOid, is_descriptor};

/// Macro name to numeric OID table.
#[derive(Debug, Default)]
pub struct Macros {
    table: RwLock<IndexMap<String, NumericOid>>,
}

impl Macros {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a macro.
    ///
    /// The value may be numeric or itself use an already defined macro
    /// (`nisObjectClass nisSchema.2`).
    pub fn set(&self, name: &str, value: &str) -> SchemaResult<()> {
        if !is_descriptor(name) {
            return Err(SchemaError::invalid_oid(name));
        }
        let oid = match NumericOid::parse(value) {
            Ok(oid) => oid,
            Err(e) => self.resolve(value).ok_or(e)?,
        };
        debug!("Macro {name} = {oid}");
        let mut table = self.table.write();
        let key = table
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| name.to_string());
        table.insert(key, oid);
        Ok(())
    }

    /// Numeric OID of a macro name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NumericOid> {
        self.table
            .read()
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, oid)| oid.clone())
    }

    /// Resolve a declaration of the form `name`, `name.arcs` or `name:arcs`.
    #[must_use]
    pub fn resolve(&self, declared: &str) -> Option<NumericOid> {
        let (prefix, suffix) = match declared.find(['.', ':']) {
            Some(at) => (&declared[..at], &declared[at + 1..]),
            None => (declared, ""),
        };
        let base = self.get(prefix)?;
        base.join(suffix).ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}
