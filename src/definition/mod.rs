//! Schema definition kinds.
//!
//! Every kind is a cheaply cloneable handle around a lock-guarded record.
//! Clones share the record, so a handle obtained from a collection lookup
//! observes later in-place replacement. Definitions refer to each other by
//! lookup key (the target's numeric OID or rule ID) and resolve those keys
//! against their owning [`Schema`] when asked; they never own one another.
//!
//! # Key Types
//!
//! - [`Definition`] - capabilities shared by all eight kinds
//! - [`Reference`] - an identifier or a definition handle passed to setters

/// Shared plumbing of a definition handle around `Arc<RwLock<Record>>`.
macro_rules! impl_handle {
    ($handle:ident) => {
        impl $crate::definition::sealed::Record for $handle {
            fn read_common<T>(&self, f: impl FnOnce(&Common) -> T) -> T {
                f(&self.0.read().common)
            }

            fn write_common<T>(&self, f: impl FnOnce(&mut Common) -> T) -> T {
                f(&mut self.0.write().common)
            }
        }

        impl $handle {
            fn snapshot(&self) -> Record {
                self.0.read().clone()
            }

            fn update<T>(&self, f: impl FnOnce(&mut Record) -> T) -> T {
                let mut record = self.0.write();
                record.common.rendered = None;
                f(&mut record)
            }

            fn overwrite(&self, other: &Self) {
                let replacement = other.snapshot();
                let mut record = self.0.write();
                let schema = record.common.schema.clone();
                *record = replacement;
                record.common.schema = schema;
                record.common.rendered = None;
            }
        }

        impl ::std::fmt::Display for $handle {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                $crate::definition::display_cached(self, f)
            }
        }

        impl PartialEq for $handle {
            fn eq(&self, other: &Self) -> bool {
                ::std::sync::Arc::ptr_eq(&self.0, &other.0) || self.snapshot() == other.snapshot()
            }
        }
    };
}

pub mod attribute_type;
pub mod dit_content_rule;
pub mod dit_structure_rule;
pub mod ldap_syntax;
pub mod matching_rule;
pub mod matching_rule_use;
pub mod name_form;
pub mod object_class;

pub use attribute_type::AttributeType;
pub use dit_content_rule::DitContentRule;
pub use dit_structure_rule::DitStructureRule;
pub use ldap_syntax::LdapSyntax;
pub use matching_rule::MatchingRule;
pub use matching_rule_use::MatchingRuleUse;
pub use name_form::NameForm;
pub use object_class::ObjectClass;

use std::collections::HashSet;
use std::fmt;

use crate::error::{SchemaError, SchemaResult};
use crate::extensions::Extensions;
use crate::name::Name;
use crate::oid::{NumericOid, oid_eq};
use crate::render::{DefinitionMap, RenderOptions};
use crate::schema::{Collection, DefinitionKind, Schema};

pub(crate) use sealed::Common;

pub(crate) mod sealed {
    use crate::extensions::Extensions;
    use crate::name::Name;
    use crate::oid::NumericOid;
    use crate::render::RenderOptions;
    use crate::schema::SchemaRef;

    /// Fields every definition kind carries.
    #[derive(Clone, Debug, Default)]
    pub struct Common {
        pub(crate) oid: NumericOid,
        /// Declared OID awaiting macro resolution (`nisSchema.1.0`)
        pub(crate) macro_oid: Option<String>,
        pub(crate) names: Name,
        pub(crate) description: String,
        pub(crate) obsolete: bool,
        pub(crate) extensions: Extensions,
        pub(crate) schema: SchemaRef,
        pub(crate) rendered: Option<(RenderOptions, String)>,
    }

    // The schema back-reference and the rendering cache are not part of a
    // definition's value.
    impl PartialEq for Common {
        fn eq(&self, other: &Self) -> bool {
            self.oid == other.oid
                && self.macro_oid == other.macro_oid
                && self.names == other.names
                && self.description == other.description
                && self.obsolete == other.obsolete
                && self.extensions == other.extensions
        }
    }

    impl Common {
        /// Lookup key: numeric OID, else macro, else first name.
        pub(crate) fn identifier(&self) -> String {
            if !self.oid.is_zero() {
                return self.oid.to_string();
            }
            if let Some(declared) = &self.macro_oid {
                return declared.clone();
            }
            self.names.first().unwrap_or_default().to_string()
        }

        /// Numeric OID text, empty while unset.
        pub(crate) fn numeric_oid(&self) -> String {
            if self.oid.is_zero() {
                String::new()
            } else {
                self.oid.to_string()
            }
        }
    }

    /// Access to the shared record header of a definition handle.
    pub trait Record {
        fn read_common<T>(&self, f: impl FnOnce(&Common) -> T) -> T;

        /// Raw write access; does not invalidate the rendering cache.
        fn write_common<T>(&self, f: impl FnOnce(&mut Common) -> T) -> T;

        /// Mutate the header and drop the cached rendering.
        fn update_common<T>(&self, f: impl FnOnce(&mut Common) -> T) -> T {
            self.write_common(|c| {
                c.rendered = None;
                f(c)
            })
        }
    }
}

/// Capabilities shared by all schema definition kinds.
///
/// Setters follow the builder convention of the RFC tooling this crate
/// models: they return `&Self` for chaining and silently ignore input they
/// cannot apply. Verify state through accessors, or use the `try_*`
/// variants on the concrete kinds when an error is wanted.
pub trait Definition:
    sealed::Record + Clone + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Kind tag of this definition type.
    const KIND: DefinitionKind;

    /// Whether the kind carries a `NAME` clause.
    const HAS_NAME: bool = true;

    /// Whether the kind carries an `OBSOLETE` flag.
    const HAS_OBSOLETE: bool = true;

    /// The collection holding this kind in a schema.
    fn collection(schema: &Schema) -> &Collection<Self>;

    /// Whether two handles refer to the same record.
    fn ptr_eq(&self, other: &Self) -> bool;

    /// Structural well-formedness check run before registration.
    fn check(&self) -> SchemaResult<()>;

    /// Whether the definition's clauses are consistent with its schema.
    fn compliant(&self) -> bool;

    /// Clause name to values export.
    fn map(&self) -> DefinitionMap;

    /// Render RFC 4512 description text with explicit layout options.
    fn render(&self, options: &RenderOptions) -> String;

    /// Overwrite this record with another's content, keeping the schema link.
    fn replace_record(&self, other: &Self);

    /// Create a zero-valued definition bound to a schema.
    fn new_in(schema: &Schema) -> Self {
        let definition = Self::default();
        definition.set_schema(schema);
        definition
    }

    /// Identifying key: numeric OID (or rule ID for structure rules).
    fn identifier(&self) -> String {
        self.read_common(Common::identifier)
    }

    /// Whether nothing identifying has been set yet.
    fn is_zero(&self) -> bool {
        self.read_common(|c| c.oid.is_zero() && c.macro_oid.is_none() && c.names.is_empty())
    }

    /// Numeric OID as a string, empty while unset.
    fn numeric_oid(&self) -> String {
        self.read_common(Common::numeric_oid)
    }

    /// Declared macro OID still awaiting resolution.
    fn macro_oid(&self) -> Option<String> {
        self.read_common(|c| c.macro_oid.clone())
    }

    fn names(&self) -> Name {
        self.read_common(|c| c.names.clone())
    }

    /// First name, empty when the definition has none.
    fn name(&self) -> String {
        self.read_common(|c| c.names.first().unwrap_or_default().to_string())
    }

    fn description(&self) -> String {
        self.read_common(|c| c.description.clone())
    }

    fn is_obsolete(&self) -> bool {
        self.read_common(|c| c.obsolete)
    }

    fn extensions(&self) -> Extensions {
        self.read_common(|c| c.extensions.clone())
    }

    /// Owning schema, if it is still alive.
    fn schema(&self) -> Option<Schema> {
        self.read_common(|c| c.schema.upgrade())
    }

    /// Bind the definition to a schema for reference resolution.
    fn set_schema(&self, schema: &Schema) -> &Self {
        self.write_common(|c| {
            c.schema = schema.downgrade();
            c.rendered = None;
        });
        self
    }

    /// Set the numeric OID. Ignored if malformed or already set.
    fn set_numeric_oid(&self, oid: &str) -> &Self {
        if let Ok(parsed) = NumericOid::parse(oid) {
            self.update_common(|c| {
                if c.oid.is_zero() {
                    c.oid = parsed;
                    c.macro_oid = None;
                }
            });
        }
        self
    }

    /// Declare a macro OID (`prefix` or `prefix.arcs`) to resolve later.
    ///
    /// Ignored when a numeric OID is already set.
    fn set_macro_oid(&self, declared: &str) -> &Self {
        if !declared.is_empty() {
            self.update_common(|c| {
                if c.oid.is_zero() {
                    c.macro_oid = Some(declared.to_string());
                }
            });
        }
        self
    }

    /// Append descriptors to the `NAME` clause.
    fn set_name<S: AsRef<str>>(&self, names: impl IntoIterator<Item = S>) -> &Self {
        if Self::HAS_NAME {
            self.update_common(|c| c.names.push(names));
        }
        self
    }

    fn set_description(&self, description: &str) -> &Self {
        self.update_common(|c| c.description = description.to_string());
        self
    }

    /// Mark obsolete. There is no way back.
    fn set_obsolete(&self) -> &Self {
        if Self::HAS_OBSOLETE {
            self.update_common(|c| c.obsolete = true);
        }
        self
    }

    /// Set an `X-` extension. Ignored for malformed labels or no values.
    fn set_extension<S: Into<String>>(
        &self,
        label: &str,
        values: impl IntoIterator<Item = S>,
    ) -> &Self {
        self.update_common(|c| {
            c.extensions.set(label, values);
        });
        self
    }

    /// Whether `id` matches the identifying OID (or rule ID).
    fn matches_identifier(&self, id: &str) -> bool {
        self.read_common(|c| {
            if c.oid.is_zero() {
                c.macro_oid
                    .as_deref()
                    .is_some_and(|declared| declared.eq_ignore_ascii_case(id))
            } else {
                oid_eq(&c.oid.to_string(), id)
            }
        })
    }

    /// Whether `id` is one of the definition's names.
    fn matches_name(&self, id: &str) -> bool {
        self.read_common(|c| c.names.contains(id))
    }
}

/// Either an identifier to resolve or a definition handle.
///
/// Setters accepting `impl Into<Reference<'_, D>>` take `&str`, `&String`
/// or `&D` alike.
#[derive(Debug)]
pub enum Reference<'a, D> {
    /// Numeric OID, descriptor or rule ID resolved against the schema
    Id(&'a str),
    /// A literal definition
    Definition(&'a D),
}

impl<'a, D: Definition> Reference<'a, D> {
    /// Resolve to a definition; a miss yields the zero value.
    pub(crate) fn resolve(self, schema: Option<&Schema>) -> D {
        match self {
            Self::Id(id) => resolve(schema, id),
            Self::Definition(definition) => definition.clone(),
        }
    }

    /// Text naming the reference, for diagnostics.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Id(id) => (*id).to_string(),
            Self::Definition(definition) => definition.identifier(),
        }
    }
}

impl<'a, D> From<&'a str> for Reference<'a, D> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

impl<'a, D> From<&'a String> for Reference<'a, D> {
    fn from(id: &'a String) -> Self {
        Self::Id(id.as_str())
    }
}

macro_rules! impl_reference_from {
    ($($kind:ty),* $(,)?) => {
        $(
            impl<'a> From<&'a $kind> for Reference<'a, $kind> {
                fn from(definition: &'a $kind) -> Self {
                    Self::Definition(definition)
                }
            }
        )*
    };
}

impl_reference_from!(
    AttributeType,
    ObjectClass,
    LdapSyntax,
    MatchingRule,
    MatchingRuleUse,
    NameForm,
    DitContentRule,
    DitStructureRule,
);

/// Resolve a clause reference of `owner` to the lookup key to store.
pub(crate) fn reference_key<O: Definition, D: Definition>(
    owner: &O,
    clause: &'static str,
    reference: Reference<'_, D>,
) -> SchemaResult<String> {
    let described = reference.describe();
    let target = reference.resolve(owner.schema().as_ref());
    if target.is_zero() {
        return Err(SchemaError::unknown_reference(
            O::KIND,
            owner.identifier(),
            clause,
            described,
        ));
    }
    Ok(target.identifier())
}

/// Resolve a list of clause references, failing on the first unknown one.
pub(crate) fn reference_keys<'a, O, D, R, I>(
    owner: &O,
    clause: &'static str,
    references: I,
) -> SchemaResult<Vec<String>>
where
    O: Definition,
    D: Definition + 'a,
    R: Into<Reference<'a, D>>,
    I: IntoIterator<Item = R>,
{
    let mut keys = Vec::new();
    for reference in references {
        push_key(&mut keys, reference_key(owner, clause, reference.into())?);
    }
    Ok(keys)
}

/// Look up a key in the schema's collection for `D`.
pub(crate) fn resolve<D: Definition>(schema: Option<&Schema>, key: &str) -> D {
    match schema {
        Some(schema) if !key.is_empty() => D::collection(schema).get(key),
        _ => D::default(),
    }
}

/// Resolve every key, dropping the ones that do not resolve.
pub(crate) fn resolve_all<D: Definition>(schema: Option<&Schema>, keys: &[String]) -> Vec<D> {
    keys.iter()
        .map(|key| resolve::<D>(schema, key))
        .filter(|definition| !definition.is_zero())
        .collect()
}

/// Whether every non-empty key resolves in the schema.
pub(crate) fn keys_resolve<D: Definition>(schema: Option<&Schema>, keys: &[String]) -> bool {
    keys.iter()
        .filter(|key| !key.is_empty())
        .all(|key| !resolve::<D>(schema, key).is_zero())
}

/// Preferred display text for a reference: the target's first name, else the key.
pub(crate) fn display_key<D: Definition>(schema: Option<&Schema>, key: &str) -> String {
    let target = resolve::<D>(schema, key);
    let name = target.name();
    if name.is_empty() { key.to_string() } else { name }
}

pub(crate) fn display_keys<D: Definition>(schema: Option<&Schema>, keys: &[String]) -> Vec<String> {
    keys.iter().map(|key| display_key::<D>(schema, key)).collect()
}

/// Append a reference key, keeping the list free of duplicates.
pub(crate) fn push_key(keys: &mut Vec<String>, key: String) {
    if !key.is_empty() && !keys.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
        keys.push(key);
    }
}

/// Identifiers of a set of definitions, for membership tests.
pub(crate) fn identifier_set<D: Definition>(definitions: &[D]) -> HashSet<String> {
    definitions.iter().map(Definition::identifier).collect()
}

/// `Display` through the per-definition cache, using the schema's layout.
pub(crate) fn display_cached<D: Definition>(
    definition: &D,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let options = definition
        .schema()
        .map(|schema| schema.options().render_options())
        .unwrap_or_default();
    let cached = definition.read_common(|c| {
        c.rendered
            .as_ref()
            .filter(|(rendered_with, _)| *rendered_with == options)
            .map(|(_, text)| text.clone())
    });
    if let Some(text) = cached {
        return f.write_str(&text);
    }
    let text = definition.render(&options);
    definition.write_common(|c| c.rendered = Some((options, text.clone())));
    f.write_str(&text)
}

/// Map entries shared by every kind with a numeric OID.
pub(crate) fn common_map(common: &Common, map: &mut DefinitionMap) {
    map.insert("NUMERICOID", [common.numeric_oid()]);
    map.insert("NAME", common.names.to_vec());
    map.insert("DESC", [common.description.clone()]);
    map.insert_flag("OBSOLETE", common.obsolete);
}
