//! The schema aggregate.
//!
//! A [`Schema`] owns one collection per definition kind plus the macro table
//! and options. It is a cheap handle: clones share the same collections, and
//! definitions keep a non-owning back-reference to it for resolving their
//! clause references.

use log::{debug, trace, warn};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

use super::collection::{
    AttributeTypes, Collection, DitContentRules, DitStructureRules, LdapSyntaxes,
    MatchingRuleUses, MatchingRules, NameForms, ObjectClasses,
};
use super::macros::Macros;
use super::types::{DefinitionKind, SchemaOptions};
use crate::definition::{
    AttributeType, Definition, DitContentRule, DitStructureRule, LdapSyntax, MatchingRule,
    MatchingRuleUse, NameForm, ObjectClass,
};
use crate::error::{SchemaError, SchemaResult};
use crate::parser::{self, Build};

/// Owner of all definitions of a subschema.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

pub(crate) struct SchemaInner {
    options: RwLock<SchemaOptions>,
    macros: Macros,
    ldap_syntaxes: LdapSyntaxes,
    matching_rules: MatchingRules,
    attribute_types: AttributeTypes,
    matching_rule_uses: MatchingRuleUses,
    object_classes: ObjectClasses,
    name_forms: NameForms,
    dit_content_rules: DitContentRules,
    dit_structure_rules: DitStructureRules,
}

/// Non-owning back-reference from a definition to its schema.
#[derive(Clone, Default)]
pub(crate) struct SchemaRef(Weak<SchemaInner>);

impl SchemaRef {
    pub(crate) fn upgrade(&self) -> Option<Schema> {
        self.0.upgrade().map(|inner| Schema { inner })
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.strong_count() > 0 {
            "bound"
        } else {
            "unbound"
        };
        write!(f, "SchemaRef({state})")
    }
}

impl Schema {
    /// Create an empty schema with default options.
    pub fn new() -> Self {
        Self::with_options(SchemaOptions::default())
    }

    /// Create an empty schema with the given options.
    pub fn with_options(options: SchemaOptions) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<SchemaInner>| {
            let owner = || SchemaRef(weak.clone());
            SchemaInner {
                options: RwLock::new(options),
                macros: Macros::new(),
                ldap_syntaxes: Collection::new(owner()),
                matching_rules: Collection::new(owner()),
                attribute_types: Collection::new(owner()),
                matching_rule_uses: Collection::new(owner()),
                object_classes: Collection::new(owner()),
                name_forms: Collection::new(owner()),
                dit_content_rules: Collection::new(owner()),
                dit_structure_rules: Collection::new(owner()),
            }
        });
        Self { inner }
    }

    pub fn options(&self) -> SchemaOptions {
        *self.inner.options.read()
    }

    /// Change options. Cached renderings are dropped when the layout changes.
    pub fn set_options(&self, options: SchemaOptions) {
        let previous = std::mem::replace(&mut *self.inner.options.write(), options);
        if previous.hanging_indent != options.hanging_indent {
            self.invalidate_renderings();
        }
    }

    pub fn macros(&self) -> &Macros {
        &self.inner.macros
    }

    /// Define an OID macro (`objectIdentifier` in OpenLDAP schema files).
    pub fn set_macro(&self, name: &str, value: &str) -> SchemaResult<()> {
        self.inner.macros.set(name, value)
    }

    /// Whether two handles refer to the same schema.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> SchemaRef {
        SchemaRef(Arc::downgrade(&self.inner))
    }

    pub fn ldap_syntaxes(&self) -> &LdapSyntaxes {
        &self.inner.ldap_syntaxes
    }

    pub fn matching_rules(&self) -> &MatchingRules {
        &self.inner.matching_rules
    }

    pub fn attribute_types(&self) -> &AttributeTypes {
        &self.inner.attribute_types
    }

    pub fn matching_rule_uses(&self) -> &MatchingRuleUses {
        &self.inner.matching_rule_uses
    }

    pub fn object_classes(&self) -> &ObjectClasses {
        &self.inner.object_classes
    }

    pub fn name_forms(&self) -> &NameForms {
        &self.inner.name_forms
    }

    pub fn dit_content_rules(&self) -> &DitContentRules {
        &self.inner.dit_content_rules
    }

    pub fn dit_structure_rules(&self) -> &DitStructureRules {
        &self.inner.dit_structure_rules
    }

    /// Number of registered definitions of a kind.
    pub fn count(&self, kind: DefinitionKind) -> usize {
        match kind {
            DefinitionKind::LdapSyntax => self.ldap_syntaxes().len(),
            DefinitionKind::MatchingRule => self.matching_rules().len(),
            DefinitionKind::AttributeType => self.attribute_types().len(),
            DefinitionKind::MatchingRuleUse => self.matching_rule_uses().len(),
            DefinitionKind::ObjectClass => self.object_classes().len(),
            DefinitionKind::NameForm => self.name_forms().len(),
            DefinitionKind::DitContentRule => self.dit_content_rules().len(),
            DefinitionKind::DitStructureRule => self.dit_structure_rules().len(),
        }
    }

    pub fn new_ldap_syntax(&self) -> LdapSyntax {
        LdapSyntax::new_in(self)
    }

    pub fn new_matching_rule(&self) -> MatchingRule {
        MatchingRule::new_in(self)
    }

    pub fn new_attribute_type(&self) -> AttributeType {
        AttributeType::new_in(self)
    }

    pub fn new_object_class(&self) -> ObjectClass {
        ObjectClass::new_in(self)
    }

    pub fn new_name_form(&self) -> NameForm {
        NameForm::new_in(self)
    }

    pub fn new_dit_content_rule(&self) -> DitContentRule {
        DitContentRule::new_in(self)
    }

    pub fn new_dit_structure_rule(&self) -> DitStructureRule {
        DitStructureRule::new_in(self)
    }

    /// Register a definition built through the fluent API.
    ///
    /// Binds it to this schema if unbound, resolves a declared macro OID and
    /// pushes it into the collection for its kind, which runs the structural
    /// check and the uniqueness policy. Attribute types additionally feed the
    /// derived matching rule uses.
    pub fn register<D: Definition>(&self, definition: D) -> SchemaResult<D> {
        if definition.schema().is_none() {
            definition.set_schema(self);
        }
        self.resolve_by_macro(&definition);
        D::collection(self).push(definition.clone())?;
        if D::KIND == DefinitionKind::AttributeType {
            let at = self.attribute_types().get(&definition.identifier());
            self.apply_matching_rule_uses(&at);
        }
        Ok(definition)
    }

    /// Build a parsed description against this schema and register it.
    pub fn register_description<B: Build>(&self, description: B) -> SchemaResult<B::Output> {
        let definition = description.build(self)?;
        self.register(definition)
    }

    /// Substitute a declared macro OID with its numeric form.
    ///
    /// Returns whether the definition has a numeric OID afterwards.
    pub fn resolve_by_macro<D: Definition>(&self, definition: &D) -> bool {
        if !definition.numeric_oid().is_empty() {
            return true;
        }
        let Some(declared) = definition.macro_oid() else {
            return false;
        };
        match self.inner.macros.resolve(&declared) {
            Some(oid) => {
                trace!("Resolved macro {declared} to {oid}");
                definition.update_common(|c| {
                    c.oid = oid;
                    c.macro_oid = None;
                });
                true
            }
            None => {
                warn!("Unresolved macro OID '{declared}' on {}", D::KIND);
                false
            }
        }
    }

    /// Rebuild the derived matching rule uses from every attribute type.
    pub fn update_matching_rule_uses(&self) {
        for at in self.attribute_types().to_vec() {
            self.apply_matching_rule_uses(&at);
        }
    }

    /// Add an attribute type to the uses of its effective matching rules.
    fn apply_matching_rule_uses(&self, at: &AttributeType) {
        for rule in [at.equality(), at.substring(), at.ordering()] {
            let id = rule.numeric_oid();
            if id.is_empty() {
                continue;
            }
            let mut mru = self.matching_rule_uses().get(&id);
            if mru.is_zero() {
                mru = MatchingRuleUse::from_matching_rule(&rule);
                if let Err(e) = self.matching_rule_uses().push(mru.clone()) {
                    warn!("Could not derive matching rule use {id}: {e}");
                    continue;
                }
            }
            mru.add_applies(at);
            trace!("Matching rule use {id} applies to {}", at.identifier());
        }
    }

    pub fn parse_ldap_syntax(&self, input: &str) -> SchemaResult<LdapSyntax> {
        self.register_description(parser::parse_ldap_syntax(input)?)
    }

    pub fn parse_matching_rule(&self, input: &str) -> SchemaResult<MatchingRule> {
        self.register_description(parser::parse_matching_rule(input)?)
    }

    pub fn parse_attribute_type(&self, input: &str) -> SchemaResult<AttributeType> {
        self.register_description(parser::parse_attribute_type(input)?)
    }

    /// Always fails: matching rule uses are derived from attribute types.
    pub fn parse_matching_rule_use(&self, _input: &str) -> SchemaResult<MatchingRuleUse> {
        Err(SchemaError::unsupported(
            "matching rule uses are derived, not parsed",
        ))
    }

    pub fn parse_object_class(&self, input: &str) -> SchemaResult<ObjectClass> {
        self.register_description(parser::parse_object_class(input)?)
    }

    pub fn parse_name_form(&self, input: &str) -> SchemaResult<NameForm> {
        self.register_description(parser::parse_name_form(input)?)
    }

    pub fn parse_dit_content_rule(&self, input: &str) -> SchemaResult<DitContentRule> {
        self.register_description(parser::parse_dit_content_rule(input)?)
    }

    pub fn parse_dit_structure_rule(&self, input: &str) -> SchemaResult<DitStructureRule> {
        self.register_description(parser::parse_dit_structure_rule(input)?)
    }

    /// Bulk-load a catalog of definitions of one kind, in order.
    ///
    /// Stops at the first failure; definitions loaded before it stay
    /// registered. Returns the number of definitions loaded.
    pub fn load<S: AsRef<str>>(
        &self,
        kind: DefinitionKind,
        definitions: impl IntoIterator<Item = S>,
    ) -> SchemaResult<usize> {
        let mut loaded = 0;
        for text in definitions {
            let text = text.as_ref();
            match kind {
                DefinitionKind::LdapSyntax => self.parse_ldap_syntax(text).map(drop),
                DefinitionKind::MatchingRule => self.parse_matching_rule(text).map(drop),
                DefinitionKind::AttributeType => self.parse_attribute_type(text).map(drop),
                DefinitionKind::MatchingRuleUse => self.parse_matching_rule_use(text).map(drop),
                DefinitionKind::ObjectClass => self.parse_object_class(text).map(drop),
                DefinitionKind::NameForm => self.parse_name_form(text).map(drop),
                DefinitionKind::DitContentRule => self.parse_dit_content_rule(text).map(drop),
                DefinitionKind::DitStructureRule => self.parse_dit_structure_rule(text).map(drop),
            }?;
            loaded += 1;
        }
        debug!("Loaded {loaded} {kind} definitions");
        Ok(loaded)
    }

    /// Drop every cached rendering, e.g. after a referenced name changed.
    pub(crate) fn invalidate_renderings(&self) {
        self.ldap_syntaxes().clear_renderings();
        self.matching_rules().clear_renderings();
        self.attribute_types().clear_renderings();
        self.matching_rule_uses().clear_renderings();
        self.object_classes().clear_renderings();
        self.name_forms().clear_renderings();
        self.dit_content_rules().clear_renderings();
        self.dit_structure_rules().clear_renderings();
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Schema");
        debug.field("options", &self.options());
        for kind in DefinitionKind::ALL {
            debug.field(kind.attribute_name(), &self.count(kind));
        }
        debug.finish()
    }
}
