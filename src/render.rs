//! Textual rendering and map export.
//!
//! Definitions render back to RFC 4512 description syntax. Layout is chosen
//! per call through [`RenderOptions`]; the schema supplies a default.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::extensions::Extensions;
use crate::name::Name;

/// Layout options for rendering definitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Put every clause on its own line, indented by four spaces
    #[serde(default)]
    pub hanging_indent: bool,
}

impl RenderOptions {
    /// Options producing one clause per line.
    #[must_use]
    pub const fn hanging() -> Self {
        Self {
            hanging_indent: true,
        }
    }

    fn separator(&self) -> &'static str {
        if self.hanging_indent { "\n    " } else { " " }
    }
}

/// Clause name to values, in rendering order.
///
/// Produced by `Definition::map` for serialization without the textual
/// renderer. Empty entries are never present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionMap(IndexMap<String, Vec<String>>);

impl DefinitionMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clause, pruning it when empty or led by an empty value.
    pub fn insert<S: Into<String>>(&mut self, key: &str, values: impl IntoIterator<Item = S>) {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.first().is_none_or(String::is_empty) {
            return;
        }
        self.0.insert(key.to_string(), values);
    }

    /// Insert a boolean clause as `TRUE` when set.
    pub fn insert_flag(&mut self, key: &str, set: bool) {
        if set {
            self.insert(key, ["TRUE"]);
        }
    }

    /// Insert every extension under its own label.
    pub fn insert_extensions(&mut self, extensions: &Extensions) {
        for (label, values) in extensions.iter() {
            self.insert(label, values.iter().cloned());
        }
    }

    /// JSON object of clause name to value array.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(key, values)| (key.clone(), serde_json::Value::from(values.clone())))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Quote a `qdstring`, escaping `'` and `\` as RFC 4512 §4.1 requires.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\27"),
            '\\' => out.push_str("\\5C"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Incremental writer for a parenthesized description.
pub(crate) struct ClauseWriter {
    out: String,
    separator: &'static str,
}

impl ClauseWriter {
    pub(crate) fn new(identifier: &str, options: &RenderOptions) -> Self {
        let mut out = String::with_capacity(64);
        out.push_str("( ");
        out.push_str(identifier);
        Self {
            out,
            separator: options.separator(),
        }
    }

    /// `KEYWORD value`, skipped when the value is empty.
    pub(crate) fn clause(&mut self, keyword: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.out.push_str(self.separator);
            self.out.push_str(keyword);
            self.out.push(' ');
            self.out.push_str(value);
        }
        self
    }

    /// Bare keyword, emitted only when set.
    pub(crate) fn flag(&mut self, keyword: &str, set: bool) -> &mut Self {
        if set {
            self.out.push_str(self.separator);
            self.out.push_str(keyword);
        }
        self
    }

    pub(crate) fn names(&mut self, names: &Name) -> &mut Self {
        let rendered = names.to_string();
        self.clause("NAME", &rendered)
    }

    pub(crate) fn description(&mut self, description: &str) -> &mut Self {
        if description.is_empty() {
            return self;
        }
        let quoted = quote(description);
        self.clause("DESC", &quoted)
    }

    /// `oids` form: a single value bare, several as `( a $ b )`.
    pub(crate) fn oids(&mut self, keyword: &str, values: &[String]) -> &mut Self {
        let rendered = match values {
            [] => return self,
            [single] => single.clone(),
            many => format!("( {} )", many.join(" $ ")),
        };
        self.clause(keyword, &rendered)
    }

    /// Space-separated list, as used for `ruleids`.
    pub(crate) fn list(&mut self, keyword: &str, values: &[String]) -> &mut Self {
        let rendered = match values {
            [] => return self,
            [single] => single.clone(),
            many => format!("( {} )", many.join(" ")),
        };
        self.clause(keyword, &rendered)
    }

    pub(crate) fn extensions(&mut self, extensions: &Extensions) -> &mut Self {
        for (label, values) in extensions.iter() {
            let rendered = match values {
                [single] => quote(single),
                many => {
                    let quoted: Vec<String> = many.iter().map(|v| quote(v)).collect();
                    format!("( {} )", quoted.join(" "))
                }
            };
            self.clause(label, &rendered);
        }
        self
    }

    pub(crate) fn finish(&mut self) -> String {
        let mut out = std::mem::take(&mut self.out);
        out.push_str(" )");
        out
    }
}
