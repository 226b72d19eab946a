//! `X-` extension clauses attached to every definition kind.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered map of extension label to values.
///
/// Labels must look like `X-ORIGIN`: an `X-` prefix followed by letters,
/// digits or hyphens. Insertions with a malformed label or no values
/// are ignored. Lookups match labels case-insensitively.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(IndexMap<String, Vec<String>>);

impl Extensions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a label is an acceptable extension label.
    #[must_use]
    pub fn is_valid_label(label: &str) -> bool {
        let Some(rest) = label.strip_prefix("X-") else {
            return false;
        };
        !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    /// Set the values of an extension, replacing any earlier values.
    ///
    /// Returns `false` when nothing was stored.
    pub fn set<S: Into<String>>(
        &mut self,
        label: &str,
        values: impl IntoIterator<Item = S>,
    ) -> bool {
        if !Self::is_valid_label(label) {
            return false;
        }
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return false;
        }
        let key = self
            .find_key(label)
            .map(str::to_string)
            .unwrap_or_else(|| label.to_string());
        self.0.insert(key, values);
        true
    }

    /// Get the values of an extension.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(label))
            .map(|(_, values)| values.as_slice())
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate extensions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn find_key(&self, label: &str) -> Option<&str> {
        self.0
            .keys()
            .find(|key| key.eq_ignore_ascii_case(label))
            .map(String::as_str)
    }
}
