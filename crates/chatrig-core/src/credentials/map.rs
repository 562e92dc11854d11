//! Resolved credentials keyed by [`CredentialKey`].

use std::collections::BTreeMap;
use std::fmt;

use super::key::CredentialKey;

/// The flat result of credential loading.
///
/// Only non-empty values are stored, so `get` doubles as a "configured?" check.
/// `Debug` prints key names only; values never reach logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialMap {
    values: BTreeMap<CredentialKey, String>,
}

impl CredentialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value for `key`, if configured.
    pub fn get(&self, key: CredentialKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: CredentialKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Store `value` unless `key` is already resolved or `value` is empty.
    ///
    /// Returns whether the value was accepted.
    pub fn insert_if_absent(&mut self, key: CredentialKey, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() || self.values.contains_key(&key) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CredentialKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl<V: Into<String>> FromIterator<(CredentialKey, V)> for CredentialMap {
    fn from_iter<I: IntoIterator<Item = (CredentialKey, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert_if_absent(key, value);
        }
        map
    }
}

impl fmt::Debug for CredentialMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_wins_and_empties_are_ignored() {
        let mut map = CredentialMap::new();
        assert!(!map.insert_if_absent(CredentialKey::OpenAiApiKey, ""));
        assert!(map.insert_if_absent(CredentialKey::OpenAiApiKey, "k1"));
        assert!(!map.insert_if_absent(CredentialKey::OpenAiApiKey, "k2"));
        assert_eq!(map.get(CredentialKey::OpenAiApiKey), Some("k1"));
    }

    #[test]
    fn debug_output_redacts_values() {
        let map: CredentialMap = [(CredentialKey::LiteLlmMasterKey, "sk-very-secret")]
            .into_iter()
            .collect();
        let rendered = format!("{map:?}");
        assert!(rendered.contains("LiteLlmMasterKey"));
        assert!(!rendered.contains("sk-very-secret"));
    }
}
