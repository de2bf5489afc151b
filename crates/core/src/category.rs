use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-taught category overrides, keyed by normalized description.
///
/// Keys are unique; inserting an existing key replaces its label. Callers
/// are responsible for normalizing keys before insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRuleSet {
    rules: BTreeMap<String, String>,
}

impl CategoryRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, category: impl Into<String>) -> Option<String> {
        self.rules.insert(key.into(), category.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.rules.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CategoryRuleSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = CategoryRuleSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}
