//! Encoder: ordered JVM flags → flat test-run-config key/value map.

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;

use crate::args::classifier::classify;
use crate::args::redaction::Denylist;
use crate::args::registry::flag_rules;

/// Prefix shared by every key the encoder produces.
pub const NAMESPACE_PREFIX: &str = "jmvArg.";

/// Separator between values of flags that land on the same key.
pub const MERGE_SEPARATOR: char = '\n';

/// Settings for one `encode` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub namespace_prefix: String,
    pub denylist: Denylist,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            namespace_prefix: NAMESPACE_PREFIX.to_string(),
            denylist: Denylist::default(),
        }
    }
}

/// Canonical key → value map produced from a flag list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap(BTreeMap<String, String>);

impl ConfigMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn values(&self) -> btree_map::Values<'_, String, String> {
        self.0.values()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }

    /// Insert, or append to an existing value with [`MERGE_SEPARATOR`].
    ///
    /// Returns `true` when the value was merged into an existing entry.
    fn merge_insert(&mut self, key: String, value: String) -> bool {
        match self.0.entry(key) {
            btree_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push(MERGE_SEPARATOR);
                existing.push_str(&value);
                true
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value);
                false
            }
        }
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of encoding, with bookkeeping for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    pub map: ConfigMap,
    /// Flags dropped because their name matched the denylist.
    pub redacted: usize,
    /// Flags whose value was appended to an earlier flag's key.
    pub merged: usize,
}

/// Encode an ordered flag list into a [`ConfigMap`].
///
/// Total over its input: unknown shapes become their own key, secrets are
/// dropped, duplicates are merged newline-separated in input order.
pub fn encode<S: AsRef<str>>(flags: &[S], options: &EncodeOptions) -> ConfigMap {
    encode_outcome(flags, options).map
}

/// Like [`encode`], also reporting how many flags were redacted or merged.
pub fn encode_outcome<S: AsRef<str>>(flags: &[S], options: &EncodeOptions) -> EncodeOutcome {
    let rules = flag_rules();
    let mut map = ConfigMap::default();
    let mut redacted = 0;
    let mut merged = 0;

    for raw in flags {
        let flag = classify(raw.as_ref(), &rules);

        if options.denylist.matches(&flag.name) {
            redacted += 1;
            continue;
        }

        let key = format!("{}{}", options.namespace_prefix, flag.suffix);
        if map.merge_insert(key, flag.value) {
            merged += 1;
        }
    }

    EncodeOutcome {
        map,
        redacted,
        merged,
    }
}
