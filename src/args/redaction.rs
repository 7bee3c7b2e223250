//! Secret redaction for JVM flag names.

use serde::{Deserialize, Serialize};

/// Names redacted when no explicit denylist is configured.
///
/// Matching is case-sensitive, so the capitalised forms are listed too
/// (`-DmyPassword`, `-DapiToken`).
pub const DEFAULT_REDACTED_NAMES: &[&str] = &["password", "Password", "token", "Token"];

/// Case-sensitive substring denylist matched against decoded flag names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denylist(Vec<String>);

impl Denylist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(Into::into).collect())
    }

    /// A denylist that redacts nothing.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        if !self.0.contains(&entry) {
            self.0.push(entry);
        }
        self
    }

    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in entries {
            let entry = entry.into();
            if !self.0.contains(&entry) {
                self.0.push(entry);
            }
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// True when `name` contains any denylisted entry.
    pub fn matches(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|entry| !entry.is_empty() && name.contains(entry.as_str()))
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_REDACTED_NAMES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_camel_case_names() {
        let denylist = Denylist::default();
        assert!(denylist.matches("myPassword"));
        assert!(denylist.matches("password"));
        assert!(denylist.matches("apiToken"));
        assert!(!denylist.matches("PASSWORD"));
        assert!(!denylist.matches("foo"));
    }

    #[test]
    fn empty_entry_never_matches() {
        let denylist = Denylist::new([""]);
        assert!(!denylist.matches("anything"));
    }

    #[test]
    fn with_entry_deduplicates() {
        let denylist = Denylist::default().with_entry("secret").with_entry("secret");
        assert_eq!(denylist.entries().len(), DEFAULT_REDACTED_NAMES.len() + 1);
    }
}
