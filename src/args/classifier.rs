//! Flag classifier: raw JVM flag → family, name, key suffix and value.

use crate::args::registry::{Extracted, FlagFamily, FlagRule};

/// A classified JVM flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFlag {
    pub family: FlagFamily,
    /// Decoded flag or property name (what redaction looks at).
    pub name: String,
    /// Key suffix, before the namespace prefix is applied.
    pub suffix: String,
    pub value: String,
}

/// Classify one raw flag against the rule table.
///
/// The table is expected to end with a catch-all rule; if it does not, the
/// token is still kept verbatim as an unrecognized flag.
pub fn classify(raw: &str, rules: &[FlagRule]) -> ClassifiedFlag {
    rules
        .iter()
        .find_map(|rule| rule.apply(raw).map(|extracted| (rule.family, extracted)))
        .map(|(family, Extracted { name, suffix, value })| ClassifiedFlag {
            family,
            name,
            suffix,
            value,
        })
        .unwrap_or_else(|| ClassifiedFlag {
            family: FlagFamily::Unrecognized,
            name: raw.to_string(),
            suffix: raw.to_string(),
            value: String::new(),
        })
}
