//! System property propagation into the forked JVM.

use std::fmt::Write as _;

const BLOCKED_PREFIXES: &[&str] = &[
    "java.", "sun.", "maven.", "file.", "awt.", "os.", "user.", "idea.", "guice.", "hudson.",
];

const BLOCKED_NAMES: &[&str] = &[
    "line.separator",
    "path.separator",
    "classworlds.conf",
    "org.slf4j.simpleLogger.defaultLogLevel",
];

/// Whether a build-tool system property may be handed to the child JVM.
pub fn is_propagatable(name: &str) -> bool {
    !BLOCKED_PREFIXES.iter().any(|p| name.starts_with(p)) && !BLOCKED_NAMES.contains(&name)
}

/// Escape a property value the way Java string literals are escaped.
///
/// Control characters become `\b`, `\n`, `\t`, `\f`, `\r` or `\u00XX`;
/// quotes and backslashes are backslash-escaped; anything outside ASCII
/// becomes `\uXXXX` per UTF-16 code unit.
pub fn escape_property_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 2);
    let mut units = [0u16; 2];
    for ch in value.chars() {
        match ch {
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 || (c as u32) > 0x7f => {
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Quote a value containing spaces.
fn quote_if_spaced(value: &str) -> String {
    if value.contains(' ') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Result of turning build-tool properties into `-D` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    pub flags: Vec<String>,
    /// Properties that could not be passed on, with the reason.
    pub skipped: Vec<String>,
}

/// Build `-Dname=value` flags for every propagatable property.
///
/// Names containing whitespace are skipped, as are values containing
/// whitespace when targeting Windows.
pub fn propagated_flags<'a, I>(properties: I, windows: bool) -> Propagation
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut result = Propagation::default();
    for (name, value) in properties {
        if !is_propagatable(name) {
            continue;
        }
        if name.contains(char::is_whitespace) {
            tracing::error!(name, "system property name contains whitespace, not propagated");
            result
                .skipped
                .push(format!("{name}: name contains whitespace"));
        } else if windows && value.contains(' ') {
            tracing::error!(name, "system property value contains whitespace, not propagated on Windows");
            result
                .skipped
                .push(format!("{name}: value contains whitespace"));
        } else {
            let escaped = quote_if_spaced(&escape_property_value(value));
            result.flags.push(format!("-D{name}={escaped}"));
        }
    }
    result
}
