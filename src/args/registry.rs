//! Flag rule table: single source of truth for JVM flag families.

/// Which parsing rule a raw JVM flag falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagFamily {
    /// `-XX:Name=value`, `-XX:+Toggle`, `-XX:-Toggle`.
    Extended,
    /// `-Xbootclasspath:`, `-Xbootclasspath/a:`, `-Xbootclasspath/p:`.
    BootClassPath,
    /// Any other `-X` flag (`-Xmx2g`, `-Xlog:gc`, `-Xnolinenumbers`).
    ShortX,
    /// `-Dname=value` system property.
    SystemProperty,
    /// `-javaagent:/path/to/agent.jar`.
    JavaAgent,
    /// `-d32` / `-d64` data model selection.
    DataModel,
    /// `key=value` without a leading dash.
    Bare,
    /// Nothing above matched; the token becomes its own key.
    Unrecognized,
}

/// Output of a rule that accepted a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Decoded flag or property name, checked against the redaction denylist.
    pub name: String,
    /// Key suffix appended to the namespace prefix.
    pub suffix: String,
    /// Value stored under the key.
    pub value: String,
}

/// A single rule: a prefix gate plus an extractor over the remainder.
///
/// The extractor sees the flag with `prefix` already stripped and may still
/// decline it by returning `None`, letting the next rule try.
#[derive(Debug, Clone, Copy)]
pub struct FlagRule {
    pub family: FlagFamily,
    pub prefix: &'static str,
    /// Shown in the `encode --help` rule listing.
    pub description: &'static str,
    extract: fn(&str) -> Option<Extracted>,
}

impl FlagRule {
    /// Apply this rule to a raw flag. `None` means the rule does not claim it.
    pub fn apply(&self, raw: &str) -> Option<Extracted> {
        let rest = raw.strip_prefix(self.prefix)?;
        (self.extract)(rest)
    }
}

/// `-X` flags that carry a size directly after the name (`-Xmx2g`).
///
/// Every other `-X` flag without a separator echoes its own name as value.
pub const SIZED_X_FLAGS: &[&str] = &["ms", "mx", "ss", "mn"];

/// Build the ordered rule table. Earlier rules win.
pub fn flag_rules() -> Vec<FlagRule> {
    vec![
        FlagRule {
            family: FlagFamily::Extended,
            prefix: "-XX:",
            description: "HotSpot extended option",
            extract: extract_extended,
        },
        FlagRule {
            family: FlagFamily::BootClassPath,
            prefix: "-Xbootclasspath",
            description: "Boot class path (set, append, prepend)",
            extract: extract_bootclasspath,
        },
        FlagRule {
            family: FlagFamily::ShortX,
            prefix: "-X",
            description: "Non-standard -X option",
            extract: extract_short_x,
        },
        FlagRule {
            family: FlagFamily::SystemProperty,
            prefix: "-D",
            description: "System property",
            extract: extract_system_property,
        },
        FlagRule {
            family: FlagFamily::JavaAgent,
            prefix: "-javaagent:",
            description: "Java agent jar",
            extract: extract_java_agent,
        },
        FlagRule {
            family: FlagFamily::DataModel,
            prefix: "-d",
            description: "Data model (32 or 64 bit)",
            extract: extract_data_model,
        },
        FlagRule {
            family: FlagFamily::Bare,
            prefix: "",
            description: "Bare key=value pair",
            extract: extract_bare,
        },
        FlagRule {
            family: FlagFamily::Unrecognized,
            prefix: "",
            description: "Unrecognized token, kept verbatim",
            extract: extract_unrecognized,
        },
    ]
}

fn extract_extended(rest: &str) -> Option<Extracted> {
    let (raw_name, value) = match rest.split_once('=') {
        Some((name, value)) => (name, value),
        None => (rest, rest),
    };
    let name = raw_name
        .strip_prefix('+')
        .or_else(|| raw_name.strip_prefix('-'))
        .unwrap_or(raw_name);
    Some(Extracted {
        name: name.to_string(),
        suffix: format!("XX{name}"),
        value: value.to_string(),
    })
}

fn extract_bootclasspath(rest: &str) -> Option<Extracted> {
    let (discriminator, tail) = if let Some(tail) = rest.strip_prefix("/a") {
        ("a", tail)
    } else if let Some(tail) = rest.strip_prefix("/p") {
        ("p", tail)
    } else {
        ("", rest)
    };
    let value = if tail.is_empty() {
        ""
    } else {
        tail.strip_prefix(':')?
    };
    Some(Extracted {
        name: format!("bootclasspath{discriminator}"),
        suffix: format!("Xbootclasspath{discriminator}"),
        value: value.to_string(),
    })
}

fn extract_short_x(rest: &str) -> Option<Extracted> {
    if rest.is_empty() {
        return None;
    }
    let (name, value) = match rest.find([':', '=']) {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => split_sized(rest).unwrap_or((rest, rest)),
    };
    Some(Extracted {
        name: name.to_string(),
        suffix: format!("X{name}"),
        value: value.to_string(),
    })
}

fn split_sized(rest: &str) -> Option<(&str, &str)> {
    SIZED_X_FLAGS.iter().find_map(|name| {
        let size = rest.strip_prefix(name)?;
        size.starts_with(|c: char| c.is_ascii_digit())
            .then_some((*name, size))
    })
}

fn extract_system_property(rest: &str) -> Option<Extracted> {
    let (name, value) = rest.split_once('=').unwrap_or((rest, ""));
    if name.is_empty() {
        return None;
    }
    Some(Extracted {
        name: name.to_string(),
        suffix: format!("D{name}"),
        value: value.to_string(),
    })
}

fn extract_java_agent(rest: &str) -> Option<Extracted> {
    Some(Extracted {
        name: "javaagent".to_string(),
        suffix: "javaagent".to_string(),
        value: rest.to_string(),
    })
}

fn extract_data_model(rest: &str) -> Option<Extracted> {
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Extracted {
        name: "d".to_string(),
        suffix: "d".to_string(),
        value: rest.to_string(),
    })
}

fn extract_bare(raw: &str) -> Option<Extracted> {
    if raw.starts_with('-') {
        return None;
    }
    let (key, value) = raw.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some(Extracted {
        name: key.to_string(),
        suffix: key.to_string(),
        value: value.to_string(),
    })
}

fn extract_unrecognized(raw: &str) -> Option<Extracted> {
    Some(Extracted {
        name: raw.to_string(),
        suffix: raw.to_string(),
        value: String::new(),
    })
}
