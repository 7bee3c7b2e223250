//! Argument assembler: JVM args and load-tool args in one place.

/// JVM options the load tool runs with when the user supplies none.
pub const DEFAULT_JVM_OPTIONS: &[&str] = &[
    "-server",
    "-Xmx1G",
    "-XX:+HeapDumpOnOutOfMemoryError",
    "-XX:+UseG1GC",
    "-XX:+ParallelRefProcEnabled",
    "-XX:MaxInlineLevel=20",
    "-XX:MaxTrivialSize=12",
];

/// Always appended to the computed JVM args.
pub const DISABLE_CLASSPATH_URL_CHECK: &str =
    "-Djdk.net.URLClassPath.disableClassPathURLCheck=true";

const TEST_RUN_ID_PREFIX: &str = "-DtestRunId";

/// Combine user JVM args with the defaults.
///
/// - no custom args → the defaults
/// - `override_defaults` → custom args followed by the defaults
/// - otherwise → the custom args alone
pub fn compute_jvm_args<S: AsRef<str>>(
    custom: &[String],
    defaults: &[S],
    override_defaults: bool,
) -> Vec<String> {
    let defaults = defaults.iter().map(|d| d.as_ref().to_string());
    let mut args: Vec<String> = if custom.is_empty() {
        defaults.collect()
    } else if override_defaults {
        custom.iter().cloned().chain(defaults).collect()
    } else {
        custom.to_vec()
    };
    args.push(DISABLE_CLASSPATH_URL_CHECK.to_string());
    args
}

/// What `inject_test_run_id` did to the argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestRunIdChange {
    /// An identical `-DtestRunId=` flag was already present.
    Unchanged,
    /// A different `-DtestRunId` flag was replaced in place.
    Replaced { previous: String },
    /// No `-DtestRunId` flag was present; one was appended.
    Injected,
}

/// Make sure the JVM args carry `-DtestRunId=<id>`.
pub fn inject_test_run_id(args: &mut Vec<String>, test_run_id: &str) -> TestRunIdChange {
    let wanted = format!("{TEST_RUN_ID_PREFIX}={test_run_id}");

    match args.iter().position(|a| a.starts_with(TEST_RUN_ID_PREFIX)) {
        Some(index) if args[index] == wanted => TestRunIdChange::Unchanged,
        Some(index) => {
            let previous = std::mem::replace(&mut args[index], wanted);
            TestRunIdChange::Replaced { previous }
        }
        None => {
            args.push(wanted);
            TestRunIdChange::Injected
        }
    }
}

/// Load-tool version, as far as argument compatibility is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ToolVersion {
    /// Parse `major.minor[.anything]`. Returns `None` for anything else.
    pub fn parse(version: &str) -> Option<Self> {
        let mut parts = version.split('.');
        let major = parts.next()?.trim().parse().ok()?;
        let minor = parts.next()?.trim().parse().ok()?;
        Some(Self { major, minor })
    }

    /// Tools from 3.8 on accept the launcher (`-l`) and build tool
    /// version (`-btv`) arguments.
    pub fn supports_launcher_args(&self) -> bool {
        (self.major == 3 && self.minor >= 8) || self.major > 4
    }
}

/// Builder for the arguments passed to the load tool's main class.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    args: Vec<String>,
}

impl ToolArgs {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    fn push_opt(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.args.push(format!("-{name}"));
            self.args.push(value.to_string());
        }
        self
    }

    /// `-rsf <dir>`: resources (feeders) folder.
    pub fn with_resources_folder(self, dir: &str) -> Self {
        self.push_opt("rsf", Some(dir))
    }

    /// `-rf <dir>`: results folder.
    pub fn with_results_folder(self, dir: &str) -> Self {
        self.push_opt("rf", Some(dir))
    }

    /// `-rd <text>`: run description.
    pub fn with_run_description(self, description: Option<&str>) -> Self {
        self.push_opt("rd", description)
    }

    /// `-nr`: run without generating reports.
    pub fn with_no_reports(mut self, no_reports: bool) -> Self {
        if no_reports {
            self.args.push("-nr".into());
        }
        self
    }

    /// `-s <class>`: simulation to run.
    pub fn with_simulation(self, simulation: Option<&str>) -> Self {
        self.push_opt("s", simulation)
    }

    /// `-ro <dir>`: only generate reports for an existing run.
    pub fn with_reports_only(self, run: Option<&str>) -> Self {
        self.push_opt("ro", run)
    }

    /// `-l maven -btv <version>` for tool versions that understand them.
    pub fn with_launcher(self, tool: Option<ToolVersion>, build_tool_version: Option<&str>) -> Self {
        match tool {
            Some(version) if version.supports_launcher_args() => self
                .push_opt("l", Some("maven"))
                .push_opt("btv", build_tool_version),
            _ => self,
        }
    }

    pub fn build(self) -> Vec<String> {
        self.args
    }
}
