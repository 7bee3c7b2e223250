use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::args::{Denylist, EncodeOptions, NAMESPACE_PREFIX};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// How JVM args are turned into test-run-config keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncoderConfig {
    /// Prefix of every produced key (default: `jmvArg.`).
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,
    /// Appended to the built-in denylist, which always applies.
    #[serde(default)]
    pub extra_redact: Vec<String>,
}

/// Settings for one load-tool run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Extra JVM arguments for the load tool.
    #[serde(default)]
    pub jvm_args: Vec<String>,
    /// Keep the default JVM args and append them after `jvm_args`.
    #[serde(default)]
    pub override_jvm_args: bool,
    /// Hand build-tool system properties to the child JVM (default: true).
    #[serde(default = "default_true")]
    pub propagate_system_properties: bool,
    #[serde(default)]
    pub simulation_class: Option<String>,
    #[serde(default)]
    pub run_description: Option<String>,
    #[serde(default)]
    pub no_reports: bool,
    /// Generate reports for this existing run folder instead of running.
    #[serde(default)]
    pub reports_only: Option<String>,
    #[serde(default = "default_results_folder")]
    pub results_folder: PathBuf,
    #[serde(default = "default_resources_folder")]
    pub resources_folder: PathBuf,
    /// Fail the build when the run fails (default: true).
    #[serde(default = "default_true")]
    pub fail_on_error: bool,
    #[serde(default)]
    pub continue_on_assertion_failure: bool,
    /// Load-tool version, e.g. `3.9.5`.
    #[serde(default)]
    pub gatling_version: Option<String>,
    #[serde(default)]
    pub build_tool_version: Option<String>,
}

/// Reporting to the external test-orchestration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    /// Generated when events are enabled and no id is configured.
    #[serde(default)]
    pub test_run_id: Option<String>,
    #[serde(default)]
    pub active_profiles: Vec<String>,
}

fn default_namespace_prefix() -> String {
    NAMESPACE_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

fn default_results_folder() -> PathBuf {
    PathBuf::from("target").join("gatling")
}

fn default_resources_folder() -> PathBuf {
    PathBuf::from("src").join("test").join("resources")
}

fn default_plugin_name() -> String {
    "events-gatling-maven-plugin".to_string()
}

fn default_tags() -> Vec<String> {
    vec!["gatling".to_string()]
}

impl EncoderConfig {
    /// Options for [`crate::args::encode`].
    pub fn encode_options(&self) -> EncodeOptions {
        let mut denylist = Denylist::default();
        denylist.extend(self.extra_redact.iter().cloned());
        EncodeOptions {
            namespace_prefix: self.namespace_prefix.clone(),
            denylist,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            namespace_prefix: default_namespace_prefix(),
            extra_redact: Vec::new(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            jvm_args: Vec::new(),
            override_jvm_args: false,
            propagate_system_properties: true,
            simulation_class: None,
            run_description: None,
            no_reports: false,
            reports_only: None,
            results_folder: default_results_folder(),
            resources_folder: default_resources_folder(),
            fail_on_error: true,
            continue_on_assertion_failure: false,
            gatling_version: None,
            build_tool_version: None,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            plugin_name: default_plugin_name(),
            tags: default_tags(),
            test_run_id: None,
            active_profiles: Vec::new(),
        }
    }
}
