use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use gatling_events::args::{
    compute_jvm_args, encode, flag_rules, inject_test_run_id, FlagFamily, TestRunIdChange, ToolArgs,
    ToolVersion, DEFAULT_JVM_OPTIONS,
};
use gatling_events::config::Config;
use gatling_events::events::TestRunConfig;
use gatling_events::logging::init_tracing;
use gatling_events::runs::{ensure_results_folder, RunDirectories};

#[derive(Debug, Parser)]
#[command(name = "gatling-events", version, about = "Gatling launcher with test-run reporting")]
struct Cli {
    /// Config file (default: ~/.config/gatling-events/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode JVM flags into test-run-config keys
    #[command(after_help = flag_rules_help())]
    Encode {
        /// Print a JSON object instead of key=value lines
        #[arg(long)]
        json: bool,
        /// Raw JVM flags, e.g. -Xmx2g -Dfoo=bar
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        flags: Vec<String>,
    },
    /// Print the JVM args a run would use, one per line
    JvmArgs {
        /// Inject -DtestRunId=<ID>
        #[arg(long)]
        test_run_id: Option<String>,
    },
    /// Print the arguments passed to the load tool
    ToolArgs {
        /// Simulation class (overrides the config)
        #[arg(long)]
        simulation: Option<String>,
    },
    /// Print the test-run-config message as JSON
    Message {
        /// Active build profile (repeatable)
        #[arg(long = "profile")]
        profiles: Vec<String>,
        /// JVM flags to report instead of the configured ones
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        flags: Vec<String>,
    },
    /// Save the names of existing run directories
    Snapshot {
        #[arg(long)]
        results: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Write lastRun.txt for the directories created since a snapshot
    Record {
        #[arg(long)]
        results: Option<PathBuf>,
        #[arg(long)]
        snapshot: PathBuf,
        /// Failure to record, outermost cause first (repeatable)
        #[arg(long)]
        error: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Encode { json, flags } => {
            let map = encode(&flags, &config.encoder.encode_options());
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
            } else {
                for (key, value) in &map {
                    writeln!(out, "{key}={value}")?;
                }
            }
        }
        Command::JvmArgs { test_run_id } => {
            for arg in run_jvm_args(&config, test_run_id.as_deref()) {
                writeln!(out, "{arg}")?;
            }
        }
        Command::ToolArgs { simulation } => {
            let run = &config.run;
            let tool = run.gatling_version.as_deref().and_then(ToolVersion::parse);
            let args = ToolArgs::new()
                .with_resources_folder(&display_absolute(&run.resources_folder))
                .with_results_folder(&display_absolute(&run.results_folder))
                .with_run_description(run.run_description.as_deref())
                .with_no_reports(run.no_reports)
                .with_simulation(simulation.as_deref().or(run.simulation_class.as_deref()))
                .with_reports_only(run.reports_only.as_deref())
                .with_launcher(tool, run.build_tool_version.as_deref())
                .build();
            for arg in args {
                writeln!(out, "{arg}")?;
            }
        }
        Command::Message { profiles, flags } => {
            let jvm_args = if flags.is_empty() {
                run_jvm_args(&config, config.events.test_run_id.as_deref())
            } else {
                flags
            };
            let mut active_profiles = config.events.active_profiles.clone();
            active_profiles.extend(profiles);

            let test_run = TestRunConfig {
                jvm_args,
                active_profiles,
                override_jvm_args: config.run.override_jvm_args,
                propagate_system_properties: config.run.propagate_system_properties,
                simulation_class: config.run.simulation_class.clone(),
            };
            let message = test_run.to_message(
                &config.events.plugin_name,
                &config.events.tags,
                &config.encoder.encode_options(),
            )?;
            writeln!(out, "{}", serde_json::to_string_pretty(&message)?)?;
        }
        Command::Snapshot { results, out: path } => {
            let results = results.unwrap_or_else(|| config.run.results_folder.clone());
            ensure_results_folder(&results)?;
            let snapshot = RunDirectories::snapshot(&results)?;
            let names: Vec<&str> = snapshot.existing().iter().map(String::as_str).collect();
            fs::write(&path, names.join("\n"))
                .with_context(|| format!("writing snapshot to '{}'", path.display()))?;
        }
        Command::Record {
            results,
            snapshot,
            error,
        } => {
            let results = results.unwrap_or_else(|| config.run.results_folder.clone());
            let content = fs::read_to_string(&snapshot)
                .with_context(|| format!("reading snapshot '{}'", snapshot.display()))?;
            let existing = content.lines().filter(|l| !l.trim().is_empty());
            let dirs = RunDirectories::with_existing(&results, existing);
            let failure = failure_chain(&error);
            let path = dirs.record_last_run(
                failure
                    .as_ref()
                    .map(|e| &**e as &(dyn std::error::Error + 'static)),
            )?;
            writeln!(out, "{}", path.display())?;
        }
    }

    Ok(())
}

/// Rule table listing for `encode --help`, in matching order.
fn flag_rules_help() -> String {
    let mut help = String::from("Flag families (first match wins):\n");
    for rule in flag_rules() {
        let pattern = match rule.family {
            FlagFamily::Bare => "key=value",
            FlagFamily::Unrecognized => "anything else",
            _ => rule.prefix,
        };
        help.push_str(&format!("  {pattern:<18}{}\n", rule.description));
    }
    help
}

/// Configured JVM args with defaults applied and the testRunId injected
/// when there is one (always, once events are enabled).
fn run_jvm_args(config: &Config, test_run_id: Option<&str>) -> Vec<String> {
    let mut args = compute_jvm_args(
        &config.run.jvm_args,
        DEFAULT_JVM_OPTIONS,
        config.run.override_jvm_args,
    );
    tracing::debug!(
        count = args.len(),
        override_defaults = config.run.override_jvm_args,
        "computed jvm args"
    );

    let test_run_id = test_run_id
        .map(str::to_string)
        .or_else(|| config.events.test_run_id.clone())
        .or_else(|| {
            config
                .events
                .enabled
                .then(|| uuid::Uuid::new_v4().to_string())
        });

    if let Some(id) = test_run_id {
        match inject_test_run_id(&mut args, &id) {
            TestRunIdChange::Unchanged => {
                tracing::info!(test_run_id = %id, "testRunId already present in jvm args")
            }
            TestRunIdChange::Replaced { previous } => {
                tracing::info!(%previous, test_run_id = %id, "replaced testRunId in jvm args")
            }
            TestRunIdChange::Injected => {
                tracing::info!(test_run_id = %id, "injected testRunId in jvm args")
            }
        }
    }
    args
}

/// Rebuild a failure from its causes, outermost first.
fn failure_chain(causes: &[String]) -> Option<anyhow::Error> {
    let (root, outer) = causes.split_last()?;
    Some(
        outer
            .iter()
            .rev()
            .fold(anyhow::anyhow!(root.clone()), |err, cause| {
                err.context(cause.clone())
            }),
    )
}

fn display_absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
