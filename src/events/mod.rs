//! Messages for the external test-orchestration service.
//!
//! Only the send contract lives here: messages are built, then handed to a
//! [`MessageSink`]. How a sink reaches the service is its own business.

pub mod session;

use std::collections::BTreeMap;
use std::io::Write;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::args::{encode_outcome, EncodeOptions};

pub use session::{EventSession, KillSwitch, SchedulerExceptionType, SessionPhase};

/// Delimiter for list-valued test-run-config entries (e.g. active profiles).
pub const VALUE_LIST_DELIMITER: &str = ",";

/// Errors that can occur when delivering a message.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Failed to serialize event message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write event message: {0}")]
    Write(#[from] std::io::Error),

    #[error("Event sink rejected message: {0}")]
    Rejected(String),
}

/// One message for the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub plugin_name: String,
    pub variables: BTreeMap<String, String>,
    pub message: String,
}

impl EventMessage {
    pub fn new(plugin_name: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            variables: BTreeMap::new(),
            message: String::new(),
        }
    }

    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn message_type(&self) -> Option<&str> {
        self.variables.get("message-type").map(String::as_str)
    }
}

/// Where messages go.
pub trait MessageSink: Send + Sync {
    fn send(&self, message: &EventMessage) -> Result<(), EventError>;
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<EventMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<EventMessage> {
        self.messages.lock().clone()
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, message: &EventMessage) -> Result<(), EventError> {
        self.messages.lock().push(message.clone());
        Ok(())
    }
}

/// Writes each message as one JSON line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> MessageSink for JsonLinesSink<W> {
    fn send(&self, message: &EventMessage) -> Result<(), EventError> {
        let line = serde_json::to_string(message)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

/// Build a `test-run-config` message carrying `key_values` as a JSON object.
pub fn test_run_config_message(
    plugin_name: &str,
    key_values: &BTreeMap<String, String>,
    tags: &[String],
) -> Result<EventMessage, EventError> {
    let body = serde_json::to_string(key_values)?;
    Ok(EventMessage::new(plugin_name)
        .variable("message-type", "test-run-config")
        .variable("output", "keys")
        .variable("tags", tags.join(VALUE_LIST_DELIMITER))
        .message(body))
}

/// Everything reported about a run before it starts.
#[derive(Debug, Clone, Default)]
pub struct TestRunConfig {
    pub jvm_args: Vec<String>,
    pub active_profiles: Vec<String>,
    pub override_jvm_args: bool,
    pub propagate_system_properties: bool,
    pub simulation_class: Option<String>,
}

impl TestRunConfig {
    /// Flat key/values: encoded JVM args plus the run switches.
    pub fn key_values(&self, options: &EncodeOptions) -> BTreeMap<String, String> {
        let outcome = encode_outcome(&self.jvm_args, options);
        tracing::debug!(
            keys = outcome.map.len(),
            redacted = outcome.redacted,
            merged = outcome.merged,
            "encoded jvm args"
        );

        let mut key_values = outcome.map.into_inner();

        let mut profiles = self.active_profiles.clone();
        profiles.sort();
        key_values.insert(
            "activeProfiles".to_string(),
            profiles.join(VALUE_LIST_DELIMITER),
        );
        key_values.insert(
            "overrideJvmArgs".to_string(),
            self.override_jvm_args.to_string(),
        );
        key_values.insert(
            "propagateSystemProperties".to_string(),
            self.propagate_system_properties.to_string(),
        );
        key_values.insert(
            "simulationClass".to_string(),
            self.simulation_class.clone().unwrap_or_default(),
        );
        key_values
    }

    /// The message sent to the orchestration service.
    pub fn to_message(
        &self,
        plugin_name: &str,
        tags: &[String],
        options: &EncodeOptions,
    ) -> Result<EventMessage, EventError> {
        test_run_config_message(plugin_name, &self.key_values(options), tags)
    }
}
