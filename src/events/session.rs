use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::events::{EventError, EventMessage, MessageSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionPhase {
    Idle = 0,
    Running = 1,
    Stopped = 2,
    Aborted = 3,
}

impl SessionPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionPhase::Idle,
            1 => SessionPhase::Running,
            2 => SessionPhase::Stopped,
            _ => SessionPhase::Aborted,
        }
    }
}

/// Lifecycle of one reported test run.
///
/// Stop and abort are idempotent and mutually exclusive: whichever comes
/// first wins, so a shutdown hook racing the main flow sends one message.
pub struct EventSession {
    sink: Arc<dyn MessageSink>,
    plugin_name: String,
    test_run_id: String,
    phase: AtomicU8,
    kill_switch: KillSwitch,
}

impl EventSession {
    pub fn new(
        sink: Arc<dyn MessageSink>,
        plugin_name: impl Into<String>,
        test_run_id: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            plugin_name: plugin_name.into(),
            test_run_id: test_run_id.into(),
            phase: AtomicU8::new(SessionPhase::Idle as u8),
            kill_switch: KillSwitch::new(),
        }
    }

    pub fn test_run_id(&self) -> &str {
        &self.test_run_id
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// True once the session was stopped or aborted.
    pub fn is_stopped(&self) -> bool {
        matches!(self.phase(), SessionPhase::Stopped | SessionPhase::Aborted)
    }

    /// Handle the orchestration service uses to end the child run early.
    pub fn kill_switch(&self) -> KillSwitch {
        self.kill_switch.clone()
    }

    /// Forward an arbitrary message (e.g. the test-run-config) to the sink.
    pub fn send(&self, message: &EventMessage) -> Result<(), EventError> {
        self.sink.send(message)
    }

    /// Start the session. Returns `false` if it was already started or ended.
    pub fn start(&self) -> Result<bool, EventError> {
        if !self.transition(SessionPhase::Idle, SessionPhase::Running) {
            return Ok(false);
        }
        tracing::info!(test_run_id = %self.test_run_id, "event session started");
        self.sink.send(&self.lifecycle_message("test-run-start"))?;
        Ok(true)
    }

    /// Stop a running session. Returns `false` if it was not running.
    pub fn stop(&self) -> Result<bool, EventError> {
        if !self.transition(SessionPhase::Running, SessionPhase::Stopped) {
            tracing::debug!(phase = ?self.phase(), "stop ignored");
            return Ok(false);
        }
        tracing::info!(test_run_id = %self.test_run_id, "event session stopped");
        self.sink.send(&self.lifecycle_message("test-run-stop"))?;
        Ok(true)
    }

    /// Abort the session unless it already ended.
    pub fn abort(&self) -> Result<bool, EventError> {
        let aborted = self.transition(SessionPhase::Running, SessionPhase::Aborted)
            || self.transition(SessionPhase::Idle, SessionPhase::Aborted);
        if !aborted {
            tracing::debug!(phase = ?self.phase(), "abort ignored");
            return Ok(false);
        }
        tracing::warn!(test_run_id = %self.test_run_id, "event session aborted");
        self.sink.send(&self.lifecycle_message("test-run-abort"))?;
        Ok(true)
    }

    fn transition(&self, from: SessionPhase, to: SessionPhase) -> bool {
        self.phase
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn lifecycle_message(&self, message_type: &str) -> EventMessage {
        EventMessage::new(&self.plugin_name)
            .variable("message-type", message_type)
            .variable("testRunId", &self.test_run_id)
    }
}

/// Why the orchestration service asked the child run to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerExceptionType {
    None = 0,
    Kill = 1,
    Abort = 2,
    Stop = 3,
}

/// Lightweight, cloneable handle recording kill/abort/stop requests.
///
/// Only the first request is kept.
#[derive(Debug, Clone)]
pub struct KillSwitch {
    requested: Arc<AtomicU8>,
}

impl KillSwitch {
    pub fn new() -> Self {
        Self {
            requested: Arc::new(AtomicU8::new(SchedulerExceptionType::None as u8)),
        }
    }

    pub fn kill(&self, message: &str) {
        tracing::info!(message, "kill requested for running process");
        self.request(SchedulerExceptionType::Kill);
    }

    pub fn abort(&self, message: &str) {
        tracing::info!(message, "abort requested for running process");
        self.request(SchedulerExceptionType::Abort);
    }

    pub fn stop(&self, message: &str) {
        tracing::info!(message, "stop requested for running process");
        self.request(SchedulerExceptionType::Stop);
    }

    pub fn requested(&self) -> SchedulerExceptionType {
        match self.requested.load(Ordering::SeqCst) {
            0 => SchedulerExceptionType::None,
            1 => SchedulerExceptionType::Kill,
            2 => SchedulerExceptionType::Abort,
            _ => SchedulerExceptionType::Stop,
        }
    }

    fn request(&self, kind: SchedulerExceptionType) {
        let _ = self.requested.compare_exchange(
            SchedulerExceptionType::None as u8,
            kind as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

impl Default for KillSwitch {
    fn default() -> Self {
        Self::new()
    }
}
