// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-task dispatch outcomes.

use crate::errors::{DispatchError, TransportError};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A bound processor was handed to an agent.
///
/// # Log Level
/// `info!`
///
/// # Example
/// ```
/// use the_sous_chef::observability::messages::dispatch::TaskDispatched;
///
/// let msg = TaskDispatched {
///     task: "unpack",
///     processor: "untar",
///     agent: "http://localhost:13740",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct TaskDispatched<'a> {
    pub task: &'a str,
    pub processor: &'a str,
    pub agent: &'a str,
}

impl Display for TaskDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' dispatched to {} (processor {})",
            self.task, self.agent, self.processor
        )
    }
}

impl StructuredLog for TaskDispatched<'_> {
    fn log(&self) {
        tracing::info!(
            task = self.task,
            processor = self.processor,
            agent = self.agent,
            "{}", self
        );
    }
}

/// `info!`
pub struct TaskSucceeded<'a> {
    pub task: &'a str,
    pub agent: &'a str,
}

impl Display for TaskSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' succeeded on {}", self.task, self.agent)
    }
}

impl StructuredLog for TaskSucceeded<'_> {
    fn log(&self) {
        tracing::info!(task = self.task, agent = self.agent, "{}", self);
    }
}

/// The agent answered but reported a non-true status.
///
/// # Log Level
/// `warn!`
pub struct AgentProcessingFailed<'a> {
    pub task: &'a str,
    pub agent: &'a str,
}

impl Display for AgentProcessingFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}': agent-side processing failed on {}",
            self.task, self.agent
        )
    }
}

impl StructuredLog for AgentProcessingFailed<'_> {
    fn log(&self) {
        tracing::warn!(task = self.task, agent = self.agent, "{}", self);
    }
}

/// The agent never produced a response; the transport failure itself is
/// logged by the agent client.
///
/// # Log Level
/// `warn!`
pub struct TaskNoResponse<'a> {
    pub task: &'a str,
    pub agent: &'a str,
    pub error: &'a TransportError,
}

impl Display for TaskNoResponse<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}': no response from {} ({})",
            self.task,
            self.agent,
            self.error.kind()
        )
    }
}

impl StructuredLog for TaskNoResponse<'_> {
    fn log(&self) {
        tracing::warn!(
            task = self.task,
            agent = self.agent,
            failure = self.error.kind(),
            "{}", self
        );
    }
}

/// Binding or validation failed before anything was sent.
///
/// # Log Level
/// `error!`
pub struct DispatchFailed<'a> {
    pub task: &'a str,
    pub error: &'a DispatchError,
}

impl Display for DispatchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}': initiating processing failed: {}", self.task, self.error)
    }
}

impl StructuredLog for DispatchFailed<'_> {
    fn log(&self) {
        tracing::error!(task = self.task, error = %self.error, "{}", self);
        if let DispatchError::ValidationFailed { usage, .. } = self.error {
            tracing::debug!(task = self.task, "processor usage:\n{}", usage);
        }
    }
}
