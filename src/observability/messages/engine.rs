// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the worker pool, recipe graph and processor catalog.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Cook started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_sous_chef::observability::messages::engine::CookStarted;
///
/// let msg = CookStarted {
///     task_count: 5,
///     worker_count: 2,
///     processor_count: 3,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct CookStarted {
    pub task_count: usize,
    pub worker_count: usize,
    pub processor_count: usize,
}

impl Display for CookStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cooking recipe: {} tasks, {} workers, {} processors available",
            self.task_count, self.worker_count, self.processor_count
        )
    }
}

impl StructuredLog for CookStarted {
    fn log(&self) {
        tracing::info!(
            task_count = self.task_count,
            worker_count = self.worker_count,
            processor_count = self.processor_count,
            "{}", self
        );
    }
}

impl CookStarted {
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "cook",
            task_count = self.task_count,
            worker_count = self.worker_count,
        )
    }
}

/// Cook completed, successfully or not.
///
/// # Log Level
/// `info!` - Important operational event
pub struct CookCompleted {
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub duration: Duration,
}

impl Display for CookCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Recipe cooked in {:?}: {} succeeded, {} failed, {} cancelled",
            self.duration, self.succeeded, self.failed, self.cancelled
        )
    }
}

impl StructuredLog for CookCompleted {
    fn log(&self) {
        tracing::info!(
            succeeded = self.succeeded,
            failed = self.failed,
            cancelled = self.cancelled,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// `debug!`
pub struct WorkerWaiting<'a> {
    pub worker: &'a str,
}

impl Display for WorkerWaiting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} waiting for a new task", self.worker)
    }
}

impl StructuredLog for WorkerWaiting<'_> {
    fn log(&self) {
        tracing::debug!(worker = self.worker, "{}", self);
    }
}

/// `debug!`
pub struct WorkerGotTask<'a> {
    pub worker: &'a str,
    pub task: &'a str,
}

impl Display for WorkerGotTask<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} got task '{}'", self.worker, self.task)
    }
}

impl StructuredLog for WorkerGotTask<'_> {
    fn log(&self) {
        tracing::debug!(worker = self.worker, task = self.task, "{}", self);
    }
}

/// `debug!`
pub struct WorkerStopped<'a> {
    pub worker: &'a str,
}

impl Display for WorkerStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} stopping now, no task remaining", self.worker)
    }
}

impl StructuredLog for WorkerStopped<'_> {
    fn log(&self) {
        tracing::debug!(worker = self.worker, "{}", self);
    }
}

/// A dispatch panicked or was aborted. The task counts as failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerFault<'a> {
    pub worker: &'a str,
    pub task: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkerFault<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: processing task '{}' raised an unexpected fault: {}",
            self.worker, self.task, self.error
        )
    }
}

impl StructuredLog for WorkerFault<'_> {
    fn log(&self) {
        tracing::error!(
            worker = self.worker,
            task = self.task,
            error = %self.error,
            "{}", self
        );
    }
}

/// A worker itself panicked or was aborted instead of stopping normally.
///
/// # Log Level
/// `error!`
pub struct WorkerTerminated<'a> {
    pub worker: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkerTerminated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} terminated abnormally: {}", self.worker, self.error)
    }
}

impl StructuredLog for WorkerTerminated<'_> {
    fn log(&self) {
        tracing::error!(worker = self.worker, error = %self.error, "{}", self);
    }
}

/// Tasks removed from the graph because a requirement failed.
///
/// # Log Level
/// `info!` - Cancellation is bookkeeping, the failure itself is logged elsewhere
pub struct TasksCancelled<'a> {
    pub failed_task: &'a str,
    pub cancelled: &'a [String],
}

impl Display for TasksCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' failed, cancelling {} dependent tasks: {}",
            self.failed_task,
            self.cancelled.len(),
            self.cancelled.join(", ")
        )
    }
}

impl StructuredLog for TasksCancelled<'_> {
    fn log(&self) {
        tracing::info!(
            failed_task = self.failed_task,
            cancelled_count = self.cancelled.len(),
            "{}", self
        );
    }
}

/// No task is left waiting; every worker will be released.
///
/// # Log Level
/// `debug!`
pub struct RecipeExhausted {
    pub ready_count: usize,
}

impl Display for RecipeExhausted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No task waiting anymore, closing recipe once {} queued tasks are taken",
            self.ready_count
        )
    }
}

impl StructuredLog for RecipeExhausted {
    fn log(&self) {
        tracing::debug!(ready_count = self.ready_count, "{}", self);
    }
}

/// An agent could not be queried for its processors and is left out of the catalog.
///
/// # Log Level
/// `warn!`
pub struct CatalogAgentSkipped<'a> {
    pub agent: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for CatalogAgentSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping agent {} while discovering processors: {}",
            self.agent, self.error
        )
    }
}

impl StructuredLog for CatalogAgentSkipped<'_> {
    fn log(&self) {
        tracing::warn!(agent = self.agent, error = %self.error, "{}", self);
    }
}

/// `info!`
pub struct CatalogBuilt {
    pub processor_count: usize,
    pub agent_count: usize,
}

impl Display for CatalogBuilt {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discovered {} processors across {} agents",
            self.processor_count, self.agent_count
        )
    }
}

impl StructuredLog for CatalogBuilt {
    fn log(&self) {
        tracing::info!(
            processor_count = self.processor_count,
            agent_count = self.agent_count,
            "{}", self
        );
    }
}
