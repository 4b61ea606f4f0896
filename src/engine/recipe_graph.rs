// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency-driven ready queue for recipe tasks.
//!
//! The graph owns every task that has not been handed out yet:
//!
//! ```text
//! WAITING --(requires emptied)--> READY --(get_task)--> [worker]
//!    |                                                     |
//!    +--(a requirement failed)--> CANCELLED     task_done(success)
//!                                                          |
//!                                              SUCCEEDED / FAILED
//! ```
//!
//! Workers only ever interact through [`RecipeGraph::get_task`] and
//! [`RecipeGraph::task_done`]. When no task is left waiting the graph closes:
//! every pending and future `get_task` call returns `None` once the ready
//! queue is drained, however many workers are pulling.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::Path;
use tokio::sync::{Mutex, Notify};

use crate::config::{load_recipe, validate_recipe, Task};
use crate::errors::RecipeError;
use crate::observability::messages::engine::{RecipeExhausted, TasksCancelled};
use crate::observability::messages::StructuredLog;

/// Terminal state of a task at the end of a cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    Failed,
    /// Removed because a transitive requirement failed; never dispatched.
    Cancelled,
}

/// Per-task summary of a cook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    pub cancelled: Vec<String>,
    /// Tasks that never reached a terminal state.
    pub unreached: Vec<String>,
}

impl CookReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.cancelled.is_empty() && self.unreached.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.cancelled.len() + self.unreached.len()
    }
}

#[derive(Debug, Default)]
struct GraphState {
    waiting: HashMap<String, Task>,
    ready: VecDeque<Task>,
    closed: bool,
    outcomes: BTreeMap<String, TaskOutcome>,
}

impl GraphState {
    fn mark_succeeded(&mut self, task: &str) {
        for waiting in self.waiting.values_mut() {
            waiting.requires.remove(task);
        }
    }

    /// Remove every waiting task that transitively requires `failed`.
    fn cancel_dependents(&mut self, failed: &str) -> Vec<String> {
        let mut cancelled = Vec::new();
        let mut frontier = vec![failed.to_string()];

        while !frontier.is_empty() {
            let next: Vec<String> = self
                .waiting
                .values()
                .filter(|t| frontier.iter().any(|f| t.requires.contains(f)))
                .map(|t| t.name.clone())
                .collect();

            for name in &next {
                self.waiting.remove(name);
                self.outcomes.insert(name.clone(), TaskOutcome::Cancelled);
            }
            cancelled.extend(next.iter().cloned());
            frontier = next;
        }

        cancelled.sort();
        cancelled
    }

    /// Move unblocked tasks to the ready queue, or close once nothing waits.
    fn sweep(&mut self) {
        if self.waiting.is_empty() {
            if !self.closed {
                self.closed = true;
                RecipeExhausted {
                    ready_count: self.ready.len(),
                }
                .log();
            }
            return;
        }

        let mut unblocked: Vec<String> = self
            .waiting
            .values()
            .filter(|t| t.requires.is_empty())
            .map(|t| t.name.clone())
            .collect();
        unblocked.sort();

        for name in unblocked {
            if let Some(task) = self.waiting.remove(&name) {
                self.ready.push_back(task);
            }
        }

        // Releasing the last waiting tasks also closes the recipe; workers
        // still drain the ready queue before observing the close.
        if self.waiting.is_empty() {
            self.sweep();
        }
    }
}

pub struct RecipeGraph {
    state: Mutex<GraphState>,
    changed: Notify,
    task_names: Vec<String>,
    required_processors: BTreeSet<String>,
}

impl RecipeGraph {
    /// Load, substitute, validate and prepare a recipe file.
    pub async fn prepare<P: AsRef<Path>>(
        recipe_path: P,
        variables_path: Option<&Path>,
    ) -> Result<Self, RecipeError> {
        let tasks = load_recipe(recipe_path, variables_path)?;
        Self::from_tasks(tasks)
    }

    /// Validate `tasks` and perform the initial ready-queue sweep.
    ///
    /// Fails on duplicate names, dangling requirements or cycles; nothing is
    /// queued in that case.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, RecipeError> {
        validate_recipe(&tasks)?;

        let mut task_names: Vec<String> = tasks.iter().map(|t| t.name.clone()).collect();
        task_names.sort();
        let required_processors = tasks.iter().map(|t| t.processor.clone()).collect();

        let mut state = GraphState {
            waiting: tasks.into_iter().map(|t| (t.name.clone(), t)).collect(),
            ..GraphState::default()
        };
        state.sweep();

        Ok(Self {
            state: Mutex::new(state),
            changed: Notify::new(),
            task_names,
            required_processors,
        })
    }

    /// Distinct processor names referenced by the recipe.
    pub fn required_processors(&self) -> &BTreeSet<String> {
        &self.required_processors
    }

    /// Every task name of the recipe, sorted.
    pub fn task_names(&self) -> &[String] {
        &self.task_names
    }

    /// Wait for the next ready task. `None` means no task will ever be
    /// produced again; it is returned to every caller from then on.
    pub async fn get_task(&self) -> Option<Task> {
        loop {
            let notified = {
                let mut state = self.state.lock().await;
                if let Some(task) = state.ready.pop_front() {
                    return Some(task);
                }
                if state.closed {
                    return None;
                }
                // Registered before the lock is released, so a wake-up sent
                // between here and the await below is not lost.
                self.changed.notified()
            };
            notified.await;
        }
    }

    /// Report the outcome of a task handed out by [`get_task`](Self::get_task).
    ///
    /// Returns the names of the tasks cancelled as a consequence, sorted.
    pub async fn task_done(&self, task: &Task, success: bool) -> Vec<String> {
        let cancelled = {
            let mut state = self.state.lock().await;
            let cancelled = if success {
                state.outcomes.insert(task.name.clone(), TaskOutcome::Succeeded);
                state.mark_succeeded(&task.name);
                Vec::new()
            } else {
                state.outcomes.insert(task.name.clone(), TaskOutcome::Failed);
                state.cancel_dependents(&task.name)
            };
            state.sweep();
            cancelled
        };
        self.changed.notify_waiters();

        if !cancelled.is_empty() {
            TasksCancelled {
                failed_task: &task.name,
                cancelled: &cancelled,
            }
            .log();
        }
        cancelled
    }

    /// Terminal state of every task reported so far.
    pub async fn outcomes(&self) -> BTreeMap<String, TaskOutcome> {
        self.state.lock().await.outcomes.clone()
    }

    /// Summary of the cook; tasks without a terminal state are `unreached`.
    pub async fn report(&self) -> CookReport {
        let outcomes = self.outcomes().await;
        let mut report = CookReport::default();
        for name in &self.task_names {
            let bucket = match outcomes.get(name) {
                Some(TaskOutcome::Succeeded) => &mut report.succeeded,
                Some(TaskOutcome::Failed) => &mut report.failed,
                Some(TaskOutcome::Cancelled) => &mut report.cancelled,
                None => &mut report.unreached,
            };
            bucket.push(name.clone());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn task(name: &str, requires: &[&str]) -> Task {
        Task::new(name, "p1").requiring(requires.iter().copied())
    }

    async fn drain_ready(graph: &RecipeGraph) -> Vec<String> {
        let state = graph.state.lock().await;
        let mut names: Vec<String> = state.ready.iter().map(|t| t.name.clone()).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_empty_recipe_closes_immediately() {
        let graph = RecipeGraph::from_tasks(vec![]).unwrap();
        assert!(graph.get_task().await.is_none());
        assert!(graph.get_task().await.is_none());
    }

    #[tokio::test]
    async fn test_tasks_without_requirements_are_ready_at_prepare() {
        let graph =
            RecipeGraph::from_tasks(vec![task("a", &[]), task("b", &[]), task("c", &["a"])]).unwrap();
        assert_eq!(drain_ready(&graph).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_success_unblocks_dependents() {
        let graph = RecipeGraph::from_tasks(vec![task("a", &[]), task("b", &["a"])]).unwrap();

        let a = graph.get_task().await.unwrap();
        assert_eq!(a.name, "a");
        assert!(drain_ready(&graph).await.is_empty());

        assert!(graph.task_done(&a, true).await.is_empty());
        let b = graph.get_task().await.unwrap();
        assert_eq!(b.name, "b");

        graph.task_done(&b, true).await;
        assert!(graph.get_task().await.is_none());
    }

    #[tokio::test]
    async fn test_diamond_waits_for_both_branches() {
        let graph = RecipeGraph::from_tasks(vec![
            task("a", &[]),
            task("b", &["a"]),
            task("c", &["a"]),
            task("d", &["b", "c"]),
        ])
        .unwrap();

        let a = graph.get_task().await.unwrap();
        graph.task_done(&a, true).await;
        let first = graph.get_task().await.unwrap();
        let second = graph.get_task().await.unwrap();
        graph.task_done(&first, true).await;
        assert!(drain_ready(&graph).await.is_empty());

        graph.task_done(&second, true).await;
        assert_eq!(graph.get_task().await.unwrap().name, "d");
    }

    #[tokio::test]
    async fn test_failure_cascades_transitively_and_spares_siblings() {
        // a -> b -> c, a -> d, e independent of a
        let graph = RecipeGraph::from_tasks(vec![
            task("a", &[]),
            task("b", &["a"]),
            task("c", &["b"]),
            task("d", &["a"]),
            task("e", &[]),
            task("f", &["e"]),
        ])
        .unwrap();

        let mut first = graph.get_task().await.unwrap();
        let mut other = graph.get_task().await.unwrap();
        if first.name != "a" {
            std::mem::swap(&mut first, &mut other);
        }
        assert_eq!(first.name, "a");

        let cancelled = graph.task_done(&first, false).await;
        assert_eq!(cancelled, vec!["b", "c", "d"]);

        assert_eq!(other.name, "e");
        graph.task_done(&other, true).await;
        let f = graph.get_task().await.unwrap();
        assert_eq!(f.name, "f");
        graph.task_done(&f, true).await;
        assert!(graph.get_task().await.is_none());

        let report = graph.report().await;
        assert_eq!(report.succeeded, vec!["e", "f"]);
        assert_eq!(report.failed, vec!["a"]);
        assert_eq!(report.cancelled, vec!["b", "c", "d"]);
        assert!(report.unreached.is_empty());
    }

    #[tokio::test]
    async fn test_close_is_observed_by_every_waiting_worker() {
        let graph = Arc::new(RecipeGraph::from_tasks(vec![task("a", &[])]).unwrap());
        let a = graph.get_task().await.unwrap();

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let graph = Arc::clone(&graph);
                tokio::spawn(async move { graph.get_task().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        graph.task_done(&a, true).await;

        for waiter in waiters {
            let got = tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("worker never released")
                .unwrap();
            assert!(got.is_none());
        }
    }

    #[tokio::test]
    async fn test_ready_tasks_are_drained_before_close() {
        let graph = RecipeGraph::from_tasks(vec![task("a", &[]), task("b", &[])]).unwrap();

        let mut names = vec![
            graph.get_task().await.unwrap().name,
            graph.get_task().await.unwrap().name,
        ];
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
        assert!(graph.get_task().await.is_none());
    }

    #[tokio::test]
    async fn test_required_processors_cover_ready_tasks_too() {
        let graph = RecipeGraph::from_tasks(vec![
            Task::new("a", "download"),
            Task::new("b", "untar").requiring(["a"]),
        ])
        .unwrap();
        let required: Vec<&str> = graph.required_processors().iter().map(String::as_str).collect();
        assert_eq!(required, vec!["download", "untar"]);
    }

    #[tokio::test]
    async fn test_invalid_recipe_is_rejected() {
        let err = RecipeGraph::from_tasks(vec![task("a", &["b"]), task("b", &["a"])]).err().unwrap();
        assert!(err.to_string().contains("dependency cycle detected"));
    }

    #[tokio::test]
    async fn test_report_marks_untouched_tasks_unreached() {
        let graph = RecipeGraph::from_tasks(vec![task("a", &[]), task("b", &["a"])]).unwrap();
        let report = graph.report().await;
        assert_eq!(report.unreached, vec!["a", "b"]);
        assert!(!report.is_success());
    }
}
