// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Top-level orchestration: prepare, discover, pre-flight, run, report.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::config::Task;
use crate::engine::{CookReport, Dispatcher, ProcessorCatalog, RecipeGraph, WorkerPool};
use crate::errors::{CookError, RecipeError};
use crate::observability::messages::engine::{CookCompleted, CookStarted};
use crate::observability::messages::validation::{MissingProcessors, RecipeRejected};
use crate::observability::messages::StructuredLog;
use crate::traits::Agent;

/// Cooks recipes against a fixed set of agents.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use the_sous_chef::engine::Kitchen;
///
/// # async fn run(agents: Vec<std::sync::Arc<dyn the_sous_chef::traits::Agent>>) -> Result<(), Box<dyn std::error::Error>> {
/// let kitchen = Kitchen::new(agents);
/// let report = kitchen.cook(Path::new("recipe.yaml"), None, 4).await?;
/// println!("{} tasks succeeded", report.succeeded.len());
/// # Ok(())
/// # }
/// ```
pub struct Kitchen {
    agents: Vec<Arc<dyn Agent>>,
}

impl Kitchen {
    pub fn new(agents: Vec<Arc<dyn Agent>>) -> Self {
        Self { agents }
    }

    pub fn agents(&self) -> &[Arc<dyn Agent>] {
        &self.agents
    }

    /// Discover processors and return a dispatcher over them.
    pub async fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(Arc::new(ProcessorCatalog::build(&self.agents).await))
    }

    /// Load a recipe file (and optional variables file) and cook it.
    ///
    /// Load-time and pre-flight problems are returned as errors before any
    /// task is dispatched. Task failures are reported in the [`CookReport`].
    pub async fn cook(
        &self,
        recipe_path: &Path,
        variables_path: Option<&Path>,
        worker_count: usize,
    ) -> Result<CookReport, CookError> {
        let graph = RecipeGraph::prepare(recipe_path, variables_path)
            .await
            .map_err(rejected)?;
        self.cook_graph(graph, worker_count).await
    }

    /// Cook an already-parsed task list.
    pub async fn cook_tasks(
        &self,
        tasks: Vec<Task>,
        worker_count: usize,
    ) -> Result<CookReport, CookError> {
        let graph = RecipeGraph::from_tasks(tasks).map_err(rejected)?;
        self.cook_graph(graph, worker_count).await
    }

    async fn cook_graph(
        &self,
        graph: RecipeGraph,
        worker_count: usize,
    ) -> Result<CookReport, CookError> {
        let catalog = ProcessorCatalog::build(&self.agents).await;
        let missing = catalog.missing(graph.required_processors());
        if !missing.is_empty() {
            MissingProcessors {
                processors: &missing,
            }
            .log();
            return Err(CookError::MissingProcessors(missing));
        }

        let pool = WorkerPool::new(worker_count);
        let started = CookStarted {
            task_count: graph.task_names().len(),
            worker_count: pool.worker_count(),
            processor_count: catalog.len(),
        };
        started.log();

        let start = Instant::now();
        let graph = Arc::new(graph);
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(catalog)));
        pool.run(Arc::clone(&graph), dispatcher)
            .instrument(started.span())
            .await;

        let report = graph.report().await;
        CookCompleted {
            succeeded: report.succeeded.len(),
            failed: report.failed.len(),
            cancelled: report.cancelled.len(),
            duration: start.elapsed(),
        }
        .log();
        Ok(report)
    }
}

fn rejected(error: RecipeError) -> CookError {
    RecipeRejected { error: &error }.log();
    CookError::Recipe(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubAgent;

    fn kitchen(agents: Vec<StubAgent>) -> Kitchen {
        Kitchen::new(
            agents
                .into_iter()
                .map(|a| Arc::new(a) as Arc<dyn Agent>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_missing_processors_abort_before_dispatch() {
        let kitchen = kitchen(vec![StubAgent::new("a", &["p1"])]);
        let tasks = vec![
            Task::new("t1", "p1").with_argument("task", "t1"),
            Task::new("t2", "untar").with_argument("task", "t2"),
            Task::new("t3", "download").with_argument("task", "t3"),
        ];

        match kitchen.cook_tasks(tasks, 2).await {
            Err(CookError::MissingProcessors(missing)) => {
                assert_eq!(missing, vec!["download", "untar"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_recipe_is_a_recipe_error() {
        let kitchen = kitchen(vec![StubAgent::new("a", &["p1"])]);
        let tasks = vec![Task::new("t1", "p1").requiring(["ghost"])];

        let err = kitchen.cook_tasks(tasks, 1).await.unwrap_err();
        assert!(matches!(err, CookError::Recipe(RecipeError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_missing_recipe_file_is_an_io_error() {
        let kitchen = kitchen(vec![]);
        let err = kitchen
            .cook(Path::new("/nonexistent/recipe.yaml"), None, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CookError::Recipe(RecipeError::Io { .. })));
    }

    #[tokio::test]
    async fn test_empty_recipe_cooks_to_empty_report() {
        let kitchen = kitchen(vec![]);
        let report = kitchen.cook_tasks(vec![], 3).await.unwrap();
        assert_eq!(report, CookReport::default());
        assert!(report.is_success());
    }
}
