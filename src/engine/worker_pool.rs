// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fixed-size pool of workers pulling ready tasks from a [`RecipeGraph`].
//!
//! Each worker loops on `get_task` / dispatch / `task_done` until the graph
//! closes. Workers share nothing but the graph and the dispatcher.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::config::Task;
use crate::engine::{DispatchOutcome, Dispatcher, RecipeGraph};
use crate::observability::messages::dispatch::{
    AgentProcessingFailed, DispatchFailed, TaskNoResponse, TaskSucceeded,
};
use crate::observability::messages::engine::{
    WorkerFault, WorkerGotTask, WorkerStopped, WorkerTerminated, WorkerWaiting,
};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    worker_count: usize,
}

impl WorkerPool {
    /// A count of zero is raised to one.
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Run until every worker has observed the closed graph.
    ///
    /// Workers and their dispatches run inside the caller's current span.
    pub async fn run(&self, graph: Arc<RecipeGraph>, dispatcher: Arc<Dispatcher>) {
        let workers: Vec<(String, JoinHandle<()>)> = (1..=self.worker_count)
            .map(|k| {
                let name = format!("worker-{}", k);
                let handle = tokio::spawn(
                    work(name.clone(), Arc::clone(&graph), Arc::clone(&dispatcher))
                        .in_current_span(),
                );
                (name, handle)
            })
            .collect();

        for (name, handle) in workers {
            if let Err(join_error) = handle.await {
                WorkerTerminated {
                    worker: &name,
                    error: &join_error,
                }
                .log();
            }
        }
    }
}

async fn work(name: String, graph: Arc<RecipeGraph>, dispatcher: Arc<Dispatcher>) {
    loop {
        WorkerWaiting { worker: &name }.log();
        let Some(task) = graph.get_task().await else {
            WorkerStopped { worker: &name }.log();
            return;
        };
        WorkerGotTask {
            worker: &name,
            task: &task.name,
        }
        .log();

        let success = run_task(&name, &task, &dispatcher).await;
        graph.task_done(&task, success).await;
    }
}

/// Dispatch one task and log its outcome. Any fault counts as a failure.
async fn run_task(worker: &str, task: &Task, dispatcher: &Arc<Dispatcher>) -> bool {
    let handle = tokio::spawn(
        {
            let dispatcher = Arc::clone(dispatcher);
            let name = task.name.clone();
            let processor = task.processor.clone();
            let arguments = task.argument_pairs();
            async move { dispatcher.initiate_as(&name, &processor, &arguments).await }
        }
        .in_current_span(),
    );

    let outcome = match handle.await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(error)) => {
            DispatchFailed {
                task: &task.name,
                error: &error,
            }
            .log();
            return false;
        }
        Err(join_error) => {
            WorkerFault {
                worker,
                task: &task.name,
                error: &join_error,
            }
            .log();
            return false;
        }
    };

    match &outcome {
        DispatchOutcome::Processed { agent, result } if result.status => {
            TaskSucceeded {
                task: &task.name,
                agent,
            }
            .log();
        }
        DispatchOutcome::Processed { agent, .. } => {
            AgentProcessingFailed {
                task: &task.name,
                agent,
            }
            .log();
        }
        DispatchOutcome::NoResponse { agent, error } => {
            TaskNoResponse {
                task: &task.name,
                agent,
                error,
            }
            .log();
        }
    }
    outcome.is_success()
}
