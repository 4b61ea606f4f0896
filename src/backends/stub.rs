// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory agents for scheduler and dispatcher tests.
//!
//! Tasks are identified on the agent side through a `task` argument holding
//! the task name, which every processor built by [`stub_processor`] declares.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{
    AgentInfo, ArgKind, ProcessingResponse, ProcessingResult, Processor, ProcessorArg,
    ProcessorsResponse,
};
use crate::errors::TransportError;
use crate::traits::Agent;

/// Shared, ordered record of `start:<task>` / `end:<task>` events.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// `tracing` writer appending every formatted event to a [`Journal`], so
/// log lines and agent calls can be ordered against each other.
#[derive(Clone)]
pub struct JournalWriter(pub Journal);

impl std::io::Write for JournalWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(buf).trim_end().to_string());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for JournalWriter {
    type Writer = JournalWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Processor with a required `task` string argument and an optional `level` int.
pub fn stub_processor(name: &str) -> Processor {
    let mut level = ProcessorArg::new("level", ArgKind::Int, false);
    level.description = Some("how hard to try".to_string());
    Processor::new(
        name,
        format!("Stub processor {}.", name),
        vec![ProcessorArg::new("task", ArgKind::Str, true), level],
    )
}

fn task_of(processor: &Processor) -> String {
    processor
        .get_arg("task")
        .and_then(|arg| arg.value.as_ref())
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// An agent that answers from memory.
pub struct StubAgent {
    url: String,
    processors: Vec<Processor>,
    unreachable: bool,
    dropping: bool,
    failing_tasks: HashSet<String>,
    panicking_tasks: HashSet<String>,
    delay: Option<Duration>,
    journal: Option<Journal>,
    calls: Mutex<Vec<Processor>>,
}

impl StubAgent {
    pub fn new(url: &str, processor_names: &[&str]) -> Self {
        Self {
            url: url.to_string(),
            processors: processor_names.iter().map(|n| stub_processor(n)).collect(),
            unreachable: false,
            dropping: false,
            failing_tasks: HashSet::new(),
            panicking_tasks: HashSet::new(),
            delay: None,
            journal: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the agent could not be reached.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Discovery works but every processing request is cut off.
    pub fn dropping_requests(mut self) -> Self {
        self.dropping = true;
        self
    }

    /// Report `status: false` for this task.
    pub fn failing_on(mut self, task: &str) -> Self {
        self.failing_tasks.insert(task.to_string());
        self
    }

    /// Panic while processing this task.
    pub fn panicking_on(mut self, task: &str) -> Self {
        self.panicking_tasks.insert(task.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Bound processors received so far, in arrival order.
    pub fn calls(&self) -> Vec<Processor> {
        self.calls.lock().unwrap().clone()
    }

    /// Names of the tasks received so far, in arrival order.
    pub fn processed_tasks(&self) -> Vec<String> {
        self.calls().iter().map(task_of).collect()
    }

    fn record(&self, event: String) {
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push(event);
        }
    }

    fn unreachable_error(&self, path: &str) -> TransportError {
        TransportError::Unreachable {
            url: format!("{}/{}", self.url, path),
            message: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl Agent for StubAgent {
    fn base_url(&self) -> &str {
        &self.url
    }

    async fn info(&self) -> Result<AgentInfo, TransportError> {
        if self.unreachable {
            return Err(self.unreachable_error("info"));
        }
        Ok(serde_json::json!({ "agent": self.url }))
    }

    async fn processors(&self, search: Option<&str>) -> Result<ProcessorsResponse, TransportError> {
        if self.unreachable {
            return Err(self.unreachable_error("processors"));
        }
        let processors = self
            .processors
            .iter()
            .filter(|p| search.map_or(true, |s| p.name.contains(s)))
            .cloned()
            .collect();
        Ok(ProcessorsResponse { processors })
    }

    async fn process(&self, processor: &Processor) -> Result<ProcessingResponse, TransportError> {
        if self.unreachable {
            return Err(self.unreachable_error("process"));
        }
        if self.dropping {
            return Err(TransportError::Disconnected {
                url: format!("{}/process", self.url),
                message: "connection closed before message completed".to_string(),
            });
        }
        let task = task_of(processor);
        self.calls.lock().unwrap().push(processor.clone());
        self.record(format!("start:{}", task));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panicking_tasks.contains(&task) {
            panic!("stub agent blew up on {}", task);
        }

        self.record(format!("end:{}", task));
        let mut details = Map::new();
        details.insert("agent".to_string(), Value::from(self.url.clone()));
        Ok(ProcessingResponse {
            result: ProcessingResult {
                status: !self.failing_tasks.contains(&task),
                details,
            },
        })
    }
}
