// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Binds task arguments to a processor definition and sends it to an agent.

use std::sync::Arc;

use crate::api::{ProcessingResult, Processor};
use crate::engine::ProcessorCatalog;
use crate::errors::{DispatchError, TransportError};
use crate::observability::messages::dispatch::TaskDispatched;
use crate::observability::messages::StructuredLog;

/// What happened once a bound processor was handed to an agent.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The agent answered. `result.status` tells whether processing worked.
    Processed {
        agent: String,
        result: ProcessingResult,
    },
    /// The request never produced a response.
    NoResponse {
        agent: String,
        error: TransportError,
    },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Processed { result, .. } if result.status)
    }

    pub fn agent(&self) -> &str {
        match self {
            DispatchOutcome::Processed { agent, .. } | DispatchOutcome::NoResponse { agent, .. } => agent,
        }
    }
}

/// Shared by every worker; the catalog is never mutated by a dispatch.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    catalog: Arc<ProcessorCatalog>,
}

impl Dispatcher {
    pub fn new(catalog: Arc<ProcessorCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ProcessorCatalog {
        &self.catalog
    }

    /// Bind `arguments` to a private copy of `processor_name` and validate it.
    pub fn bind(
        &self,
        processor_name: &str,
        arguments: &[(String, String)],
    ) -> Result<Processor, DispatchError> {
        let template = self
            .catalog
            .processor(processor_name)
            .ok_or_else(|| DispatchError::ProcessorNotOffered {
                processor: processor_name.to_string(),
            })?;
        let mut processor = template.clone();

        for (name, value) in arguments {
            let arg = processor
                .get_arg_mut(name)
                .ok_or_else(|| DispatchError::UnsupportedArgument {
                    processor: processor_name.to_string(),
                    argument: name.clone(),
                })?;
            arg.set_value(value)
                .map_err(|err| DispatchError::InvalidArgumentValue {
                    processor: processor_name.to_string(),
                    argument: err.argument,
                    value: err.value,
                    expected: err.expected.to_string(),
                })?;
        }

        if !processor.validate_arguments() {
            return Err(DispatchError::ValidationFailed {
                processor: processor_name.to_string(),
                usage: processor.usage(),
            });
        }
        Ok(processor)
    }

    /// Bind, pick the next agent offering the processor, and process.
    ///
    /// Transport failures are an outcome, not an error: `Err` is reserved for
    /// problems detected before anything is sent.
    pub async fn initiate(
        &self,
        processor_name: &str,
        arguments: &[(String, String)],
    ) -> Result<DispatchOutcome, DispatchError> {
        self.initiate_as(processor_name, processor_name, arguments).await
    }

    /// [`initiate`](Self::initiate) on behalf of the task named `task`, which
    /// labels the dispatch log line emitted once the agent is chosen.
    pub async fn initiate_as(
        &self,
        task: &str,
        processor_name: &str,
        arguments: &[(String, String)],
    ) -> Result<DispatchOutcome, DispatchError> {
        let processor = self.bind(processor_name, arguments)?;
        let agent = self
            .catalog
            .selector(processor_name)
            .map(|selector| selector.next())
            .ok_or_else(|| DispatchError::ProcessorNotOffered {
                processor: processor_name.to_string(),
            })?;

        let agent_url = agent.base_url().to_string();
        TaskDispatched {
            task,
            processor: processor_name,
            agent: &agent_url,
        }
        .log();

        Ok(match agent.process(&processor).await {
            Ok(resp) => DispatchOutcome::Processed {
                agent: agent_url,
                result: resp.result,
            },
            Err(error) => DispatchOutcome::NoResponse {
                agent: agent_url,
                error,
            },
        })
    }
}
