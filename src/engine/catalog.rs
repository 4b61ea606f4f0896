// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor catalog: which processors exist and which agents offer them.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::api::Processor;
use crate::engine::AgentSelector;
use crate::observability::messages::engine::{CatalogAgentSkipped, CatalogBuilt};
use crate::observability::messages::StructuredLog;
use crate::traits::Agent;

/// Processor definitions and per-processor agent selectors.
///
/// Built once before any dispatch and read-only afterwards, apart from the
/// selectors' internal cursors.
#[derive(Debug, Default)]
pub struct ProcessorCatalog {
    processors: HashMap<String, Processor>,
    agents: HashMap<String, AgentSelector>,
}

impl ProcessorCatalog {
    /// Query every agent, in order, for the processors it supports.
    ///
    /// An agent that cannot be queried contributes nothing. When two agents
    /// expose a processor with the same name, the definition seen last wins.
    pub async fn build(agents: &[Arc<dyn Agent>]) -> Self {
        let mut processors = HashMap::new();
        let mut offering: HashMap<String, Vec<Arc<dyn Agent>>> = HashMap::new();
        let mut answering = 0;

        for agent in agents {
            let resp = match agent.processors(None).await {
                Ok(resp) => resp,
                Err(error) => {
                    CatalogAgentSkipped {
                        agent: agent.base_url(),
                        error: &error,
                    }
                    .log();
                    continue;
                }
            };
            answering += 1;
            for processor in resp.processors {
                offering
                    .entry(processor.name.clone())
                    .or_default()
                    .push(Arc::clone(agent));
                processors.insert(processor.name.clone(), processor);
            }
        }

        let agents = offering
            .into_iter()
            .filter_map(|(name, agents)| AgentSelector::new(agents).map(|s| (name, s)))
            .collect();

        let catalog = Self { processors, agents };
        CatalogBuilt {
            processor_count: catalog.processors.len(),
            agent_count: answering,
        }
        .log();
        catalog
    }

    pub fn processor(&self, name: &str) -> Option<&Processor> {
        self.processors.get(name)
    }

    pub fn selector(&self, name: &str) -> Option<&AgentSelector> {
        self.agents.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Names in `required` that no agent offers, sorted.
    pub fn missing<'a, I>(&self, required: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        required
            .into_iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
