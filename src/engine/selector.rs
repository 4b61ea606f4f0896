// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::traits::Agent;

/// Round-robin cursor over the agents offering one processor.
///
/// The agent list is fixed at construction; only the cursor moves. The
/// cursor wraps explicitly at the list length, so selection order is stable:
/// `agents[0], agents[1], ..., agents[n-1], agents[0], ...`.
pub struct AgentSelector {
    agents: Vec<Arc<dyn Agent>>,
    cursor: AtomicUsize,
}

impl AgentSelector {
    /// Returns `None` for an empty list; a selector always has an agent to give.
    pub fn new(agents: Vec<Arc<dyn Agent>>) -> Option<Self> {
        if agents.is_empty() {
            return None;
        }
        Some(Self {
            agents,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Next agent in rotation. Safe to call from many workers at once.
    pub fn next(&self) -> Arc<dyn Agent> {
        let len = self.agents.len();
        let index = match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % len))
        {
            Ok(previous) | Err(previous) => previous,
        };
        Arc::clone(&self.agents[index])
    }

    pub fn agents(&self) -> &[Arc<dyn Agent>] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for AgentSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSelector")
            .field("agents", &self.agents.iter().map(|a| a.base_url()).collect::<Vec<_>>())
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}
