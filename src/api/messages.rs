// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Processor;

/// Agent metadata returned by `GET /info`. Free-form, display only.
pub type AgentInfo = Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorsRequest {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorsResponse {
    #[serde(default)]
    pub processors: Vec<Processor>,
}

/// Body of `POST /process`: the processor with its bound argument values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    pub processor: Processor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResponse {
    pub result: ProcessingResult,
}

/// Outcome reported by the agent. Everything besides `status` is kept
/// verbatim for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub status: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
