// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Failures talking to an agent. All of them collapse to "no response" for
//! scheduling purposes; the distinction only matters for logging.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to connect to agent at {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("agent at {url} closed the connection: {message}")]
    Disconnected { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url}:{code}: {message}")]
    Status {
        url: String,
        code: u16,
        message: String,
    },

    #[error("cannot decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("cannot build http client: {message}")]
    Client { message: String },
}

impl TransportError {
    /// Short, stable name of the failure class, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Unreachable { .. } => "unreachable",
            TransportError::Disconnected { .. } => "disconnected",
            TransportError::Timeout { .. } => "timeout",
            TransportError::Status { .. } => "status",
            TransportError::Decode { .. } => "decode",
            TransportError::Client { .. } => "client",
        }
    }
}
