// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for agent HTTP traffic.

use crate::errors::TransportError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// `debug!`
pub struct RequestSent<'a> {
    pub method: &'a str,
    pub url: &'a str,
}

impl Display for RequestSent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

impl StructuredLog for RequestSent<'_> {
    fn log(&self) {
        tracing::debug!(method = self.method, url = self.url, "{}", self);
    }
}

/// A request to an agent failed. The level depends on the failure class:
/// status errors are warnings, everything else is an error.
pub struct TransportFailure<'a> {
    pub error: &'a TransportError,
}

impl Display for TransportFailure<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.error {
            TransportError::Disconnected { url, .. } => write!(
                f,
                "agent at {} refused the connection, it might be expecting a certificate",
                url
            ),
            other => write!(f, "{}", other),
        }
    }
}

impl StructuredLog for TransportFailure<'_> {
    fn log(&self) {
        match self.error {
            TransportError::Status { code, .. } => {
                tracing::warn!(failure = self.error.kind(), status = code, "{}", self);
            }
            TransportError::Disconnected { message, .. } => {
                tracing::error!(failure = self.error.kind(), detail = %message, "{}", self);
            }
            _ => {
                tracing::error!(failure = self.error.kind(), "{}", self);
            }
        }
    }
}

/// One processor of an agent's listing could not be decoded and is left out.
///
/// # Log Level
/// `warn!`
pub struct ProcessorSkipped<'a> {
    pub agent: &'a str,
    pub processor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProcessorSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Ignoring processor '{}' offered by {}: {}",
            self.processor, self.agent, self.error
        )
    }
}

impl StructuredLog for ProcessorSkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            agent = self.agent,
            processor = self.processor,
            error = %self.error,
            "{}", self
        );
    }
}
