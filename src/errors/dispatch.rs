// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors scoped to a single dispatch attempt.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("cannot find an agent providing processor: {processor}")]
    ProcessorNotOffered { processor: String },

    #[error("processor {processor} does not support argument: {argument}")]
    UnsupportedArgument { processor: String, argument: String },

    #[error("invalid value '{value}' for argument '{argument}' of processor {processor}: expected {expected}")]
    InvalidArgumentValue {
        processor: String,
        argument: String,
        value: String,
        expected: String,
    },

    /// Carries the processor usage text so callers can show it to the operator.
    #[error("arguments validation failed for processor {processor}")]
    ValidationFailed { processor: String, usage: String },
}
