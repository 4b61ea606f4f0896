// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `engine` - worker pool, recipe graph and catalog events
//! * `dispatch` - per-task dispatch outcomes
//! * `transport` - agent HTTP failures
//! * `validation` - recipe loading and pre-flight failures

pub mod dispatch;
pub mod engine;
pub mod transport;
pub mod validation;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    fn log(&self);
}
