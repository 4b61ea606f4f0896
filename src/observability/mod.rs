// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Every diagnostic line the orchestrator emits comes from a message struct in
//! [`messages`]. Each message implements `Display` for the human-readable text
//! and [`messages::StructuredLog`] to emit it at its intended level with
//! structured fields attached.
//!
//! # Usage
//!
//! ```rust
//! use the_sous_chef::observability::messages::StructuredLog;
//! use the_sous_chef::observability::messages::engine::WorkerStopped;
//!
//! WorkerStopped { worker: "worker-0" }.log();
//! ```

pub mod messages;
