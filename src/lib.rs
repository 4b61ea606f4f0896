// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod api;        // agent wire types
pub mod backends;   // agent clients
pub mod config;     // recipes + settings
pub mod engine;     // scheduler and dispatch
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // unified abstractions
