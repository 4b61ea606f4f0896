// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wire types of the agent HTTP contract.
//!
//! | Call      | Method/Path       | Request             | Response              |
//! |-----------|-------------------|---------------------|-----------------------|
//! | Info      | `GET /info`       | none                | [`AgentInfo`]         |
//! | Discover  | `POST /processors`| [`ProcessorsRequest`] | [`ProcessorsResponse`] |
//! | Process   | `POST /process`   | [`ProcessingRequest`] | [`ProcessingResponse`] |

mod messages;
mod processor;

pub use messages::{
    AgentInfo, ProcessingRequest, ProcessingResponse, ProcessingResult, ProcessorsRequest,
    ProcessorsResponse,
};
pub use processor::{ArgKind, InvalidValue, Processor, ProcessorArg};
