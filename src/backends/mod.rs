// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Agent backends: concrete implementations of the [`Agent`](crate::traits::Agent) trait.
//!
//! # Available Backends
//!
//! ## HTTP Backend
//! Talks JSON over HTTP(S) to remote processing agents:
//! - **Discovery**: `POST {base}/processors` with an optional search string
//! - **Processing**: `POST {base}/process` with a bound processor
//! - **Info**: `GET {base}/info`
//! - **Auth**: HTTP basic auth when a password is configured
//!
//! ## Stub Backend (Test-Only)
//! In-memory agents for scheduler tests (only available in test builds):
//! - **StubAgent**: offers named processors, records every call
//! - **Failure modes**: unreachable, dropped connections, `status: false`, panics
//! - **Note**: NOT available in production builds
//!
//! # Examples
//!
//! ```rust,no_run
//! use the_sous_chef::backends::http::HttpAgent;
//! use the_sous_chef::traits::Agent;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let agent = HttpAgent::new("https://agent-1:13740", reqwest::Client::new())
//!     .with_basic_auth("user", "secret");
//! let info = agent.info().await?;
//! println!("{}", serde_json::to_string_pretty(&info)?);
//! # Ok(())
//! # }
//! ```

pub mod http;
#[cfg(test)]
pub mod stub;
