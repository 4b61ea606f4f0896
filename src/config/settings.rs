// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::{DEFAULT_AGENT_URL, DEFAULT_USERNAME, DEFAULT_WORKER_COUNT};
use crate::errors::SettingsError;

/// Operator settings file.
///
/// # Example
/// ```yaml
/// agents:
///   - https://agent-1:13740
///   - https://agent-2:13740
/// username: user
/// password: secret
/// timeout_seconds: 300
/// worker_count: 4
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub agents: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub worker_count: Option<usize>,
}

/// Values the command line may override.
#[derive(Debug, Default)]
pub struct Overrides {
    pub agents: Vec<String>,
    pub username: Option<String>,
    pub worker_count: Option<usize>,
}

/// Settings after applying command line > settings file > built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub agents: Vec<String>,
    pub username: String,
    pub password: Option<String>,
    pub timeout: Option<Duration>,
    pub worker_count: usize,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve final values. `password_fallback` is consulted only when the
    /// settings file carries no password.
    pub fn resolve(self, overrides: Overrides, password_fallback: Option<String>) -> ResolvedSettings {
        let agents = if !overrides.agents.is_empty() {
            overrides.agents
        } else if !self.agents.is_empty() {
            self.agents
        } else {
            vec![DEFAULT_AGENT_URL.to_string()]
        };

        ResolvedSettings {
            agents: agents
                .into_iter()
                .map(|url| url.trim_end_matches('/').to_string())
                .collect(),
            username: overrides
                .username
                .or(self.username)
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: self.password.or(password_fallback),
            timeout: self.timeout_seconds.map(Duration::from_secs),
            worker_count: overrides
                .worker_count
                .or(self.worker_count)
                .unwrap_or(DEFAULT_WORKER_COUNT)
                .max(1),
        }
    }
}
