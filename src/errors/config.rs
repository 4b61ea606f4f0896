// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Load-time errors: anything that prevents a recipe from being prepared.

use std::path::PathBuf;
use thiserror::Error;

/// Structural problems found while validating a recipe's task graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two tasks share the same name
    #[error("task name duplicated: '{task}'")]
    DuplicateTaskName { task: String },

    /// A task requires a task that is not part of the recipe
    #[error("task '{task}' requires '{missing}' which does not exist")]
    UnresolvedRequirement { task: String, missing: String },

    /// The `requires` relation contains at least one cycle.
    ///
    /// `tasks` lists the tasks left over once every task that can be
    /// scheduled has been peeled off, restricted to those on or between cycles.
    #[error("dependency cycle detected between tasks: {}", .tasks.join(", "))]
    CyclicDependency { tasks: Vec<String> },
}

/// Errors raised while loading and preparing a recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `origin` names the document: a file path or a description of the source.
    #[error("cannot parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("variable not provided: '{variable}' (task '{task}', argument '{argument}')")]
    UnresolvedVariable {
        task: String,
        argument: String,
        variable: String,
    },

    #[error("malformed placeholder in task '{task}', argument '{argument}'")]
    MalformedPlaceholder { task: String, argument: String },

    #[error("argument '{argument}' of task '{task}' must be a scalar value")]
    NonScalarArgument { task: String, argument: String },

    #[error("recipe validation failed:\n{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<ValidationError>),
}

impl From<Vec<ValidationError>> for RecipeError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RecipeError::Invalid(errors)
    }
}

/// Errors raised while loading the operator settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
