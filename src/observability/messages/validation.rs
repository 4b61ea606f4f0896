// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for recipe loading and pre-flight checks.

use crate::errors::RecipeError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Recipe could not be prepared.
///
/// # Log Level
/// `error!` - The cook is aborted before any dispatch
///
/// # Example
/// ```
/// use the_sous_chef::errors::{RecipeError, ValidationError};
/// use the_sous_chef::observability::messages::validation::RecipeRejected;
///
/// let error = RecipeError::Invalid(vec![ValidationError::CyclicDependency {
///     tasks: vec!["a".to_string(), "b".to_string()],
/// }]);
/// let msg = RecipeRejected { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RecipeRejected<'a> {
    pub error: &'a RecipeError,
}

impl Display for RecipeRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "cannot cook recipe: {}", self.error)
    }
}

impl StructuredLog for RecipeRejected<'_> {
    fn log(&self) {
        tracing::error!("{}", self);
    }
}

/// The recipe needs processors no configured agent offers.
///
/// # Log Level
/// `error!`
pub struct MissingProcessors<'a> {
    pub processors: &'a [String],
}

impl Display for MissingProcessors<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "cannot cook recipe: missing processors {}",
            self.processors.join(", ")
        )
    }
}

impl StructuredLog for MissingProcessors<'_> {
    fn log(&self) {
        tracing::error!(missing_count = self.processors.len(), "{}", self);
    }
}
