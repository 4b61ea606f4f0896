// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::RecipeError;

/// Fatal errors that abort a cook before anything is dispatched.
#[derive(Debug, Error)]
pub enum CookError {
    #[error("cannot cook recipe: {0}")]
    Recipe(#[from] RecipeError),

    #[error("cannot cook recipe: missing processors {}", .0.join(", "))]
    MissingProcessors(Vec<String>),
}
