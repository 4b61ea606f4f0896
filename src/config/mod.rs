// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod recipe;
mod settings;
mod validation;

pub mod consts;

pub use recipe::{load_recipe, parse_recipe, parse_variables, Task};
pub use settings::{Overrides, ResolvedSettings, Settings};
pub use validation::validate_recipe;
