// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod cook;
mod dispatch;
mod transport;

pub use config::{RecipeError, SettingsError, ValidationError};
pub use cook::CookError;
pub use dispatch::DispatchError;
pub use transport::TransportError;
