//! Configuration for the console
//!
//! - `types`: settings structures with defaults
//! - `settings`: TOML loading and validation

pub mod settings;
pub mod types;

pub use settings::{CONFIG_FILENAME, find_api, load_settings, parse_settings};
pub use types::{ApiSpec, SelectorSettings, Settings};
