//! Settings loader for apidocs-console.toml

use super::types::{ApiSpec, Settings};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_FILENAME: &str = "apidocs-console.toml";

/// Ten years; longer lifetimes are not representable as cookie dates.
const MAX_PREFERENCE_TTL_DAYS: i64 = 3650;

/// Load settings from `path`, falling back to defaults when the file is
/// missing or unparseable.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.apis.is_empty() {
        return Err(Error::config("at least one entry in `apis` is required"));
    }
    if find_api(settings, &settings.default_api).is_none() {
        return Err(Error::config(format!(
            "default_api `{}` is not listed in `apis`",
            settings.default_api
        )));
    }
    if !(1..=MAX_PREFERENCE_TTL_DAYS).contains(&settings.preference_ttl_days) {
        return Err(Error::config(format!(
            "preference_ttl_days must be between 1 and {MAX_PREFERENCE_TTL_DAYS}"
        )));
    }
    url::Url::parse(&settings.base_url)?;
    Ok(())
}

pub fn find_api<'a>(settings: &'a Settings, id: &str) -> Option<&'a ApiSpec> {
    settings.apis.iter().find(|api| api.id == id)
}
