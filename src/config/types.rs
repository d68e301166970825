//! Configuration types for the API console
//!
//! Defines:
//! - `Settings` - top-level settings loaded from `apidocs-console.toml`
//! - `ApiSpec` - one selectable spec document
//! - `SelectorSettings` - CSS selectors describing the renderer's markup

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Origin of the documented API; relative endpoint paths are joined onto it
    pub base_url: String,

    /// Path of the localization endpoint
    pub locale_path: String,

    /// Selectable spec documents
    pub apis: Vec<ApiSpec>,

    /// Spec rendered when nothing else is selected
    pub default_api: String,

    pub default_locale: String,

    pub supported_locales: Vec<String>,

    /// "light" or "dark"
    pub default_theme: String,

    /// Lifetime of persisted preferences
    pub preference_ttl_days: i64,

    /// Timeout for spec, catalog and Try-It requests
    pub request_timeout_secs: u64,

    /// File backing the preference store; `None` keeps preferences in memory
    pub preferences_path: Option<PathBuf>,

    pub selectors: SelectorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            locale_path: "/api/v1/locales".to_string(),
            apis: vec![ApiSpec {
                id: "/v3/api-docs".to_string(),
                label: "All APIs".to_string(),
            }],
            default_api: "/v3/api-docs".to_string(),
            default_locale: "en".to_string(),
            supported_locales: vec!["en".to_string(), "tr".to_string()],
            default_theme: "light".to_string(),
            preference_ttl_days: 7,
            request_timeout_secs: 30,
            preferences_path: None,
            selectors: SelectorSettings::default(),
        }
    }
}

/// A spec document the user can switch to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSpec {
    /// Path the document is fetched from, e.g. `/v3/api-docs/users`
    pub id: String,
    pub label: String,
}

/// Selectors for the renderer's generated markup.
///
/// The renderer emits hashed styled-component class names that change between
/// releases, so every structural assumption is kept here and overridable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorSettings {
    /// One block per (method, path) operation
    pub endpoint_section: String,

    /// First block inside a section; the Try-It form goes right after it
    pub header_block: String,

    /// Element holding the path template, looked up inside the header block
    pub endpoint_path: String,

    pub http_verb: String,

    pub property_name: String,

    /// Literal value cell of a header parameter row, most specific first
    pub header_value: Vec<String>,

    pub parameter_heading: String,

    pub sample_heading: String,

    pub header_params_label: String,
    pub query_params_label: String,
    pub path_params_label: String,
    pub request_samples_label: String,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            endpoint_section: ".sc-dcJsrY.kNjBFu".to_string(),
            header_block: ".sc-dkmUuB.iwMnZw".to_string(),
            endpoint_path: ".sc-ejfMa-d.jgeKJH".to_string(),
            http_verb: ".http-verb".to_string(),
            property_name: ".property-name".to_string(),
            header_value: vec![
                ".sc-ddjGPC.lmPAIU.fGykvj".to_string(),
                ".sc-ddjGPC.lmPAIU".to_string(),
            ],
            parameter_heading: "h5".to_string(),
            sample_heading: "h3".to_string(),
            header_params_label: "header Parameters".to_string(),
            query_params_label: "query Parameters".to_string(),
            path_params_label: "path Parameters".to_string(),
            request_samples_label: "Request samples".to_string(),
        }
    }
}
