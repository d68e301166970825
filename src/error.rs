//! Error types for the console and its controllers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Infrastructure
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // ─────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown API spec: {id}")]
    UnknownApi { id: String },

    #[error("Preference store error at {path}: {message}")]
    Preferences { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────
    #[error("Renderer error: {message}")]
    Render { message: String },

    #[error("Nothing is mounted")]
    NotMounted,

    // ─────────────────────────────────────────────────────────────
    // Try-It console
    // ─────────────────────────────────────────────────────────────
    #[error("Try-It form {index} belongs to mount {generation}, which is no longer mounted")]
    StaleForm { generation: u64, index: usize },

    #[error("No Try-It form at index {index}")]
    NoSuchForm { index: usize },

    #[error("No endpoint matches {method} {path}")]
    NoSuchEndpoint { method: String, path: String },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn preferences(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Preferences {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Errors caused by a handle outliving its mount, as opposed to real faults.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleForm { .. })
    }
}
