//! Try-It console for rendered API documentation
//!
//! Renders an OpenAPI document into documentation markup, injects a
//! request-builder form under every endpoint, prefills the forms from the
//! documentation itself and submits them against the live API. Spec, locale
//! and theme changes tear the mount down and rebuild it.

pub mod app;
pub mod config;
pub mod console;
pub mod controllers;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod prefs;
pub mod renderer;
pub mod web;

pub use app::{App, AppState, LoadOutcome};
pub use error::{Error, Result};
