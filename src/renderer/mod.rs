//! Renderer bridge
//!
//! The renderer turns a spec document into documentation markup. It is an
//! external component; the console only relies on the markup shape described
//! by the extractor's selectors.

mod markup;

pub use markup::MarkupRenderer;

use crate::controllers::theme::ThemeDescriptor;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// Options handed to the renderer on every mount.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub scroll_y_offset: u32,
    pub theme: ThemeDescriptor,
    pub hide_download_button: bool,
    pub hide_loading: bool,
    pub hide_logo: bool,
    pub hide_single_request_sample_tab: bool,
}

impl RenderOptions {
    pub fn new(theme: ThemeDescriptor) -> Self {
        Self {
            scroll_y_offset: 50,
            theme,
            hide_download_button: true,
            hide_loading: true,
            hide_logo: true,
            hide_single_request_sample_tab: true,
        }
    }
}

pub trait Renderer: Send + Sync {
    /// Markup for `spec`. Returning is the completion signal.
    fn render(&self, spec: &Value, options: &RenderOptions) -> Result<String>;
}
