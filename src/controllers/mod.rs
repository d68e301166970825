//! Page-state controllers
//!
//! Each controller is a pure `(state, event) -> state` reduction plus a small
//! side-effecting step; [`crate::app::App`] owns the state and runs the
//! effects.

pub mod locale;
pub mod render;
pub mod theme;

pub use locale::{Catalog, LocaleEvent, PageChrome};
pub use render::{
    RenderEffect, RenderEvent, RenderPhase, RenderState, RenderTarget, RenderTrigger, transition,
};
pub use theme::{Theme, ThemeDescriptor, ThemeEvent};
