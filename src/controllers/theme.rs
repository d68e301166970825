//! Theme controller: light/dark state, persistence and renderer color tokens

use crate::error::Result;
use crate::prefs::{PreferenceStore, THEME_KEY};
use chrono::Duration;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEvent {
    Toggle,
    Set(Theme),
}

impl Theme {
    /// Anything but `"dark"` is light.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn body_class(&self) -> String {
        format!("theme-{}", self.as_str())
    }

    /// Class of the toggle control, which only marks the dark state.
    pub fn toggle_class(&self) -> Option<&'static str> {
        match self {
            Self::Dark => Some("theme-dark"),
            Self::Light => None,
        }
    }

    pub fn descriptor(&self) -> ThemeDescriptor {
        let (text, text_secondary, background, background_secondary, panel, panel_text) =
            match self {
                Self::Dark => (
                    "#ffffff", "#b0bec5", "#1a202c", "#2d3748", "#2d3748", "#ffffff",
                ),
                Self::Light => (
                    "#000000", "#555555", "#ffffff", "#f4f4f4", "#ffffff", "#000000",
                ),
            };

        ThemeDescriptor {
            colors: Colors {
                primary: Swatch::new(BRAND_GREEN),
                success: Swatch::new(BRAND_GREEN),
                text: Pair::new(text, text_secondary),
                background: Pair::new(background, background_secondary),
            },
            sidebar: PanelColors::new(panel, panel_text),
            right_panel: PanelColors::new(panel, panel_text),
            typography: Typography {
                font_size: "14px".to_string(),
                font_family: "Roboto, sans-serif".to_string(),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const BRAND_GREEN: &str = "#6DB33F";

/// Color tokens in the renderer's theme option shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDescriptor {
    pub colors: Colors,
    pub sidebar: PanelColors,
    pub right_panel: PanelColors,
    pub typography: Typography,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Colors {
    pub primary: Swatch,
    pub success: Swatch,
    pub text: Pair,
    pub background: Pair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swatch {
    pub main: String,
}

impl Swatch {
    fn new(main: &str) -> Self {
        Self {
            main: main.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub primary: String,
    pub secondary: String,
}

impl Pair {
    fn new(primary: &str, secondary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelColors {
    pub background_color: String,
    pub text_color: String,
}

impl PanelColors {
    fn new(background: &str, text: &str) -> Self {
        Self {
            background_color: background.to_string(),
            text_color: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_size: String,
    pub font_family: String,
}

pub fn reduce(theme: Theme, event: ThemeEvent) -> Theme {
    match event {
        ThemeEvent::Toggle => theme.toggled(),
        ThemeEvent::Set(theme) => theme,
    }
}

/// Persist the chosen theme.
pub fn persist(theme: Theme, store: &mut dyn PreferenceStore, ttl: Duration) -> Result<()> {
    store.set(THEME_KEY, theme.as_str(), ttl)
}
