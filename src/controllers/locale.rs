//! Locale controller: active locale resolution, message catalogs and the
//! page text that follows them

use crate::error::Result;
use crate::prefs::{LANG_KEY, PreferenceStore};
use chrono::Duration;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Translated UI strings keyed like `api-docs.title`.
pub type Catalog = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleEvent {
    Select(String),
}

/// persisted choice → browser language → fallback.
pub fn resolve(persisted: Option<&str>, browser: Option<&str>, fallback: &str) -> String {
    [persisted, browser]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|tag| !tag.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// A blank selection keeps the current locale.
pub fn reduce(current: &str, event: LocaleEvent) -> String {
    match event {
        LocaleEvent::Select(tag) if tag.trim().is_empty() => current.to_string(),
        LocaleEvent::Select(tag) => tag.trim().to_string(),
    }
}

/// `tr-TR` → `tr`; what the language selector shows.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// First language of an `Accept-Language` header.
pub fn from_accept_language(header: &str) -> Option<String> {
    header
        .split(',')
        .map(|part| part.split(';').next().unwrap_or_default().trim())
        .find(|tag| !tag.is_empty() && *tag != "*")
        .map(str::to_string)
}

/// Language of a POSIX locale such as `tr_TR.UTF-8`, as a language tag.
pub fn from_posix_locale(value: &str) -> Option<String> {
    let tag = value.split(['.', '@']).next()?.trim();
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.replace('_', "-"))
}

pub fn persist(tag: &str, store: &mut dyn PreferenceStore, ttl: Duration) -> Result<()> {
    store.set(LANG_KEY, tag, ttl)
}

/// Fetch the message catalog for `locale`.
pub async fn fetch_catalog(client: &reqwest::Client, url: Url, locale: &str) -> Result<Catalog> {
    debug!("Fetching catalog for {} from {}", locale, url);
    let catalog = client
        .get(url)
        .header(reqwest::header::ACCEPT_LANGUAGE, locale)
        .send()
        .await?
        .error_for_status()?
        .json::<Catalog>()
        .await?;
    Ok(catalog)
}

/// The fixed set of page text nodes that follow the locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChrome {
    pub title: String,
    pub topbar_title: String,
    pub language_english: String,
    pub language_turkish: String,
    pub theme_light: String,
    pub theme_dark: String,
}

impl Default for PageChrome {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            topbar_title: "API Documentation".to_string(),
            language_english: "English".to_string(),
            language_turkish: "Turkish".to_string(),
            theme_light: "Light".to_string(),
            theme_dark: "Dark".to_string(),
        }
    }
}

impl PageChrome {
    /// Rewrite every node whose key is in the catalog; others keep their text.
    pub fn apply_catalog(&mut self, catalog: &Catalog) {
        let slots: [(&str, &mut String); 6] = [
            ("api-docs.title", &mut self.title),
            ("api-docs.topbar.title", &mut self.topbar_title),
            ("api-docs.language.english", &mut self.language_english),
            ("api-docs.language.turkish", &mut self.language_turkish),
            ("api-docs.theme.light", &mut self.theme_light),
            ("api-docs.theme.dark", &mut self.theme_dark),
        ];
        for (key, slot) in slots {
            if let Some(text) = catalog.get(key) {
                *slot = text.clone();
            }
        }
    }
}
