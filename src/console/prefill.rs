//! Scraping form prefill values out of an endpoint section

use crate::extractor::DocExtractor;
use crate::models::{FormFields, ParamCategory, ParamEntry};
use scraper::ElementRef;

/// Prefill values; `None` means the section had nothing for that field and
/// the field is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub headers: Option<String>,
    pub path_params: Option<String>,
    pub query_params: Option<String>,
    pub body: Option<String>,
}

impl Prefill {
    /// Overwrite (never append to) the fields this prefill has values for.
    pub fn apply(self, fields: &mut FormFields) {
        if let Some(headers) = self.headers {
            fields.headers = headers;
        }
        if let Some(path_params) = self.path_params {
            fields.path_params = path_params;
        }
        if let Some(query_params) = self.query_params {
            fields.query_params = query_params;
        }
        if let Some(body) = self.body {
            fields.body = body;
        }
    }
}

pub fn scrape(extractor: &dyn DocExtractor, section: ElementRef<'_>) -> Prefill {
    let lines = |category: ParamCategory, separator: &str| {
        extractor
            .parameters(section, category)
            .map(|entries| join_lines(&entries, separator))
    };

    Prefill {
        headers: lines(ParamCategory::Header, ": "),
        path_params: lines(ParamCategory::Path, "="),
        query_params: lines(ParamCategory::Query, "="),
        body: extractor.request_sample(section),
    }
}

fn join_lines(entries: &[ParamEntry], separator: &str) -> String {
    entries
        .iter()
        .map(|entry| format!("{}{}{}\n", entry.name, separator, entry.value))
        .collect()
}
