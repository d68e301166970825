use super::{DocExtractor, SectionRef};
use crate::config::SelectorSettings;
use crate::error::{Error, Result};
use crate::models::{EndpointInfo, HttpMethod, ParamCategory, ParamEntry};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static MARKER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:example|default)\s*:\s*").expect("static regex")
});

const EXAMPLE_MARKER: &str = "example:";
const DEFAULT_MARKER: &str = "default:";

/// Extractor for Redoc-generated documentation.
pub struct RedocExtractor {
    section: Selector,
    header_block: Selector,
    endpoint_path: Selector,
    http_verb: Selector,
    property_name: Selector,
    header_value: Vec<Selector>,
    parameter_heading: Selector,
    sample_heading: Selector,
    row: Selector,
    span: Selector,
    code: Selector,
    header_label: String,
    query_label: String,
    path_label: String,
    samples_label: String,
}

impl RedocExtractor {
    pub fn new(selectors: &SelectorSettings) -> Result<Self> {
        Ok(Self {
            section: parse_selector(&selectors.endpoint_section)?,
            header_block: parse_selector(&selectors.header_block)?,
            endpoint_path: parse_selector(&selectors.endpoint_path)?,
            http_verb: parse_selector(&selectors.http_verb)?,
            property_name: parse_selector(&selectors.property_name)?,
            header_value: selectors
                .header_value
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_>>()?,
            parameter_heading: parse_selector(&selectors.parameter_heading)?,
            sample_heading: parse_selector(&selectors.sample_heading)?,
            row: parse_selector("tr")?,
            span: parse_selector("span")?,
            code: parse_selector("code")?,
            header_label: selectors.header_params_label.to_lowercase(),
            query_label: selectors.query_params_label.to_lowercase(),
            path_label: selectors.path_params_label.to_lowercase(),
            samples_label: selectors.request_samples_label.to_lowercase(),
        })
    }

    fn parse_section(&self, section: ElementRef<'_>) -> Option<SectionRef> {
        let header_block = section.select(&self.header_block).next()?;
        let path = header_block.select(&self.endpoint_path).next()?;
        let path = text_of(path).trim().to_string();
        if path.is_empty() {
            return None;
        }

        let verb = section.select(&self.http_verb).next()?;
        let method = match text_of(verb).parse::<HttpMethod>() {
            Ok(method) => method,
            Err(e) => {
                debug!("Skipping section for {}: {}", path, e);
                return None;
            }
        };

        Some(SectionRef {
            section: section.id(),
            header_block: header_block.id(),
            endpoint: EndpointInfo { method, path },
        })
    }

    /// The element right after the first heading whose text contains `label`.
    fn table_after<'a>(
        &self,
        section: ElementRef<'a>,
        heading: &Selector,
        label: &str,
    ) -> Option<ElementRef<'a>> {
        let heading = section
            .select(heading)
            .find(|h| text_of(*h).to_lowercase().contains(label))?;
        heading.next_siblings().find_map(ElementRef::wrap)
    }

    fn header_row(&self, row: ElementRef<'_>) -> Option<ParamEntry> {
        let name = row.select(&self.property_name).next()?;
        let value = self
            .header_value
            .iter()
            .find_map(|selector| row.select(selector).next())?;

        let name = text_of(name).trim().to_string();
        if name.is_empty() {
            return None;
        }
        Some(ParamEntry::new(name, strip_quotes(&text_of(value))))
    }

    /// Example wins over Default; rows with neither are dropped.
    fn parameter_row(&self, row: ElementRef<'_>) -> Option<ParamEntry> {
        let name = text_of(row.select(&self.property_name).next()?)
            .trim()
            .to_string();
        if name.is_empty() {
            return None;
        }

        let value = self
            .marked_value(row, EXAMPLE_MARKER)
            .map(|raw| match raw.split_once('=') {
                Some((_, value)) => value.to_string(),
                None => raw,
            })
            .map(|v| strip_quotes(&v))
            .filter(|v| !v.is_empty())
            .or_else(|| {
                self.marked_value(row, DEFAULT_MARKER)
                    .map(|v| strip_quotes(&v))
                    .filter(|v| !v.is_empty())
            })?;

        Some(ParamEntry::new(name, value))
    }

    /// Text of the element following the span carrying `marker`, or the rest
    /// of the span's own text when the value is inline.
    fn marked_value(&self, row: ElementRef<'_>, marker: &str) -> Option<String> {
        let span = row
            .select(&self.span)
            .find(|span| text_of(*span).to_lowercase().contains(marker))?;

        let raw = match span.next_siblings().find_map(ElementRef::wrap) {
            Some(value) => text_of(value),
            None => text_of(span),
        };
        Some(MARKER_PREFIX.replace(raw.trim(), "").into_owned())
    }
}

impl DocExtractor for RedocExtractor {
    fn endpoint_sections(&self, doc: &Html) -> Vec<SectionRef> {
        let sections: Vec<_> = doc
            .select(&self.section)
            .filter_map(|section| self.parse_section(section))
            .collect();
        debug!("Found {} endpoint sections", sections.len());
        sections
    }

    fn parameters(
        &self,
        section: ElementRef<'_>,
        category: ParamCategory,
    ) -> Option<Vec<ParamEntry>> {
        let label = match category {
            ParamCategory::Header => &self.header_label,
            ParamCategory::Query => &self.query_label,
            ParamCategory::Path => &self.path_label,
        };
        let table = self.table_after(section, &self.parameter_heading, label)?;

        let entries = table
            .select(&self.row)
            .filter_map(|row| match category {
                ParamCategory::Header => self.header_row(row),
                ParamCategory::Query | ParamCategory::Path => self.parameter_row(row),
            })
            .collect();
        Some(entries)
    }

    fn request_sample(&self, section: ElementRef<'_>) -> Option<String> {
        let container = self.table_after(section, &self.sample_heading, &self.samples_label)?;
        let code = container.select(&self.code).next()?;
        Some(text_of(code))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::config(format!("invalid selector `{selector}`: {e:?}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn strip_quotes(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}
