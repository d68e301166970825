//! Turning Try-It form contents into a request

use crate::models::{EndpointInfo, FormFields, ParamMap, RequestDraft};
use crate::prefs::cookie::COMPONENT;
use percent_encoding::utf8_percent_encode;

pub const JSON: &str = "application/json";

/// `Name: value` lines split on the first colon. Lines without a colon or
/// with an empty side are dropped.
pub fn parse_headers(text: &str) -> ParamMap {
    parse_lines(text, ':')
}

/// `name=value` lines split on the first `=`, same dropping rules as headers.
pub fn parse_params(text: &str) -> ParamMap {
    parse_lines(text, '=')
}

fn parse_lines(text: &str, separator: char) -> ParamMap {
    text.lines()
        .filter_map(|line| line.split_once(separator))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect()
}

/// Substitute `{key}` placeholders with values as given. Keys without a
/// placeholder are ignored; placeholders without a key stay in the URL.
pub fn resolve_path(template: &str, params: &ParamMap) -> String {
    params
        .iter()
        .fold(template.to_string(), |url, (key, value)| {
            url.replace(&format!("{{{key}}}"), value)
        })
}

/// `k=v&k=v` with every key and value percent-encoded.
pub fn encode_query(params: &ParamMap) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, COMPONENT),
                utf8_percent_encode(value, COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the request for `endpoint` from the current form contents.
pub fn build_draft(endpoint: &EndpointInfo, fields: &FormFields) -> RequestDraft {
    let method = endpoint.method;

    let mut headers = parse_headers(&fields.headers);
    if method.has_body() && !headers.contains_key_ignore_case("Content-Type") {
        headers.insert("Content-Type", JSON);
    }
    if !headers.contains_key_ignore_case("Accept") {
        headers.insert("Accept", JSON);
    }

    let mut url = resolve_path(&endpoint.path, &parse_params(&fields.path_params));
    let query = encode_query(&parse_params(&fields.query_params));
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    RequestDraft {
        method,
        url,
        headers,
        body: method.has_body().then(|| fields.body.clone()),
    }
}
