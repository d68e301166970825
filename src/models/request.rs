use super::api_docs::{HttpMethod, ParamMap};
use serde::{Deserialize, Serialize};

/// The four editable text areas of a Try-It form.
///
/// Headers are `Name: value` lines; path and query parameters are
/// `name=value` lines; the body is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub headers: String,
    pub path_params: String,
    pub query_params: String,
    pub body: String,
}

/// A fully resolved request, rebuilt from form contents on every submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDraft {
    pub method: HttpMethod,
    /// Template with placeholders substituted and the query string appended;
    /// relative to the API origin when the documented path is relative
    pub url: String,
    pub headers: ParamMap,
    /// Always `None` for GET and HEAD
    pub body: Option<String>,
}
