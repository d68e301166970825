use super::form::{FormHandle, TryItForm};
use maud::{Markup, html};
use std::collections::HashMap;

/// Visible strings of an injected form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLabels {
    pub button: String,
    pub headers: String,
    pub path_params: String,
    pub query_params: String,
    pub body: String,
    pub send: String,
    pub response: String,
}

impl Default for FormLabels {
    fn default() -> Self {
        Self {
            button: "Try it".to_string(),
            headers: "Headers".to_string(),
            path_params: "Path parameters".to_string(),
            query_params: "Query parameters".to_string(),
            body: "Body".to_string(),
            send: "Send".to_string(),
            response: "Response".to_string(),
        }
    }
}

impl FormLabels {
    /// Override labels present in a message catalog (`api-docs.try-it.*`).
    pub fn apply_catalog(&mut self, catalog: &HashMap<String, String>) {
        let slots: [(&str, &mut String); 7] = [
            ("api-docs.try-it.button", &mut self.button),
            ("api-docs.try-it.headers", &mut self.headers),
            ("api-docs.try-it.path-params", &mut self.path_params),
            ("api-docs.try-it.query-params", &mut self.query_params),
            ("api-docs.try-it.body", &mut self.body),
            ("api-docs.try-it.send", &mut self.send),
            ("api-docs.try-it.response", &mut self.response),
        ];
        for (key, slot) in slots {
            if let Some(text) = catalog.get(key) {
                *slot = text.clone();
            }
        }
    }
}

pub(crate) fn render_form(handle: FormHandle, form: &TryItForm, labels: &FormLabels) -> Markup {
    let id = format!("{}-{}", handle.generation, handle.index);
    let display = if form.expanded { "block" } else { "none" };

    html! {
        div class="try-it-button-container" {
            button type="button" class="try-it-button" data-form=(id) { (labels.button) }
        }
        div class="try-it-form-container" style=(format!("display: {display}")) {
            form data-method=(form.endpoint.method.as_str()) data-endpoint=(form.endpoint.path) data-form=(id) {
                label { (labels.headers) textarea class="headers" { (form.fields.headers) } }
                label { (labels.path_params) textarea class="path-params" { (form.fields.path_params) } }
                label { (labels.query_params) textarea class="query-params" { (form.fields.query_params) } }
                label { (labels.body) textarea class="body" { (form.fields.body) } }
                button type="submit" { (labels.send) }
                div class="response" {
                    span { (labels.response) }
                    pre class="response-content" { (form.response.as_deref().unwrap_or_default()) }
                }
            }
        }
    }
}
