//! Try-It console
//!
//! Injects one request-builder form per endpoint section of a freshly
//! rendered tree, prefills it from the section's own documentation and
//! submits it against the live API.
//!
//! Submission is split into three steps so several requests can be in
//! flight while the mount keeps changing:
//! [`TryItConsole::draft`] reads the form, [`TryItConsole::execute`] performs
//! the call without touching the mount, and [`Mount::write_response`] puts the
//! result back (or refuses, if the form is gone).

mod form;
mod markup;
mod prefill;
pub mod request;

pub use form::{FormHandle, Mount, TryItForm};
pub use markup::FormLabels;
pub use prefill::Prefill;

use crate::error::{Error, Result};
use crate::extractor::{self, DocExtractor};
use crate::models::{HttpMethod, RequestDraft};
use scraper::Html;
use std::sync::Arc;
use tracing::{debug, error, info};
use url::Url;

pub struct TryItConsole {
    extractor: Arc<dyn DocExtractor>,
    client: reqwest::Client,
    base_url: Url,
}

impl TryItConsole {
    pub fn new(extractor: Arc<dyn DocExtractor>, client: reqwest::Client, base_url: Url) -> Self {
        Self {
            extractor,
            client,
            base_url,
        }
    }

    /// Parse renderer output and attach one collapsed form per endpoint
    /// section. Sections the extractor cannot make sense of get no form.
    pub fn inject(&self, generation: u64, api: &str, rendered: &str) -> Mount {
        let doc = Html::parse_fragment(rendered);
        let forms: Vec<_> = self
            .extractor
            .endpoint_sections(&doc)
            .into_iter()
            .map(form::TryItForm::new)
            .collect();

        info!(
            "Injected {} Try-It forms into mount {} ({})",
            forms.len(),
            generation,
            api
        );
        Mount::new(generation, api.to_string(), doc, forms)
    }

    /// Show or hide a form; every reveal re-runs prefill. Returns whether the
    /// form is now visible.
    pub fn toggle(&self, mount: &mut Mount, handle: FormHandle) -> Result<bool> {
        let form = mount.form_mut(handle)?;
        form.expanded = !form.expanded;
        let expanded = form.expanded;

        if expanded {
            self.prefill(mount, handle)?;
        }
        Ok(expanded)
    }

    /// Overwrite the form's fields from the current documentation tree.
    pub fn prefill(&self, mount: &mut Mount, handle: FormHandle) -> Result<()> {
        let section = mount.form(handle)?.section;
        let prefill = match extractor::element(mount.doc(), section) {
            Some(section) => prefill::scrape(self.extractor.as_ref(), section),
            None => {
                debug!("Section of form {:?} not found, nothing to prefill", handle);
                Prefill::default()
            }
        };

        prefill.apply(&mut mount.form_mut(handle)?.fields);
        Ok(())
    }

    /// Build the request from whatever the form holds right now.
    pub fn draft(&self, mount: &Mount, handle: FormHandle) -> Result<RequestDraft> {
        let form = mount.form(handle)?;
        Ok(request::build_draft(&form.endpoint, &form.fields))
    }

    /// Send the request once and return the text for the response area:
    /// the raw body on any HTTP status, `Error: ...` on transport failure.
    pub async fn execute(&self, draft: &RequestDraft) -> String {
        match self.send(draft).await {
            Ok(text) => text,
            Err(e) => {
                error!("Try-It request {} {} failed: {}", draft.method, draft.url, e);
                match e {
                    Error::Http(e) => format!("Error: {e}"),
                    other => format!("Error: {other}"),
                }
            }
        }
    }

    async fn send(&self, draft: &RequestDraft) -> Result<String> {
        let url = self.base_url.join(&draft.url)?;
        debug!("Try-It {} {}", draft.method, url);

        let mut request = self.client.request(reqwest_method(draft.method), url);
        for (name, value) in draft.headers.iter() {
            request = request.header(name, value);
        }
        if let Some(body) = &draft.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        Ok(response.text().await?)
    }

    /// Draft, execute and write back in one go.
    ///
    /// Holds the mount across the request; callers that need other work to
    /// proceed meanwhile use the three steps separately.
    pub async fn submit(&self, mount: &mut Mount, handle: FormHandle) -> Result<String> {
        let draft = self.draft(mount, handle)?;
        let text = self.execute(&draft).await;
        mount.write_response(handle, text.clone())?;
        Ok(text)
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}
