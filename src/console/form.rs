use crate::dom::{self, Injections};
use crate::error::{Error, Result};
use crate::extractor::SectionRef;
use crate::models::{EndpointInfo, FormFields, HttpMethod};
use ego_tree::NodeId;
use maud::Markup;
use scraper::Html;
use serde::{Deserialize, Serialize};

use super::markup::{self, FormLabels};

/// Addresses one form of one mount. Handles from an earlier mount are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormHandle {
    pub generation: u64,
    pub index: usize,
}

/// A Try-It form bound to one endpoint section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TryItForm {
    pub endpoint: EndpointInfo,
    pub expanded: bool,
    pub fields: FormFields,
    /// Raw response text or `Error: ...` from the last completed submission
    pub response: Option<String>,
    #[serde(skip)]
    pub(crate) section: NodeId,
    #[serde(skip)]
    pub(crate) header_block: NodeId,
}

impl TryItForm {
    pub(crate) fn new(section: SectionRef) -> Self {
        Self {
            endpoint: section.endpoint,
            expanded: false,
            fields: FormFields::default(),
            response: None,
            section: section.section,
            header_block: section.header_block,
        }
    }
}

/// One rendered documentation tree and the forms injected into it.
///
/// A mount is built whole from renderer output and dropped whole on the next
/// render; nothing outlives it except handles, which then fail as stale.
#[derive(Debug)]
pub struct Mount {
    generation: u64,
    api: String,
    doc: Html,
    forms: Vec<TryItForm>,
}

impl Mount {
    pub(crate) fn new(generation: u64, api: String, doc: Html, forms: Vec<TryItForm>) -> Self {
        Self {
            generation,
            api,
            doc,
            forms,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Spec this tree was rendered from.
    pub fn api(&self) -> &str {
        &self.api
    }

    pub(crate) fn doc(&self) -> &Html {
        &self.doc
    }

    pub fn forms(&self) -> &[TryItForm] {
        &self.forms
    }

    pub fn handles(&self) -> impl Iterator<Item = FormHandle> + '_ {
        (0..self.forms.len()).map(|index| FormHandle {
            generation: self.generation,
            index,
        })
    }

    /// Form documenting `method path`, if any.
    pub fn find(&self, method: HttpMethod, path: &str) -> Option<FormHandle> {
        self.forms
            .iter()
            .position(|f| f.endpoint.method == method && f.endpoint.path == path)
            .map(|index| FormHandle {
                generation: self.generation,
                index,
            })
    }

    fn check(&self, handle: FormHandle) -> Result<usize> {
        if handle.generation != self.generation {
            return Err(Error::StaleForm {
                generation: handle.generation,
                index: handle.index,
            });
        }
        if handle.index >= self.forms.len() {
            return Err(Error::NoSuchForm {
                index: handle.index,
            });
        }
        Ok(handle.index)
    }

    pub fn form(&self, handle: FormHandle) -> Result<&TryItForm> {
        let index = self.check(handle)?;
        Ok(&self.forms[index])
    }

    pub(crate) fn form_mut(&mut self, handle: FormHandle) -> Result<&mut TryItForm> {
        let index = self.check(handle)?;
        Ok(&mut self.forms[index])
    }

    /// Replace the editable fields, as a user typing into the form would.
    pub fn edit(&mut self, handle: FormHandle, fields: FormFields) -> Result<()> {
        self.form_mut(handle)?.fields = fields;
        Ok(())
    }

    /// Replace the response area. Fails on stale handles so late responses
    /// never land in a newer tree.
    pub fn write_response(&mut self, handle: FormHandle, text: String) -> Result<()> {
        self.form_mut(handle)?.response = Some(text);
        Ok(())
    }

    /// The documentation tree with every form placed after its header block.
    pub fn to_markup(&self, labels: &FormLabels) -> Markup {
        let injections: Injections = self
            .handles()
            .zip(&self.forms)
            .map(|(handle, form)| (form.header_block, markup::render_form(handle, form, labels)))
            .collect();
        dom::inner_html(&self.doc, self.doc.root_element().id(), &injections)
    }

    pub fn to_html(&self, labels: &FormLabels) -> String {
        self.to_markup(labels).into_string()
    }
}
