//! Documentation extractor
//!
//! The renderer's markup is an untyped external contract. Everything the
//! console needs from it (which blocks are endpoints, where the parameter
//! tables are, where the request sample lives) goes through [`DocExtractor`],
//! so a renderer upgrade only touches this module.

mod redoc;

pub use redoc::RedocExtractor;

use crate::models::{EndpointInfo, ParamCategory, ParamEntry};
use ego_tree::NodeId;
use scraper::{ElementRef, Html};

/// An endpoint section located in a rendered tree.
///
/// Node ids are only meaningful for the tree they were extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    pub section: NodeId,
    /// Block the Try-It form is placed after
    pub header_block: NodeId,
    pub endpoint: EndpointInfo,
}

pub trait DocExtractor: Send + Sync {
    /// Every endpoint section with the markup needed to host a form.
    /// Sections missing their header block, path or verb are skipped.
    fn endpoint_sections(&self, doc: &Html) -> Vec<SectionRef>;

    /// Parameter rows of one category, or `None` when the section has no
    /// table for it.
    fn parameters(&self, section: ElementRef<'_>, category: ParamCategory)
    -> Option<Vec<ParamEntry>>;

    /// Text of the first request-sample code block, verbatim.
    fn request_sample(&self, section: ElementRef<'_>) -> Option<String>;
}

/// Resolve a node id back to an element of `doc`.
pub fn element(doc: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    doc.tree.get(id).and_then(ElementRef::wrap)
}
