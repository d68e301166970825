//! HTML output
//!
//! - `serialize`: writes a parsed tree back out, splicing injected markup
//!   after chosen nodes
//! - `page`: the surrounding documentation page (chrome, selectors, loader)

pub mod page;
mod serialize;

pub use serialize::{Injections, inner_html};
