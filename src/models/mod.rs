mod api_docs;
mod request;

pub use api_docs::{EndpointInfo, HttpMethod, ParamCategory, ParamEntry, ParamMap};
pub use request::{FormFields, RequestDraft};
