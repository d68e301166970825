//! Preference store: persisted `lang` and `theme` choices

pub mod cookie;
mod store;

pub use cookie::{cookie_value, set_cookie};
pub use store::{
    FileStore, LANG_KEY, MemoryStore, PreferenceStore, THEME_KEY, expiry, ttl_days,
};
