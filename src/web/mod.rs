mod server;

pub use server::{SharedApp, routes, run_server};
