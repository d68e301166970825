//! Fake documentation backend shared by the integration tests
//!
//! Serves two spec documents, the locale catalog and an `/echo` tree that
//! reflects every request it receives as JSON.

use apidocs_console::config::{ApiSpec, Settings};
use apidocs_console::prefs::MemoryStore;
use apidocs_console::renderer::MarkupRenderer;
use apidocs_console::App;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use warp::Filter;
use warp::http::{HeaderMap, Method};
use warp::hyper::body::Bytes;
use warp::path::FullPath;

pub const ALL_APIS: &str = "/v3/api-docs";
pub const USERS_API: &str = "/v3/api-docs/users";
/// Serves the users spec after [`SLOW_DELAY`].
pub const SLOW_API: &str = "/v3/api-docs/slow";
pub const SLOW_DELAY: Duration = Duration::from_millis(1500);

pub fn all_spec() -> Value {
    json!({
        "openapi": "3.0.1",
        "info": { "title": "Demo API" },
        "paths": {
            "/echo/users/{id}": {
                "get": {
                    "summary": "Get user",
                    "parameters": [
                        { "name": "id", "in": "path", "example": 42, "schema": { "type": "integer" } },
                        { "name": "verbose", "in": "query", "schema": { "type": "boolean", "default": false } },
                        { "name": "X-Tenant", "in": "header", "example": "acme", "schema": { "type": "string" } }
                    ]
                }
            },
            "/echo/users": {
                "post": {
                    "summary": "Create user",
                    "requestBody": {
                        "content": { "application/json": { "example": { "name": "Ada" } } }
                    }
                }
            },
            "/echo/items/{itemId}": {
                "get": { "summary": "Get item" }
            }
        }
    })
}

pub fn users_spec() -> Value {
    json!({
        "openapi": "3.0.1",
        "info": { "title": "Users API" },
        "paths": {
            "/echo/users/{id}": {
                "delete": {
                    "summary": "Delete user",
                    "parameters": [
                        { "name": "id", "in": "path", "example": 7, "schema": { "type": "integer" } }
                    ]
                }
            }
        }
    })
}

fn catalog(language: Option<String>) -> Value {
    let turkish = language
        .as_deref()
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("tr"));
    if turkish {
        json!({
            "api-docs.title": "API Dokümantasyonu",
            "api-docs.topbar.title": "API Dokümantasyonu",
            "api-docs.theme.light": "Açık",
            "api-docs.theme.dark": "Koyu",
            "api-docs.try-it.button": "Dene"
        })
    } else {
        json!({
            "api-docs.title": "API Documentation",
            "api-docs.topbar.title": "API Documentation"
        })
    }
}

/// Start the backend on an ephemeral port and return its origin.
pub fn spawn_backend() -> String {
    let all = warp::path!("v3" / "api-docs")
        .and(warp::get())
        .map(|| warp::reply::json(&all_spec()));

    let users = warp::path!("v3" / "api-docs" / "users")
        .and(warp::get())
        .map(|| warp::reply::json(&users_spec()));

    let slow = warp::path!("v3" / "api-docs" / "slow")
        .and(warp::get())
        .and_then(|| async {
            tokio::time::sleep(SLOW_DELAY).await;
            Ok::<_, warp::Rejection>(warp::reply::json(&users_spec()))
        });

    let locales = warp::path!("api" / "v1" / "locales")
        .and(warp::get())
        .and(warp::header::optional::<String>("accept-language"))
        .map(|language| warp::reply::json(&catalog(language)));

    let echo = warp::path("echo")
        .and(warp::method())
        .and(warp::path::full())
        .and(
            warp::query::raw()
                .or(warp::any().map(String::new))
                .unify(),
        )
        .and(warp::header::headers_cloned())
        .and(warp::body::bytes())
        .map(
            |method: Method, path: FullPath, query: String, headers: HeaderMap, body: Bytes| {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string)
                };
                warp::reply::json(&json!({
                    "method": method.as_str(),
                    "path": path.as_str(),
                    "query": query,
                    "accept": header("accept"),
                    "content_type": header("content-type"),
                    "tenant": header("x-tenant"),
                    "body": String::from_utf8_lossy(&body),
                }))
            },
        );

    let routes = all.or(users).or(slow).or(locales).or(echo);
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{}", addr)
}

pub fn settings(base_url: &str) -> Settings {
    Settings {
        base_url: base_url.to_string(),
        apis: vec![
            ApiSpec {
                id: ALL_APIS.to_string(),
                label: "All APIs".to_string(),
            },
            ApiSpec {
                id: USERS_API.to_string(),
                label: "Users".to_string(),
            },
            ApiSpec {
                id: SLOW_API.to_string(),
                label: "Users (slow)".to_string(),
            },
        ],
        request_timeout_secs: 5,
        ..Settings::default()
    }
}

pub fn app(base_url: &str) -> App {
    App::new(
        settings(base_url),
        Box::new(MemoryStore::new()),
        Arc::new(MarkupRenderer),
    )
    .expect("app builds")
}
