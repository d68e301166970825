mod common;

use apidocs_console::web::{self, SharedApp};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use warp::http::StatusCode;

fn shared(base: &str) -> SharedApp {
    Arc::new(Mutex::new(common::app(base)))
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("JSON reply")
}

#[tokio::test]
async fn test_index_bootstraps_from_cookies() {
    let base = common::spawn_backend();
    let app = shared(&base);
    let routes = web::routes(app.clone());

    let res = warp::test::request()
        .method("GET")
        .path("/")
        .header("cookie", "lang=tr; theme=dark")
        .header("accept-language", "en-US,en;q=0.9")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let html = String::from_utf8_lossy(res.body());
    assert!(html.contains(r#"<html lang="tr">"#));
    assert!(html.contains(r#"<body class="theme-dark">"#));
    assert_eq!(html.matches(r#"class="try-it-form-container""#).count(), 3);

    // A second visit shows the same mount instead of reloading.
    let res = warp::test::request().path("/").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.lock().await.state().render.generation, 1);
}

#[tokio::test]
async fn test_locale_and_theme_routes_set_cookies() {
    let base = common::spawn_backend();
    let routes = web::routes(shared(&base));
    warp::test::request().path("/").reply(&routes).await;

    let res = warp::test::request()
        .method("POST")
        .path("/locale")
        .json(&json!({ "lang": "tr" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("lang=tr; Expires="), "{cookie}");
    assert!(cookie.ends_with("; Path=/"), "{cookie}");
    assert_eq!(json_body(res.body())["status"], "mounted");

    let res = warp::test::request()
        .method("POST")
        .path("/theme/toggle")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("theme=dark; "), "{cookie}");
    assert_eq!(json_body(res.body())["generation"], 3);
}

#[tokio::test]
async fn test_api_route_rejects_unknown_spec() {
    let base = common::spawn_backend();
    let routes = web::routes(shared(&base));
    warp::test::request().path("/").reply(&routes).await;

    let res = warp::test::request()
        .method("POST")
        .path("/api")
        .json(&json!({ "spec": "/v3/api-docs/nope" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = warp::test::request()
        .method("POST")
        .path("/api")
        .json(&json!({ "spec": common::USERS_API }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res.body()),
        json!({ "status": "mounted", "generation": 2, "forms": 1 })
    );
}

#[tokio::test]
async fn test_page_is_served_while_a_spec_is_loading() {
    let base = common::spawn_backend();
    let routes = web::routes(shared(&base));
    warp::test::request().path("/").reply(&routes).await;

    let switch = warp::test::request()
        .method("POST")
        .path("/api")
        .json(&json!({ "spec": common::SLOW_API }))
        .reply(&routes);
    let visit = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let started = Instant::now();
        let res = warp::test::request().path("/").reply(&routes).await;
        (res, started.elapsed())
    };
    let (switched, (page, waited)) = tokio::join!(switch, visit);

    assert!(waited < common::SLOW_DELAY / 2, "page waited {waited:?}");
    assert_eq!(page.status(), StatusCode::OK);
    let html = String::from_utf8_lossy(page.body());
    assert!(html.contains(r#"<div id="loader" style="display: block">"#));
    assert!(!html.contains("try-it-form-container"));

    assert_eq!(
        json_body(switched.body()),
        json!({ "status": "mounted", "generation": 2, "forms": 1 })
    );
}

#[tokio::test]
async fn test_newer_spec_change_supersedes_a_slow_one() {
    let base = common::spawn_backend();
    let app = shared(&base);
    let routes = web::routes(app.clone());
    warp::test::request().path("/").reply(&routes).await;

    let slow = warp::test::request()
        .method("POST")
        .path("/api")
        .json(&json!({ "spec": common::SLOW_API }))
        .reply(&routes);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        warp::test::request()
            .method("POST")
            .path("/api")
            .json(&json!({ "spec": common::USERS_API }))
            .reply(&routes)
            .await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(json_body(slow.body()), json!({ "status": "superseded" }));
    assert_eq!(
        json_body(fast.body()),
        json!({ "status": "mounted", "generation": 3, "forms": 1 })
    );
    let app = app.lock().await;
    assert_eq!(app.state().api, common::USERS_API);
    assert!(!app.state().render.busy);
}

#[tokio::test]
async fn test_try_routes_toggle_and_submit() {
    let base = common::spawn_backend();
    let app = shared(&base);
    let routes = web::routes(app.clone());
    warp::test::request().path("/").reply(&routes).await;

    let handle = app
        .lock()
        .await
        .mount()
        .unwrap()
        .find(apidocs_console::models::HttpMethod::Post, "/echo/users")
        .unwrap();

    let res = warp::test::request()
        .method("POST")
        .path(&format!("/try/{}/{}/toggle", handle.generation, handle.index))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let form = json_body(res.body());
    assert_eq!(form["expanded"], true);
    assert_eq!(form["endpoint"]["method"], "POST");

    let res = warp::test::request()
        .method("POST")
        .path(&format!("/try/{}/{}", handle.generation, handle.index))
        .json(&json!({ "body": "{}" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let response = json_body(res.body())["response"]
        .as_str()
        .unwrap()
        .to_string();
    let echoed: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["body"], "{}");
    assert_eq!(echoed["content_type"], "application/json");
}

#[tokio::test]
async fn test_stale_and_missing_forms() {
    let base = common::spawn_backend();
    let routes = web::routes(shared(&base));

    let res = warp::test::request()
        .method("POST")
        .path("/try/1/0/toggle")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    warp::test::request().path("/").reply(&routes).await;
    warp::test::request()
        .method("POST")
        .path("/theme/toggle")
        .reply(&routes)
        .await;

    let res = warp::test::request()
        .method("POST")
        .path("/try/1/0")
        .json(&json!({}))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::GONE);

    let res = warp::test::request()
        .method("POST")
        .path("/try/2/99/toggle")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_theme_route_skips_cookie_with_unrepresentable_lifetime() {
    let base = common::spawn_backend();
    let mut settings = common::settings(&base);
    settings.preference_ttl_days = i64::MAX;
    let app = apidocs_console::App::new(
        settings,
        Box::new(apidocs_console::prefs::MemoryStore::new()),
        Arc::new(apidocs_console::renderer::MarkupRenderer),
    )
    .unwrap();
    let routes = web::routes(Arc::new(Mutex::new(app)));

    let res = warp::test::request()
        .path("/")
        .header("cookie", "theme=dark")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = warp::test::request()
        .method("POST")
        .path("/theme/toggle")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("set-cookie").is_none());
    assert_eq!(json_body(res.body())["status"], "mounted");
}

#[tokio::test]
async fn test_health() {
    let routes = web::routes(shared("http://127.0.0.1:9"));
    let res = warp::test::request().path("/health").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res.body()), json!({ "status": "healthy" }));
}
