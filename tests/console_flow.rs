mod common;

use apidocs_console::controllers::{RenderPhase, RenderTrigger, Theme};
use apidocs_console::models::{FormFields, HttpMethod};
use apidocs_console::{Error, LoadOutcome};
use common::{ALL_APIS, USERS_API};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn echo(text: &str) -> Value {
    serde_json::from_str(text).expect("echo reply is JSON")
}

#[tokio::test]
async fn test_initial_load_mounts_one_form_per_endpoint() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);

    let outcome = app.start(None).await;
    assert_eq!(
        outcome,
        LoadOutcome::Mounted {
            generation: 1,
            forms: 3
        }
    );

    let state = app.state();
    assert_eq!(state.render.phase, RenderPhase::Ready);
    assert!(!state.render.busy);
    let html = app.page_html();
    assert_eq!(html.matches(r#"class="try-it-form-container""#).count(), 3);
    assert!(html.contains(r#"<div id="loader" style="display: none">"#));
}

#[tokio::test]
async fn test_switching_specs_never_duplicates_forms() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;

    let outcome = app.change_api(USERS_API).await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Mounted {
            generation: 2,
            forms: 1
        }
    );
    assert!(app.page_html().contains(r#"data-method="DELETE""#));

    let outcome = app.change_api(ALL_APIS).await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Mounted {
            generation: 3,
            forms: 3
        }
    );
    let html = app.page_html();
    assert_eq!(html.matches(r#"class="try-it-form-container""#).count(), 3);
    assert!(!html.contains(r#"data-method="DELETE""#));
}

#[tokio::test]
async fn test_unknown_api_is_rejected_without_teardown() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;

    let err = app.change_api("/v3/api-docs/nope").await.unwrap_err();
    assert!(matches!(err, Error::UnknownApi { .. }));
    assert_eq!(app.mount().unwrap().generation(), 1);
    assert_eq!(app.state().api, ALL_APIS);
}

#[tokio::test]
async fn test_late_fetch_from_superseded_load_is_dropped() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;

    let first = app.begin(RenderTrigger::SpecChanged).unwrap();
    app.select_api(USERS_API).unwrap();
    let second = app.begin(RenderTrigger::SpecChanged).unwrap();
    assert!(app.state().mount.is_none());
    assert!(app.state().render.busy);

    let second_generation = second.generation;
    let fetched = second.fetch(app.client()).await;
    assert_eq!(
        app.complete(second, fetched),
        LoadOutcome::Mounted {
            generation: second_generation,
            forms: 1
        }
    );

    let fetched = first.fetch(app.client()).await;
    assert_eq!(app.complete(first, fetched), LoadOutcome::Superseded);

    let mount = app.mount().unwrap();
    assert_eq!(mount.generation(), second_generation);
    assert_eq!(mount.api(), USERS_API);
    assert_eq!(mount.forms().len(), 1);
    assert!(!app.state().render.busy);
}

#[tokio::test]
async fn test_failed_fetch_clears_busy_and_leaves_nothing_mounted() {
    let base = common::spawn_backend();
    let mut settings = common::settings(&base);
    settings.apis[1].id = "/v3/api-docs/missing".to_string();
    let mut app = apidocs_console::App::new(
        settings,
        Box::new(apidocs_console::prefs::MemoryStore::new()),
        std::sync::Arc::new(apidocs_console::renderer::MarkupRenderer),
    )
    .unwrap();
    app.start(None).await;

    let outcome = app.change_api("/v3/api-docs/missing").await.unwrap();
    assert!(matches!(outcome, LoadOutcome::Failed { .. }));
    assert!(app.state().mount.is_none());
    assert!(!app.state().render.busy);
    assert_eq!(app.state().render.phase, RenderPhase::Idle);
}

#[tokio::test]
async fn test_get_with_empty_fields_hits_template_url() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;

    let handle = app
        .mount()
        .unwrap()
        .find(HttpMethod::Get, "/echo/items/{itemId}")
        .unwrap();
    let text = app
        .submit_form(handle, Some(FormFields::default()))
        .await
        .unwrap();

    let reply = echo(&text);
    assert_eq!(reply["method"], "GET");
    assert_eq!(reply["path"], "/echo/items/%7BitemId%7D");
    assert_eq!(reply["query"], "");
    assert_eq!(reply["accept"], "application/json");
    assert_eq!(reply["content_type"], Value::Null);
    assert_eq!(reply["body"], "");
    assert_eq!(
        app.mount().unwrap().form(handle).unwrap().response.as_deref(),
        Some(text.as_str())
    );
}

#[tokio::test]
async fn test_prefilled_get_sends_documented_values() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;

    let handle = app
        .mount()
        .unwrap()
        .find(HttpMethod::Get, "/echo/users/{id}")
        .unwrap();
    let form = app.toggle_form(handle).unwrap();
    assert!(form.expanded);
    assert_eq!(form.fields.path_params, "id=42\n");
    assert_eq!(form.fields.query_params, "verbose=false\n");
    assert_eq!(form.fields.headers, "X-Tenant: acme\n");

    let text = app.submit_form(handle, None).await.unwrap();
    let reply = echo(&text);
    assert_eq!(reply["path"], "/echo/users/42");
    assert_eq!(reply["query"], "verbose=false");
    assert_eq!(reply["tenant"], "acme");
}

#[tokio::test]
async fn test_post_adds_default_headers_and_sends_body() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;

    let handle = app
        .mount()
        .unwrap()
        .find(HttpMethod::Post, "/echo/users")
        .unwrap();
    let form = app.toggle_form(handle).unwrap();
    assert!(form.fields.body.contains(r#""name": "Ada""#));

    let fields = FormFields {
        body: r#"{"name":"Grace"}"#.to_string(),
        ..form.fields
    };
    let text = app.submit_form(handle, Some(fields)).await.unwrap();
    let reply = echo(&text);
    assert_eq!(reply["method"], "POST");
    assert_eq!(reply["content_type"], "application/json");
    assert_eq!(reply["accept"], "application/json");
    assert_eq!(reply["body"], r#"{"name":"Grace"}"#);
}

#[tokio::test]
async fn test_response_for_remounted_form_is_discarded() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;

    let handle = app
        .mount()
        .unwrap()
        .find(HttpMethod::Get, "/echo/items/{itemId}")
        .unwrap();
    let draft = app.prepare_submit(handle, None).unwrap();

    app.change_api(USERS_API).await.unwrap();
    let text = app.console().execute(&draft).await;

    let err = app.finish_submit(handle, text).unwrap_err();
    assert!(err.is_stale());
    assert!(
        app.mount()
            .unwrap()
            .forms()
            .iter()
            .all(|form| form.response.is_none())
    );
}

#[tokio::test]
async fn test_locale_change_rewrites_page_text_and_remounts() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;
    assert!(app.page_html().contains(">API Documentation</title>"));

    let outcome = app.change_locale("tr").await;
    assert!(matches!(outcome, LoadOutcome::Mounted { generation: 2, .. }));

    let html = app.page_html();
    assert_eq!(app.state().locale, "tr");
    assert!(html.contains(r#"<html lang="tr">"#));
    assert!(html.contains(">API Dokümantasyonu</title>"));
    assert!(html.contains(r#"title="Koyu""#));
    assert!(html.contains(">Dene</button>"));
    assert!(html.contains(r#"<option value="tr" selected>"#));
}

#[tokio::test]
async fn test_persisted_preferences_win_over_browser_language() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.remember("lang", "tr").unwrap();
    app.remember("theme", "dark").unwrap();

    app.start(Some("en-US")).await;
    assert_eq!(app.state().locale, "tr");
    assert_eq!(app.state().theme, Theme::Dark);
}

#[tokio::test]
async fn test_theme_toggle_rerenders_with_new_colors() {
    let base = common::spawn_backend();
    let mut app = common::app(&base);
    app.start(None).await;
    assert!(app.page_html().contains("background-color: #ffffff"));

    let outcome = app.toggle_theme().await;
    assert!(matches!(outcome, LoadOutcome::Mounted { generation: 2, .. }));

    let html = app.page_html();
    assert_eq!(app.state().theme, Theme::Dark);
    assert!(html.contains(r#"<body class="theme-dark">"#));
    assert!(html.contains("background-color: #1a202c"));
    assert_eq!(html.matches(r#"class="try-it-form-container""#).count(), 3);
}

#[tokio::test]
async fn test_out_of_range_preference_lifetime_does_not_panic() {
    let base = common::spawn_backend();
    let mut settings = common::settings(&base);
    settings.preference_ttl_days = i64::MAX;
    let mut app = apidocs_console::App::new(
        settings,
        Box::new(apidocs_console::prefs::MemoryStore::new()),
        std::sync::Arc::new(apidocs_console::renderer::MarkupRenderer),
    )
    .unwrap();

    assert!(matches!(app.preference_ttl(), Err(Error::Config { .. })));
    assert!(matches!(app.remember("theme", "dark"), Err(Error::Config { .. })));

    app.start(None).await;
    let outcome = app.toggle_theme().await;
    assert!(matches!(outcome, LoadOutcome::Mounted { generation: 2, .. }));
    assert_eq!(app.state().theme, Theme::Dark);

    let outcome = app.change_locale("tr").await;
    assert!(matches!(outcome, LoadOutcome::Mounted { generation: 3, .. }));
    assert_eq!(app.state().locale, "tr");
}
