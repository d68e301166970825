use crate::app::{App, LoadOutcome, PendingLoad};
use crate::console::FormHandle;
use crate::controllers::locale;
use crate::controllers::render::RenderTrigger;
use crate::controllers::theme::ThemeEvent;
use crate::error::Error;
use crate::models::FormFields;
use crate::prefs::{self, LANG_KEY, THEME_KEY};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use warp::http::StatusCode;
use warp::http::header::{HeaderValue, SET_COOKIE};
use warp::reply::Response;
use warp::{Filter, Reply};

pub type SharedApp = Arc<Mutex<App>>;

#[derive(Debug, Deserialize)]
struct ApiRequest {
    spec: String,
}

#[derive(Debug, Deserialize)]
struct LocaleRequest {
    lang: String,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_server(app: App, port: u16) -> Result<()> {
    let app = Arc::new(Mutex::new(app));

    info!("Server running on http://localhost:{}", port);
    warp::serve(routes(app).with(warp::cors().allow_any_origin()))
        .run(([127, 0, 0, 1], port)).await;

    Ok(())
}

pub fn routes(app: SharedApp) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let with_app = warp::any().map(move || Arc::clone(&app));

    let index_route = warp::path::end()
        .and(warp::get())
        .and(with_app.clone())
        .and(warp::header::optional::<String>("cookie"))
        .and(warp::header::optional::<String>("accept-language"))
        .and_then(index);

    let api_route = warp::path("api")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_app.clone())
        .and(warp::body::json())
        .and_then(change_api);

    let locale_route = warp::path("locale")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_app.clone())
        .and(warp::body::json())
        .and_then(change_locale);

    let theme_route = warp::path!("theme" / "toggle")
        .and(warp::post())
        .and(with_app.clone())
        .and_then(toggle_theme);

    let toggle_route = warp::path!("try" / u64 / usize / "toggle")
        .and(warp::post())
        .and(with_app.clone())
        .and_then(toggle_form);

    let submit_route = warp::path!("try" / u64 / usize)
        .and(warp::post())
        .and(with_app)
        .and(warp::body::json())
        .and_then(submit_form);

    let health_route = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})).into_response());

    index_route
        .or(api_route)
        .unify()
        .or(locale_route)
        .unify()
        .or(theme_route)
        .unify()
        .or(toggle_route)
        .unify()
        .or(submit_route)
        .unify()
        .or(health_route)
        .unify()
}

/// The page; the first visit bootstraps state from cookies and the browser
/// language. Visits during a load get the page with the loader showing.
async fn index(
    app: SharedApp,
    cookie: Option<String>,
    accept_language: Option<String>,
) -> Result<Response, warp::Rejection> {
    let pending = {
        let mut app = app.lock().await;
        if app.state().render.generation != 0 {
            return Ok(warp::reply::html(app.page_html()).into_response());
        }

        let cookie = cookie.unwrap_or_default();
        for name in [LANG_KEY, THEME_KEY] {
            if let Some(value) = prefs::cookie_value(&cookie, name) {
                if let Err(e) = app.remember(name, &value) {
                    warn!("Ignoring {} cookie: {}", name, e);
                }
            }
        }
        let browser = accept_language
            .as_deref()
            .and_then(locale::from_accept_language);
        app.resolve_preferences(browser.as_deref());
        app.begin_load(RenderTrigger::InitialLoad, true)
    };

    let outcome = run_load(&app, pending).await;
    debug!("Initial load: {:?}", outcome);

    Ok(warp::reply::html(app.lock().await.page_html()).into_response())
}

async fn change_api(app: SharedApp, request: ApiRequest) -> Result<Response, warp::Rejection> {
    let pending = {
        let mut app = app.lock().await;
        if let Err(e) = app.select_api(&request.spec) {
            return Ok(error_reply(&e));
        }
        app.begin_load(RenderTrigger::SpecChanged, false)
    };

    let outcome = run_load(&app, pending).await;
    Ok(warp::reply::json(&outcome).into_response())
}

async fn change_locale(app: SharedApp, request: LocaleRequest) -> Result<Response, warp::Rejection> {
    let (pending, cookie) = {
        let mut app = app.lock().await;
        app.select_locale(&request.lang);
        let cookie = app
            .preference_ttl()
            .and_then(|ttl| prefs::set_cookie(LANG_KEY, &app.state().locale, ttl));
        (app.begin_load(RenderTrigger::LocaleChanged, true), cookie)
    };

    let outcome = run_load(&app, pending).await;
    Ok(with_cookie(warp::reply::json(&outcome).into_response(), cookie))
}

async fn toggle_theme(app: SharedApp) -> Result<Response, warp::Rejection> {
    let (pending, cookie) = {
        let mut app = app.lock().await;
        app.select_theme(ThemeEvent::Toggle);
        let cookie = app
            .preference_ttl()
            .and_then(|ttl| prefs::set_cookie(THEME_KEY, app.state().theme.as_str(), ttl));
        (app.begin_load(RenderTrigger::ThemeChanged, false), cookie)
    };

    let outcome = run_load(&app, pending).await;
    Ok(with_cookie(warp::reply::json(&outcome).into_response(), cookie))
}

async fn toggle_form(
    generation: u64,
    index: usize,
    app: SharedApp,
) -> Result<Response, warp::Rejection> {
    let handle = FormHandle { generation, index };
    let mut app = app.lock().await;
    match app.toggle_form(handle) {
        Ok(form) => Ok(warp::reply::json(&form).into_response()),
        Err(e) => Ok(error_reply(&e)),
    }
}

/// The app is only locked while reading and writing the form; the request
/// itself runs unlocked so submissions from several forms overlap.
async fn submit_form(
    generation: u64,
    index: usize,
    app: SharedApp,
    fields: FormFields,
) -> Result<Response, warp::Rejection> {
    let handle = FormHandle { generation, index };

    let prepared = {
        let mut app = app.lock().await;
        app.prepare_submit(handle, Some(fields))
            .map(|draft| (app.console(), draft))
    };
    let (console, draft) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => return Ok(error_reply(&e)),
    };

    let response = console.execute(&draft).await;

    let mut app = app.lock().await;
    match app.finish_submit(handle, response.clone()) {
        Ok(()) => Ok(warp::reply::json(&SubmitResponse { response }).into_response()),
        Err(e) => Ok(error_reply(&e)),
    }
}

/// Fetch with the app unlocked, then lock again to mount. A trigger that
/// arrives meanwhile supersedes this one.
async fn run_load(app: &SharedApp, pending: std::result::Result<PendingLoad, Error>) -> LoadOutcome {
    let pending = match pending {
        Ok(pending) => pending,
        Err(e) => {
            warn!("Load not started: {}", e);
            return LoadOutcome::Failed {
                message: e.to_string(),
            };
        }
    };
    let fetched = pending.fetch().await;
    app.lock().await.finish_load(fetched)
}

fn with_cookie(mut response: Response, cookie: std::result::Result<String, Error>) -> Response {
    let value = cookie.and_then(|cookie| {
        HeaderValue::from_str(&cookie).map_err(|e| Error::config(e.to_string()))
    });
    match value {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(e) => warn!("Not setting preference cookie: {}", e),
    }
    response
}

fn error_reply(error: &Error) -> Response {
    let status = match error {
        Error::StaleForm { .. } => StatusCode::GONE,
        Error::NoSuchForm { .. } | Error::NotMounted | Error::NoSuchEndpoint { .. } => {
            StatusCode::NOT_FOUND
        }
        Error::UnknownApi { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: error.to_string(),
        }),
        status,
    )
    .into_response()
}
