//! Application state and the effects behind every page-level change

use crate::config::{Settings, find_api};
use crate::console::{FormHandle, FormLabels, Mount, TryItConsole, TryItForm};
use crate::controllers::locale::{self, Catalog, LocaleEvent, PageChrome};
use crate::controllers::render::{
    RenderEffect, RenderEvent, RenderState, RenderTarget, RenderTrigger, transition,
};
use crate::controllers::theme::{self, Theme, ThemeEvent};
use crate::dom::page::{self, PageView};
use crate::error::{Error, Result};
use crate::extractor::RedocExtractor;
use crate::models::{FormFields, RequestDraft};
use crate::prefs::{self, LANG_KEY, PreferenceStore, THEME_KEY};
use crate::renderer::{RenderOptions, Renderer};
use chrono::Duration;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Everything the page currently shows.
#[derive(Debug)]
pub struct AppState {
    pub api: String,
    pub locale: String,
    pub theme: Theme,
    pub chrome: PageChrome,
    pub labels: FormLabels,
    pub render: RenderState,
    pub mount: Option<Mount>,
}

/// How a load cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Mounted { generation: u64, forms: usize },
    Failed { message: String },
    /// A newer trigger took over before this one finished
    Superseded,
}

/// The fetch half of a load cycle, detached from the app so other triggers
/// can run while it is in flight.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub generation: u64,
    pub target: RenderTarget,
    url: Url,
}

impl LoadRequest {
    /// Fetch the spec document in the target locale.
    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Value> {
        debug!("Fetching spec {} ({})", self.url, self.target.locale);
        let spec = client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.target.locale)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(spec)
    }
}

/// Catalog fetch for one locale.
#[derive(Debug, Clone)]
pub struct CatalogRequest {
    pub locale: String,
    url: Url,
}

impl CatalogRequest {
    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Catalog> {
        locale::fetch_catalog(client, self.url.clone(), &self.locale).await
    }
}

/// A started load cycle whose network half has not run yet.
#[derive(Debug)]
pub struct PendingLoad {
    pub request: LoadRequest,
    pub catalog: Option<CatalogRequest>,
    client: reqwest::Client,
}

impl PendingLoad {
    /// Fetch the spec, and the catalog if one is due, concurrently.
    pub async fn fetch(self) -> FetchedLoad {
        let (spec, catalog) = match self.catalog {
            Some(catalog) => {
                let (spec, messages) =
                    tokio::join!(self.request.fetch(&self.client), catalog.fetch(&self.client));
                (spec, Some((catalog, messages)))
            }
            None => (self.request.fetch(&self.client).await, None),
        };
        FetchedLoad {
            request: self.request,
            spec,
            catalog,
        }
    }
}

#[derive(Debug)]
pub struct FetchedLoad {
    request: LoadRequest,
    spec: Result<Value>,
    catalog: Option<(CatalogRequest, Result<Catalog>)>,
}

pub struct App {
    settings: Settings,
    base_url: Url,
    client: reqwest::Client,
    prefs: Box<dyn PreferenceStore>,
    renderer: Arc<dyn Renderer>,
    console: Arc<TryItConsole>,
    state: AppState,
    fetched: Option<(u64, Value)>,
    rendered: Option<(u64, String)>,
}

impl App {
    pub fn new(
        settings: Settings,
        prefs: Box<dyn PreferenceStore>,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("apidocs-console/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        let extractor = Arc::new(RedocExtractor::new(&settings.selectors)?);
        let console = Arc::new(TryItConsole::new(
            extractor,
            client.clone(),
            base_url.clone(),
        ));

        let state = AppState {
            api: settings.default_api.clone(),
            locale: settings.default_locale.clone(),
            theme: Theme::parse_or_default(Some(settings.default_theme.as_str())),
            chrome: PageChrome::default(),
            labels: FormLabels::default(),
            render: RenderState::default(),
            mount: None,
        };

        Ok(Self {
            settings,
            base_url,
            client,
            prefs,
            renderer,
            console,
            state,
            fetched: None,
            rendered: None,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Record a preference coming from outside, e.g. a request cookie.
    pub fn remember(&mut self, name: &str, value: &str) -> Result<()> {
        let ttl = self.preference_ttl()?;
        self.prefs.set(name, value, ttl)
    }

    pub fn console(&self) -> Arc<TryItConsole> {
        Arc::clone(&self.console)
    }

    pub fn preference_ttl(&self) -> Result<Duration> {
        prefs::ttl_days(self.settings.preference_ttl_days)
    }

    /// Establish locale and theme from persisted preferences, then load the
    /// catalog and the default spec.
    pub async fn start(&mut self, browser_language: Option<&str>) -> LoadOutcome {
        self.resolve_preferences(browser_language);
        self.run_load(RenderTrigger::InitialLoad, true).await
    }

    /// Pick locale and theme: persisted choice, then browser, then defaults.
    pub fn resolve_preferences(&mut self, browser_language: Option<&str>) {
        let persisted_lang = self.prefs.get(LANG_KEY);
        self.state.locale = locale::resolve(
            persisted_lang.as_deref(),
            browser_language,
            &self.settings.default_locale,
        );
        let persisted_theme = self.prefs.get(THEME_KEY);
        self.state.theme = Theme::parse_or_default(
            persisted_theme
                .as_deref()
                .or(Some(self.settings.default_theme.as_str())),
        );
        info!(
            "Starting with locale {} and {} theme",
            self.state.locale, self.state.theme
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Load cycle
    // ─────────────────────────────────────────────────────────────

    /// Synchronous phase of a load: busy on, old viewer detached, fetch
    /// described.
    pub fn begin(&mut self, trigger: RenderTrigger) -> Result<LoadRequest> {
        let url = self.base_url.join(&self.state.api)?;
        let target = RenderTarget {
            api: self.state.api.clone(),
            locale: self.state.locale.clone(),
            theme: self.state.theme,
        };
        debug!("{:?}: loading {}", trigger, target.api);

        let mut request = None;
        let (next, effects) = transition(&self.state.render, RenderEvent::Trigger { trigger, target });
        self.state.render = next;
        for effect in effects {
            match effect {
                RenderEffect::FetchSpec { generation, target } => {
                    request = Some(LoadRequest {
                        generation,
                        target,
                        url: url.clone(),
                    });
                }
                other => {
                    self.perform(other);
                }
            }
        }
        request.ok_or_else(|| Error::render("trigger produced no fetch"))
    }

    /// Asynchronous phase result: render and inject if still current.
    pub fn complete(&mut self, request: LoadRequest, fetched: Result<Value>) -> LoadOutcome {
        let generation = request.generation;
        let event = match fetched {
            Ok(spec) => {
                self.fetched = Some((generation, spec));
                RenderEvent::Fetched { generation }
            }
            Err(e) => RenderEvent::Failed {
                generation,
                message: format!("failed to fetch {}: {}", request.target.api, e),
            },
        };
        self.drive(event)
    }

    /// [`App::begin`] plus, when the locale may have changed, the catalog
    /// request. The result is fetched without access to the app.
    pub fn begin_load(&mut self, trigger: RenderTrigger, with_catalog: bool) -> Result<PendingLoad> {
        let catalog = if with_catalog {
            self.catalog_request()
        } else {
            None
        };
        let request = self.begin(trigger)?;
        Ok(PendingLoad {
            request,
            catalog,
            client: self.client.clone(),
        })
    }

    /// Apply the fetched catalog, then render and inject if still current.
    pub fn finish_load(&mut self, fetched: FetchedLoad) -> LoadOutcome {
        if let Some((request, catalog)) = fetched.catalog {
            self.apply_catalog(&request, catalog);
        }
        self.complete(fetched.request, fetched.spec)
    }

    /// A whole load cycle for the current api/locale/theme.
    pub async fn reload(&mut self, trigger: RenderTrigger) -> LoadOutcome {
        self.run_load(trigger, false).await
    }

    async fn run_load(&mut self, trigger: RenderTrigger, with_catalog: bool) -> LoadOutcome {
        match self.begin_load(trigger, with_catalog) {
            Ok(pending) => {
                let fetched = pending.fetch().await;
                self.finish_load(fetched)
            }
            Err(e) => {
                error!("Cannot load {}: {}", self.state.api, e);
                LoadOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn drive(&mut self, event: RenderEvent) -> LoadOutcome {
        let mut outcome = LoadOutcome::Superseded;
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let (next, effects) = transition(&self.state.render, event);
            self.state.render = next;
            for effect in effects {
                if let Some(follow_up) = self.perform_with_outcome(effect, &mut outcome) {
                    queue.push_back(follow_up);
                }
            }
        }
        outcome
    }

    fn perform(&mut self, effect: RenderEffect) {
        let mut ignored = LoadOutcome::Superseded;
        if let Some(event) = self.perform_with_outcome(effect, &mut ignored) {
            warn!("Unexpected follow-up event {:?}", event);
        }
    }

    fn perform_with_outcome(
        &mut self,
        effect: RenderEffect,
        outcome: &mut LoadOutcome,
    ) -> Option<RenderEvent> {
        match effect {
            RenderEffect::ShowBusy | RenderEffect::HideBusy => {
                debug!("Busy: {}", self.state.render.busy);
                None
            }
            RenderEffect::DetachViewer => {
                if let Some(old) = self.state.mount.take() {
                    debug!("Detached mount {}", old.generation());
                }
                self.rendered = None;
                None
            }
            RenderEffect::FetchSpec { generation, .. } => {
                warn!("Fetch for generation {} requested outside begin()", generation);
                None
            }
            RenderEffect::InvokeRenderer { generation, theme } => {
                Some(self.invoke_renderer(generation, theme))
            }
            RenderEffect::InjectConsole { generation } => {
                match self.rendered.take() {
                    Some((rendered_for, html)) if rendered_for == generation => {
                        let api = self
                            .state
                            .render
                            .target
                            .as_ref()
                            .map(|t| t.api.clone())
                            .unwrap_or_else(|| self.state.api.clone());
                        let mount = self.console.inject(generation, &api, &html);
                        *outcome = LoadOutcome::Mounted {
                            generation,
                            forms: mount.forms().len(),
                        };
                        self.state.mount = Some(mount);
                    }
                    _ => warn!("No rendered markup for generation {}", generation),
                }
                None
            }
            RenderEffect::LogFailure { message } => {
                error!("Error initializing API docs: {}", message);
                *outcome = LoadOutcome::Failed { message };
                None
            }
            RenderEffect::Superseded { generation } => {
                debug!("Dropping result of superseded load {}", generation);
                if matches!(self.fetched, Some((g, _)) if g == generation) {
                    self.fetched = None;
                }
                *outcome = LoadOutcome::Superseded;
                None
            }
        }
    }

    fn invoke_renderer(&mut self, generation: u64, theme: Theme) -> RenderEvent {
        let spec = match self.fetched.take() {
            Some((fetched_for, spec)) if fetched_for == generation => spec,
            _ => {
                return RenderEvent::Failed {
                    generation,
                    message: "spec document missing".to_string(),
                };
            }
        };

        let options = RenderOptions::new(theme.descriptor());
        match self.renderer.render(&spec, &options) {
            Ok(html) => {
                self.rendered = Some((generation, html));
                RenderEvent::Rendered { generation }
            }
            Err(e) => RenderEvent::Failed {
                generation,
                message: e.to_string(),
            },
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Spec / locale / theme changes
    // ─────────────────────────────────────────────────────────────

    /// Switch to another configured spec. Unknown ids are rejected before
    /// anything is torn down.
    pub fn select_api(&mut self, id: &str) -> Result<()> {
        let api = find_api(&self.settings, id).ok_or_else(|| Error::UnknownApi { id: id.to_string() })?;
        self.state.api = api.id.clone();
        Ok(())
    }

    pub async fn change_api(&mut self, id: &str) -> Result<LoadOutcome> {
        self.select_api(id)?;
        Ok(self.reload(RenderTrigger::SpecChanged).await)
    }

    pub async fn change_locale(&mut self, tag: &str) -> LoadOutcome {
        self.select_locale(tag);
        self.run_load(RenderTrigger::LocaleChanged, true).await
    }

    /// Switch and persist the locale; the caller reloads.
    pub fn select_locale(&mut self, tag: &str) {
        self.state.locale = locale::reduce(&self.state.locale, LocaleEvent::Select(tag.to_string()));
        let persisted = self
            .preference_ttl()
            .and_then(|ttl| locale::persist(&self.state.locale, self.prefs.as_mut(), ttl));
        if let Err(e) = persisted {
            warn!("Failed to persist locale: {}", e);
        }
    }

    pub async fn apply_theme_event(&mut self, event: ThemeEvent) -> LoadOutcome {
        self.select_theme(event);
        // The renderer cannot swap colors live; re-render with the new tokens.
        self.reload(RenderTrigger::ThemeChanged).await
    }

    /// Switch and persist the theme; the caller reloads.
    pub fn select_theme(&mut self, event: ThemeEvent) {
        self.state.theme = theme::reduce(self.state.theme, event);
        let persisted = self
            .preference_ttl()
            .and_then(|ttl| theme::persist(self.state.theme, self.prefs.as_mut(), ttl));
        if let Err(e) = persisted {
            warn!("Failed to persist theme: {}", e);
        }
    }

    pub async fn toggle_theme(&mut self) -> LoadOutcome {
        self.apply_theme_event(ThemeEvent::Toggle).await
    }

    /// The catalog fetch for the active locale, if the endpoint is usable.
    pub fn catalog_request(&self) -> Option<CatalogRequest> {
        match self.base_url.join(&self.settings.locale_path) {
            Ok(url) => Some(CatalogRequest {
                locale: self.state.locale.clone(),
                url,
            }),
            Err(e) => {
                error!("Invalid locale path {}: {}", self.settings.locale_path, e);
                None
            }
        }
    }

    /// Rewrite page text from a fetched catalog. Failures, and catalogs for
    /// a locale that is no longer active, leave the text as it was.
    pub fn apply_catalog(&mut self, request: &CatalogRequest, catalog: Result<Catalog>) {
        match catalog {
            Ok(_) if request.locale != self.state.locale => {
                debug!("Dropping catalog for inactive locale {}", request.locale);
            }
            Ok(catalog) => {
                self.state.chrome.apply_catalog(&catalog);
                self.state.labels.apply_catalog(&catalog);
            }
            Err(e) => error!("Error fetching localization messages: {}", e),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Try-It forms
    // ─────────────────────────────────────────────────────────────

    fn mount_mut(&mut self) -> Result<&mut Mount> {
        self.state.mount.as_mut().ok_or(Error::NotMounted)
    }

    pub fn mount(&self) -> Result<&Mount> {
        self.state.mount.as_ref().ok_or(Error::NotMounted)
    }

    pub fn toggle_form(&mut self, handle: FormHandle) -> Result<TryItForm> {
        let console = Arc::clone(&self.console);
        let mount = self.mount_mut()?;
        console.toggle(mount, handle)?;
        Ok(mount.form(handle)?.clone())
    }

    /// Store edited fields (if any) and build the request to send.
    pub fn prepare_submit(
        &mut self,
        handle: FormHandle,
        fields: Option<FormFields>,
    ) -> Result<RequestDraft> {
        let console = Arc::clone(&self.console);
        let mount = self.mount_mut()?;
        if let Some(fields) = fields {
            mount.edit(handle, fields)?;
        }
        console.draft(mount, handle)
    }

    /// Write a finished response back. Responses for forms that were
    /// remounted meanwhile are dropped.
    pub fn finish_submit(&mut self, handle: FormHandle, text: String) -> Result<()> {
        match self.mount_mut()?.write_response(handle, text) {
            Err(e) if e.is_stale() => {
                debug!("Discarding response for {:?}: {}", handle, e);
                Err(e)
            }
            other => other,
        }
    }

    pub async fn submit_form(
        &mut self,
        handle: FormHandle,
        fields: Option<FormFields>,
    ) -> Result<String> {
        let draft = self.prepare_submit(handle, fields)?;
        let text = self.console.execute(&draft).await;
        self.finish_submit(handle, text.clone())?;
        Ok(text)
    }

    // ─────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────

    pub fn page_html(&self) -> String {
        let content = self
            .state
            .mount
            .as_ref()
            .map(|mount| mount.to_markup(&self.state.labels));
        page::render_page(&PageView {
            chrome: &self.state.chrome,
            locale: &self.state.locale,
            theme: self.state.theme,
            apis: &self.settings.apis,
            locales: &self.settings.supported_locales,
            selected_api: &self.state.api,
            busy: self.state.render.busy,
            content: content.as_ref(),
        })
    }
}
