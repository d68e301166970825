use anyhow::{Context, Result};
use apidocs_console::config::{self, CONFIG_FILENAME, Settings};
use apidocs_console::console::FormHandle;
use apidocs_console::controllers::locale;
use apidocs_console::models::{FormFields, HttpMethod};
use apidocs_console::prefs::{FileStore, LANG_KEY, MemoryStore, PreferenceStore};
use apidocs_console::renderer::MarkupRenderer;
use apidocs_console::{App, Error, LoadOutcome, logging, web};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "apidocs-console")]
#[command(about = "Try-It console for rendered API documentation")]
struct Cli {
    /// Settings file
    #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the endpoints that get a Try-It form
    Endpoints {
        /// Spec id, e.g. /v3/api-docs
        #[arg(long)]
        api: Option<String>,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Prefill and submit the form of one endpoint
    Try {
        method: HttpMethod,
        /// Path template exactly as documented, e.g. /users/{id}
        path: String,
        #[arg(long)]
        api: Option<String>,
        /// `Name: value`, replaces the prefilled headers
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// `name=value`, replaces the prefilled path parameters
        #[arg(short = 'p', long = "path-param")]
        path_params: Vec<String>,
        /// `name=value`, replaces the prefilled query parameters
        #[arg(short = 'q', long = "query")]
        query_params: Vec<String>,
        /// Request body, replaces the request sample
        #[arg(short = 'd', long = "data")]
        body: Option<String>,
    },
    /// Start the web interface
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    let settings = config::load_settings(&cli.config);
    let mut app = build_app(settings)?;

    match cli.command {
        Commands::Endpoints { api, lang } => {
            load(&mut app, api.as_deref(), lang.as_deref()).await?;
            let handles: Vec<FormHandle> = app.mount()?.handles().collect();
            for handle in handles {
                let form = app.toggle_form(handle)?;
                println!("{}", form.endpoint);
                print_field("headers", &form.fields.headers);
                print_field("path", &form.fields.path_params);
                print_field("query", &form.fields.query_params);
                print_field("body", &form.fields.body);
            }
        }
        Commands::Try {
            method,
            path,
            api,
            headers,
            path_params,
            query_params,
            body,
        } => {
            load(&mut app, api.as_deref(), None).await?;
            let handle = app.mount()?.find(method, &path).ok_or_else(|| {
                Error::NoSuchEndpoint {
                    method: method.to_string(),
                    path: path.clone(),
                }
            })?;

            // Revealing the form prefills it from the documentation.
            let form = app.toggle_form(handle)?;
            let fields = FormFields {
                headers: override_lines(form.fields.headers, &headers),
                path_params: override_lines(form.fields.path_params, &path_params),
                query_params: override_lines(form.fields.query_params, &query_params),
                body: body.unwrap_or(form.fields.body),
            };
            let response = submit(&mut app, handle, fields).await?;
            println!("{}", response);
        }
        Commands::Serve { port } => {
            info!("Starting web server on port {}...", port);
            web::run_server(app, port).await?;
        }
    }

    Ok(())
}

fn build_app(settings: Settings) -> Result<App> {
    let prefs: Box<dyn PreferenceStore> = match &settings.preferences_path {
        Some(path) => Box::new(FileStore::open(path.clone())),
        None => Box::new(MemoryStore::new()),
    };
    Ok(App::new(settings, prefs, Arc::new(MarkupRenderer))?)
}

async fn load(app: &mut App, api: Option<&str>, lang: Option<&str>) -> Result<()> {
    if let Some(lang) = lang {
        app.remember(LANG_KEY, lang)?;
    }
    let browser = std::env::var("LANG")
        .ok()
        .and_then(|value| locale::from_posix_locale(&value));

    let mut outcome = app.start(browser.as_deref()).await;
    if let Some(api) = api {
        if api != app.state().api {
            outcome = app.change_api(api).await?;
        }
    }

    match outcome {
        LoadOutcome::Mounted { .. } => Ok(()),
        LoadOutcome::Failed { message } => anyhow::bail!("{}", message),
        LoadOutcome::Superseded => anyhow::bail!("load was superseded"),
    }
}

async fn submit(app: &mut App, handle: FormHandle, fields: FormFields) -> Result<String> {
    app.submit_form(handle, Some(fields))
        .await
        .with_context(|| format!("submitting form {}", handle.index))
}

fn print_field(label: &str, text: &str) {
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        println!("    {:<8} {}", label, line);
    }
}

fn override_lines(prefilled: String, given: &[String]) -> String {
    if given.is_empty() {
        prefilled
    } else {
        given.join("\n")
    }
}
