use crate::config::ApiSpec;
use crate::controllers::locale::{self, PageChrome};
use crate::controllers::theme::Theme;
use maud::{DOCTYPE, Markup, html};

/// Everything the documentation page shows around the mounted viewer.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub chrome: &'a PageChrome,
    pub locale: &'a str,
    pub theme: Theme,
    pub apis: &'a [ApiSpec],
    /// Language selector entries, as primary subtags
    pub locales: &'a [String],
    pub selected_api: &'a str,
    pub busy: bool,
    /// Mounted documentation with injected forms; `None` while nothing is mounted
    pub content: Option<&'a Markup>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let chrome = view.chrome;
    let markup = html! {
        (DOCTYPE)
        html lang=(view.locale) {
            head {
                meta charset="utf-8";
                title id="api-docs-title" { (chrome.title) }
            }
            body class=(view.theme.body_class()) {
                (topbar(view))
                div id="loader" style=(format!("display: {}", if view.busy { "block" } else { "none" })) {}
                div id="redoc-container-parent" {
                    @if let Some(content) = view.content {
                        div id="redoc-container" class="content container" { (content) }
                    }
                }
            }
        }
    };

    markup.into_string()
}

fn topbar(view: &PageView<'_>) -> Markup {
    let chrome = view.chrome;
    let language = locale::primary_subtag(view.locale);
    let toggle_class = match view.theme.toggle_class() {
        Some(class) => format!("theme-toggle {class}"),
        None => "theme-toggle".to_string(),
    };

    html! {
        nav class="topbar" {
            span id="api-docs-topbar-title" { (chrome.topbar_title) }
            select id="api-select" {
                @for api in view.apis {
                    option value=(api.id) selected[api.id == view.selected_api] { (api.label) }
                }
            }
            select id="language-select" class="language-dropdown-content" {
                @for tag in view.locales {
                    option value=(tag) selected[tag == language] { (language_label(chrome, tag)) }
                }
            }
            button id="theme-toggle" class=(toggle_class) {
                span class="sun" title=(chrome.theme_light) {}
                span class="moon" title=(chrome.theme_dark) {}
            }
        }
    }
}

fn language_label<'a>(chrome: &'a PageChrome, tag: &'a str) -> &'a str {
    match tag {
        "en" => chrome.language_english.as_str(),
        "tr" => chrome.language_turkish.as_str(),
        other => other,
    }
}
