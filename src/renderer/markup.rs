use super::{RenderOptions, Renderer};
use crate::error::{Error, Result};
use maud::{Markup, html};
use serde_json::Value;

const METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// `$ref` chains longer than this are treated as unresolvable.
const MAX_REF_HOPS: usize = 8;
const MAX_SAMPLE_DEPTH: usize = 6;

/// Renders an OpenAPI document into Redoc-shaped markup: one section per
/// operation with its header block, `h5` parameter tables and an `h3`
/// request sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupRenderer;

impl Renderer for MarkupRenderer {
    fn render(&self, spec: &Value, options: &RenderOptions) -> Result<String> {
        let paths = spec
            .get("paths")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::render("spec document has no `paths` object"))?;

        let mut operations = Vec::new();
        for (path, item) in paths {
            let item = resolve(spec, item);
            let shared = item
                .get("parameters")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            for method in METHODS {
                if let Some(operation) = item.get(*method) {
                    operations.push(render_operation(spec, path, method, operation, shared));
                }
            }
        }

        let colors = &options.theme.colors;
        let style = format!(
            "background-color: {}; color: {}",
            colors.background.primary, colors.text.primary
        );
        let title = spec.pointer("/info/title").and_then(Value::as_str);

        let markup = html! {
            div class="redoc-wrap" style=(style) {
                @if let Some(title) = title {
                    h1 class="api-info-title" { (title) }
                }
                @for operation in &operations {
                    (operation)
                }
            }
        };
        Ok(markup.into_string())
    }
}

fn render_operation(
    spec: &Value,
    path: &str,
    method: &str,
    operation: &Value,
    shared: &[Value],
) -> Markup {
    let summary = operation
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or(path);
    let anchor = operation
        .get("operationId")
        .and_then(Value::as_str)
        .map(|id| format!("operation/{id}"))
        .unwrap_or_else(|| format!("operation/{method}{path}"));
    let description = operation.get("description").and_then(Value::as_str);

    let own = operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let parameters: Vec<&Value> = shared
        .iter()
        .chain(own)
        .map(|p| resolve(spec, p))
        .collect();

    let tables: Vec<(&str, Vec<Markup>)> = ["path", "query", "header"]
        .into_iter()
        .map(|location| {
            let rows = parameters
                .iter()
                .filter(|p| p.get("in").and_then(Value::as_str) == Some(location))
                .filter_map(|p| render_parameter(spec, location, p))
                .collect::<Vec<_>>();
            (location, rows)
        })
        .filter(|(_, rows)| !rows.is_empty())
        .collect();

    let sample = request_sample(spec, operation);

    html! {
        div class="sc-dcJsrY kNjBFu" id=(anchor) {
            div class="sc-dkmUuB iwMnZw" {
                h2 { (summary) }
                div class="endpoint" {
                    span class=(format!("http-verb {method}")) { (method) }
                    span class="sc-ejfMa-d jgeKJH" { (path) }
                }
            }
            @if let Some(description) = description {
                p { (description) }
            }
            @for (location, rows) in &tables {
                h5 { (location) " Parameters" }
                table {
                    tbody {
                        @for row in rows {
                            (row)
                        }
                    }
                }
            }
            @if let Some(sample) = &sample {
                h3 { "Request samples" }
                div class="samples" {
                    pre { code { (sample) } }
                }
            }
        }
    }
}

fn render_parameter(spec: &Value, location: &str, parameter: &Value) -> Option<Markup> {
    let name = parameter.get("name").and_then(Value::as_str)?;
    let schema = parameter.get("schema").map(|s| resolve(spec, s));
    let kind = schema
        .and_then(|s| s.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("string");
    let example = parameter
        .get("example")
        .or_else(|| {
            parameter
                .get("examples")
                .and_then(Value::as_object)
                .and_then(|examples| examples.values().next())
                .and_then(|example| example.get("value"))
        })
        .or_else(|| schema.and_then(|s| s.get("example")))
        .map(scalar);
    let default = schema.and_then(|s| s.get("default")).map(scalar);
    let header_value = example.clone().or_else(|| default.clone());

    Some(html! {
        tr {
            td { span class="property-name" { (name) } }
            td {
                span class="type-name" { (kind) }
                @if location == "header" {
                    @if let Some(value) = &header_value {
                        span class="sc-ddjGPC lmPAIU fGykvj" { "\"" (value) "\"" }
                    }
                } @else {
                    @if let Some(value) = &default {
                        div {
                            span class="sc-kFCroH" { "Default:" }
                            " "
                            span class="sc-ddjGPC lmPAIU" { "\"" (value) "\"" }
                        }
                    }
                    @if let Some(value) = &example {
                        div {
                            span class="sc-kFCroH" { "Example:" }
                            " "
                            span class="sc-ddjGPC lmPAIU" { (name) "=" (value) }
                        }
                    }
                }
            }
        }
    })
}

/// Pretty-printed JSON sample for the operation's JSON request body.
fn request_sample(spec: &Value, operation: &Value) -> Option<String> {
    let body = resolve(spec, operation.get("requestBody")?);
    let media = body.get("content")?.get("application/json")?;

    let sample = media
        .get("example")
        .cloned()
        .or_else(|| {
            media
                .get("examples")
                .and_then(Value::as_object)
                .and_then(|examples| examples.values().next())
                .map(|example| resolve(spec, example))
                .and_then(|example| example.get("value").cloned())
        })
        .or_else(|| {
            media
                .get("schema")
                .map(|schema| sample_from_schema(spec, schema, 0))
        })?;

    serde_json::to_string_pretty(&sample).ok()
}

fn sample_from_schema(spec: &Value, schema: &Value, depth: usize) -> Value {
    let schema = resolve(spec, schema);
    if let Some(example) = schema.get("example").or_else(|| schema.get("default")) {
        return example.clone();
    }
    if depth >= MAX_SAMPLE_DEPTH {
        return Value::Null;
    }

    match schema.get("type").and_then(Value::as_str) {
        Some("array") => {
            let item = schema
                .get("items")
                .map(|items| sample_from_schema(spec, items, depth + 1))
                .unwrap_or(Value::Null);
            Value::Array(vec![item])
        }
        Some("integer") | Some("number") => Value::from(0),
        Some("boolean") => Value::Bool(true),
        Some("string") => Value::from("string"),
        _ => {
            let properties = schema
                .get("properties")
                .and_then(Value::as_object)
                .map(|properties| {
                    properties
                        .iter()
                        .map(|(name, property)| {
                            (name.clone(), sample_from_schema(spec, property, depth + 1))
                        })
                        .collect()
                })
                .unwrap_or_default();
            Value::Object(properties)
        }
    }
}

/// Follow local `$ref`s (`#/components/...`).
fn resolve<'a>(spec: &'a Value, mut value: &'a Value) -> &'a Value {
    for _ in 0..MAX_REF_HOPS {
        let Some(target) = value
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| r.strip_prefix('#'))
            .and_then(|pointer| spec.pointer(pointer))
        else {
            break;
        };
        value = target;
    }
    value
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
