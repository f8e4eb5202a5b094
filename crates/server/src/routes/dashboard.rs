//! `GET /`: HTML dashboard with one card per cached character.
//!
//! The page is rendered from the snapshot on every request. Cards carry the
//! name, location and avatar; clicking one opens a client-side detail view
//! fed by the embedded `characters` array. Search is client-side only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Router, routing::get};
use html_escape::{encode_double_quoted_attribute, encode_script, encode_text};

use earthlings_core::{Cache, CatalogQuery, OriginFilter};

use crate::state::AppState;

const TEMPLATE: &str = include_str!("dashboard.html");

async fn dashboard(State(state): State<AppState>) -> Response {
    match render(&state.cache, &state.query, &state.origin) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render dashboard");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render dashboard").into_response()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Render the full page.
pub fn render(cache: &Cache, query: &CatalogQuery, origin: &OriginFilter) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(cache.details())?;
    let characters_json = encode_script(&json);

    let mut cards = String::new();
    for (index, character) in cache.details().iter().enumerate() {
        cards.push_str(&format!(
            r#"        <div class="card" data-index="{index}" role="button" tabindex="0" onclick="openDetail({index})" onkeydown="if (event.key === 'Enter') openDetail({index})">
            <img src="{image}" alt="{alt}" loading="lazy">
            <div class="card-body">
                <div class="card-name">{name}</div>
                <div class="card-location">{location}</div>
            </div>
        </div>
"#,
            image = encode_double_quoted_attribute(&character.image),
            alt = encode_double_quoted_attribute(&character.name),
            name = encode_text(&character.name),
            location = encode_text(&character.location),
        ));
    }

    let count = cache.len().to_string();
    let species = encode_text(&query.species);
    let status = encode_text(&query.status);
    let needle = encode_text(origin.needle());
    let species_upper = encode_text(&query.species.to_uppercase()).into_owned();
    let status_upper = encode_text(&query.status.to_uppercase()).into_owned();
    let origin_upper = encode_text(&origin.needle().to_uppercase()).into_owned();

    Ok(fill(
        TEMPLATE,
        &[
            ("count", &count),
            ("species", &species),
            ("status", &status),
            ("origin", &needle),
            ("species_upper", &species_upper),
            ("status_upper", &status_upper),
            ("origin_upper", &origin_upper),
            ("cards", &cards),
            ("characters_json", &characters_json),
        ],
    ))
}

/// Substitute `{{key}}` placeholders in one pass.
///
/// Substituted text is never rescanned; unknown keys are left in place.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
