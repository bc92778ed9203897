//! Handlers for the JSON API.
//!
//! Everything under `/api` speaks JSON, including the error envelopes. Content
//! lookups are read-only against the store loaded at startup; the contact
//! endpoint is the only one with side effects.
use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};

use atelier::{ContactMessage, ContactPayload, Locale};

use super::AppState;

/// Liveness probe for the contact endpoint.
pub async fn contact_status() -> Response {
    Json(json!({ "status": "Contact API is running" })).into_response()
}

/// Accept a contact form submission.
///
/// Checks run in order: rate limit, body shape, honeypot, field validation,
/// delivery. The honeypot path returns the success envelope so that bots
/// cannot tell they were filtered.
pub async fn submit_contact(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let addr = client_addr(&headers, peer);

    if !state.limiter.check(&addr) {
        warn!(name: "contact", "Rate limited submission from {}", addr);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests. Please try again later." })),
        )
            .into_response();
    }

    let payload: ContactPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request body" })),
            )
                .into_response();
        }
    };

    if payload.is_spam() {
        info!(name: "contact", "Dropped a submission that tripped the honeypot");
        return success_envelope();
    }

    let field_errors = payload.validate();
    if !field_errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid form data. Please check all required fields.",
                "fields": field_errors,
            })),
        )
            .into_response();
    }

    let message = ContactMessage::from_payload(&payload);
    if let Err(err) = state.mailer.deliver(&message).await {
        error!(name: "contact", "{}", err);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error. Please try again later." })),
        )
            .into_response();
    }

    success_envelope()
}

pub async fn list_projects(State(state): State<AppState>, Path(locale): Path<String>) -> Response {
    let locale = match parse_locale(&locale) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    Json(state.content.projects(locale)).into_response()
}

pub async fn get_project(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let locale = match parse_locale(&locale) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    match state.content.project(locale, &slug) {
        Some(project) => Json(project).into_response(),
        None => not_found(),
    }
}

pub async fn related_projects(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let locale = match parse_locale(&locale) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    if state.content.project(locale, &slug).is_none() {
        return not_found();
    }

    Json(state.content.related_projects(locale, &slug)).into_response()
}

pub async fn list_posts(State(state): State<AppState>, Path(locale): Path<String>) -> Response {
    let locale = match parse_locale(&locale) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    Json(state.content.posts(locale)).into_response()
}

pub async fn get_post(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Response {
    let locale = match parse_locale(&locale) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    match state.content.post(locale, &slug) {
        Some(post) => Json(post).into_response(),
        None => not_found(),
    }
}

pub async fn list_service_tags(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> Response {
    let locale = match parse_locale(&locale) {
        Ok(locale) => locale,
        Err(response) => return response,
    };

    Json(state.content.service_tags(locale)).into_response()
}

fn success_envelope() -> Response {
    Json(json!({
        "success": true,
        "message": "Message received. We will be in touch shortly.",
    }))
    .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

fn parse_locale(raw: &str) -> Result<Locale, Response> {
    raw.parse().map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Unknown locale" })),
        )
            .into_response()
    })
}

/// The client address used as the rate-limit key.
///
/// Proxy headers win over the socket peer, which on a deployed site is the
/// reverse proxy rather than the visitor.
fn client_addr(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|value| value.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    peer.ip().to_string()
}
