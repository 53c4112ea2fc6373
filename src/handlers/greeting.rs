//! Greeting handler (`/HttpTrigger`).

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::identity::Principal;

#[derive(Debug, Default, Deserialize)]
pub struct GreetingQuery {
    name: Option<String>,
}

/// Query parameter first, then a `name` string in a JSON object body.
/// Empty values count as absent; an unparsable body is ignored.
pub fn resolve_name(query: Option<String>, body: &[u8]) -> Option<String> {
    query.filter(|n| !n.is_empty()).or_else(|| {
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        value
            .get("name")?
            .as_str()
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
    })
}

pub fn greeting_text(name: Option<&str>, user: &str) -> String {
    match name {
        Some(name) => format!("Hello, {}. Welcome, {}!", name, user),
        None => format!(
            "Welcome, {}. This HTTP triggered function executed successfully.",
            user
        ),
    }
}

pub async fn greet(
    Principal(claim): Principal,
    query: Result<Query<GreetingQuery>, QueryRejection>,
    body: Bytes,
) -> impl IntoResponse {
    tracing::info!(
        user = claim.display_name(),
        user_id = claim.user_id(),
        provider = claim.identity_provider(),
        "Greeting request"
    );
    let name = resolve_name(query.ok().and_then(|Query(q)| q.name), &body);
    (StatusCode::OK, greeting_text(name.as_deref(), claim.display_name()))
}
