//! Account insights handler (`/abn_insights`).

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::identity::Principal;

pub async fn account_insights(
    State(state): State<AppState>,
    Principal(claim): Principal,
) -> Response {
    tracing::info!(
        user = claim.display_name(),
        user_id = claim.user_id(),
        provider = claim.identity_provider(),
        endpoint = state.insights.endpoint(),
        "Processing account insights request"
    );

    match state.insights.fetch().await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
