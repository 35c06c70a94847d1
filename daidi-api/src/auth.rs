use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;
use daidi_core::{Principal, UserRole};
use crate::{state::AppState, error::AppError, middleware::auth::issue_token};

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user_id: String,
    expires_in: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/auth/guest", post(login_guest))
}

/// Anonymous customer session, enough to place and track orders.
async fn login_guest(State(state): State<AppState>) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let principal = Principal {
        user_id: format!("guest-{}", Uuid::new_v4()),
        email: None,
        name: None,
        role: UserRole::Customer,
        is_superuser: false,
    };

    let token = issue_token(&state.auth, &principal)
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    tracing::info!(user_id = %principal.user_id, "Issued guest token");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_id: principal.user_id,
            expires_in: state.auth.expiration,
        }),
    ))
}
