use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use daidi_core::{Permission, Principal, UserProfile, UserRole};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub full_name: String,
    pub profile: UserProfile,
    pub role: UserRole,
    pub is_superuser: bool,
    pub is_back_office: bool,
    pub permissions: Vec<Permission>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/accounts/me", get(me))
}

/// GET /v1/accounts/me
async fn me(Extension(principal): Extension<Principal>) -> Json<MeResponse> {
    let profile = UserProfile::for_principal(&principal);
    Json(MeResponse {
        full_name: profile.full_name(),
        profile,
        is_back_office: principal.is_back_office(),
        permissions: principal.permissions(),
        user_id: principal.user_id,
        email: principal.email,
        role: principal.role,
        is_superuser: principal.is_superuser,
    })
}
