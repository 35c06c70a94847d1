use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use daidi_core::contact::{normalize_subscriber_email, NewContactMessage, NewsletterSubscriber};
use daidi_shared::models::DomainEvent;
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub status: &'static str,
    pub id: uuid::Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/contact", post(submit_contact))
        .route("/v1/newsletter/subscribe", post(subscribe))
        .route("/v1/newsletter/unsubscribe", post(unsubscribe))
}

/// POST /v1/contact
async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<NewContactMessage>,
) -> Result<(StatusCode, Json<ContactReceipt>), AppError> {
    form.validate()?;

    let message = form.into_message();
    state.contacts.save_message(&message).await?;

    tracing::info!(message_id = %message.id, email = %message.email, "Contact message received");
    state.events.publish(DomainEvent::ContactReceived(message.received_event()));

    Ok((StatusCode::CREATED, Json(ContactReceipt { status: "received", id: message.id })))
}

/// POST /v1/newsletter/subscribe
async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<NewsletterRequest>,
) -> Result<Json<NewsletterSubscriber>, AppError> {
    let email = normalize_subscriber_email(&req.email)?;
    let subscriber = state.contacts.subscribe(&email).await?;
    Ok(Json(subscriber))
}

/// POST /v1/newsletter/unsubscribe
async fn unsubscribe(
    State(state): State<AppState>,
    Json(req): Json<NewsletterRequest>,
) -> Result<Json<Value>, AppError> {
    let email = normalize_subscriber_email(&req.email)?;
    if !state.contacts.unsubscribe(&email).await? {
        return Err(AppError::NotFoundError(format!("{} is not subscribed", email)));
    }
    Ok(Json(json!({ "status": "unsubscribed" })))
}
