use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use daidi_shared::models::ContactReceivedEvent;
use daidi_shared::Masked;
use crate::validators::{validate_email, validate_iranian_phone, validate_not_empty};
use crate::CoreResult;

/// Message sent through the site's contact form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: Masked<String>,
    pub phone: Option<Masked<String>>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl NewContactMessage {
    pub fn validate(&self) -> CoreResult<()> {
        validate_not_empty("message", &self.message)?;
        validate_not_empty("name", &self.name)?;
        validate_email(self.email.trim())?;
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            validate_iranian_phone(phone)?;
        }
        Ok(())
    }

    pub fn into_message(self) -> ContactMessage {
        ContactMessage {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: Masked::new(self.email.trim().to_lowercase()),
            phone: self.phone.filter(|p| !p.is_empty()).map(Masked::new),
            subject: self.subject,
            message: self.message,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

impl ContactMessage {
    pub fn received_event(&self) -> ContactReceivedEvent {
        ContactReceivedEvent {
            message_id: self.id,
            subject: self.subject.clone(),
            timestamp: self.created_at.timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsletterSubscriber {
    pub email: String,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
}

/// Lower-cased, trimmed and syntactically valid
pub fn normalize_subscriber_email(email: &str) -> CoreResult<String> {
    let email = email.trim().to_lowercase();
    validate_email(&email)?;
    Ok(email)
}
