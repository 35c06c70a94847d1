use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};
use daidi_core::contact::{ContactMessage, NewsletterSubscriber};
use daidi_core::repository::{ContactRepository, RepoResult};

pub struct StoreContactRepository {
    pool: PgPool,
}

impl StoreContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    email: String,
    is_active: bool,
    subscribed_at: DateTime<Utc>,
}

#[async_trait]
impl ContactRepository for StoreContactRepository {
    async fn save_message(&self, message: &ContactMessage) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, phone, subject, message, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(message.email.expose())
        .bind(message.phone.as_ref().map(|p| p.expose().as_str()))
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.is_read)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn subscribe(&self, email: &str) -> RepoResult<NewsletterSubscriber> {
        let row: SubscriberRow = sqlx::query_as(
            r#"
            INSERT INTO newsletter_subscribers (email, is_active)
            VALUES ($1, TRUE)
            ON CONFLICT (email) DO UPDATE SET is_active = TRUE
            RETURNING email, is_active, subscribed_at
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(NewsletterSubscriber {
            email: row.email,
            is_active: row.is_active,
            subscribed_at: row.subscribed_at,
        })
    }

    async fn unsubscribe(&self, email: &str) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE newsletter_subscribers SET is_active = FALSE WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
