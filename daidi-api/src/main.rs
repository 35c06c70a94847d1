use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use daidi_api::{app, worker, AppState, AuthConfig};
use daidi_store::app_config::Config;
use daidi_store::{
    DbClient, StoreCatalogRepository, StoreContactRepository, StoreOrderRepository, StoreShowcaseRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daidi_api=debug,daidi_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Daidi API on port {}", config.server.port);

    let auth = AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        expiration: config.auth.jwt_expiration_seconds,
    };

    let app_state = match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url, &config.database)
                .await
                .context("Failed to connect to Postgres")?;
            if config.database.run_migrations {
                db.migrate().await.context("Failed to run migrations")?;
            }

            let pricing = db
                .fetch_pricing_config(config.pricing.clone())
                .await
                .context("Failed to load pricing settings")?;

            AppState::new(
                Arc::new(StoreCatalogRepository::new(db.pool.clone())),
                Arc::new(StoreOrderRepository::new(db.pool.clone())),
                Arc::new(StoreContactRepository::new(db.pool.clone())),
                Arc::new(StoreShowcaseRepository::new(db.pool.clone())),
                pricing,
                auth,
            )
            .context("Invalid pricing configuration")?
        }
        None => {
            tracing::warn!("No database configured, serving the in-memory demo catalog");
            AppState::in_memory(config.pricing.clone(), auth).context("Invalid pricing configuration")?
        }
    };

    // Background event consumer
    tokio::spawn(worker::start_event_logger(app_state.events.subscribe()));

    let app = app(app_state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
