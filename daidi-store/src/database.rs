use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;
use rust_decimal::Decimal;
use tracing::{info, warn};
use daidi_catalog::PricingConfig;
use crate::app_config::DatabaseConfig;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Override pricing constants from the `site_settings` table.
    ///
    /// Unknown keys are ignored. Unparsable values and values that would make
    /// the configuration invalid keep the previous value.
    pub async fn fetch_pricing_config(&self, defaults: PricingConfig) -> Result<PricingConfig, sqlx::Error> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, value FROM site_settings WHERE is_active = TRUE",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(apply_pricing_settings(defaults, rows))
    }
}

pub(crate) fn apply_pricing_settings(defaults: PricingConfig, rows: Vec<(String, String)>) -> PricingConfig {
    let mut config = defaults;

    for (key, value) in rows {
        let mut candidate = config.clone();
        let target = match key.as_str() {
            "design_fee" => &mut candidate.design_fee,
            "lamination_unit_cost" => &mut candidate.lamination_unit_cost,
            "uv_unit_cost" => &mut candidate.uv_unit_cost,
            "fancy_paper_unit_cost" => &mut candidate.fancy_paper_unit_cost,
            "volume_discount_step" => &mut candidate.volume_discount_step,
            "max_volume_discount" => &mut candidate.max_volume_discount,
            _ => continue,
        };

        match Decimal::from_str(value.trim()) {
            Ok(parsed) => *target = parsed,
            Err(_) => {
                warn!("Ignoring unparsable pricing setting {}={}", key, value);
                continue;
            }
        }

        match candidate.validate() {
            Ok(()) => config = candidate,
            Err(err) => warn!("Ignoring pricing setting {}={}: {}", key, value, err),
        }
    }

    config
}
