use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::post_service::PostService;
use application::retry::RetryPolicy;
use data::repositories::memory::post_repository::InMemoryPostRepository;
use data::repositories::postgres::post_repository::{PostgresPostRepository, TransactionTimeouts};
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use infrastructure::uploads::{UploadSettings, UploadStore};
use presentation::{AppState, SharedPostRepository};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let repo = build_repository(&settings).await?;
    let uploads = UploadStore::new(UploadSettings::new(
        settings.upload_dir.clone(),
        &settings.upload_public_prefix,
        settings.upload_reference_style,
    ));
    let retry = RetryPolicy {
        max_attempts: settings.db_tx_max_attempts,
        initial_delay: Duration::from_millis(settings.db_tx_retry_delay_ms),
        ..RetryPolicy::default()
    };
    info!(
        upload_dir = %settings.upload_dir.display(),
        prefix = %uploads.public_prefix(),
        "cover uploads configured"
    );

    let post_service = Arc::new(PostService::new(repo, uploads, retry));
    server::run_http(&settings, AppState::new(post_service)).await
}

async fn build_repository(settings: &Settings) -> Result<SharedPostRepository> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("DATABASE_URL is not set, posts are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryPostRepository::new()));
    };

    let pool = create_pool(database_url, settings.db_max_connections).await?;
    run_migrations(&pool).await?;
    info!("database ready");

    let timeouts = TransactionTimeouts {
        update: Duration::from_millis(settings.db_update_tx_timeout_ms),
        delete: Duration::from_millis(settings.db_delete_tx_timeout_ms),
    };
    Ok(Arc::new(PostgresPostRepository::new(pool, timeouts)))
}
