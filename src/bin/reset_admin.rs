//! Replace every administrator with a single account taken from
//! `ADMIN_USERNAME` / `ADMIN_PASSWORD`. All sessions are revoked.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use portfolio_admin::auth::hash_password;
use portfolio_admin::config::Config;
use portfolio_admin::db;
use portfolio_admin::error::{AppError, AppResult};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Admin reset failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<()> {
    let config = Config::from_env();

    let (Some(username), Some(password)) = (config.admin_username, config.admin_password) else {
        return Err(AppError::Validation(
            "ADMIN_USERNAME and ADMIN_PASSWORD must be set".into(),
        ));
    };

    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;

    let password_hash = hash_password(&password)?;
    let admin = db::admins::replace_all(&pool, &username, &password_hash).await?;

    info!("✅ Admin reset: {} ({})", admin.username, admin.id);
    Ok(())
}
