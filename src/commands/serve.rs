use std::sync::Arc;

use anyhow::{Context, Result};
use leadgate_core::{
    AppState, Database, Mailer, ServiceConfig, SmtpMailer, Store, UnconfiguredMailer, http,
};
use tracing::{info, warn};

pub async fn run_serve(config: ServiceConfig) -> Result<()> {
    let db = Database::new(&config.database_path, &config.db_options)
        .await
        .with_context(|| {
            format!(
                "Failed to open database '{}'",
                config.database_path.display()
            )
        })?;
    info!(path = %config.database_path.display(), "database ready");

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(settings) => {
            info!(host = %settings.host, port = settings.port, "SMTP delivery enabled");
            Arc::new(SmtpMailer::new(settings).context("Failed to set up SMTP transport")?)
        }
        None => {
            warn!("EMAIL_ADDRESS/EMAIL_PASSWORD not set; resource emails will fail");
            Arc::new(UnconfiguredMailer)
        }
    };

    if config.admin.is_none() {
        warn!("ADMIN_USER/ADMIN_PASS not set; admin API is locked");
    }

    let state = AppState::new(Arc::new(Store::new(db.clone())), mailer)
        .with_admin(config.admin.clone())
        .with_sender_name(config.sender_name.clone());

    http::serve(config.bind_addr, state)
        .await
        .with_context(|| format!("HTTP server on {} failed", config.bind_addr))?;

    db.close().await;
    info!("server stopped");
    Ok(())
}
