//! AgencyDesk headless entry point.
//!
//! Restores the cached session, reports health and relays notifications to
//! the log until interrupted.

use agencydesk_app::AppContext;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ctx = AppContext::new().await?;

    let health = ctx.health_check().await;
    info!(score = health.score, healthy = health.is_healthy, "Startup health");
    if let Some(user) = ctx.store.current_user() {
        info!(
            user = %user.name,
            clients = ctx.store.clients().len(),
            tasks = ctx.store.tasks().len(),
            "Session restored"
        );
    } else {
        info!(base_url = %ctx.config.api.base_url, "No cached session, sign in from the UI");
    }

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Could not listen for shutdown signal");
    }
    ctx.shutdown().await?;
    Ok(())
}
