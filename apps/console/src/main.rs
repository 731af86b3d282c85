use std::sync::Arc;

use chrono::Local;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod input;
mod screens;
mod shell;

use session_cell::SessionState;
use shared_config::AppConfig;
use shared_gateway::ApiGateway;
use shared_query::QueryCache;

use crate::shell::AdminShell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing. Log lines go to stderr so they never interleave
    // with the menus on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting ConfirmaMed admin console");

    // Load configuration
    let config = AppConfig::from_env();

    // Create shared state
    let gateway = Arc::new(ApiGateway::new(&config)?);
    let cache = Arc::new(QueryCache::new());
    let session = Arc::new(SessionState::new());

    // A 401 from any call signs the whole console out at once: the session
    // record and every cached read are dropped, and the next guarded screen
    // bounces to the login prompt.
    {
        let session = session.clone();
        let cache = cache.clone();
        gateway.set_unauthorized_hook(Arc::new(move || {
            session.clear();
            cache.clear();
        }));
    }

    let today = Local::now().date_naive();
    let mut shell = AdminShell::new(gateway, cache, session, config, today);
    shell.run().await?;
    Ok(())
}
