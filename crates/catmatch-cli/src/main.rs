//! Catmatch terminal host.
//!
//! Speaks JSON lines: one client message per stdin line, one server message
//! per stdout line. Logs go to stderr.

use catmatch_core::GameState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod protocol;
mod runner;
mod session;

use config::HostConfig;
use session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout carries the protocol, so tracing writes to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = HostConfig::from_env()?;
    info!(seed = config.seed, "Starting Catmatch session...");

    let session = Session::new(GameState::with_rules(config.rules, config.seed));
    runner::run_session(session, tokio::io::stdin(), tokio::io::stdout()).await?;

    Ok(())
}
