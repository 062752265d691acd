use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use authgate_backend_lib::{config::Settings, router, AppState};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Credential service: user signup and token issuance
#[derive(Parser, Debug)]
#[command(name = "authgate", version)]
struct Args {
    /// Path to the configuration file (YAML, TOML or JSON)
    #[arg(long = "conf", default_value = "resources/server/prod/conf.yml")]
    conf: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = Settings::load_from(&args.conf)
        .with_context(|| format!("loading {}", args.conf.display()))?;
    init_tracing(&settings.log_level, args.json_logs);

    let addr = settings.bind_addr;
    let state = AppState::from_settings(settings)
        .await
        .context("could not connect to store")?;

    let app = router::create_router(Arc::new(state));

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
