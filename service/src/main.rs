use anyhow::Context;
use clap::Parser;
use liftoff_service::{Api, Service};
use liftoff_types::game::EngineConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Minimum accepted bet
    #[arg(long)]
    min_bet: Option<u64>,

    /// Balance granted on registration
    #[arg(long)]
    starting_balance: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut config = EngineConfig::default();
    if let Some(min_bet) = args.min_bet {
        config.min_bet = min_bet;
    }
    if let Some(starting_balance) = args.starting_balance {
        config.starting_balance = starting_balance;
    }

    let service = Arc::new(Service::new(config));
    let api = Api::new(service);
    let app = api.router();

    // Start server
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);
    axum::serve(listener, app).await.context("axum server error")?;

    Ok(())
}
