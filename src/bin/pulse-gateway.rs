// ABOUTME: Server binary wiring stores, provider clients, and the HTTP surface together
// ABOUTME: Loads environment configuration, initializes logging, and serves the router

//! # Pulse Gateway Server Binary

use anyhow::Result;
use clap::Parser;
use pulse_gateway::agent::EchoAgent;
use pulse_gateway::config::ServerConfig;
use pulse_gateway::logging;
use pulse_gateway::providers::{HevyClient, HevyConfig, WhoopClient, WhoopConfig};
use pulse_gateway::routes::{self, AppState};
use pulse_gateway::sms::{SmsBridge, TwilioClient, TwilioConfig};
use pulse_gateway::store::StorePaths;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "pulse-gateway")]
#[command(about = "Pulse Gateway - fitness and SMS provider integrations for LLM agents")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Pulse Gateway");
    info!("{}", config.summary());

    let paths = StorePaths::from_home()?;

    let hevy = Arc::new(HevyClient::new(
        HevyConfig::new(config.hevy.api_key.clone()),
        paths.hevy_key(),
    ));
    let whoop = Arc::new(WhoopClient::new(
        WhoopConfig::new(
            config.whoop.client_id.clone(),
            config.whoop.client_secret.clone(),
            config.whoop.redirect_uri.clone(),
        ),
        paths.whoop_token(),
        paths.whoop_state(),
    ));
    let twilio = Arc::new(TwilioClient::new(
        TwilioConfig::new(
            config.twilio.account_sid.clone(),
            config.twilio.auth_token.clone(),
            config.twilio.phone_number.clone(),
        ),
        paths.sms_config(),
    ));

    // Stand-in agent wiring; a real agent backend implements ConversationalAgent
    let bridge = Arc::new(SmsBridge::new(Arc::clone(&twilio), Arc::new(EchoAgent)));

    let state = Arc::new(AppState {
        hevy,
        whoop,
        twilio,
        bridge,
    });

    let app = routes::router(state);
    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
