use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use reqwest::Client;
use speech_tone_broker::config::credentials::UpstreamConfig;
use speech_tone_broker::config::proc_loader::{self, SettingsOrigin};
use speech_tone_broker::observability::metrics::get_metrics;
use speech_tone_broker::server::server::{self, AppState};
use speech_tone_broker::utils::logging::{self, LogLevel};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "speech-tone-broker.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Refuse to start when an upstream variable is missing
    #[arg(long, env = "STRICT_ENV")]
    strict_env: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read .env, args and settings
    // -------------------------------

    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let (settings, origin) = proc_loader::file_to_settings(Path::new(&args.config))?;
    logging::run(&settings, args.log_level);
    if origin == SettingsOrigin::Defaults {
        info!("settings file {} not found, using defaults", args.config);
    }

    // -------------------------------
    // 2. Upstream credentials, read once
    // -------------------------------

    let upstream = UpstreamConfig::load();
    upstream.check(args.strict_env)?;

    // -------------------------------
    // 3. Shared request client and app state
    // -------------------------------

    let client = Client::builder()
        .timeout(Duration::from_millis(settings.http.timeout_ms))
        .build()?;
    let state = AppState::from_config(&upstream, &client, get_metrics().await);
    info!(
        "speech token mode: {}, service url: {}",
        state.token_broker.mode().as_str(),
        upstream.speech.service_url
    );

    // -------------------------------
    // 4. Serve until ctrl-c
    // -------------------------------

    server::start(&settings, state).await
}
