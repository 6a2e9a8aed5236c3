//! Sentinel bot
//!
//! Sends the scheduled valuation report and answers on-demand report
//! commands over Telegram until SIGINT/SIGTERM.

use dotenvy::dotenv;
use sentinel::config::Config;
use sentinel::core::http::build_client;
use sentinel::core::pipeline::ReportPipeline;
use sentinel::core::runtime::SentinelRuntime;
use sentinel::delivery::service::DeliveryService;
use sentinel::delivery::telegram::TelegramClient;
use sentinel::delivery::transport::NotificationTransport;
use sentinel::logging;
use sentinel::report::ReportRenderer;
use sentinel::services::binance::BinanceCollector;
use sentinel::services::market_data::IndicatorSource;
use sentinel::signals::engine::SignalEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = sentinel::config::get_environment();
    info!("Starting Sentinel");
    info!(environment = %env, "Environment");

    let config = Config::from_env()?;
    info!(
        chat_id = config.chat_id,
        cron = %config.cron_spec,
        leverage = config.leverage,
        max_send_attempts = config.max_send_attempts,
        "Configuration loaded"
    );

    let http = build_client(config.proxy.as_deref(), REQUEST_TIMEOUT)?;

    let transport: Arc<dyn NotificationTransport> = Arc::new(TelegramClient::with_client(
        config.telegram_api_url.clone(),
        http.clone(),
        config.bot_token.clone(),
        config.chat_id,
    ));
    let delivery = DeliveryService::new(transport, config.delivery());

    let source: Arc<dyn IndicatorSource> =
        Arc::new(BinanceCollector::with_client(config.binance_api_url.clone(), http));

    let pipeline = Arc::new(
        ReportPipeline::new(
            source,
            SignalEngine::new(config.thresholds),
            ReportRenderer::new(config.thresholds),
            delivery.clone(),
        )
        .with_leverage(config.leverage)
        .with_max_send_attempts(config.max_send_attempts),
    );

    if config.run_on_start {
        info!("Running one cycle on start...");
        pipeline.run_cycle().await;
    }

    let runtime = SentinelRuntime::new(pipeline, delivery, config.cron_spec.clone());
    let handles = runtime
        .start()
        .map_err(|e| format!("Failed to start runtime: {}", e))?;

    info!("Sentinel started, waiting for shutdown signal...");
    wait_for_shutdown().await;

    info!("Shutting down, waiting for in-flight work...");
    runtime.shutdown();
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Task ended abnormally");
        }
    }
    info!("Sentinel stopped");

    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown() {
    let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "Failed to install SIGTERM handler, only Ctrl-C will stop the bot");
            let _ = signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown() {
    let _ = signal::ctrl_c().await;
}
