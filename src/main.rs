//! imagegen-gateway - HTTP front end for image-generation providers

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imagegen_gateway::api::{self, AppState};
use imagegen_gateway::telemetry::sink_from_config;
use imagegen_gateway::{Gateway, ProviderConfig, ProviderFactory, TelemetryConfig};

#[derive(Debug, Parser)]
#[command(
    name = "imagegen-gateway",
    about = "HTTP gateway for prompt-to-image providers",
    version = env!("CARGO_PKG_VERSION")
)]
struct ServerArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "GATEWAY_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must run before argument parsing so `.env` values feed clap's env fallbacks.
    let dotenv = dotenvy::dotenv();
    let args = ServerArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagegen_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let provider_config = ProviderConfig::from_env()?;
    let provider = ProviderFactory::create(&provider_config)?;
    if provider.is_configured() {
        info!(provider = provider.name(), "Provider configured");
    } else {
        warn!(
            provider = provider.name(),
            "{} is not set; generation requests will fail until it is",
            provider.api_key_env()
        );
    }

    let telemetry_config = TelemetryConfig::from_env();
    match &telemetry_config {
        Some(config) => info!(table = %config.table, "Request telemetry enabled"),
        None => info!("Request telemetry disabled (SUPABASE_URL not set)"),
    }

    let gateway = Gateway::new(Arc::from(provider), sink_from_config(telemetry_config));
    let app = api::create_router(AppState::new(gateway));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
