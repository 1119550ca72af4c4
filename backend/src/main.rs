mod error;
mod handlers;
mod settings;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::settings::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.server.log_level))
        .init();

    // router HTTP
    let app = handlers::build_router(&config.server)?;
    info!(
        "orígenes CORS permitidos: {:?}",
        config.server.cors_origins_list()
    );

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("no se pudo abrir {}", addr))?;
    info!("backend escuchando en {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error sirviendo HTTP")?;

    info!("backend detenido");
    Ok(())
}

// RUST_LOG tiene prioridad sobre PIPELINE__SERVER__LOG_LEVEL
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("no se pudo escuchar ctrl-c: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // único test que toca RUST_LOG, los dos casos van juntos
    #[test]
    fn env_filter_prefiere_rust_log_sobre_log_level() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter("warn").to_string(), "warn");

        std::env::set_var("RUST_LOG", "backend=trace");
        let filter = env_filter("warn");
        std::env::remove_var("RUST_LOG");
        assert_eq!(filter.to_string(), "backend=trace");
    }
}
