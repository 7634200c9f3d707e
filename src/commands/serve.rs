use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::routes::create_router;
use crate::snmp::SnmpV2cAgent;

/// HTTP режим: GET /health и POST /poll
pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = AppState {
        agent: SnmpV2cAgent::new(config.get_timeout()),
        options: config.poll_options(),
    };

    let listener = TcpListener::bind(config.get_bind())
        .await
        .context(format!("Не удалось занять адрес {}", config.get_bind()))?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP сервер запущен");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP сервер завершился с ошибкой")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Не удалось установить обработчик Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Остановка HTTP сервера");
}
