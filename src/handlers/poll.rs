use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;

use crate::collector::{AggregateReport, PollOptions, SnmpCollector};
use crate::snmp::AgentQuery;

/// Общее состояние сервера
pub struct AppState<Q> {
    pub agent: Q,
    pub options: PollOptions,
}

/// POST /poll: тело запроса это инвентарь, ответ это сводный отчёт
pub async fn handle_poll<Q: AgentQuery + 'static>(
    State(state): State<Arc<AppState<Q>>>,
    Json(document): Json<Value>,
) -> Result<Json<AggregateReport>, (StatusCode, String)> {
    let outcome = SnmpCollector::collect_all(&state.agent, &document, &state.options)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!(
        devices = outcome.summary.polled_devices,
        skipped = outcome.summary.skipped_entries,
        failed = outcome.summary.failed_queries,
        "Опрос по HTTP запросу завершён"
    );

    Ok(Json(outcome.report))
}
