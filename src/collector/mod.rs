use futures_util::stream::{self, StreamExt};
use serde_json::Value;

use crate::inventory::{Device, InventoryError, parse_inventory};
use crate::snmp::{AgentQuery, QueryError};

pub mod retry;
pub mod types;

pub use retry::{RetryPolicy, query_with_retry};
pub use types::{AggregateReport, DeviceReport, PollOutcome, PollSummary, QueryResult};

/// Параметры опроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Сколько устройств опрашивать одновременно; 1 = последовательно
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            retry: RetryPolicy::none(),
        }
    }
}

/// Коллектор для сбора SNMP данных по инвентарю
pub struct SnmpCollector;

impl SnmpCollector {
    /// Разбирает инвентарь и опрашивает все валидные устройства
    pub async fn collect_all<Q: AgentQuery>(
        agent: &Q,
        document: &Value,
        options: &PollOptions,
    ) -> Result<PollOutcome, InventoryError> {
        let inventory = parse_inventory(document)?;
        let mut outcome = Self::collect_devices(agent, &inventory.devices, options).await;

        outcome.summary.total_entries = inventory.total_entries();
        outcome.summary.skipped_entries = inventory.skipped.len();

        Ok(outcome)
    }

    /// Опрашивает устройства и складывает отчёты в порядке списка.
    ///
    /// Запросы идут параллельно не более `concurrency` штук, но результаты
    /// забираются строго по порядку и пишутся в отчёт из одного места.
    pub async fn collect_devices<Q: AgentQuery>(
        agent: &Q,
        devices: &[Device],
        options: &PollOptions,
    ) -> PollOutcome {
        let results: Vec<(&Device, QueryResult)> = stream::iter(devices)
            .map(|device| async move {
                let result = Self::query_device(agent, device, &options.retry).await;
                (device, result)
            })
            .buffered(options.concurrency.max(1))
            .boxed()
            .collect()
            .await;

        let mut outcome = PollOutcome::default();
        outcome.summary.polled_devices = results.len();

        for (device, result) in results {
            if result.is_failed() {
                outcome.summary.failed_queries += 1;
            }
            outcome.summary.absent_metrics += result.absent_count();
            outcome.summary.total_metrics += result.entries.len();

            let report = Self::aggregate_device(device, &result);
            if outcome.report.insert(device.hostname.clone(), report).is_some() {
                tracing::warn!(hostname = %device.hostname, "Повторный hostname, предыдущий отчёт заменён");
            }
        }

        outcome
    }

    /// Один запрос к устройству; ошибка превращается в `None` для всех OID
    pub async fn query_device<Q: AgentQuery>(
        agent: &Q,
        device: &Device,
        retry: &RetryPolicy,
    ) -> QueryResult {
        let oids: Vec<&str> = device.catalog.identifiers().collect();
        if oids.is_empty() {
            return QueryResult::from_values(&oids, Vec::new());
        }

        let error = match query_with_retry(agent, &device.endpoint, &oids, retry).await {
            Ok(values) if values.len() == oids.len() => return QueryResult::from_values(&oids, values),
            Ok(values) => QueryError::VarbindCount {
                expected: oids.len(),
                received: values.len(),
            },
            Err(e) => e,
        };

        // TODO: при ErrorStatus переспрашивать без OID с индексом ошибки, чтобы не терять остальные значения
        match &error {
            QueryError::ErrorStatus { status, index } => tracing::warn!(
                hostname = %device.hostname,
                status = %status,
                index = *index,
                "Агент вернул ошибку, значения устройства пропущены"
            ),
            other => tracing::warn!(
                hostname = %device.hostname,
                error = %other,
                "SNMP запрос не удался, значения устройства пропущены"
            ),
        }

        QueryResult::absent(&oids, error)
    }

    /// Сопоставляет значения с именами метрик каталога
    pub fn aggregate_device(device: &Device, result: &QueryResult) -> DeviceReport {
        let mut report = DeviceReport::new();

        for (oid, value) in &result.entries {
            if let Some(name) = device.catalog.metric_name(oid) {
                report.insert(name, value.clone());
            }
        }

        report
    }
}
