use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::snmp::QueryError;

/// Ответ агента, выровненный по запрошенным OID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// (OID, значение) в порядке запроса; `None` означает отсутствие значения
    pub entries: Vec<(String, Option<String>)>,
    /// Почему значения отсутствуют, если запрос не удался
    pub error: Option<QueryError>,
}

impl QueryResult {
    pub fn from_values(oids: &[&str], values: Vec<String>) -> Self {
        Self {
            entries: oids
                .iter()
                .map(|oid| oid.to_string())
                .zip(values.into_iter().map(Some))
                .collect(),
            error: None,
        }
    }

    /// Все значения `None`, длина как у запроса
    pub fn absent(oids: &[&str], error: QueryError) -> Self {
        Self {
            entries: oids.iter().map(|oid| (oid.to_string(), None)).collect(),
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn absent_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_none()).count()
    }
}

/// Метрики одного устройства: имя -> значение или `null`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceReport(IndexMap<String, Option<String>>);

impl DeviceReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: impl Into<String>, value: Option<String>) {
        self.0.insert(metric.into(), value);
    }

    pub fn get(&self, metric: &str) -> Option<&Option<String>> {
        self.0.get(metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for DeviceReport {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Сводный отчёт: hostname -> метрики устройства
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateReport(IndexMap<String, DeviceReport>);

impl AggregateReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Повторный hostname заменяет значение, но сохраняет исходную позицию
    pub fn insert(&mut self, hostname: impl Into<String>, report: DeviceReport) -> Option<DeviceReport> {
        self.0.insert(hostname.into(), report)
    }

    pub fn get(&self, hostname: &str) -> Option<&DeviceReport> {
        self.0.get(hostname)
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.0.contains_key(hostname)
    }

    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Итоги одного опроса
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub total_entries: usize,
    pub polled_devices: usize,
    pub skipped_entries: usize,
    pub failed_queries: usize,
    pub total_metrics: usize,
    pub absent_metrics: usize,
}

/// Результат опроса всего инвентаря
#[derive(Debug, Clone, Default)]
pub struct PollOutcome {
    pub report: AggregateReport,
    pub summary: PollSummary,
}
