use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use crate::collector::AggregateReport;

/// JSON форматтер для сводного отчёта.
///
/// Формат `{hostname: {metric: value | null}}`: порядок hostname как при
/// сборе, порядок метрик как в каталоге, отсутствующие значения явно `null`.
pub struct JsonFormatter;

impl JsonFormatter {
    /// Сериализует отчёт в JSON с отступом в 4 пробела
    pub fn to_json_string(report: &AggregateReport) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        report
            .serialize(&mut serializer)
            .map_err(|e| anyhow::anyhow!("Ошибка сериализации в JSON: {}", e))?;

        String::from_utf8(buf).map_err(|e| anyhow::anyhow!("Ошибка сериализации в JSON: {}", e))
    }

    /// Сериализует отчёт в компактный JSON
    pub fn to_json_compact(report: &AggregateReport) -> anyhow::Result<String> {
        serde_json::to_string(report).map_err(|e| anyhow::anyhow!("Ошибка сериализации в JSON: {}", e))
    }

    /// Читает отчёт обратно из JSON
    pub fn from_json_str(raw: &str) -> anyhow::Result<AggregateReport> {
        serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("Ошибка разбора отчёта: {}", e))
    }
}
