use snmp2::Oid;

use super::QueryError;

/// Парсит строку вида `1.3.6.1.2.1.1.3.0` в `Oid`
pub fn parse_oid(s: &str) -> Result<Oid<'static>, QueryError> {
    let invalid = |reason: String| QueryError::InvalidOid {
        oid: s.to_string(),
        reason,
    };

    let parts: Vec<u64> = s
        .trim()
        .trim_start_matches('.')
        .split('.')
        .map(|p| p.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|e| invalid(e.to_string()))?;

    if parts.len() < 2 {
        return Err(invalid("нужно минимум две компоненты".to_string()));
    }

    Oid::from(&parts).map_err(|e| invalid(format!("{e:?}")))
}
