use std::time::Duration;

use crate::inventory::Endpoint;
use crate::snmp::{AgentQuery, QueryError};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Повторы запроса к агенту. По умолчанию выключены: одна попытка на устройство.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Сколько раз повторить после первой неудачи
    pub max_retries: u32,
    /// Задержка перед первым повтором, дальше удваивается
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub const fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Задержка перед повтором номер `attempt` (с единицы)
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Запрос с повторами на временных ошибках
pub async fn query_with_retry<Q: AgentQuery>(
    agent: &Q,
    endpoint: &Endpoint,
    oids: &[&str],
    policy: &RetryPolicy,
) -> Result<Vec<String>, QueryError> {
    let mut attempt = 0;

    loop {
        match agent.get_many(endpoint, oids).await {
            Ok(values) => return Ok(values),
            Err(e) if attempt < policy.max_retries && e.is_transient() => {
                attempt += 1;
                let delay = policy.delay(attempt);
                tracing::debug!(error = %e, attempt, ?delay, "Повтор SNMP запроса");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
