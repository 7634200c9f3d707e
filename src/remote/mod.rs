use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;

/// Ошибка получения инвентаря
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("запрос инвентаря не удался: {0}")]
    Request(#[source] reqwest::Error),
    #[error("сервер инвентаря ответил {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("ответ с инвентарём не является JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Ошибка отправки отчёта
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("отправка отчёта не удалась: {0}")]
    Request(#[source] reqwest::Error),
    #[error("приёмник отчёта ответил {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Ответ приёмника на отправленный отчёт
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP клиент для источника инвентаря и приёмника отчётов
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    inventory_url: String,
    report_url: String,
}

impl ApiClient {
    pub fn new(
        inventory_url: impl Into<String>,
        report_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            inventory_url: inventory_url.into(),
            report_url: report_url.into(),
        })
    }

    /// GET инвентаря; тело должно быть JSON
    pub async fn fetch_inventory(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(&self.inventory_url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let document = response.json::<Value>().await.map_err(FetchError::Decode)?;
        tracing::info!(url = %self.inventory_url, "Инвентарь получен");
        Ok(document)
    }

    /// POST готового JSON отчёта. Повторов нет.
    pub async fn deliver_report(&self, body: String) -> Result<DeliveryReceipt, DeliveryError> {
        let response = self
            .client
            .post(&self.report_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(DeliveryError::Request)?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %self.report_url, error = %e, "Не удалось прочитать ответ приёмника отчёта");
                String::new()
            }
        };

        if !status.is_success() {
            return Err(DeliveryError::Status { status, body });
        }

        Ok(DeliveryReceipt { status, body })
    }
}
