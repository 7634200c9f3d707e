use anyhow::{Context, Result};

use crate::collector::{PollOptions, PollOutcome, SnmpCollector};
use crate::config::AppConfig;
use crate::formatter::JsonFormatter;
use crate::remote::{ApiClient, DeliveryReceipt};
use crate::snmp::{AgentQuery, SnmpV2cAgent};

use super::log_summary;

/// Полный цикл: инвентарь по HTTP -> опрос -> отчёт по HTTP
pub async fn run(config: &AppConfig) -> Result<()> {
    let api = ApiClient::new(
        config.get_inventory_url(),
        config.get_report_url(),
        config.get_http_timeout(),
    )
    .context("Не удалось создать HTTP клиент")?;
    let agent = SnmpV2cAgent::new(config.get_timeout());

    run_with(&api, &agent, &config.poll_options()).await?;
    Ok(())
}

pub async fn run_with<Q: AgentQuery>(
    api: &ApiClient,
    agent: &Q,
    options: &PollOptions,
) -> Result<(PollOutcome, DeliveryReceipt)> {
    // Без инвентаря ни одного SNMP запроса не делаем
    let document = api
        .fetch_inventory()
        .await
        .context("Не удалось получить инвентарь")?;

    let outcome = SnmpCollector::collect_all(agent, &document, options)
        .await
        .context("Инвентарь имеет неверный формат")?;
    log_summary(&outcome.summary);

    let json = JsonFormatter::to_json_string(&outcome.report)?;
    println!("{json}");

    let receipt = api
        .deliver_report(json)
        .await
        .context("Не удалось отправить отчёт")?;
    tracing::info!(status = %receipt.status, body = %receipt.body, "Отчёт отправлен");

    Ok((outcome, receipt))
}
