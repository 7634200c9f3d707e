use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::collector::{PollOptions, PollOutcome, SnmpCollector};
use crate::config::AppConfig;
use crate::formatter::JsonFormatter;
use crate::snmp::{AgentQuery, SnmpV2cAgent};

use super::log_summary;

/// Опрос по локальному файлу инвентаря (`-` = stdin), без HTTP
pub async fn poll(config: &AppConfig, inventory: &Path, output: Option<&Path>) -> Result<()> {
    let agent = SnmpV2cAgent::new(config.get_timeout());
    poll_with(&agent, &config.poll_options(), inventory, output).await?;
    Ok(())
}

pub async fn poll_with<Q: AgentQuery>(
    agent: &Q,
    options: &PollOptions,
    inventory: &Path,
    output: Option<&Path>,
) -> Result<PollOutcome> {
    let raw = read_inventory(inventory).await?;
    let document: Value =
        serde_json::from_str(&raw).context("Файл инвентаря не является JSON")?;

    let outcome = SnmpCollector::collect_all(agent, &document, options)
        .await
        .context("Инвентарь имеет неверный формат")?;
    log_summary(&outcome.summary);

    let json = JsonFormatter::to_json_string(&outcome.report)?;
    match output {
        Some(path) => tokio::fs::write(path, format!("{json}\n"))
            .await
            .context(format!("Не удалось записать отчёт в {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(outcome)
}

async fn read_inventory(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("Не удалось прочитать инвентарь из stdin")?;
        Ok(raw)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .context(format!("Не удалось прочитать файл: {}", path.display()))
    }
}
