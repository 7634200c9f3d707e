use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub mod settings;

pub use settings::Settings;

use crate::collector::{PollOptions, RetryPolicy};

/// Путь к конфигурации по умолчанию
pub const DEFAULT_CONFIG_PATH: &str = "./config/poller.yaml";

/// Главная конфигурация приложения
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub settings: Settings,
}

impl AppConfig {
    /// Загружает конфигурацию из YAML файла и применяет переменные окружения.
    /// Если файла нет, берутся настройки по умолчанию.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_env(path, |key| env::var(key).ok())
    }

    pub fn load_with_env(
        path: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = path.as_ref();

        let settings = if path.exists() {
            let content = std::fs::read_to_string(path)
                .context(format!("Не удалось прочитать файл: {}", path.display()))?;
            if content.trim().is_empty() {
                Settings::default()
            } else {
                serde_yml::from_str(&content).context("Не удалось распарсить YAML")?
            }
        } else {
            tracing::debug!(path = %path.display(), "Файл конфигурации не найден, используются значения по умолчанию");
            Settings::default()
        };

        let mut config = Self { settings };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Переменные окружения перекрывают значения из файла
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let s = &mut self.settings;

        if let Some(url) = lookup("POLLER_INVENTORY_URL") {
            s.inventory.url = url;
        }
        if let Some(url) = lookup("POLLER_REPORT_URL") {
            s.report.url = url;
        }
        if let Some(bind) = lookup("POLLER_BIND") {
            s.server.bind = bind;
        }
        override_parsed(&lookup, "SNMP_TIMEOUT", &mut s.connection.timeout)?;
        override_parsed(&lookup, "SNMP_RETRIES", &mut s.connection.retries)?;
        override_parsed(&lookup, "POLLER_CONCURRENCY", &mut s.connection.concurrency)?;

        Ok(())
    }

    pub fn get_inventory_url(&self) -> &str {
        &self.settings.inventory.url
    }

    pub fn get_report_url(&self) -> &str {
        &self.settings.report.url
    }

    pub fn get_bind(&self) -> &str {
        &self.settings.server.bind
    }

    /// Таймаут SNMP запроса к одному устройству
    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.connection.timeout.max(1))
    }

    pub fn get_http_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.http.timeout.max(1))
    }

    pub fn poll_options(&self) -> PollOptions {
        let connection = &self.settings.connection;
        PollOptions {
            concurrency: connection.concurrency.max(1),
            retry: RetryPolicy::new(
                connection.retries,
                Duration::from_millis(connection.retry_backoff_ms),
            ),
        }
    }

    pub fn debug_config(&self) {
        let c = &self.settings.connection;
        tracing::debug!(
            inventory = %self.get_inventory_url(),
            report = %self.get_report_url(),
            timeout_secs = c.timeout,
            retries = c.retries,
            concurrency = c.concurrency,
            "Конфигурация загружена"
        );
    }
}

fn override_parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Невалидное значение {}='{}': {}", key, raw, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_with_env(dir.path().join("absent.yaml"), no_env).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.get_timeout(), Duration::from_secs(10));
        assert_eq!(
            config.poll_options(),
            PollOptions {
                concurrency: 1,
                retry: RetryPolicy::new(0, Duration::from_millis(500)),
            }
        );
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "inventory:\n  url: http://inventory.local/devices\nconnection:\n  timeout: 3\n  concurrency: 16\n"
        )
        .unwrap();

        let config = AppConfig::load_with_env(file.path(), no_env).unwrap();
        assert_eq!(config.get_inventory_url(), "http://inventory.local/devices");
        assert_eq!(config.get_report_url(), "http://localhost:81/test-soft/update_api.php");
        assert_eq!(config.get_timeout(), Duration::from_secs(3));
        assert_eq!(config.poll_options().concurrency, 16);
        assert_eq!(config.poll_options().retry.max_retries, 0);
    }

    #[test]
    fn env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection:\n  timeout: 3\n").unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("SNMP_TIMEOUT", "7"),
            ("SNMP_RETRIES", "2"),
            ("POLLER_REPORT_URL", "http://sink.local/report"),
        ]);
        let config =
            AppConfig::load_with_env(file.path(), |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.get_timeout(), Duration::from_secs(7));
        assert_eq!(config.poll_options().retry.max_retries, 2);
        assert_eq!(config.get_report_url(), "http://sink.local/report");
    }

    #[test]
    fn invalid_env_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_with_env(dir.path().join("absent.yaml"), |k| {
            (k == "POLLER_CONCURRENCY").then(|| "many".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn broken_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection: [unclosed").unwrap();
        assert!(AppConfig::load_with_env(file.path(), no_env).is_err());
    }
}
