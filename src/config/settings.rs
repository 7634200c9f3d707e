use serde::{Deserialize, Serialize};

/// Базовые настройки приложения
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Откуда берём инвентарь
    pub inventory: InventorySettings,
    /// Куда отправляем отчёт
    pub report: ReportSettings,
    /// Настройки SNMP подключения
    pub connection: ConnectionSettings,
    /// HTTP клиент для инвентаря и отчёта
    pub http: HttpSettings,
    /// Режим serve
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    pub url: String,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:81/test-soft/api.php".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub url: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:81/test-soft/update_api.php".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Таймаут SNMP запроса к одному устройству (секунды)
    pub timeout: u64,
    /// Количество повторов при ошибках, 0 = одна попытка
    pub retries: u32,
    /// Пауза перед первым повтором (мс)
    pub retry_backoff_ms: u64,
    /// Сколько устройств опрашивать одновременно
    pub concurrency: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            timeout: 10,
            retries: 0,
            retry_backoff_ms: 500,
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Таймаут HTTP запросов (секунды)
    pub timeout: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}
