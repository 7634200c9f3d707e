use serde_json::{Map, Value};
use thiserror::Error;

pub mod catalog;

pub use catalog::{CatalogError, OidCatalog};

/// Стандартный порт SNMP-агента
pub const DEFAULT_SNMP_PORT: u16 = 161;

/// Фатальные ошибки разбора инвентаря
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("документ инвентаря должен быть JSON-объектом, получено: {0}")]
    NotAMapping(&'static str),
    #[error("документ инвентаря не является JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Причина, по которой отдельное устройство пропущено
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("описание устройства должно быть JSON-объектом, получено: {0}")]
    DescriptorNotAMapping(&'static str),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Параметры подключения к агенту.
///
/// Поля остаются `None`, если в инвентаре их нет или значение непригодно:
/// такое устройство не отбрасывается, а получает ошибку на этапе запроса.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub community: Option<String>,
}

impl Endpoint {
    pub fn new(ip: impl Into<String>, port: u16, community: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            port: Some(port),
            community: Some(community.into()),
        }
    }
}

/// Устройство из инвентаря
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub hostname: String,
    pub endpoint: Endpoint,
    pub catalog: OidCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub hostname: String,
    pub reason: EntryError,
}

/// Результат разбора инвентаря
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    /// Валидные устройства в порядке документа
    pub devices: Vec<Device>,
    pub skipped: Vec<SkippedEntry>,
}

impl Inventory {
    pub fn total_entries(&self) -> usize {
        self.devices.len() + self.skipped.len()
    }
}

/// Разбирает инвентарь из текста JSON
pub fn parse_inventory_str(raw: &str) -> Result<Inventory, InventoryError> {
    let document: Value = serde_json::from_str(raw)?;
    parse_inventory(&document)
}

/// Разбирает документ `{hostname: descriptor}` в список устройств.
///
/// Ошибка возвращается только если сам документ не объект; битые записи
/// пропускаются с предупреждением.
pub fn parse_inventory(document: &Value) -> Result<Inventory, InventoryError> {
    let entries = document
        .as_object()
        .ok_or_else(|| InventoryError::NotAMapping(json_kind(document)))?;

    let mut inventory = Inventory::default();

    for (hostname, descriptor) in entries {
        match validate_entry(hostname, descriptor) {
            Ok(device) => inventory.devices.push(device),
            Err(reason) => {
                tracing::warn!(hostname = %hostname, error = %reason, "Устройство пропущено");
                inventory.skipped.push(SkippedEntry {
                    hostname: hostname.clone(),
                    reason,
                });
            }
        }
    }

    Ok(inventory)
}

/// Проверяет одну запись инвентаря
pub fn validate_entry(hostname: &str, descriptor: &Value) -> Result<Device, EntryError> {
    let descriptor = descriptor
        .as_object()
        .ok_or_else(|| EntryError::DescriptorNotAMapping(json_kind(descriptor)))?;

    let catalog = OidCatalog::from_field(descriptor.get("oids"))?;

    Ok(Device {
        hostname: hostname.to_string(),
        endpoint: Endpoint {
            ip: extract_string(descriptor, "ip").filter(|ip| !ip.trim().is_empty()),
            port: extract_port(descriptor),
            community: extract_string(descriptor, "community_string"),
        },
        catalog,
    })
}

fn extract_string(descriptor: &Map<String, Value>, key: &str) -> Option<String> {
    descriptor.get(key).and_then(Value::as_str).map(str::to_string)
}

// Отсутствующий порт -> 161; null, 0 и мусор -> None
fn extract_port(descriptor: &Map<String, Value>) -> Option<u16> {
    let port = match descriptor.get("port") {
        None => return Some(DEFAULT_SNMP_PORT),
        Some(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Some(Value::String(s)) => s.trim().parse::<u16>().ok(),
        Some(_) => None,
    };
    port.filter(|p| *p != 0)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
