use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::json_kind;

/// Ошибки разбора поля `oids`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("поле oids отсутствует")]
    Missing,
    #[error("поле oids должно быть строкой с JSON, получено: {0}")]
    NotAString(&'static str),
    #[error("невалидный JSON в oids: {0}")]
    InvalidJson(String),
    #[error("oids должен быть JSON-объектом, получено: {0}")]
    NotAMapping(&'static str),
    #[error("имя метрики для OID {oid} должно быть строкой, получено: {kind}")]
    NonStringName { oid: String, kind: &'static str },
}

/// Каталог OID устройства: OID -> имя метрики.
///
/// Порядок ключей совпадает с порядком в исходном JSON и задаёт порядок
/// запроса и сопоставления значений.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OidCatalog {
    entries: IndexMap<String, String>,
}

impl OidCatalog {
    /// Разбирает значение поля `oids` из описания устройства
    pub fn from_field(field: Option<&Value>) -> Result<Self, CatalogError> {
        match field {
            None => Err(CatalogError::Missing),
            Some(Value::String(raw)) => Self::from_json_str(raw),
            Some(other) => Err(CatalogError::NotAString(json_kind(other))),
        }
    }

    /// Разбирает строку с JSON-объектом `{"1.3.6...": "metric"}`
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let decoded: Value =
            serde_json::from_str(raw).map_err(|e| CatalogError::InvalidJson(e.to_string()))?;

        let Value::Object(map) = decoded else {
            return Err(CatalogError::NotAMapping(json_kind(&decoded)));
        };

        let mut entries = IndexMap::with_capacity(map.len());
        for (oid, name) in map {
            match name {
                Value::String(name) => {
                    entries.insert(oid, name);
                }
                other => {
                    return Err(CatalogError::NonStringName {
                        oid,
                        kind: json_kind(&other),
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    /// OID в порядке каталога
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn metric_name(&self, oid: &str) -> Option<&str> {
        self.entries.get(oid).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OidCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
