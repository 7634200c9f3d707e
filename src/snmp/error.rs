use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Ошибка одного SNMP-запроса к устройству.
///
/// Любой вариант превращает все значения устройства в `null`, поэтому здесь
/// нет источников ошибок, которые нельзя клонировать.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("не задан адрес агента (ip)")]
    MissingAddress,
    #[error("некорректный порт агента")]
    InvalidPort,
    #[error("не задана community-строка")]
    MissingCommunity,
    #[error("невалидный OID '{oid}': {reason}")]
    InvalidOid { oid: String, reason: String },
    #[error("транспортная ошибка: {0}")]
    Transport(String),
    #[error("таймаут SNMP запроса ({0:?})")]
    Timeout(Duration),
    #[error("агент вернул {status} для OID №{index}")]
    ErrorStatus { status: ErrorStatus, index: u32 },
    #[error("агент вернул {received} значений вместо {expected}")]
    VarbindCount { expected: usize, received: usize },
}

impl QueryError {
    /// Сетевая ошибка: агент не ответил или ответ не дошёл
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Ошибка, сообщённая самим агентом или нарушение формата ответа
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::ErrorStatus { .. } | Self::VarbindCount { .. })
    }

    /// Имеет ли смысл повторять запрос
    pub fn is_transient(&self) -> bool {
        self.is_transport() || matches!(self, Self::ErrorStatus { .. })
    }
}

/// Поле error-status из ответа агента
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorStatus(pub u32);

impl ErrorStatus {
    /// Имя статуса из RFC 3416
    pub fn name(self) -> &'static str {
        error_status_name(self.0)
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

fn error_status_name(status: u32) -> &'static str {
    match status {
        0 => "noError",
        1 => "tooBig",
        2 => "noSuchName",
        3 => "badValue",
        4 => "readOnly",
        5 => "genErr",
        6 => "noAccess",
        7 => "wrongType",
        8 => "wrongLength",
        9 => "wrongEncoding",
        10 => "wrongValue",
        11 => "noCreation",
        12 => "inconsistentValue",
        13 => "resourceUnavailable",
        14 => "commitFailed",
        15 => "undoFailed",
        16 => "authorizationError",
        17 => "notWritable",
        18 => "inconsistentName",
        _ => "unknownError",
    }
}
