//! Опрос сетевых устройств по SNMPv2c.
//!
//! Инвентарь `{hostname: {ip, port, community_string, oids}}` разбирается в
//! список устройств, каждое опрашивается одним пакетным GET, значения
//! сопоставляются с именами метрик и собираются в отчёт
//! `{hostname: {metric: value | null}}`.

pub mod collector;
pub mod commands;
pub mod config;
pub mod formatter;
pub mod handlers;
pub mod inventory;
pub mod remote;
pub mod routes;
pub mod snmp;

pub use collector::{AggregateReport, DeviceReport, PollOptions, PollOutcome, SnmpCollector};
pub use formatter::JsonFormatter;
pub use inventory::{Device, Endpoint, Inventory, OidCatalog, parse_inventory};
pub use snmp::{AgentQuery, QueryError, SnmpV2cAgent};
