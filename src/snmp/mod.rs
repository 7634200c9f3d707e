use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::inventory::Endpoint;

pub mod error;
pub mod oid;
pub mod v2c;
pub mod value;

pub use error::{ErrorStatus, QueryError};
pub use oid::parse_oid;
pub use v2c::SnmpClientV2c;
pub use value::render_value;

/// Источник значений OID для одного устройства.
///
/// Реализация делает один пакетный запрос и возвращает значения в порядке
/// `oids`. Ошибка относится ко всему запросу целиком.
pub trait AgentQuery: Send + Sync {
    fn get_many(
        &self,
        endpoint: &Endpoint,
        oids: &[&str],
    ) -> impl Future<Output = Result<Vec<String>, QueryError>> + Send;
}

/// SNMPv2c агент поверх UDP
#[derive(Debug, Clone)]
pub struct SnmpV2cAgent {
    timeout: Duration,
}

impl SnmpV2cAgent {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl AgentQuery for SnmpV2cAgent {
    async fn get_many(&self, endpoint: &Endpoint, oids: &[&str]) -> Result<Vec<String>, QueryError> {
        if oids.is_empty() {
            return Ok(Vec::new());
        }

        let target = agent_address(endpoint)?;
        let community = endpoint
            .community
            .as_deref()
            .ok_or(QueryError::MissingCommunity)?;
        let parsed = oids
            .iter()
            .map(|oid| parse_oid(oid))
            .collect::<Result<Vec<_>, _>>()?;

        let work = async {
            let mut client = SnmpClientV2c::new(&target, community.as_bytes()).await?;
            client.get_many(&parsed).await
        };

        match timeout(self.timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Timeout(self.timeout)),
        }
    }
}

/// Адрес агента в виде `host:port`
pub fn agent_address(endpoint: &Endpoint) -> Result<String, QueryError> {
    let ip = endpoint
        .ip
        .as_deref()
        .map(str::trim)
        .ok_or(QueryError::MissingAddress)?;
    let port = endpoint.port.ok_or(QueryError::InvalidPort)?;

    // IPv6 без скобок
    if ip.contains(':') && !ip.starts_with('[') {
        Ok(format!("[{ip}]:{port}"))
    } else {
        Ok(format!("{ip}:{port}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UdpSocket;

    fn endpoint(ip: &str, port: u16) -> Endpoint {
        Endpoint::new(ip, port, "public")
    }

    #[test]
    fn formats_agent_address() {
        assert_eq!(agent_address(&endpoint("10.0.0.1", 161)).unwrap(), "10.0.0.1:161");
        assert_eq!(agent_address(&endpoint("fe80::1", 1161)).unwrap(), "[fe80::1]:1161");

        let mut no_ip = endpoint("10.0.0.1", 161);
        no_ip.ip = None;
        assert_eq!(agent_address(&no_ip), Err(QueryError::MissingAddress));

        let mut no_port = endpoint("10.0.0.1", 161);
        no_port.port = None;
        assert_eq!(agent_address(&no_port), Err(QueryError::InvalidPort));
    }

    #[tokio::test]
    async fn empty_request_skips_network() {
        let agent = SnmpV2cAgent::new(Duration::from_millis(10));
        let mut nowhere = endpoint("10.0.0.1", 161);
        nowhere.ip = None;

        assert_eq!(agent.get_many(&nowhere, &[]).await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn missing_community_fails_before_sending() {
        let agent = SnmpV2cAgent::new(Duration::from_millis(10));
        let mut ep = endpoint("127.0.0.1", 161);
        ep.community = None;

        let err = agent.get_many(&ep, &["1.3.6.1.2.1.1.3.0"]).await.unwrap_err();
        assert_eq!(err, QueryError::MissingCommunity);
    }

    #[tokio::test]
    async fn invalid_oid_fails_whole_request() {
        let agent = SnmpV2cAgent::new(Duration::from_millis(10));
        let err = agent
            .get_many(&endpoint("127.0.0.1", 161), &["1.3.6.1.2.1.1.3.0", "sysName"])
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidOid { oid, .. } if oid == "sysName"));
    }

    #[tokio::test]
    async fn silent_agent_times_out() {
        // Сокет принимает датаграммы, но никогда не отвечает
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let agent = SnmpV2cAgent::new(Duration::from_millis(200));
        let err = agent
            .get_many(&endpoint("127.0.0.1", port), &["1.3.6.1.2.1.1.3.0"])
            .await
            .unwrap_err();

        assert_eq!(err, QueryError::Timeout(Duration::from_millis(200)));
        assert!(err.is_transport());
    }
}
