use snmp2::{AsyncSession, Oid};

use super::value::render_value;
use super::{ErrorStatus, QueryError};

pub struct SnmpClientV2c {
    pub(crate) session: AsyncSession,
}

impl SnmpClientV2c {
    pub async fn new(target: &str, community: &[u8]) -> Result<Self, QueryError> {
        let session = AsyncSession::new_v2c(target, community, 2)
            .await
            .map_err(|e| QueryError::Transport(format!("не удалось создать SNMP сессию: {e}")))?;

        Ok(Self { session })
    }

    /// Один GET на все OID сразу; значения в порядке запроса
    pub async fn get_many(&mut self, oids: &[Oid<'_>]) -> Result<Vec<String>, QueryError> {
        let refs: Vec<&Oid<'_>> = oids.iter().collect();

        let resp = self
            .session
            .get_many(&refs)
            .await
            .map_err(|e| QueryError::Transport(format!("SNMP GET запрос не удался: {e}")))?;

        if resp.error_status != 0 {
            return Err(QueryError::ErrorStatus {
                status: ErrorStatus(resp.error_status),
                index: resp.error_index,
            });
        }

        let values: Vec<String> = resp
            .varbinds
            .map(|(_, value)| render_value(&value))
            .collect();

        if values.len() != oids.len() {
            return Err(QueryError::VarbindCount {
                expected: oids.len(),
                received: values.len(),
            });
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::UdpSocket;

    use super::*;
    use crate::inventory::Endpoint;
    use crate::snmp::{AgentQuery, SnmpV2cAgent, parse_oid};

    const OIDS: [&str; 2] = ["1.3.6.1.2.1.1.5.0", "1.3.6.1.2.1.1.1.0"];

    /// Что фейковый агент кладёт в GetResponse
    #[derive(Clone)]
    struct Reply {
        status: u8,
        index: u8,
        values: Vec<&'static str>,
    }

    impl Reply {
        fn values(values: &[&'static str]) -> Self {
            Self {
                status: 0,
                index: 0,
                values: values.to_vec(),
            }
        }

        fn error(status: u8, index: u8) -> Self {
            Self {
                status,
                index,
                values: Vec::new(),
            }
        }
    }

    fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
        let mut out = vec![tag];
        match content.len() {
            n if n < 0x80 => out.push(n as u8),
            n if n <= 0xff => out.extend([0x81, n as u8]),
            n => out.extend([0x82, (n >> 8) as u8, n as u8]),
        }
        out.extend_from_slice(content);
        out
    }

    /// Один элемент BER: (тег, содержимое, остаток)
    fn split(buf: &[u8]) -> (u8, &[u8], &[u8]) {
        let tag = buf[0];
        let (len, header) = match buf[1] {
            n if n < 0x80 => (n as usize, 2),
            n => {
                let width = (n & 0x7f) as usize;
                let len = buf[2..2 + width]
                    .iter()
                    .fold(0usize, |acc, b| (acc << 8) | *b as usize);
                (len, 2 + width)
            }
        };
        (tag, &buf[header..header + len], &buf[header + len..])
    }

    /// Строит GetResponse на GetRequest: тот же request-id и OID,
    /// значения берутся из `reply` по порядку, лишние OID без ответа
    fn respond(request: &[u8], reply: &Reply) -> Vec<u8> {
        let (_, message, _) = split(request);
        let (_, version, rest) = split(message);
        let (_, community, rest) = split(rest);
        let (_, pdu, _) = split(rest);
        let (_, request_id, rest) = split(pdu);
        let (_, _error_status, rest) = split(rest);
        let (_, _error_index, rest) = split(rest);
        let (_, mut varbinds, _) = split(rest);

        let mut bound = Vec::new();
        let mut position = 0;
        while !varbinds.is_empty() {
            let (_, varbind, rest) = split(varbinds);
            varbinds = rest;
            let (_, oid, _) = split(varbind);
            if let Some(value) = reply.values.get(position) {
                let mut content = tlv(0x06, oid);
                content.extend(tlv(0x04, value.as_bytes()));
                bound.extend(tlv(0x30, &content));
            }
            position += 1;
        }

        let mut pdu = tlv(0x02, request_id);
        pdu.extend(tlv(0x02, &[reply.status]));
        pdu.extend(tlv(0x02, &[reply.index]));
        pdu.extend(tlv(0x30, &bound));

        let mut message = tlv(0x02, version);
        message.extend(tlv(0x04, community));
        message.extend(tlv(0xA2, &pdu));
        tlv(0x30, &message)
    }

    /// Агент на loopback, отвечает на каждый запрос одинаково
    async fn spawn_agent(reply: Reply) -> u16 {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 65_535];
            while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
                let answer = respond(&buf[..n], &reply);
                if socket.send_to(&answer, peer).await.is_err() {
                    break;
                }
            }
        });
        port
    }

    async fn query(reply: Reply) -> Result<Vec<String>, QueryError> {
        let port = spawn_agent(reply).await;
        let oids: Vec<Oid<'static>> = OIDS.iter().map(|o| parse_oid(o).unwrap()).collect();

        let mut client = SnmpClientV2c::new(&format!("127.0.0.1:{port}"), b"public").await?;
        tokio::time::timeout(Duration::from_secs(5), client.get_many(&oids))
            .await
            .expect("агент не ответил")
    }

    #[tokio::test]
    async fn values_come_back_in_request_order() {
        let values = query(Reply::values(&["core-sw-01", "Linux 5.15"])).await.unwrap();
        assert_eq!(values, ["core-sw-01", "Linux 5.15"]);
    }

    #[tokio::test]
    async fn error_status_keeps_code_and_index() {
        let err = query(Reply::error(2, 2)).await.unwrap_err();

        assert_eq!(
            err,
            QueryError::ErrorStatus {
                status: ErrorStatus(2),
                index: 2,
            }
        );
        assert!(err.is_protocol());
    }

    #[tokio::test]
    async fn short_response_is_count_mismatch() {
        let err = query(Reply::values(&["core-sw-01"])).await.unwrap_err();
        assert_eq!(
            err,
            QueryError::VarbindCount {
                expected: 2,
                received: 1,
            }
        );
    }

    #[tokio::test]
    async fn agent_reads_loopback_device() {
        let port = spawn_agent(Reply::values(&["core-sw-01", "Linux 5.15"])).await;
        let agent = SnmpV2cAgent::new(Duration::from_secs(5));

        let values = agent
            .get_many(&Endpoint::new("127.0.0.1", port, "public"), &OIDS)
            .await
            .unwrap();
        assert_eq!(values, ["core-sw-01", "Linux 5.15"]);
    }
}
