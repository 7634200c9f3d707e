use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use snmp_poller::{AgentQuery, Endpoint, QueryError};

/// Агент с ответами, заданными по ip; незнакомый ip отвечает таймаутом
#[derive(Default)]
pub struct ScriptedAgent {
    responses: HashMap<String, Result<Vec<String>, QueryError>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedAgent {
    pub fn with(mut self, ip: &str, values: &[&str]) -> Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.responses.insert(ip.to_string(), Ok(values));
        self
    }

    pub fn failing(mut self, ip: &str, error: QueryError) -> Self {
        self.responses.insert(ip.to_string(), Err(error));
        self
    }

    pub fn called_ips(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl AgentQuery for ScriptedAgent {
    async fn get_many(&self, endpoint: &Endpoint, oids: &[&str]) -> Result<Vec<String>, QueryError> {
        if oids.is_empty() {
            return Ok(Vec::new());
        }
        let ip = endpoint.ip.clone().ok_or(QueryError::MissingAddress)?;
        self.calls.lock().unwrap().push(ip.clone());
        self.responses
            .get(&ip)
            .cloned()
            .unwrap_or(Err(QueryError::Timeout(Duration::from_secs(10))))
    }
}
