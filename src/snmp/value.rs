use snmp2::Value;

/// Переводит значение varbind в строку для отчёта.
///
/// Числа десятичные, печатные строки как текст, бинарные как `0x...`,
/// исключения v2c их текстовым описанием.
pub fn render_value(value: &Value<'_>) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Counter32(n) | Value::Unsigned32(n) | Value::Timeticks(n) => n.to_string(),
        Value::Counter64(n) => n.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::OctetString(bytes) => render_octets(bytes),
        Value::Opaque(bytes) => to_hex(bytes),
        Value::IpAddress([a, b, c, d]) => format!("{a}.{b}.{c}.{d}"),
        Value::ObjectIdentifier(oid) => oid.to_string(),
        Value::Null => String::new(),
        Value::NoSuchObject => "No Such Object currently exists at this OID".to_string(),
        Value::NoSuchInstance => "No Such Instance currently exists at this OID".to_string(),
        Value::EndOfMibView => "No more variables left in this MIB View".to_string(),
        other => format!("{other:?}"),
    }
}

fn render_octets(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if text.chars().all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r')) => {
            text.to_string()
        }
        _ => to_hex(bytes),
    }
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
