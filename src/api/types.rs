//! # Wire Types
//!
//! Records exchanged with the chat server. Field names on the wire are the
//! server's (`usuario`, `mensagem`, `data_hora`); the Rust side uses its own.
//!
//! The server is loose about types: ids arrive as numbers or strings,
//! timestamps in either SQL or RFC 3339 form, and `status` may be missing,
//! null or an unknown word. Deserialization accepts all of those instead of
//! rejecting the whole batch.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Delivery state of a message as reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryStatus {
    #[default]
    None,
    Delivered,
    Read,
}

impl DeliveryStatus {
    /// Maps the server's status word. Anything unrecognized is `None`.
    pub fn from_wire(word: &str) -> Self {
        match word.trim() {
            "entregue" => DeliveryStatus::Delivered,
            "lido" => DeliveryStatus::Read,
            _ => DeliveryStatus::None,
        }
    }
}

/// A chat message as listed by `GET /listar`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "usuario")]
    pub sender: String,
    #[serde(rename = "mensagem")]
    pub body: String,
    #[serde(rename = "data_hora", default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: DeliveryStatus,
}

/// Body of `POST /enviar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequest<'a> {
    #[serde(rename = "usuario")]
    pub sender: &'a str,
    #[serde(rename = "mensagem")]
    pub body: &'a str,
}

/// Body of `POST /marcar_lido`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkReadRequest<'a> {
    #[serde(rename = "usuario")]
    pub sender: &'a str,
}

/// Parses a server timestamp. SQL datetimes are taken as local time,
/// RFC 3339 values are converted to local time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<DeliveryStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(DeliveryStatus::from_wire).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_message_deserializes_server_fields() {
        let json = r#"{
            "id": 7,
            "usuario": "Ana",
            "mensagem": "oi",
            "data_hora": "2024-05-01 14:03:59",
            "status": "entregue"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "7");
        assert_eq!(msg.sender, "Ana");
        assert_eq!(msg.body, "oi");
        assert_eq!(msg.status, DeliveryStatus::Delivered);
        let ts = msg.timestamp.unwrap();
        assert_eq!((ts.hour(), ts.minute()), (14, 3));
    }

    #[test]
    fn test_string_id_accepted() {
        let json = r#"{"id":"42","usuario":"Bob","mensagem":"x"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "42");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id":1,"usuario":"Bob","mensagem":"x"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.status, DeliveryStatus::None);
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_null_and_unknown_status_are_none() {
        let json = r#"[
            {"id":1,"usuario":"a","mensagem":"x","status":null},
            {"id":2,"usuario":"a","mensagem":"x","status":"pendente"},
            {"id":3,"usuario":"a","mensagem":"x","status":"lido"}
        ]"#;
        let msgs: Vec<Message> = serde_json::from_str(json).unwrap();
        assert_eq!(msgs[0].status, DeliveryStatus::None);
        assert_eq!(msgs[1].status, DeliveryStatus::None);
        assert_eq!(msgs[2].status, DeliveryStatus::Read);
    }

    #[test]
    fn test_garbage_timestamp_is_none() {
        let json = r#"{"id":1,"usuario":"a","mensagem":"x","data_hora":"ontem"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T09:15:00").is_some());
        assert!(parse_timestamp("2024-05-01 09:15").is_some());
        assert!(parse_timestamp("2024-05-01T09:15:00Z").is_some());
        assert!(parse_timestamp("   ").is_none());
    }

    #[test]
    fn test_send_request_uses_server_field_names() {
        let body = serde_json::to_value(SendRequest {
            sender: "Ana",
            body: "olá",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"usuario": "Ana", "mensagem": "olá"}));

        let body = serde_json::to_value(MarkReadRequest { sender: "Ana" }).unwrap();
        assert_eq!(body, serde_json::json!({"usuario": "Ana"}));
    }
}
