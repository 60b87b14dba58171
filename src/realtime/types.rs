use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    json,
    Value,
};
use uuid::Uuid;

pub const PHOENIX_TOPIC: &str = "phoenix";

/// Envelope of every frame on a Phoenix channel socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl PhoenixMessage {
    pub fn heartbeat(reference: u64) -> Self {
        Self {
            topic: PHOENIX_TOPIC.to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    /// Join request for inserts, updates and deletes on one user's alert rows.
    pub fn join_alerts(user_id: &Uuid, access_token: &str, reference: u64) -> Self {
        Self {
            topic: alerts_topic(user_id),
            event: "phx_join".to_string(),
            payload: json!({
                "config": {
                    "broadcast": { "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": [{
                        "event": "*",
                        "schema": "public",
                        "table": "alerts",
                        "filter": format!("user_id=eq.{user_id}"),
                    }],
                },
                "access_token": access_token,
            }),
            reference: Some(reference.to_string()),
        }
    }

    pub fn leave(topic: &str, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_leave".to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    /// `Some(true)` for an `ok` reply, `Some(false)` for an error reply.
    pub fn reply_ok(&self) -> Option<bool> {
        if self.event != "phx_reply" {
            return None;
        }
        Some(self.payload.get("status").and_then(Value::as_str) == Some("ok"))
    }
}

pub fn alerts_topic(user_id: &Uuid) -> String {
    format!("realtime:alerts:{user_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One row change on the alerts table.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertChange {
    pub kind: ChangeKind,
    pub record: Option<Value>,
    pub old_record: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChangeData {
    #[serde(rename = "type", alias = "eventType")]
    kind: ChangeKind,
    #[serde(default, alias = "new")]
    record: Option<Value>,
    #[serde(default, alias = "old")]
    old_record: Option<Value>,
}

impl AlertChange {
    /// Reads a change out of a `postgres_changes` frame, or out of the older
    /// `INSERT`/`UPDATE`/`DELETE` frames that carry the row directly.
    pub fn from_message(message: &PhoenixMessage) -> Option<Self> {
        let data = match message.event.as_str() {
            "postgres_changes" => message.payload.get("data")?.clone(),
            "INSERT" | "UPDATE" | "DELETE" => message.payload.clone(),
            _ => return None,
        };

        let data: ChangeData = serde_json::from_value(data).ok()?;
        Some(Self {
            kind: data.kind,
            record: data.record.filter(|v| !v.is_null()),
            old_record: data.old_record.filter(|v| !v.is_null()),
        })
    }

    pub fn alert_id(&self) -> Option<&str> {
        self.record
            .as_ref()
            .or(self.old_record.as_ref())
            .and_then(|row| row.get("id"))
            .and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.record.as_ref().and_then(|row| row.get("title")).and_then(Value::as_str)
    }
}
