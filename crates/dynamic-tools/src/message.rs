use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn now_rfc3339() -> String {
    let now = std::time::SystemTime::now();
    let datetime: chrono::DateTime<chrono::Utc> = now.into();
    datetime.to_rfc3339()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageInfo {
    pub id: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartBase {
    pub id: String,
    pub message_id: String,
}

impl PartBase {
    pub fn new(message_id: &str) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            message_id: message_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextPart {
    #[serde(flatten)]
    pub base: PartBase,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text(TextPart),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub info: MessageInfo,
    pub parts: Vec<MessagePart>,
}

impl Message {
    pub fn from_text(role: &str, text: &str) -> Message {
        let info = MessageInfo {
            id: Uuid::now_v7().to_string(),
            role: role.to_string(),
            created_at: now_rfc3339(),
        };
        Message {
            parts: vec![MessagePart::Text(TextPart {
                base: PartBase::new(info.id.as_str()),
                text: text.to_string(),
            })],
            info,
        }
    }

    pub fn user(text: &str) -> Message {
        Message::from_text("user", text)
    }

    pub fn role(&self) -> &str {
        &self.info.role
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                MessagePart::Text(text) => text.text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
