use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Bot API event kind. Only `newMessage` enters the link pipeline; the
/// rest are carried so the poll loop can log and skip them cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EventKind {
    #[serde(rename = "newMessage")]
    NewMessage,
    #[serde(rename = "editedMessage")]
    EditedMessage,
    #[serde(rename = "deletedMessage")]
    DeletedMessage,
    #[serde(rename = "pinnedMessage")]
    PinnedMessage,
    #[serde(rename = "unpinnedMessage")]
    UnpinnedMessage,
    #[serde(rename = "newChatMembers")]
    NewChatMembers,
    #[serde(rename = "leftChatMembers")]
    LeftChatMembers,
    #[serde(rename = "callbackQuery")]
    CallbackQuery,
    #[serde(other)]
    Unknown,
}

/// One event from `events/get`.
///
/// `payload.parts` is heterogeneous (forwards, replies, mentions, files) so
/// each part keeps its payload as raw JSON and exposes the two shapes the
/// handler cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingEvent {
    #[serde(rename = "eventId", default)]
    pub event_id: u64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub chat: Chat,
    #[serde(rename = "msgId", default, deserialize_with = "string_or_number")]
    pub msg_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub parts: Option<Vec<EventPart>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Chat {
    #[serde(rename = "chatId", default)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl IncomingEvent {
    pub fn chat_id(&self) -> &str {
        &self.payload.chat.chat_id
    }

    pub fn msg_id(&self) -> &str {
        &self.payload.msg_id
    }

    /// Best-effort message text: the direct `text` field if present,
    /// otherwise the first part carrying `payload.message.text`. Forwarded
    /// and replied messages both embed the quoted message that way, so the
    /// part's outer type is irrelevant here.
    pub fn extract_text(&self) -> Option<&str> {
        if let Some(text) = self.payload.text.as_deref() {
            return Some(text);
        }
        self.payload
            .parts
            .as_ref()?
            .iter()
            .find_map(EventPart::message_text)
    }

    /// True iff some part is a mention of `user_id`.
    pub fn mentions(&self, user_id: &str) -> bool {
        self.payload.parts.as_ref().is_some_and(|parts| {
            parts.iter().any(|p| {
                p.kind == "mention"
                    && p.mention_user_id().is_some_and(|id| id == user_id)
            })
        })
    }
}

impl EventPart {
    fn message_text(&self) -> Option<&str> {
        self.payload.get("message")?.get("text")?.as_str()
    }

    // The API is inconsistent about id types; accept both.
    fn mention_user_id(&self) -> Option<String> {
        match self.payload.get("userId")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
