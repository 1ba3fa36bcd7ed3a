use super::Transport;
use crate::error::TransportError;
use crate::event::IncomingEvent;
use crate::handler::reply::Keyboard;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Public ICQ/VK Teams Bot API endpoint. On-prem installs override it
/// through `api_url_base` in the config.
pub const DEFAULT_API_BASE: &str = "https://api.icq.net/bot/v1";

const POLL_TIME_SECS: u64 = 30;
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// HTTP transport over the Bot API — long-polls `events/get`, sends
/// through `messages/sendText`.
pub struct BotApiTransport {
    token: String,
    base_url: String,
    user_id: String,
    client: reqwest::Client,
}

impl BotApiTransport {
    /// Build the transport and fetch the bot's own identity via
    /// `self/get`. Fails fast: a bad token or unreachable API should stop
    /// startup, not surface as a silent dead poll loop.
    pub async fn connect(token: String, base_url: Option<String>) -> Result<Self, TransportError> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        // Client timeout must exceed the long-poll window.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIME_SECS * 2))
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let data: Value = client
            .get(format!("{base_url}/self/get"))
            .query(&[("token", token.as_str())])
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?
            .json()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if data.get("ok").and_then(Value::as_bool) != Some(true) {
            return Err(TransportError::Connection(format!(
                "self/get rejected: {data}"
            )));
        }

        let user_id = match data.get("userId") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(TransportError::Connection(
                    "self/get response has no userId".to_string(),
                ));
            }
        };

        tracing::info!(user_id = %user_id, base_url = %base_url, "bot API transport connected");

        Ok(Self {
            token,
            base_url,
            user_id,
            client,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }
}

#[async_trait]
impl Transport for BotApiTransport {
    fn self_id(&self) -> &str {
        &self.user_id
    }

    async fn send_reply(
        &self,
        chat_id: &str,
        text: &str,
        reply_msg_id: &str,
        keyboard: &Keyboard,
    ) -> anyhow::Result<()> {
        let markup = serde_json::to_string(keyboard)?;

        let resp = self
            .client
            .get(self.api_url("messages/sendText"))
            .query(&[
                ("token", self.token.as_str()),
                ("chatId", chat_id),
                ("text", text),
                ("replyMsgId", reply_msg_id),
                ("inlineKeyboardMarkup", markup.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(TransportError::Send {
                chat_id: chat_id.to_string(),
                message: format!("sendText failed ({status}): {err}"),
            }
            .into());
        }

        let body: Value = resp.json().await?;
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            return Err(TransportError::Send {
                chat_id: chat_id.to_string(),
                message: format!("sendText rejected: {body}"),
            }
            .into());
        }

        Ok(())
    }

    async fn listen(&self, tx: tokio::sync::mpsc::Sender<IncomingEvent>) -> anyhow::Result<()> {
        let mut last_event_id: u64 = 0;

        tracing::info!("bot API transport listening for events...");

        loop {
            let last = last_event_id.to_string();
            let poll = POLL_TIME_SECS.to_string();
            let resp = match self
                .client
                .get(self.api_url("events/get"))
                .query(&[
                    ("token", self.token.as_str()),
                    ("lastEventId", last.as_str()),
                    ("pollTime", poll.as_str()),
                ])
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("event poll error: {e}");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            let data: Value = match resp.json().await {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("event parse error: {e}");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            let Some(events) = data.get("events").and_then(Value::as_array) else {
                continue;
            };

            for raw in events {
                let event: IncomingEvent = match serde_json::from_value(raw.clone()) {
                    Ok(ev) => ev,
                    Err(e) => {
                        tracing::warn!("skipping undecodable event: {e}");
                        continue;
                    }
                };

                // Advance past this event even if nobody consumes it
                last_event_id = last_event_id.max(event.event_id);

                if tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.client
            .get(self.api_url("self/get"))
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
