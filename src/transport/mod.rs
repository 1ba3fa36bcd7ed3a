pub mod botapi;

pub use botapi::BotApiTransport;

use crate::event::IncomingEvent;
use crate::handler::reply::Keyboard;
use async_trait::async_trait;

/// Outbound boundary to the chat platform.
///
/// The handler holds this as an injected collaborator purely to send
/// replies and read the bot's own identity; it never controls the
/// transport's lifecycle.
#[async_trait]
pub trait Transport: Send + Sync {
    /// The bot's own user id, used for mention matching.
    fn self_id(&self) -> &str;

    /// Send one reply with an inline keyboard, referencing the message
    /// that triggered it.
    async fn send_reply(
        &self,
        chat_id: &str,
        text: &str,
        reply_msg_id: &str,
        keyboard: &Keyboard,
    ) -> anyhow::Result<()>;

    /// Long-poll for events, forwarding each to `tx` (long-running).
    async fn listen(&self, tx: tokio::sync::mpsc::Sender<IncomingEvent>) -> anyhow::Result<()>;

    /// Check if the transport is reachable
    async fn health_check(&self) -> bool {
        true
    }
}
