pub mod reply;

use crate::config::{Config, TriggerStrategy};
use crate::event::{EventKind, IncomingEvent};
use crate::links::find_url;
use crate::resolver::Resolver;
use crate::transport::Transport;
use std::sync::Arc;

/// Literal token gating lookups in `TriggerStrategy::Command` chats.
pub const LINKS_COMMAND: &str = "/links";

/// A matched URL and the full text it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundData {
    pub url: String,
    pub text: String,
}

/// Per-event decision engine and dispatcher.
///
/// All state is read-only after construction, so concurrent invocations
/// across chats are safe without locking.
pub struct SongLinkHandler {
    config: Arc<Config>,
    resolver: Arc<dyn Resolver>,
    transport: Arc<dyn Transport>,
}

impl SongLinkHandler {
    pub fn new(
        config: Arc<Config>,
        resolver: Arc<dyn Resolver>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            resolver,
            transport,
        }
    }

    /// Trigger decision: does this event warrant a lookup, and for which
    /// URL? Strategy gating runs before the URL search, so a command-chat
    /// message without the token never touches the regex.
    pub fn check_event(&self, event: &IncomingEvent) -> Option<FoundData> {
        let text = event.extract_text().filter(|t| !t.is_empty())?;
        let policy = self.config.resolve_chat(event.chat_id());

        match policy.trigger {
            TriggerStrategy::All => {}
            TriggerStrategy::Mention => {
                if !event.mentions(self.transport.self_id()) {
                    return None;
                }
            }
            TriggerStrategy::Command => {
                if !text.contains(LINKS_COMMAND) {
                    return None;
                }
            }
        }

        let url = find_url(text, &policy.check_domains)?;
        Some(FoundData {
            url: url.to_string(),
            text: text.to_string(),
        })
    }

    /// One event, at most one attempt, at most one send. Every per-event
    /// failure is logged and swallowed here; nothing propagates to the
    /// poll loop and the chat never sees an error message.
    pub async fn handle(&self, event: &IncomingEvent) {
        if event.kind != EventKind::NewMessage {
            return;
        }

        let Some(data) = self.check_event(event) else {
            return;
        };

        tracing::info!(
            chat_id = event.chat_id(),
            url = %data.url,
            "matched streaming link"
        );

        let response = match self.resolver.resolve(&data.url).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %data.url, error = %e, "link resolution failed; dropping event");
                return;
            }
        };

        let policy = self.config.resolve_chat(event.chat_id());
        let reply = match reply::assemble(&response, policy) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %data.url, error = %e, "unusable resolution response; dropping event");
                return;
            }
        };

        if let Err(e) = self
            .transport
            .send_reply(event.chat_id(), &reply.text, event.msg_id(), &reply.keyboard)
            .await
        {
            tracing::warn!(chat_id = event.chat_id(), error = %e, "reply send failed");
        }
    }
}
