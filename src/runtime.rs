use crate::event::IncomingEvent;
use crate::handler::SongLinkHandler;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;

const EVENT_QUEUE_DEPTH: usize = 64;
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Keep the transport's long-poll loop alive: restart it on exit with
/// exponential backoff, reset after a clean run.
fn spawn_supervised_listener(
    transport: Arc<dyn Transport>,
    tx: tokio::sync::mpsc::Sender<IncomingEvent>,
    initial_backoff: Duration,
    max_backoff: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut backoff = initial_backoff;

        loop {
            tracing::debug!("event listener starting");
            let result = transport.listen(tx.clone()).await;

            if tx.is_closed() {
                break;
            }

            match result {
                Ok(()) => {
                    tracing::warn!("event listener exited unexpectedly; restarting");
                    backoff = initial_backoff;
                }
                Err(e) => {
                    tracing::error!("event listener error: {e}; restarting");
                }
            }

            tokio::time::sleep(backoff).await;
            // Double backoff AFTER sleeping so the first error uses the
            // initial delay.
            backoff = backoff.saturating_mul(2).min(max_backoff);
        }
    })
}

/// The dispatch loop: one handler invocation per inbound event, in
/// arrival order. Returns when the listener side closes.
pub async fn run(handler: SongLinkHandler, transport: Arc<dyn Transport>) {
    let (tx, mut rx) = tokio::sync::mpsc::channel(EVENT_QUEUE_DEPTH);
    let listener = spawn_supervised_listener(transport, tx, INITIAL_BACKOFF, MAX_BACKOFF);

    while let Some(event) = rx.recv().await {
        handler.handle(&event).await;
    }

    listener.abort();
}
