use crate::config::ChatPolicy;
use crate::error::ResolveError;
use crate::resolver::ResolveResponse;
use crate::utils::{chunk_rows, humanize_platform};
use serde::Serialize;

/// One inline-keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    pub url: String,
}

/// Row-grouped reply buttons. Serialized as nested arrays for the
/// `inlineKeyboardMarkup` wire format.
pub type Keyboard = Vec<Vec<Button>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

/// Build the reply for a resolution response under a chat's policy:
/// `"artist - title"` text, platform entries filtered (order preserved),
/// labels humanized, grouped into rows of `button_row_width`.
///
/// Missing `entityUniqueId`, a missing entity entry, or an absent
/// `linksByPlatform` map means the response is unusable — the caller must
/// not send anything. An empty (but present) platform map is fine and
/// yields an empty keyboard.
pub fn assemble(response: &ResolveResponse, policy: &ChatPolicy) -> Result<Reply, ResolveError> {
    let entity_id = response
        .entity_unique_id
        .as_deref()
        .ok_or_else(|| ResolveError::MalformedResponse("missing entityUniqueId".to_string()))?;

    let entity = response
        .entities_by_unique_id
        .get(entity_id)
        .ok_or_else(|| {
            ResolveError::MalformedResponse(format!("no entity entry for {entity_id}"))
        })?;

    let links = response.links_by_platform.as_deref().ok_or_else(|| {
        ResolveError::MalformedResponse("missing linksByPlatform".to_string())
    })?;

    let text = format!(
        "{} - {}",
        entity.artist_name.as_deref().unwrap_or(""),
        entity.title.as_deref().unwrap_or("")
    );

    let buttons: Vec<Button> = links
        .iter()
        .filter(|(key, _)| {
            policy
                .limit_platforms
                .as_ref()
                .is_none_or(|allowed| allowed.iter().any(|a| a == key))
        })
        .map(|(key, link)| Button {
            text: humanize_platform(key),
            url: link.url.clone(),
        })
        .collect();

    Ok(Reply {
        text,
        keyboard: chunk_rows(buttons, policy.button_row_width),
    })
}
