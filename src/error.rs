use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `muzaklink`.
///
/// Each subsystem defines its own error variant. Per-event failures never
/// escape the dispatcher; these types exist so the few fatal paths (config
/// validation, transport bootstrap) stay matchable. Internal code continues
/// to use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum MuzakError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Link resolution (Odesli) ────────────────────────────────────────
    #[error("resolve: {0}")]
    Resolve(#[from] ResolveError),

    // ── Transport / Bot API ─────────────────────────────────────────────
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// Fatal at startup: policy lookup has no fallback without it.
    #[error("chat policy table has no `default` entry")]
    MissingDefaultPolicy,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Link resolution errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request for {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("resolution API returned status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Structurally valid JSON missing the keys the reply needs
    /// (`entityUniqueId`, its entity entry, or `linksByPlatform`).
    #[error("malformed resolution response: {0}")]
    MalformedResponse(String),
}

// ─── Transport errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("bot API connection failed: {0}")]
    Connection(String),

    #[error("send to chat {chat_id} failed: {message}")]
    Send { chat_id: String, message: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, MuzakError>;
