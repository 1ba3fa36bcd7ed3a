use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Env var prefix for secret overrides.
const ENV_PREFIX: &str = "MUZAKLINK_";

/// Key of the fallback chat policy entry. Must always be present.
pub const DEFAULT_CHAT_KEY: &str = "default";

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path the config was loaded from - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Bot API token
    #[serde(default)]
    pub token: String,

    /// Odesli (song.link) API key. Optional, raises rate limits.
    #[serde(default)]
    pub odesli_api_key: Option<String>,

    /// Alternate Bot API base URL (e.g. an on-prem VK Teams install)
    #[serde(default)]
    pub api_url_base: Option<String>,

    /// Country hint passed to the resolution API
    #[serde(default)]
    pub user_country: Option<String>,

    /// Log level used when no `--log-level` flag is given
    #[serde(default)]
    pub log_level: Option<String>,

    /// Per-chat policy table, keyed by chat id. The `default` entry is
    /// the fallback for chats without an explicit entry.
    #[serde(default = "default_chats")]
    pub chats: HashMap<String, ChatPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            token: String::new(),
            odesli_api_key: None,
            api_url_base: None,
            user_country: None,
            log_level: None,
            chats: default_chats(),
        }
    }
}

// ── Per-chat policy ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPolicy {
    /// Domain tokens used to build the URL match pattern. Non-empty.
    pub check_domains: Vec<String>,

    /// When set, only these platform keys are surfaced in the reply.
    #[serde(default)]
    pub limit_platforms: Option<Vec<String>>,

    /// Max buttons per row in the reply keyboard.
    #[serde(default = "default_button_row_width")]
    pub button_row_width: usize,

    #[serde(default)]
    pub trigger: TriggerStrategy,
}

/// Which inbound messages are eligible for link lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerStrategy {
    /// Any message containing a matching URL triggers a lookup.
    All,
    /// The message must mention the bot.
    Mention,
    /// The message text must contain the command token (`/links`).
    #[default]
    Command,
}

fn default_button_row_width() -> usize {
    3
}

fn default_chats() -> HashMap<String, ChatPolicy> {
    let mut chats = HashMap::new();
    chats.insert(
        DEFAULT_CHAT_KEY.to_string(),
        ChatPolicy {
            check_domains: ["spotify", "deezer", "yandex", "apple"]
                .into_iter()
                .map(String::from)
                .collect(),
            limit_platforms: None,
            button_row_width: default_button_row_width(),
            trigger: TriggerStrategy::Command,
        },
    );
    chats
}

// ── Loading & validation ──────────────────────────────────────────

impl Config {
    /// Load config from `path` if given, else from the default location,
    /// else start from built-in defaults. Env vars (`MUZAKLINK_TOKEN`,
    /// `MUZAKLINK_ODESLI_API_KEY`, `MUZAKLINK_API_URL_BASE`) override the
    /// file so tokens can stay out of it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    fn default_path() -> Option<PathBuf> {
        let dirs = UserDirs::new()?;
        Some(dirs.home_dir().join(".muzaklink").join("config.toml"))
    }

    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(format!("{ENV_PREFIX}TOKEN")) {
            self.token = token;
        }
        if let Ok(key) = std::env::var(format!("{ENV_PREFIX}ODESLI_API_KEY")) {
            self.odesli_api_key = Some(key);
        }
        if let Ok(base) = std::env::var(format!("{ENV_PREFIX}API_URL_BASE")) {
            self.api_url_base = Some(base);
        }
    }

    /// Startup-time validation. A missing `default` policy is fatal: the
    /// dispatch loop must not start without a fallback entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.chats.contains_key(DEFAULT_CHAT_KEY) {
            return Err(ConfigError::MissingDefaultPolicy);
        }
        for (chat_id, policy) in &self.chats {
            if policy.check_domains.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "chat `{chat_id}`: check_domains must be non-empty"
                )));
            }
            if policy.button_row_width == 0 {
                return Err(ConfigError::Validation(format!(
                    "chat `{chat_id}`: button_row_width must be positive"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the policy for a chat: explicit entry if present, else the
    /// `default` entry. Infallible once `validate` has passed.
    pub fn resolve_chat(&self, chat_id: &str) -> &ChatPolicy {
        self.chats
            .get(chat_id)
            .or_else(|| self.chats.get(DEFAULT_CHAT_KEY))
            .expect("validated config always has a `default` chat policy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_fallback_entry() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        let policy = config.resolve_chat("default");
        assert_eq!(policy.button_row_width, 3);
        assert_eq!(policy.trigger, TriggerStrategy::Command);
        assert!(policy.check_domains.contains(&"spotify".to_string()));
    }

    #[test]
    fn unknown_chat_falls_back_to_default() {
        let config = Config::default();
        let fallback = config.resolve_chat("someone@mail.ru");
        assert_eq!(
            fallback.check_domains,
            config.chats[DEFAULT_CHAT_KEY].check_domains
        );
        assert_eq!(fallback.trigger, TriggerStrategy::Command);
    }

    #[test]
    fn explicit_chat_entry_wins() {
        let mut config = Config::default();
        config.chats.insert(
            "custom".into(),
            ChatPolicy {
                check_domains: vec!["youtube.com".into()],
                limit_platforms: Some(vec!["amazon".into()]),
                button_row_width: 10,
                trigger: TriggerStrategy::All,
            },
        );
        let policy = config.resolve_chat("custom");
        assert_eq!(policy.check_domains, vec!["youtube.com"]);
        assert_eq!(policy.limit_platforms.as_deref(), Some(&["amazon".to_string()][..]));
        assert_eq!(policy.button_row_width, 10);
        assert_eq!(policy.trigger, TriggerStrategy::All);
    }

    #[test]
    fn missing_default_entry_fails_validation() {
        let mut config = Config::default();
        config.chats.remove(DEFAULT_CHAT_KEY);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDefaultPolicy)
        ));
    }

    #[test]
    fn empty_domains_fail_validation() {
        let mut config = Config::default();
        config
            .chats
            .get_mut(DEFAULT_CHAT_KEY)
            .unwrap()
            .check_domains
            .clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_row_width_fails_validation() {
        let mut config = Config::default();
        config
            .chats
            .get_mut(DEFAULT_CHAT_KEY)
            .unwrap()
            .button_row_width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn parses_toml_policy_table() {
        let raw = r#"
            token = "001.123.456:789"

            [chats.default]
            check_domains = ["spotify", "youtube"]
            button_row_width = 2
            trigger = "all"

            [chats."work@chat"]
            check_domains = ["yandex"]
            limit_platforms = ["yandexMusic"]
            trigger = "mention"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolve_chat("default").trigger, TriggerStrategy::All);
        assert_eq!(
            config.resolve_chat("work@chat").trigger,
            TriggerStrategy::Mention
        );
        // row width falls back to the serde default
        assert_eq!(config.resolve_chat("work@chat").button_row_width, 3);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "token = \"from-file\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.token, "from-file");
        assert_eq!(config.config_path, path);
    }
}
