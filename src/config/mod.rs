pub mod schema;

pub use schema::{ChatPolicy, Config, DEFAULT_CHAT_KEY, TriggerStrategy};
