//! # Application State
//!
//! Core chat state. Domain data only; presentation state (scroll offsets,
//! input buffers) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: Session          // Anonymous or Active(name)
//! ├── messages: Vec<Message>    // latest applied snapshot, oldest first
//! ├── emojis: EmojiAssigner     // sender → glyph, assigned once
//! ├── last_applied_fetch: u64   // sequence number of the snapshot shown
//! └── time_format: String       // strftime pattern for message times
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::api::Message;
use crate::core::config::ResolvedConfig;
use crate::core::emoji::EmojiAssigner;
use crate::core::session::Session;

pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

pub struct App {
    pub session: Session,
    pub messages: Vec<Message>,
    pub emojis: EmojiAssigner,
    /// Sequence number of the fetch whose snapshot is in `messages`.
    /// 0 until the first snapshot lands.
    pub last_applied_fetch: u64,
    pub time_format: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_FORMAT.to_string())
    }
}

impl App {
    pub fn new(time_format: String) -> Self {
        Self {
            session: Session::default(),
            messages: Vec::new(),
            emojis: EmojiAssigner::new(),
            last_applied_fetch: 0,
            time_format,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.time_format.clone())
    }

    /// Whether `sender` is the person using this client.
    pub fn is_own(&self, sender: &str) -> bool {
        self.session.user() == Some(sender)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{message, test_app};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(!app.session.is_active());
        assert!(app.messages.is_empty());
        assert_eq!(app.last_applied_fetch, 0);
        assert_eq!(app.time_format, "%H:%M");
    }

    #[test]
    fn test_is_own_needs_active_session() {
        let mut app = test_app();
        let msg = message(1, "Ana", "oi");
        assert!(!app.is_own(&msg.sender));
        app.session.confirm("Ana");
        assert!(app.is_own(&msg.sender));
        assert!(!app.is_own("Bob"));
    }
}
