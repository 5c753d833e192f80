//! # Actions
//!
//! Everything that can happen in the chat becomes an `Action`.
//! User presses Enter on the gate? That's `Action::ConfirmName(name)`.
//! A poll returns? That's `Action::MessagesLoaded { seq, messages }`.
//!
//! `update()` applies an action to the state and returns an `Effect`: the
//! I/O the event loop should perform next. No side effects happen here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::api::Message;
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Gate submitted with this name.
    ConfirmName(String),
    /// Composer submitted with this draft.
    Submit(String),
    /// A fetch finished. `seq` is the number it was issued with.
    MessagesLoaded { seq: u64, messages: Vec<Message> },
    /// The server accepted `body`.
    MessageSent { body: String },
    /// The server accepted a mark-read.
    MarkedRead,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Session just became active: start polling as `user`.
    StartSession { user: String },
    /// Post a message.
    SendMessage { sender: String, body: String },
    /// A send went through: clear the composer if it still holds `body`, then refresh.
    DraftSent { body: String },
    /// Fetch the message list once.
    FetchMessages,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::ConfirmName(name) => {
            if !app.session.confirm(&name) {
                debug!("Ignoring name confirmation (blank or already active)");
                return Effect::None;
            }
            let user = app.session.user().unwrap_or_default().to_string();
            info!("Session active as {:?}", user);
            Effect::StartSession { user }
        }
        Action::Submit(text) => {
            let Some(sender) = app.session.user() else {
                return Effect::None;
            };
            if text.trim().is_empty() {
                return Effect::None;
            }
            Effect::SendMessage {
                sender: sender.to_string(),
                body: text,
            }
        }
        Action::MessagesLoaded { seq, mut messages } => {
            if seq <= app.last_applied_fetch {
                debug!(
                    "Dropping stale snapshot #{} (showing #{})",
                    seq, app.last_applied_fetch
                );
                return Effect::None;
            }
            // Server lists newest first; display oldest first.
            messages.reverse();
            let new_senders = app.emojis.observe(&messages);
            debug!(
                "Applied snapshot #{}: {} messages, {} new senders",
                seq,
                messages.len(),
                new_senders
            );
            app.messages = messages;
            app.last_applied_fetch = seq;
            Effect::None
        }
        Action::MessageSent { body } => Effect::DraftSent { body },
        Action::MarkedRead => Effect::FetchMessages,
        Action::Quit => Effect::Quit,
    }
}
