//! # Message Presentation
//!
//! Turns the message list into what the screen should show for each entry:
//! which side it sits on, the sender header, the time and the status badge.
//! No styling here; the TUI decides colours.

use chrono::NaiveDateTime;

use crate::api::{DeliveryStatus, Message};
use crate::core::state::App;

/// Which side of the list a bubble hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Someone else's message.
    Left,
    /// The viewer's own message.
    Right,
}

/// Delivery badge shown on the viewer's own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub glyph: &'static str,
    /// Drawn in the "read" colour.
    pub highlighted: bool,
}

impl StatusBadge {
    pub fn for_status(status: DeliveryStatus) -> Option<Self> {
        match status {
            DeliveryStatus::Delivered => Some(Self {
                glyph: "✅✅",
                highlighted: false,
            }),
            DeliveryStatus::Read => Some(Self {
                glyph: "✅👌",
                highlighted: true,
            }),
            DeliveryStatus::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView<'a> {
    pub id: &'a str,
    pub side: Side,
    /// `"{emoji} {sender}"` on other people's messages.
    pub header: Option<String>,
    pub body: &'a str,
    /// Formatted time, empty when the server sent none.
    pub time: String,
    pub status: Option<StatusBadge>,
}

/// Format a message time with a strftime pattern. Empty for a missing time.
pub fn format_time(timestamp: Option<&NaiveDateTime>, pattern: &str) -> String {
    use std::fmt::Write;

    let Some(ts) = timestamp else {
        return String::new();
    };
    // chrono reports a bad pattern through fmt::Error instead of panicking here
    let mut out = String::new();
    match write!(out, "{}", ts.format(pattern)) {
        Ok(()) => out,
        Err(_) => ts.format(crate::core::state::DEFAULT_TIME_FORMAT).to_string(),
    }
}

pub fn message_view<'a>(app: &App, msg: &'a Message) -> MessageView<'a> {
    let own = app.is_own(&msg.sender);
    MessageView {
        id: &msg.id,
        side: if own { Side::Right } else { Side::Left },
        header: (!own).then(|| format!("{} {}", app.emojis.glyph_for(&msg.sender), msg.sender)),
        body: &msg.body,
        time: format_time(msg.timestamp.as_ref(), &app.time_format),
        status: if own {
            StatusBadge::for_status(msg.status)
        } else {
            None
        },
    }
}

/// Views for every message, in display order.
pub fn message_views(app: &App) -> Vec<MessageView<'_>> {
    app.messages.iter().map(|m| message_view(app, m)).collect()
}
