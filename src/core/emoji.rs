//! # Emoji Assigner
//!
//! Gives every sender a decorative glyph the first time they show up.
//! The choice is random, made once per name and kept for the rest of the
//! process. Nothing is persisted or shared with the server.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::api::Message;

/// Glyphs a sender can be given.
pub const PALETTE: [&str; 7] = ["😎", "😊", "🤖", "🌸", "🐱", "🐶", "🦄"];

/// Shown for a sender that has not been assigned a glyph yet.
pub const FALLBACK: &str = "🙂";

pub struct EmojiAssigner {
    assigned: HashMap<String, &'static str>,
    rng: StdRng,
}

impl Default for EmojiAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiAssigner {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic assigner for tests.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            assigned: HashMap::new(),
            rng,
        }
    }

    /// Assign a glyph to every sender in `messages` that doesn't have one.
    /// Returns how many new senders were seen.
    pub fn observe(&mut self, messages: &[Message]) -> usize {
        let mut added = 0;
        for msg in messages {
            if self.assigned.contains_key(&msg.sender) {
                continue;
            }
            let glyph = PALETTE.choose(&mut self.rng).copied().unwrap_or(FALLBACK);
            self.assigned.insert(msg.sender.clone(), glyph);
            added += 1;
        }
        added
    }

    /// Glyph for `sender`, or [`FALLBACK`] if none was assigned.
    pub fn glyph_for(&self, sender: &str) -> &'static str {
        self.assigned.get(sender).copied().unwrap_or(FALLBACK)
    }

    pub fn get(&self, sender: &str) -> Option<&'static str> {
        self.assigned.get(sender).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
