//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::api::{ApiError, ChatBackend, DeliveryStatus, Message};
use crate::core::emoji::EmojiAssigner;
use crate::core::state::App;

/// A message with no status and no timestamp.
pub fn message(id: u64, sender: &str, body: &str) -> Message {
    message_with(id, sender, body, DeliveryStatus::None, None)
}

pub fn message_with(
    id: u64,
    sender: &str,
    body: &str,
    status: DeliveryStatus,
    timestamp: Option<NaiveDateTime>,
) -> Message {
    Message {
        id: id.to_string(),
        sender: sender.to_string(),
        body: body.to_string(),
        timestamp,
        status,
    }
}

/// Creates a test App with a seeded emoji assigner.
pub fn test_app() -> App {
    let mut app = App::default();
    app.emojis = EmojiAssigner::with_rng(StdRng::seed_from_u64(42));
    app
}

/// A test App already past the name gate.
pub fn active_app(user: &str) -> App {
    let mut app = test_app();
    app.session.confirm(user);
    app
}

/// Waits up to 500ms for the next action from a background task.
pub async fn next_action<T>(rx: &Receiver<T>) -> Option<T> {
    for _ in 0..50 {
        if let Ok(action) = rx.try_recv() {
            return Some(action);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

/// In-memory backend that records calls.
#[derive(Default)]
pub struct FakeBackend {
    messages: Vec<Message>,
    fail: bool,
    delay: Option<Duration>,
    mark_read_delay: Option<Duration>,
    list_calls: AtomicUsize,
    mark_read_calls: AtomicUsize,
    marked: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeBackend {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Every call fails with a network error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Only `mark_read` waits for `delay`.
    pub fn with_mark_read_delay(mut self, delay: Duration) -> Self {
        self.mark_read_delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn mark_read_calls(&self) -> usize {
        self.mark_read_calls.load(Ordering::SeqCst)
    }

    pub fn marked_users(&self) -> Vec<String> {
        self.marked.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    async fn respond(&self) -> Result<(), ApiError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            Err(ApiError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn list_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        Ok(self.messages.clone())
    }

    async fn send_message(&self, sender: &str, body: &str) -> Result<(), ApiError> {
        self.respond().await?;
        self.sent
            .lock()
            .unwrap()
            .push((sender.to_string(), body.to_string()));
        Ok(())
    }

    async fn mark_read(&self, sender: &str) -> Result<(), ApiError> {
        self.mark_read_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.mark_read_delay {
            tokio::time::sleep(delay).await;
        }
        self.respond().await?;
        self.marked.lock().unwrap().push(sender.to_string());
        Ok(())
    }
}
