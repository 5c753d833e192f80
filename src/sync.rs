//! # Background Sync
//!
//! Network work for an active chat: the poll loop and the one-off fetch,
//! send and mark-read requests. Every request runs in its own tokio task and
//! reports back to the event loop as an [`Action`] over a `std::sync::mpsc`
//! channel. Failures are logged and swallowed; nothing is retried.
//!
//! All tasks belong to a [`ChatSync`]. Dropping it aborts them, in-flight
//! requests included, so nothing lands in the channel after teardown.
//!
//! ## Ordering
//!
//! Fetches overlap freely. Each one is stamped with a sequence number when
//! it is issued; the reducer only applies a snapshot newer than the one on
//! screen, so a slow response can't roll the list back.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::{AbortHandle, JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::api::ChatBackend;
use crate::core::action::Action;

pub struct ChatSync {
    backend: Arc<dyn ChatBackend>,
    tx: Sender<Action>,
    user: String,
    next_seq: Arc<AtomicU64>,
    tasks: Vec<AbortHandle>,
}

impl ChatSync {
    pub fn new(backend: Arc<dyn ChatBackend>, tx: Sender<Action>, user: String) -> Self {
        Self {
            backend,
            tx,
            user,
            next_seq: Arc::new(AtomicU64::new(0)),
            tasks: Vec::new(),
        }
    }

    /// Start the poll loop. The first tick fires immediately and both
    /// fetches and marks read; later ticks fetch, and mark read too when
    /// `mark_read_on_poll` is set.
    ///
    /// Mark-read calls run beside the loop in their own tasks, so a slow
    /// `marcar_lido` never delays the next fetch. They live in a `JoinSet`
    /// owned by the loop and are aborted along with it.
    pub fn start_polling(&mut self, interval: Duration, mark_read_on_poll: bool) {
        info!(
            "Polling every {:?} as {:?} (mark read on poll: {})",
            interval, self.user, mark_read_on_poll
        );
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let user = self.user.clone();
        let next_seq = self.next_seq.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut marks: JoinSet<bool> = JoinSet::new();
            let mut first = true;

            loop {
                ticker.tick().await;

                // Reap finished mark-read calls
                while let Some(done) = marks.try_join_next() {
                    if matches!(done, Ok(false)) {
                        info!("Poll loop stopping: receiver dropped");
                        return;
                    }
                }

                // At most one mark-read in flight
                if (first || mark_read_on_poll) && marks.is_empty() {
                    let backend = backend.clone();
                    let tx = tx.clone();
                    let user = user.clone();
                    marks.spawn(async move { mark_read_once(backend.as_ref(), &tx, &user).await });
                }
                first = false;

                let seq = issue(&next_seq);
                if !fetch_once(backend.as_ref(), &tx, seq).await {
                    info!("Poll loop stopping: receiver dropped");
                    return;
                }
            }
        });
        self.track(handle);
    }

    /// Fetch the message list once.
    pub fn fetch(&mut self) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let seq = issue(&self.next_seq);
        let handle = tokio::spawn(async move {
            fetch_once(backend.as_ref(), &tx, seq).await;
        });
        self.track(handle);
    }

    /// Tell the server this user has read the conversation.
    pub fn mark_read(&mut self) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let user = self.user.clone();
        let handle = tokio::spawn(async move {
            mark_read_once(backend.as_ref(), &tx, &user).await;
        });
        self.track(handle);
    }

    /// Post `body` as this user.
    pub fn send(&mut self, body: String) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let user = self.user.clone();
        let handle = tokio::spawn(async move {
            match backend.send_message(&user, &body).await {
                Ok(()) => {
                    debug!("Sent message (len={})", body.len());
                    if tx.send(Action::MessageSent { body }).is_err() {
                        warn!("Failed to report sent message: receiver dropped");
                    }
                }
                Err(e) => warn!("Error sending message: {}", e),
            }
        });
        self.track(handle);
    }

    /// Tasks that haven't finished yet.
    pub fn active_tasks(&self) -> usize {
        self.tasks.iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort the poll loop and every in-flight request.
    pub fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            debug!("Aborting {} sync tasks", self.tasks.len());
        }
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.tasks.retain(|h| !h.is_finished());
        self.tasks.push(handle.abort_handle());
    }
}

impl Drop for ChatSync {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn issue(next_seq: &AtomicU64) -> u64 {
    next_seq.fetch_add(1, Ordering::SeqCst) + 1
}

/// Returns `false` once the receiver is gone.
async fn fetch_once(backend: &dyn ChatBackend, tx: &Sender<Action>, seq: u64) -> bool {
    match backend.list_messages().await {
        Ok(messages) => {
            debug!("Fetch #{} returned {} messages", seq, messages.len());
            tx.send(Action::MessagesLoaded { seq, messages }).is_ok()
        }
        Err(e) => {
            warn!("Error fetching messages (fetch #{}): {}", seq, e);
            true
        }
    }
}

/// Returns `false` once the receiver is gone.
async fn mark_read_once(backend: &dyn ChatBackend, tx: &Sender<Action>, user: &str) -> bool {
    match backend.mark_read(user).await {
        Ok(()) => tx.send(Action::MarkedRead).is_ok(),
        Err(e) => {
            warn!("Error marking messages as read: {}", e);
            true
        }
    }
}
