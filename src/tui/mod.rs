//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into core::Action values and carries out the
//! `Effect`s the reducer returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each iteration draws if something changed, waits up to 250ms for a
//! terminal event, drains any further pending events, then drains the
//! actions reported by background network tasks. Polling itself runs in
//! tokio tasks owned by [`ChatSync`]; the loop never waits on the network.

mod component;
pub mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::api::{ChatBackend, HttpChatBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::sync::ChatSync;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub name_input: InputBox,
    pub composer: InputBox,
    pub message_list: MessageListState,
}

impl TuiState {
    pub fn new(prefill_name: Option<String>) -> Self {
        let mut name_input = InputBox::new("Name", "Your name");
        if let Some(name) = prefill_name {
            name_input.set_text(&name);
        }
        Self {
            name_input,
            composer: InputBox::new("Message", "Type a message..."),
            message_list: MessageListState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Everything an `Effect` may need to touch.
struct Runtime<'a> {
    backend: &'a Arc<dyn ChatBackend>,
    config: &'a ResolvedConfig,
    tx: &'a mpsc::Sender<Action>,
    sync: &'a mut Option<ChatSync>,
}

impl Runtime<'_> {
    /// Carry out an effect. Returns `true` when the app should quit.
    fn apply(&mut self, effect: Effect, tui: &mut TuiState) -> bool {
        match effect {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::StartSession { user } => {
                let mut sync = ChatSync::new(self.backend.clone(), self.tx.clone(), user);
                sync.start_polling(self.config.poll_interval, self.config.mark_read_on_poll);
                *self.sync = Some(sync);
                tui.message_list = MessageListState::new();
            }
            Effect::SendMessage { body, .. } => match self.sync.as_mut() {
                Some(sync) => sync.send(body),
                None => warn!("Send requested before the session started"),
            },
            Effect::DraftSent { body } => {
                // Only clear if the user hasn't typed something new meanwhile
                if tui.composer.text() == body {
                    tui.composer.clear();
                }
                if let Some(sync) = self.sync.as_mut() {
                    sync.fetch();
                }
            }
            Effect::FetchMessages => {
                if let Some(sync) = self.sync.as_mut() {
                    sync.fetch();
                }
            }
        }
        false
    }
}

pub fn run(config: ResolvedConfig, prefill_name: Option<String>) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(
        HttpChatBackend::new(
            &config.base_url,
            config.extension.clone(),
            config.request_timeout,
        )
        .map_err(|e| std::io::Error::other(e.to_string()))?,
    );
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(prefill_name);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut sync: Option<ChatSync> = None;
    let mut runtime = Runtime {
        backend: &backend,
        config: &config,
        tx: &tx,
        sync: &mut sync,
    };

    let mut needs_redraw = true; // Force first frame

    loop {
        // Only draw when something changed
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(IDLE_POLL);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}
                TuiEvent::Quit => {
                    should_quit |= runtime.apply(update(&mut app, Action::Quit), &mut tui);
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    if app.session.is_active() {
                        tui.message_list.handle_event(&event);
                    }
                }
                _ => {
                    let active = app.session.is_active();
                    let input = if active {
                        &mut tui.composer
                    } else {
                        &mut tui.name_input
                    };
                    if let Some(InputEvent::Submit(text)) = input.handle_event(&event) {
                        let action = if active {
                            Action::Submit(text)
                        } else {
                            Action::ConfirmName(text)
                        };
                        let effect = update(&mut app, action);
                        should_quit |= runtime.apply(effect, &mut tui);
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (poll results, send confirmations)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if runtime.apply(effect, &mut tui) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    // Tear down the chat view: abort polling and in-flight requests
    if let Some(mut sync) = sync.take() {
        sync.shutdown();
    }
    info!("Tagarela shutting down");

    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, EnvOverrides, TagarelaConfig, resolve};
    use crate::test_support::{FakeBackend, message, next_action};

    struct Harness {
        fake: Arc<FakeBackend>,
        backend: Arc<dyn ChatBackend>,
        config: ResolvedConfig,
        tx: mpsc::Sender<Action>,
        rx: mpsc::Receiver<Action>,
        sync: Option<ChatSync>,
        tui: TuiState,
    }

    impl Harness {
        fn new() -> Self {
            let fake = Arc::new(FakeBackend::with_messages(vec![message(1, "Bob", "oi")]));
            let mut config = resolve(
                &TagarelaConfig::default(),
                &EnvOverrides::default(),
                &CliOverrides::default(),
            );
            // Only the immediate first tick runs during a test
            config.poll_interval = Duration::from_secs(3600);
            let (tx, rx) = mpsc::channel();
            Self {
                backend: fake.clone(),
                fake,
                config,
                tx,
                rx,
                sync: None,
                tui: TuiState::new(None),
            }
        }

        fn apply(&mut self, effect: Effect) -> bool {
            let mut runtime = Runtime {
                backend: &self.backend,
                config: &self.config,
                tx: &self.tx,
                sync: &mut self.sync,
            };
            runtime.apply(effect, &mut self.tui)
        }

        /// Start a session and drain the first tick's results.
        async fn started(mut self) -> Self {
            self.apply(Effect::StartSession {
                user: "Ana".to_string(),
            });
            for _ in 0..2 {
                assert!(next_action(&self.rx).await.is_some());
            }
            self
        }
    }

    #[tokio::test]
    async fn test_start_session_begins_polling() {
        let mut h = Harness::new();
        assert!(!h.apply(Effect::StartSession {
            user: "Ana".to_string()
        }));
        assert!(h.sync.is_some());

        let mut got_snapshot = false;
        for _ in 0..2 {
            if let Some(Action::MessagesLoaded { .. }) = next_action(&h.rx).await {
                got_snapshot = true;
            }
        }
        assert!(got_snapshot);
        assert_eq!(h.fake.list_calls(), 1);
        assert_eq!(h.fake.marked_users(), vec!["Ana".to_string()]);
    }

    #[tokio::test]
    async fn test_send_before_session_is_ignored() {
        let mut h = Harness::new();
        assert!(!h.apply(Effect::SendMessage {
            sender: "Ana".to_string(),
            body: "oi".to_string(),
        }));
        assert!(h.sync.is_none());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(h.fake.sent().is_empty());
        assert!(h.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_message_posts_as_session_user() {
        let mut h = Harness::new().started().await;
        h.apply(Effect::SendMessage {
            sender: "Ana".to_string(),
            body: "oi Bob".to_string(),
        });

        assert_eq!(
            next_action(&h.rx).await,
            Some(Action::MessageSent {
                body: "oi Bob".to_string()
            })
        );
        assert_eq!(h.fake.sent(), vec![("Ana".to_string(), "oi Bob".to_string())]);
    }

    #[tokio::test]
    async fn test_draft_sent_clears_matching_composer_and_refreshes() {
        let mut h = Harness::new().started().await;
        h.tui.composer.set_text("oi Bob");

        h.apply(Effect::DraftSent {
            body: "oi Bob".to_string(),
        });

        assert_eq!(h.tui.composer.text(), "");
        assert!(matches!(
            next_action(&h.rx).await,
            Some(Action::MessagesLoaded { .. })
        ));
        assert_eq!(h.fake.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_draft_sent_keeps_newer_typing() {
        let mut h = Harness::new().started().await;
        // User kept typing while the send was in flight
        h.tui.composer.set_text("oi Bob, tudo bem?");

        h.apply(Effect::DraftSent {
            body: "oi Bob".to_string(),
        });

        assert_eq!(h.tui.composer.text(), "oi Bob, tudo bem?");
        assert!(next_action(&h.rx).await.is_some());
        assert_eq!(h.fake.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_messages_triggers_fetch() {
        let mut h = Harness::new().started().await;
        h.apply(Effect::FetchMessages);

        assert!(matches!(
            next_action(&h.rx).await,
            Some(Action::MessagesLoaded { .. })
        ));
        assert_eq!(h.fake.list_calls(), 2);
    }

    #[test]
    fn test_quit_and_none() {
        let mut h = Harness::new();
        assert!(!h.apply(Effect::None));
        assert!(h.apply(Effect::Quit));
    }

    #[test]
    fn test_prefilled_name_lands_in_gate() {
        let tui = TuiState::new(Some("Ana".to_string()));
        assert_eq!(tui.name_input.text(), "Ana");
        assert_eq!(tui.composer.text(), "");
    }
}
