//! # MessageList Component
//!
//! Scrollable, oldest-first view of the chat.
//!
//! ## Responsibilities
//!
//! - Lay out one [`Bubble`] per message, own messages on the right
//! - Keep the newest message in view ("stick to bottom")
//! - Let the user scroll back without being yanked down on every poll
//!
//! ## Auto-scroll
//!
//! The list re-pins to the bottom whenever the total content height or the
//! viewport size changes. A poll that returns the same messages leaves the
//! height unchanged, so a user reading older messages stays where they are;
//! a new message changes the height and brings the view back to the end.
//!
//! ## Long histories
//!
//! Heights and the scroll position are tracked in `u32`, since a full
//! history can run past `u16::MAX` rows. Each frame only the bubbles around
//! the scroll position are laid into the `ScrollView`, with offsets relative
//! to that window, and the scrollbar is drawn separately against the whole
//! list.
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message views
//! (props).

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::view::MessageView;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Bubble;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Rows scrolled past the top of the whole list
    pub scroll_offset: u32,
    /// When true, auto-scroll to bottom on every render
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Running bottom edge of each bubble, from the last render
    pub prefix_heights: Vec<u32>,
    /// Offset into the rendered window
    window_state: ScrollViewState,
    last_content_height: u32,
    last_viewport: Size,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            prefix_heights: Vec::new(),
            window_state: ScrollViewState::default(),
            last_content_height: 0,
            last_viewport: Size::new(0, 0),
        }
    }

    pub fn content_height(&self) -> u32 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    fn max_scroll(&self) -> u32 {
        self.content_height()
            .saturating_sub(u32::from(self.viewport_height))
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        if self.scroll_offset >= max_y {
            self.stick_to_bottom = true;
            self.scroll_offset = max_y;
        }
    }

    /// Whether content exists below the visible window.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_offset < self.max_scroll()
    }

    /// Record this frame's measurements. A change in content height or
    /// viewport size re-pins the view to the bottom.
    fn observe_layout(&mut self, content_height: u32, viewport: Size) {
        if content_height != self.last_content_height || viewport != self.last_viewport {
            self.stick_to_bottom = true;
        }
        self.last_content_height = content_height;
        self.last_viewport = viewport;
        self.viewport_height = viewport.height;
    }

    /// Top edge of bubble `i`.
    fn top_of(&self, i: usize) -> u32 {
        match i {
            0 => 0,
            _ => self.prefix_heights[i - 1],
        }
    }

    /// Index range of bubbles that intersect the viewport, with half a
    /// screen of slack on each side.
    pub fn visible_range(&self, scroll_offset: u32, viewport_height: u16) -> std::ops::Range<usize> {
        let viewport_height = u32::from(viewport_height);
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }

    fn scroll_by(&mut self, rows: i64) {
        let target = i64::from(self.scroll_offset).saturating_add(rows);
        self.scroll_offset = u32::try_from(target.max(0)).unwrap_or(u32::MAX);
        self.clamp_scroll();
    }
}

/// Scrollable chat view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub views: &'a [MessageView<'a>],
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, views: &'a [MessageView<'a>]) -> Self {
        Self { state, views }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Lay out every bubble and cache running heights
        let bubbles: Vec<Bubble> = self
            .views
            .iter()
            .map(|v| Bubble::layout(v, content_width))
            .collect();
        self.state.prefix_heights = bubbles
            .iter()
            .scan(0u32, |acc, b| {
                *acc = acc.saturating_add(u32::from(b.height()));
                Some(*acc)
            })
            .collect();
        let total_height = self.state.content_height();

        // 2. Re-pin on content or viewport change, otherwise keep the user's place
        self.state
            .observe_layout(total_height, Size::new(area.width, area.height));
        if self.state.stick_to_bottom {
            self.state.scroll_offset = self.state.max_scroll();
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_offset;
        let visible = self.state.visible_range(scroll_offset, area.height);

        // 3. Render the visible bubbles into a window-sized ScrollView
        let window_top = self.state.top_of(visible.start);
        let window_bottom = self.state.top_of(visible.end);
        let window_height = u16::try_from(window_bottom - window_top).unwrap_or(u16::MAX);

        let mut scroll_view = ScrollView::new(Size::new(content_width, window_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let window = bubbles
            .into_iter()
            .enumerate()
            .take(visible.end)
            .skip(visible.start);
        for (i, bubble) in window {
            let Ok(top) = u16::try_from(self.state.top_of(i) - window_top) else {
                break;
            };
            let rect = Rect::new(
                bubble.x_offset(content_width),
                top,
                bubble.width(),
                bubble.height().min(window_height.saturating_sub(top)),
            );
            scroll_view.render_widget(bubble, rect);
        }

        let window_offset =
            u16::try_from(scroll_offset.saturating_sub(window_top)).unwrap_or(u16::MAX);
        self.state.window_state.set_offset(Position {
            x: 0,
            y: window_offset,
        });
        frame.render_stateful_widget(scroll_view, area, &mut self.state.window_state);

        // 4. Scrollbar against the whole list
        if total_height > u32::from(area.height) {
            let mut scrollbar_state = ScrollbarState::new(self.state.max_scroll() as usize + 1)
                .position(scroll_offset as usize)
                .viewport_content_length(area.height as usize);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar_state,
            );
        }
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because `MessageList` is recreated each frame and can't hold scroll state.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let page = i64::from(self.viewport_height.max(1));
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_by(-1);
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_by(1);
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_by(-page);
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_by(page);
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}
