//! # InputBox Component
//!
//! Single-line text field used by both the name gate and the composer.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste)
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter
//! - Scroll horizontally so the cursor stays visible
//!
//! Submitting does **not** clear the buffer. The parent decides: the
//! composer is cleared only once the server has accepted the message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Offset from area edge to the first text column (border + padding)
const TEXT_OFFSET: u16 = 2;
/// Rows taken by a box: top border, text, bottom border
pub const HEIGHT: u16 = 3;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User pressed Enter with this text
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    title: String,
    placeholder: String,
    /// Draw with the accent colour
    pub focused: bool,
}

impl InputBox {
    pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            title: title.into(),
            placeholder: placeholder.into(),
            focused: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = single_line(text);
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Byte offset where the visible window starts so that the cursor fits
    /// within `inner_width` columns.
    fn window_start(&self, inner_width: u16) -> usize {
        let inner_width = inner_width as usize;
        if inner_width == 0 {
            return self.cursor;
        }
        let mut start = self.cursor;
        let mut used = 0usize;
        for (i, c) in self.buffer[..self.cursor].char_indices().rev() {
            used += c.width().unwrap_or(0);
            // keep one column free for the cursor itself
            if used >= inner_width {
                break;
            }
            start = i;
        }
        start
    }
}

/// Newlines become spaces: both fields are single-line.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let accent = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(accent)
            .title(self.title.as_str())
            .padding(Padding::horizontal(1));

        let start = self.window_start(inner_width);
        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder.as_str())
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(&self.buffer[start..])
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused && area.height >= HEIGHT {
            let cursor_col = UnicodeWidthStr::width(&self.buffer[start..self.cursor]) as u16;
            let max_x = area.x + area.width.saturating_sub(TEXT_OFFSET + 1);
            let x = (area.x + TEXT_OFFSET + cursor_col).min(max_x);
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let c = if *c == '\n' || *c == '\r' { ' ' } else { *c };
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let text = single_line(text);
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
