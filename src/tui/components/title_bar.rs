//! # TitleBar Component
//!
//! One-line header above the chat: greets the user by name and shows a
//! "↓ More" hint when there are messages below the visible window.
//!
//! Stateless: all fields are props from the parent.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    pub user: &'a str,
    pub has_unseen_content: bool,
}

impl TitleBar<'_> {
    pub fn title_text(&self) -> String {
        format!("💬 Welcome to the Chat, {}", self.user)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            self.title_text(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.has_unseen_content {
            spans.push(Span::styled(
                "  ↓ More",
                Style::default().fg(Color::Yellow),
            ));
        }
        let header = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(header, area);
    }
}
