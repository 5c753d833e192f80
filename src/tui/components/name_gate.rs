//! # Name Gate Component
//!
//! First screen: a greeting and a name field. Enter confirms; a blank name
//! is ignored and the screen stays put.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::input_box::{self, InputBox};

/// Width of the name field.
const FIELD_WIDTH: u16 = 32;

pub struct NameGate<'a> {
    pub input: &'a mut InputBox,
}

impl<'a> NameGate<'a> {
    pub fn new(input: &'a mut InputBox) -> Self {
        Self { input }
    }
}

impl Component for NameGate<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text_lines = vec![
            Line::from(Span::styled(
                "👋 Welcome to the Chat 👋",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter your name",
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            )),
        ];
        let text_height = text_lines.len() as u16;

        let [text_area, _, field_row, _, hint_area] = Layout::vertical([
            Constraint::Length(text_height),
            Constraint::Length(1), // Spacer
            Constraint::Length(input_box::HEIGHT),
            Constraint::Length(1), // Spacer
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);

        frame.render_widget(Paragraph::new(text_lines).alignment(Alignment::Center), text_area);

        let [field_area] = Layout::horizontal([Constraint::Length(FIELD_WIDTH.min(area.width))])
            .flex(Flex::Center)
            .areas(field_row);
        self.input.render(frame, field_area);

        let hint = Paragraph::new(Span::styled(
            "Enter to join · Esc to quit",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(hint, hint_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_renders_greeting_prompt_and_field() {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let mut input = InputBox::new("Name", "Your name");
        terminal
            .draw(|f| NameGate::new(&mut input).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Welcome to the Chat"));
        assert!(text.contains("Enter your name"));
        assert!(text.contains("Your name"));
    }
}
