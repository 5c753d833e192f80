use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::view::{MessageView, Side, StatusBadge};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
pub const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;
/// Bubbles never take more than this share of the list width.
const MAX_WIDTH_PERCENT: u16 = 75;

const OWN_COLOR: Color = Color::Blue;
const OTHER_COLOR: Color = Color::White;
const READ_COLOR: Color = Color::LightBlue;
const MUTED_COLOR: Color = Color::DarkGray;

/// A single chat bubble, laid out for a given list width.
///
/// # Design
///
/// `Bubble` is a **transient component**: built fresh each frame from a
/// [`MessageView`]. The body is wrapped with `textwrap` up front and drawn
/// line by line, so [`height`](Self::height) is exact and the parent
/// `MessageList` can place bubbles without rendering them first.
///
/// ```text
/// ╭──────────────╮                       ╭────────────╮
/// │ 🐱 Bob       │                       │ oi!        │
/// │ hey there    │                       │  14:03 ✅✅ │
/// │        14:02 │                       ╰────────────╯
/// ╰──────────────╯
/// ```
#[derive(Debug, Clone)]
pub struct Bubble {
    pub side: Side,
    header: Option<String>,
    body_lines: Vec<String>,
    time: String,
    status: Option<StatusBadge>,
    width: u16,
}

impl Bubble {
    pub fn layout(view: &MessageView<'_>, list_width: u16) -> Self {
        let max_width = max_bubble_width(list_width);
        let inner_max = max_width.saturating_sub(HORIZONTAL_OVERHEAD).max(1);

        let body_lines = wrap_body(view.body, inner_max);

        let footer_width = footer_width(&view.time, view.status.as_ref());
        let natural = body_lines
            .iter()
            .map(|l| l.width())
            .chain(view.header.as_deref().map(UnicodeWidthStr::width))
            .chain(std::iter::once(footer_width))
            .max()
            .unwrap_or(0) as u16;

        let width = (natural.min(inner_max) + HORIZONTAL_OVERHEAD).min(list_width.max(1));

        Self {
            side: view.side,
            header: view.header.clone(),
            body_lines,
            time: view.time.clone(),
            status: view.status,
            width,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Rows this bubble occupies, saturating at `u16::MAX` for absurdly
    /// long bodies.
    pub fn height(&self) -> u16 {
        let header = u16::from(self.header.is_some());
        let footer = u16::from(self.has_footer());
        let body = u16::try_from(self.body_lines.len()).unwrap_or(u16::MAX);
        body.saturating_add(header)
            .saturating_add(footer)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn has_footer(&self) -> bool {
        !self.time.is_empty() || self.status.is_some()
    }

    /// Column where this bubble starts inside a list of `list_width`.
    pub fn x_offset(&self, list_width: u16) -> u16 {
        match self.side {
            Side::Left => 0,
            Side::Right => list_width.saturating_sub(self.width),
        }
    }
}

/// 75% of the list, but never narrower than what borders and one column need.
pub fn max_bubble_width(list_width: u16) -> u16 {
    let share = (u32::from(list_width) * u32::from(MAX_WIDTH_PERCENT) / 100) as u16;
    share.max(HORIZONTAL_OVERHEAD + 1).min(list_width)
}

fn wrap_body(body: &str, width: u16) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return vec![String::new()];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(body, options)
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

fn footer_width(time: &str, status: Option<&StatusBadge>) -> usize {
    match (time.is_empty(), status) {
        (true, None) => 0,
        (false, None) => time.width(),
        (true, Some(badge)) => badge.glyph.width(),
        (false, Some(badge)) => time.width() + 1 + badge.glyph.width(),
    }
}

impl Widget for Bubble {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = match self.side {
            Side::Right => OWN_COLOR,
            Side::Left => OTHER_COLOR,
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let mut lines: Vec<Line> = Vec::with_capacity(self.body_lines.len() + 2);
        if let Some(header) = self.header {
            lines.push(Line::from(Span::styled(
                header,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        lines.extend(self.body_lines.into_iter().map(Line::from));

        if !self.time.is_empty() || self.status.is_some() {
            let mut footer: Vec<Span> = Vec::new();
            if !self.time.is_empty() {
                footer.push(Span::styled(self.time, Style::default().fg(MUTED_COLOR)));
            }
            if let Some(badge) = self.status {
                if !footer.is_empty() {
                    footer.push(Span::raw(" "));
                }
                let color = if badge.highlighted { READ_COLOR } else { MUTED_COLOR };
                footer.push(Span::styled(badge.glyph, Style::default().fg(color)));
            }
            lines.push(Line::from(footer).alignment(Alignment::Right));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
