use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::constants::background::TEXT_COLOR;

/// Status line below the play surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBar {
    text: String,
}

impl ScoreBar {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for &ScoreBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(self.text.as_str()).bold())
            .style(Style::default().fg(TEXT_COLOR))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
