use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Span, Text},
    widgets::Widget,
};

#[derive(Default)]
pub struct SetStyle(Style);
#[derive(Default)]
pub struct NoStyle;

#[derive(Default)]
pub struct LineMode;
#[derive(Default)]
pub struct PixelMode;

/// Multi-line text block. Line mode draws each line as text; pixel mode draws every
/// character as its own cell, so whitespace can be left transparent.
#[derive(Debug, Default)]
pub struct MultiLine<U, M, T: ToString> {
    lines: Vec<T>,
    ignore_whitespace: bool,
    style: U,
    mode: M,
}

impl<T: ToString> MultiLine<NoStyle, LineMode, T> {
    pub fn new(lines: Vec<T>) -> Self {
        MultiLine { lines, ignore_whitespace: false, style: NoStyle, mode: LineMode }
    }
}

impl<U, M, T: ToString> MultiLine<U, M, T> {
    pub fn ignore_whitespace(self, ignore_whitespace: bool) -> Self {
        Self { ignore_whitespace, ..self }
    }

    pub fn style(self, style: Style) -> MultiLine<SetStyle, M, T> {
        MultiLine {
            lines: self.lines,
            ignore_whitespace: self.ignore_whitespace,
            style: SetStyle(style),
            mode: self.mode,
        }
    }

    pub fn pixel_mode(self) -> MultiLine<U, PixelMode, T> {
        MultiLine {
            lines: self.lines,
            ignore_whitespace: self.ignore_whitespace,
            style: self.style,
            mode: PixelMode,
        }
    }
}

fn preprocess_lines<T: ToString>(
    lines: Vec<T>,
    ignore_whitespace: bool,
    area: Rect,
) -> Vec<(String, Rect)> {
    lines
        .into_iter()
        .map(|s| s.to_string())
        .enumerate()
        .map(|(index, line)| {
            let (prefix, line) = if ignore_whitespace {
                let prefix = line.chars().take_while(|c| c.is_whitespace()).count() as u16;
                (prefix, line.trim().to_string())
            } else {
                (0, line)
            };
            let rect = Rect {
                x: area.x.saturating_add(prefix),
                y: area.y.saturating_add(index as u16),
                width: line.chars().count() as u16,
                height: 1,
            };
            (line, rect.intersection(area))
        })
        .filter(|(_, rect)| !rect.is_empty())
        .collect()
}

fn preprocess_pixels<T: ToString>(
    lines: Vec<T>,
    ignore_whitespace: bool,
    area: Rect,
) -> Vec<(String, Rect)> {
    lines
        .into_iter()
        .enumerate()
        .flat_map(|(row, line)| {
            line.to_string()
                .chars()
                .enumerate()
                .map(move |(col, pixel)| (pixel, row as u16, col as u16))
                .collect::<Vec<_>>()
        })
        .filter(|(pixel, _, _)| !(ignore_whitespace && pixel.is_whitespace()))
        .map(|(pixel, row, col)| {
            let rect = Rect {
                x: area.x.saturating_add(col),
                y: area.y.saturating_add(row),
                width: 1,
                height: 1,
            };
            (pixel.to_string(), rect.intersection(area))
        })
        .filter(|(_, rect)| !rect.is_empty())
        .collect()
}

impl<T: ToString> Widget for MultiLine<SetStyle, LineMode, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for (line, rect) in preprocess_lines(self.lines, self.ignore_whitespace, area) {
            Text::from(line).style(self.style.0).render(rect, buf);
        }
    }
}

impl<T: ToString> Widget for MultiLine<NoStyle, LineMode, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.style(Style::default()).render(area, buf);
    }
}

impl<T: ToString> Widget for MultiLine<SetStyle, PixelMode, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for (pixel, rect) in preprocess_pixels(self.lines, self.ignore_whitespace, area) {
            Span::from(pixel).style(self.style.0).render(rect, buf);
        }
    }
}

impl<T: ToString> Widget for MultiLine<NoStyle, PixelMode, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.style(Style::default()).render(area, buf);
    }
}
