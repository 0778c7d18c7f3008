use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    widgets::StatefulWidget,
};

use crate::{constants::background, scenes::play::assets::Sprite};

/// Horizontal offset of the tiling background, in world units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundState {
    tile_position_x: f32,
}

impl BackgroundState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll(&mut self, by: f32) {
        self.tile_position_x += by;
    }

    pub fn tile_position_x(&self) -> f32 {
        self.tile_position_x
    }
}

/// Sky filled with a tile repeated along x, anchored to the bottom of the area.
#[derive(Debug)]
pub struct Background<'a> {
    tile: &'a Sprite,
    scale_x: f32,
}

impl<'a> Background<'a> {
    /// `scale_x` converts the state's world offset into cells.
    pub fn new(tile: &'a Sprite, scale_x: f32) -> Self {
        Self { tile, scale_x }
    }
}

impl StatefulWidget for Background<'_> {
    type State = BackgroundState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut BackgroundState) {
        buf.set_style(area, Style::default().bg(background::SKY_COLOR));

        let width = self.tile.width as usize;
        if width == 0 || area.is_empty() {
            return;
        }
        let offset = (state.tile_position_x * self.scale_x).max(0.0) as usize;
        let first_row = area.bottom() as i32 - self.tile.height as i32;

        for row in 0..self.tile.height as usize {
            let y = first_row + row as i32;
            if y < area.top() as i32 {
                continue;
            }
            let color = if row < background::CLOUD_ROWS { background::CLOUD_COLOR } else { background::CITY_COLOR };

            for x in area.left()..area.right() {
                let col = (x - area.left()) as usize + offset;
                let Some(c) = self.tile.char_at(col % width, row) else { continue };
                if c == ' ' {
                    continue;
                }
                if let Some(cell) = buf.cell_mut(Position::new(x, y as u16)) {
                    cell.set_char(c).set_fg(color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(state: &mut BackgroundState) -> Vec<String> {
        let tile = Sprite::parse("ab  ");
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        Background::new(&tile, 1.0).render(area, &mut buf, state);

        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect()
    }

    #[test]
    fn test_tile_repeats_across_the_bottom() {
        let mut state = BackgroundState::new();
        assert_eq!(render(&mut state), vec!["      ".to_string(), "ab  ab".to_string()]);
    }

    #[test]
    fn test_scroll_moves_tile_left() {
        let mut state = BackgroundState::new();
        state.scroll(0.5);
        state.scroll(0.5);
        assert_eq!(state.tile_position_x(), 1.0);
        assert_eq!(render(&mut state), vec!["      ".to_string(), "b  ab ".to_string()]);
    }
}
