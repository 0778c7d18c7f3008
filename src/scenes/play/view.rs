//! Mapping from world units onto terminal cells.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
};

use crate::{
    constants::play,
    scenes::play::{assets::Sprite, physics::Aabb},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    area: Rect,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    pub fn new(area: Rect) -> Self {
        Viewport { area, scale_x: area.width as f32 / play::WIDTH, scale_y: area.height as f32 / play::HEIGHT }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Cells per world unit along x.
    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    /// Absolute cell column of world `x`. May fall outside the area.
    pub fn column(&self, x: f32) -> i32 {
        self.area.x as i32 + (x * self.scale_x).floor() as i32
    }

    pub fn row(&self, y: f32) -> i32 {
        self.area.y as i32 + (y * self.scale_y).floor() as i32
    }

    /// Cells covered by `bounds`, clipped to the area. `None` when nothing is on screen.
    pub fn project(&self, bounds: &Aabb) -> Option<Rect> {
        let (left, right) = self.span_x(bounds);
        let top = self.row(bounds.top);
        let bottom = self.area.y as i32 + (bounds.bottom * self.scale_y).ceil() as i32;
        self.clip(left, top, right, bottom)
    }

    /// Unclipped first and one-past-last columns covered by `bounds`.
    pub fn span_x(&self, bounds: &Aabb) -> (i32, i32) {
        (self.column(bounds.left), self.area.x as i32 + (bounds.right * self.scale_x).ceil() as i32)
    }

    /// Rect of `width` x `height` cells centered on world (`x`, `y`), clipped to the area.
    pub fn centered(&self, x: f32, y: f32, width: u16, height: u16) -> Option<Rect> {
        let (left, top) = self.centered_origin(x, y, width, height);
        self.clip(left, top, left + width as i32, top + height as i32)
    }

    pub fn centered_origin(&self, x: f32, y: f32, width: u16, height: u16) -> (i32, i32) {
        (self.column(x) - width as i32 / 2, self.row(y) - height as i32 / 2)
    }

    fn clip(&self, left: i32, top: i32, right: i32, bottom: i32) -> Option<Rect> {
        let left = left.max(self.area.left() as i32);
        let top = top.max(self.area.top() as i32);
        let right = right.min(self.area.right() as i32);
        let bottom = bottom.min(self.area.bottom() as i32);
        if left >= right || top >= bottom {
            return None;
        }
        Some(Rect::new(left as u16, top as u16, (right - left) as u16, (bottom - top) as u16))
    }
}

/// Writes `sprite` with its top-left cell at `origin`. Spaces are transparent and anything
/// outside `clip` is skipped.
pub fn paint_sprite(buf: &mut Buffer, clip: Rect, origin: (i32, i32), sprite: &Sprite, style: Style) {
    for (row, line) in sprite.lines.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if c == ' ' {
                continue;
            }
            let (x, y) = (origin.0 + col as i32, origin.1 + row as i32);
            if x < 0 || y < 0 {
                continue;
            }
            let position = Position::new(x as u16, y as u16);
            if !clip.contains(position) {
                continue;
            }
            if let Some(cell) = buf.cell_mut(position) {
                cell.set_char(c).set_style(style);
            }
        }
    }
}

/// Fills `rect` row by row, picking each cell from `row_pattern` stretched to the rect width.
pub fn fill_stretched(buf: &mut Buffer, rect: Rect, full_width: u16, skip: u16, row_pattern: &str, style: Style) {
    let pattern: Vec<char> = row_pattern.chars().collect();
    if pattern.is_empty() || full_width == 0 {
        return;
    }
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            let offset = (x - rect.left() + skip) as usize;
            let index = (offset * pattern.len() / full_width as usize).min(pattern.len() - 1);
            if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
                cell.set_char(pattern[index]).set_style(style);
            }
        }
    }
}

/// Repeats `sprite` over `rect`, starting `offset` columns into the tile.
pub fn fill_tiled(buf: &mut Buffer, rect: Rect, sprite: &Sprite, offset: usize, style: Style) {
    if sprite.width == 0 || sprite.height == 0 {
        return;
    }
    for y in rect.top()..rect.bottom() {
        let row = (y - rect.top()) as usize % sprite.height as usize;
        for x in rect.left()..rect.right() {
            let col = ((x - rect.left()) as usize + offset) % sprite.width as usize;
            let c = sprite.char_at(col, row).unwrap_or(' ');
            if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
                cell.set_char(c).set_style(style);
            }
        }
    }
}
