use ratatui::style::Color;

pub const SKY_COLOR: Color = Color::Rgb(78, 192, 202);
pub const CLOUD_COLOR: Color = Color::White;
pub const CITY_COLOR: Color = Color::Rgb(160, 220, 170);
pub const ROAD_COLOR: Color = Color::Rgb(222, 216, 149);
pub const PIPE_COLOR: Color = Color::LightGreen;
pub const PIPE_CAP_COLOR: Color = Color::Green;
pub const BIRD_COLOR: Color = Color::Yellow;
pub const TEXT_COLOR: Color = Color::White;

/// Rows of the tile drawn from the top of the surface in the cloud color; the rest use the city color.
pub const CLOUD_ROWS: usize = 8;
