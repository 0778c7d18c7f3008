pub mod background;
pub mod play;
pub mod sprites;

/// Terminal cells covered by the play surface, border excluded.
pub const SURFACE_WIDTH: u16 = 90;
pub const SURFACE_HEIGHT: u16 = 30;
