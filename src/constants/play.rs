// Logical canvas, in world units. Y grows downward.
pub const WIDTH: f32 = 900.0;
pub const HEIGHT: f32 = 600.0;

pub const GRAVITY: f32 = 1000.0;
pub const FLAP_VELOCITY: f32 = -350.0;

pub const BIRD_INITIAL_X: f32 = 80.0;
pub const BIRD_INITIAL_Y: f32 = 300.0;
pub const BIRD_WIDTH: f32 = 34.0;
pub const BIRD_HEIGHT: f32 = 24.0;

// angle = clamp(vy / ROTATION_DIVISOR, MIN, MAX), in degrees
pub const ROTATION_DIVISOR: f32 = 10.0;
pub const ROTATION_MIN: f32 = -30.0;
pub const ROTATION_MAX: f32 = 90.0;

pub const PIPE_WIDTH: f32 = 52.0;
pub const PIPE_HEIGHT: f32 = 400.0;
pub const PIPE_GAP: f32 = 120.0;
pub const PIPE_VELOCITY: f32 = -200.0;
pub const PIPE_GAP_MIN: i32 = 100;
pub const PIPE_GAP_MAX: i32 = 500;
pub const PIPE_SPAWN_X: f32 = 960.0;
pub const PIPE_CULL_X: f32 = -50.0;
/// Milliseconds between two pipe pairs.
pub const PIPE_SPAWN_INTERVAL: f64 = 1500.0;

pub const ROAD_X: f32 = 450.0;
pub const ROAD_Y: f32 = 590.0;
pub const ROAD_WIDTH: f32 = 900.0;
pub const ROAD_HEIGHT: f32 = 40.0;

/// Background tile offset added every frame.
pub const BACKGROUND_SCROLL: f32 = 0.5;

/// Longest physics step, in milliseconds. Longer gaps between frames are clamped.
pub const MAX_STEP_MS: f64 = 50.0;

pub const DEPTH_BACKGROUND: u8 = 0;
pub const DEPTH_PIPE: u8 = 5;
pub const DEPTH_ROAD: u8 = 10;
pub const DEPTH_BIRD: u8 = 20;
pub const DEPTH_TEXT: u8 = 30;

pub const START_TEXT: &str = "Tap or Press SPACE to Start";
pub const GAME_OVER_TEXT: &str = "GAME OVER";
pub const RESTART_TEXT: &str = "Tap or Press SPACE to Restart";
pub const TEXT_X: f32 = 450.0;
pub const TEXT_Y: f32 = 300.0;
pub const RESTART_TEXT_Y: f32 = 340.0;
