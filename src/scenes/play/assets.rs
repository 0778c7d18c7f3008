use tracing::debug;

use crate::constants::sprites;

/// Text-art sprite; one character per terminal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub lines: Vec<String>,
    pub width: u16,
    pub height: u16,
}

impl Sprite {
    /// Blank lines are dropped, so raw string literals can start on their own line.
    pub fn parse(art: &str) -> Self {
        let lines: Vec<String> = art.lines().filter(|line| !line.is_empty()).map(|line| line.to_string()).collect();
        let height = lines.len() as u16;
        let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16;
        Sprite { lines, width, height }
    }

    /// Character at (`col`, `row`), if there is one.
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        self.lines.get(row).and_then(|line| line.chars().nth(col))
    }
}

/// Every sprite the play scene draws.
#[derive(Debug, Clone)]
pub struct Assets {
    pub background: Sprite,
    pub pipe: Sprite,
    pub road: Sprite,
    pub bird: Vec<Sprite>,
}

impl Assets {
    pub fn load() -> Self {
        let assets = Assets {
            background: Sprite::parse(sprites::BACKGROUND_TILE),
            pipe: Sprite::parse(sprites::PIPE_TILE),
            road: Sprite::parse(sprites::ROAD_TILE),
            bird: sprites::BIRD_FRAMES.iter().map(|frame| Sprite::parse(frame)).collect(),
        };
        debug!(bird_frames = assets.bird.len(), "registered sprites");
        assets
    }

    pub fn bird_frame(&self, frame: usize) -> Option<&Sprite> {
        self.bird.get(frame).or_else(|| self.bird.first())
    }
}
