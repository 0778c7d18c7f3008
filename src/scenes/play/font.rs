//! Banner font used for large prompts, loaded once at scene setup.
//!
//! The font is a JSON document:
//!
//! ```json
//! { "name": "FlappyFont", "height": 5, "spacing": 1, "glyphs": { "A": ["..", ...] } }
//! ```
//!
//! Every glyph must have exactly `height` rows. When the file cannot be read or parsed the
//! scene falls back to plain terminal text.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{bail, Result, WrapErr};
use serde::Deserialize;
use tokio::sync::oneshot;
use tracing::{info, warn};

fn default_spacing() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BannerFont {
    pub name: String,
    pub height: usize,
    #[serde(default = "default_spacing")]
    pub spacing: usize,
    glyphs: HashMap<String, Vec<String>>,
}

impl BannerFont {
    pub fn from_json(raw: &str) -> Result<Self> {
        let font: BannerFont = serde_json::from_str(raw).wrap_err("malformed font file")?;
        font.validate()?;
        Ok(font)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("unable to read font {}", path.display()))?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.height == 0 {
            bail!("font {} has zero height", self.name);
        }
        for (key, rows) in self.glyphs.iter() {
            if key.chars().count() != 1 {
                bail!("glyph key {key:?} in font {} is not a single character", self.name);
            }
            if rows.len() != self.height {
                bail!("glyph {key:?} has {} rows, font {} expects {}", rows.len(), self.name, self.height);
            }
        }
        Ok(())
    }

    /// Renders `text` as `height` rows, or `None` if a character has no glyph.
    pub fn render(&self, text: &str) -> Option<Vec<String>> {
        let mut rows = vec![String::new(); self.height];
        let gap = " ".repeat(self.spacing);

        for (index, c) in text.chars().enumerate() {
            let glyph = self.glyphs.get(&c.to_string())?;
            let width = glyph.iter().map(|row| row.chars().count()).max().unwrap_or(0);
            for (row, line) in rows.iter_mut().zip(glyph.iter()) {
                if index > 0 {
                    row.push_str(&gap);
                }
                row.push_str(line);
                row.extend(std::iter::repeat_n(' ', width - line.chars().count()));
            }
        }

        Some(rows)
    }
}

/// Outcome of the one-shot font load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontLoad {
    Loaded(BannerFont),
    Fallback,
}

impl FontLoad {
    pub fn font(&self) -> Option<&BannerFont> {
        match self {
            FontLoad::Loaded(font) => Some(font),
            FontLoad::Fallback => None,
        }
    }
}

/// Loads the font in the background. The receiver yields exactly one [`FontLoad`].
pub fn spawn_font_load(path: PathBuf) -> oneshot::Receiver<FontLoad> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let load = match BannerFont::load(&path).await {
            Ok(font) => {
                info!(font = %font.name, path = %path.display(), "loaded banner font");
                FontLoad::Loaded(font)
            },
            Err(e) => {
                warn!("{e:#}; using plain text");
                FontLoad::Fallback
            },
        };
        let _ = tx.send(load);
    });
    rx
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FONT: &str = r####"{
        "name": "Tiny",
        "height": 2,
        "glyphs": { "H": ["# #", "###"], "I": ["#", "#"] }
    }"####;

    #[test]
    fn test_render() {
        let font = BannerFont::from_json(FONT).unwrap();
        assert_eq!(font.spacing, 1);
        assert_eq!(font.render("HI"), Some(vec!["# # #".to_string(), "### #".to_string()]));
        assert_eq!(font.render("HA"), None);
    }

    #[test]
    fn test_rejects_ragged_glyphs() {
        let raw = r####"{ "name": "Bad", "height": 3, "glyphs": { "H": ["# #", "###"] } }"####;
        assert!(BannerFont::from_json(raw).is_err());
        assert!(BannerFont::from_json("{ not json").is_err());
    }

    #[test]
    fn test_bundled_font_renders_game_over() {
        let font = BannerFont::from_json(include_str!("../../../assets/font.json")).unwrap();
        let rows = font.render(crate::constants::play::GAME_OVER_TEXT).unwrap();
        assert_eq!(rows.len(), font.height);
    }

    #[tokio::test]
    async fn test_missing_file_falls_back() {
        let rx = spawn_font_load(PathBuf::from("/nonexistent/flappy/font.json"));
        assert_eq!(rx.await.unwrap(), FontLoad::Fallback);
    }
}
