use color_eyre::eyre::Result;
use derive_builder::Builder;
use tracing::warn;

use crate::{
    constants::play,
    scenes::play::{font::BannerFont, session::GameState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSize {
    Small,
    Large,
}

#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(pattern = "owned")]
pub struct TextPrompt {
    text: &'static str,
    /// Center, in world units.
    x: f32,
    y: f32,
    size: PromptSize,
    #[builder(default)]
    visible: bool,
    /// Pre-rendered banner rows, when the custom font covers the text.
    #[builder(default)]
    banner: Option<Vec<String>>,
}

impl TextPrompt {
    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn banner(&self) -> Option<&[String]> {
        self.banner.as_deref()
    }
}

/// Text objects created once the font has settled.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompts {
    pub start: TextPrompt,
    pub game_over: TextPrompt,
    pub restart: TextPrompt,
}

impl Prompts {
    pub fn create(font: Option<&BannerFont>, state: GameState) -> Result<Self> {
        let prompt = |text: &'static str, y: f32, size: PromptSize| -> Result<TextPrompt> {
            let banner = match (font, size) {
                (Some(font), PromptSize::Large) => {
                    let banner = font.render(text);
                    if banner.is_none() {
                        warn!(font = %font.name, text, "font is missing glyphs; using plain text");
                    }
                    banner
                },
                _ => None,
            };
            Ok(TextPromptBuilder::default().text(text).x(play::TEXT_X).y(y).size(size).banner(banner).build()?)
        };

        let mut prompts = Prompts {
            start: prompt(play::START_TEXT, play::TEXT_Y, PromptSize::Small)?,
            game_over: prompt(play::GAME_OVER_TEXT, play::TEXT_Y, PromptSize::Large)?,
            restart: prompt(play::RESTART_TEXT, play::RESTART_TEXT_Y, PromptSize::Small)?,
        };
        prompts.sync(state);
        Ok(prompts)
    }

    /// Shows the prompts belonging to `state` and hides the rest.
    pub fn sync(&mut self, state: GameState) {
        self.start.visible = state == GameState::NotStarted;
        self.game_over.visible = state == GameState::GameOver;
        self.restart.visible = state == GameState::GameOver;
    }

    pub fn visible(&self) -> impl Iterator<Item = &TextPrompt> {
        [&self.start, &self.game_over, &self.restart].into_iter().filter(|prompt| prompt.visible)
    }
}
