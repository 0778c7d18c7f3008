//! The one scene of the game.
//!
//! Setup happens in two phases. Sprites, bodies and the session exist as soon as the scene is
//! built; the text prompts only appear once the banner font load has finished or given up.

pub mod assets;
pub mod bird;
pub mod font;
pub mod physics;
pub mod pipe;
pub mod prompts;
pub mod score;
pub mod session;
pub mod spawner;
pub mod view;

use std::{collections::HashMap, path::PathBuf, time::Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, style::Style, widgets::Widget, Frame};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, trace};

use self::{
    assets::Assets,
    font::{spawn_font_load, FontLoad},
    pipe::Segment,
    prompts::{Prompts, TextPrompt},
    session::{GameSession, Transition},
    view::{fill_stretched, fill_tiled, paint_sprite, Viewport},
};
use super::{Scene, SceneId};
use crate::{
    action::{act, Action, ActionState, Command, PlayAction},
    components::{
        background::{Background, BackgroundState},
        multiline::MultiLine,
    },
    config::{binding_key, Config, SceneKeyBindings},
    constants::{background, play},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Background,
    Pipes,
    Road,
    Bird,
    Text,
}

impl Layer {
    fn depth(self) -> u8 {
        match self {
            Layer::Background => play::DEPTH_BACKGROUND,
            Layer::Pipes => play::DEPTH_PIPE,
            Layer::Road => play::DEPTH_ROAD,
            Layer::Bird => play::DEPTH_BIRD,
            Layer::Text => play::DEPTH_TEXT,
        }
    }

    /// Back to front.
    fn ordered() -> [Layer; 5] {
        let mut layers = [Layer::Text, Layer::Bird, Layer::Road, Layer::Pipes, Layer::Background];
        layers.sort_by_key(|layer| layer.depth());
        layers
    }
}

pub struct PlayScene {
    font_path: Option<PathBuf>,
    assets: Assets,
    background_state: BackgroundState,
    session: GameSession,
    prompts: Option<Prompts>,
    setup: Option<oneshot::Receiver<FontLoad>>,
    keymap: SceneKeyBindings,
    clock: Instant,
    /// Wall time of the last tick, in milliseconds since `clock` started.
    last_tick: f64,
    /// Game time in milliseconds. Only advances by clamped frame steps, so it stands still
    /// while the scene receives no ticks.
    now: f64,
}

impl PlayScene {
    pub fn new() -> Self {
        PlayScene {
            font_path: None,
            assets: Assets::load(),
            background_state: BackgroundState::new(),
            session: GameSession::new(),
            prompts: None,
            setup: None,
            keymap: SceneKeyBindings::default(),
            clock: Instant::now(),
            last_tick: 0.0,
            now: 0.0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn prompts(&self) -> Option<&Prompts> {
        self.prompts.as_ref()
    }

    fn poll_setup(&mut self) -> Result<()> {
        let Some(rx) = self.setup.as_mut() else { return Ok(()) };
        let load = match rx.try_recv() {
            Ok(load) => load,
            Err(TryRecvError::Empty) => return Ok(()),
            Err(TryRecvError::Closed) => FontLoad::Fallback,
        };
        self.setup = None;
        self.complete_setup(load)
    }

    /// Second setup phase. Runs once, whichever way the font load ended.
    fn complete_setup(&mut self, load: FontLoad) -> Result<()> {
        if self.prompts.is_some() {
            return Ok(());
        }
        let prompts = Prompts::create(load.font(), self.session.state())?;
        debug!(banner = load.font().is_some(), state = %self.session.state(), "created prompts");
        self.prompts = Some(prompts);
        Ok(())
    }

    /// Advances the game by `elapsed_ms` of wall time, at most one maximal step.
    fn frame(&mut self, elapsed_ms: f64) {
        let dt = elapsed_ms.clamp(0.0, play::MAX_STEP_MS);
        self.now += dt;

        if let Some(transition) = self.session.step(dt) {
            self.apply_transition(transition);
        }
        self.background_state.scroll(play::BACKGROUND_SCROLL);

        let report = self.session.update(self.now);
        if report != Default::default() {
            trace!(?report, "frame");
        }
    }

    fn flap(&mut self) {
        if let Some(transition) = self.session.flap(self.now) {
            self.apply_transition(transition);
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        // Prompts do not exist until setup has completed.
        if let Some(prompts) = self.prompts.as_mut() {
            prompts.sync(transition.to);
        }
    }

    fn draw_layer(&mut self, layer: Layer, f: &mut Frame<'_>, viewport: &Viewport) {
        match layer {
            Layer::Background => f.render_stateful_widget(
                Background::new(&self.assets.background, viewport.scale_x()),
                viewport.area(),
                &mut self.background_state,
            ),
            Layer::Pipes => self.draw_pipes(f, viewport),
            Layer::Road => {
                let Some(rect) = viewport.project(&self.session.road().bounds()) else { return };
                let style = Style::default().fg(background::ROAD_COLOR);
                fill_tiled(f.buffer_mut(), rect, &self.assets.road, 0, style);
            },
            Layer::Bird => {
                let bird = self.session.bird();
                let Some(sprite) = self.assets.bird_frame(bird.pose().frame()) else { return };
                let origin = viewport.centered_origin(bird.body.x, bird.body.y, sprite.width, sprite.height);
                let style = Style::default().fg(background::BIRD_COLOR);
                paint_sprite(f.buffer_mut(), viewport.area(), origin, sprite, style);
            },
            Layer::Text => {
                let Some(prompts) = self.prompts.as_ref() else { return };
                for prompt in prompts.visible() {
                    draw_prompt(f, viewport, prompt);
                }
            },
        }
    }

    fn draw_pipes(&self, f: &mut Frame<'_>, viewport: &Viewport) {
        let sprite = &self.assets.pipe;
        let (body, cap) = match (sprite.lines.first(), sprite.lines.get(1)) {
            (Some(body), Some(cap)) => (body.as_str(), cap.as_str()),
            _ => return,
        };
        let body_style = Style::default().fg(background::PIPE_COLOR);
        let cap_style = Style::default().fg(background::PIPE_CAP_COLOR);

        for pipe in self.session.pipes().iter() {
            let bounds = pipe.body.bounds();
            let Some(rect) = viewport.project(&bounds) else { continue };
            let (left, right) = viewport.span_x(&bounds);
            let full_width = (right - left) as u16;
            let skip = (rect.x as i32 - left).max(0) as u16;

            fill_stretched(f.buffer_mut(), rect, full_width, skip, body, body_style);
            // The cap sits on the edge facing the gap.
            let cap_y = match pipe.segment {
                Segment::Top => rect.bottom() - 1,
                Segment::Bottom => rect.top(),
            };
            let cap_rect = Rect { y: cap_y, height: 1, ..rect };
            fill_stretched(f.buffer_mut(), cap_rect, full_width, skip, cap, cap_style);
        }
    }
}

impl Default for PlayScene {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_prompt(f: &mut Frame<'_>, viewport: &Viewport, prompt: &TextPrompt) {
    let (x, y) = prompt.position();
    let style = Style::default().fg(background::TEXT_COLOR);
    match prompt.banner() {
        Some(rows) => {
            let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u16;
            let Some(rect) = viewport.centered(x, y, width, rows.len() as u16) else { return };
            MultiLine::new(rows.to_vec()).ignore_whitespace(true).pixel_mode().style(style).render(rect, f.buffer_mut());
        },
        None => {
            let text = prompt.text();
            let Some(rect) = viewport.centered(x, y, text.chars().count() as u16, 1) else { return };
            MultiLine::new(vec![text]).style(style).render(rect, f.buffer_mut());
        },
    }
}

impl Scene for PlayScene {
    fn id(&self) -> SceneId {
        SceneId::Play
    }

    fn register_keymap(&mut self, keymaps: &HashMap<SceneId, SceneKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        debug!(bindings = self.keymap.len(), "registered play keymap");
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.font_path = Some(config.font_path());
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        self.clock = Instant::now();
        self.last_tick = 0.0;
        self.now = 0.0;
        match self.font_path.clone() {
            Some(path) => self.setup = Some(spawn_font_load(path)),
            None => self.complete_setup(FontLoad::Fallback)?,
        }
        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(self.keymap.get(&binding_key(key)).cloned())
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Ok(Some(act!(Command::Play(PlayAction::Flap)))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match (action.command, action.state) {
            (Command::Tick, _) => {
                self.poll_setup()?;
                let wall = self.clock.elapsed().as_secs_f64() * 1000.0;
                let elapsed = wall - self.last_tick;
                self.last_tick = wall;
                self.frame(elapsed);
            },
            // Hold bindings also report repeat and release; only the press flaps.
            (Command::Play(PlayAction::Flap), ActionState::Start) => self.flap(),
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let viewport = Viewport::new(area);
        for layer in Layer::ordered() {
            self.draw_layer(layer, f, &viewport);
        }
        Ok(())
    }

    fn draw_status(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        f.render_widget(self.session.score().display(), area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::*;
    use crate::scenes::play::session::GameState;

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    fn render(scene: &mut PlayScene) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                scene.draw(f, area).unwrap();
            })
            .unwrap();
        rows(terminal.backend().buffer())
    }

    fn ready_scene() -> PlayScene {
        let mut scene = PlayScene::new();
        scene.complete_setup(FontLoad::Fallback).unwrap();
        scene
    }

    fn flap() -> Action {
        act!(Command::Play(PlayAction::Flap))
    }

    #[test]
    fn test_layers_back_to_front() {
        assert_eq!(Layer::ordered(), [Layer::Background, Layer::Pipes, Layer::Road, Layer::Bird, Layer::Text]);
    }

    #[test]
    fn test_start_prompt_shown_before_first_flap() {
        let mut scene = ready_scene();
        let screen = render(&mut scene);

        assert!(screen.iter().any(|row| row.contains(play::START_TEXT)));
        assert!(!screen.iter().any(|row| row.contains(play::GAME_OVER_TEXT)));
    }

    #[test]
    fn test_flap_starts_and_hides_prompt() {
        let mut scene = ready_scene();
        scene.update(flap()).unwrap();

        assert_eq!(scene.session().state(), GameState::Playing);
        let screen = render(&mut scene);
        assert!(!screen.iter().any(|row| row.contains(play::START_TEXT)));
    }

    #[test]
    fn test_held_key_does_not_flap_again() {
        let mut scene = ready_scene();
        scene.update(flap()).unwrap();
        scene.session.bird_mut().body.vy = 100.0;

        scene.update(act!(Command::Play(PlayAction::Flap), ActionState::Repeat)).unwrap();
        scene.update(act!(Command::Play(PlayAction::Flap), ActionState::End)).unwrap();
        assert_eq!(scene.session().bird().body.vy, 100.0);

        scene.update(flap()).unwrap();
        assert_eq!(scene.session().bird().body.vy, play::FLAP_VELOCITY);
    }

    #[test]
    fn test_game_over_shows_both_prompts() {
        let mut scene = ready_scene();
        scene.update(flap()).unwrap();
        // Drop the bird onto the road.
        scene.session.bird_mut().body.y = play::ROAD_Y - 10.0;
        scene.frame(16.0);

        assert_eq!(scene.session().state(), GameState::GameOver);
        let screen = render(&mut scene);
        assert!(screen.iter().any(|row| row.contains(play::GAME_OVER_TEXT)));
        assert!(screen.iter().any(|row| row.contains(play::RESTART_TEXT)));

        scene.update(flap()).unwrap();
        assert_eq!(scene.session().state(), GameState::NotStarted);
        let screen = render(&mut scene);
        assert!(screen.iter().any(|row| row.contains(play::START_TEXT)));
    }

    #[test]
    fn test_transitions_before_setup_are_ignored() {
        let mut scene = PlayScene::new();
        scene.update(flap()).unwrap();
        assert_eq!(scene.prompts(), None);

        // Prompts created late still match the current state.
        scene.complete_setup(FontLoad::Fallback).unwrap();
        let prompts = scene.prompts().unwrap();
        assert!(!prompts.start.is_visible());
        assert!(!prompts.game_over.is_visible());
    }

    #[test]
    fn test_background_scrolls_every_frame() {
        let mut scene = ready_scene();
        scene.frame(16.0);
        scene.frame(32.0);
        assert_eq!(scene.background_state.tile_position_x(), 1.0);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut scene = ready_scene();
        scene.update(flap()).unwrap();
        scene.frame(1000.0);

        // One 50ms step from the flap velocity, not a full second of falling.
        let vy = scene.session().bird().body.vy;
        assert_eq!(vy, play::FLAP_VELOCITY + play::GRAVITY * 0.05);
    }

    #[test]
    fn test_pause_does_not_advance_spawn_timer() {
        let mut scene = ready_scene();
        scene.update(flap()).unwrap();
        while scene.session().pipes().is_empty() {
            scene.frame(16.0);
            // Keep the bird in the air.
            scene.session.bird_mut().body.y = play::BIRD_INITIAL_Y;
        }
        let spawned_at = scene.now;

        // A tick arriving long after the previous one, as after help or a suspend.
        scene.frame(1600.0);
        assert_eq!(scene.now, spawned_at + play::MAX_STEP_MS);
        assert_eq!(scene.session().pipes().len(), 2);

        let xs: Vec<f32> = scene.session().pipes().iter().map(|pipe| pipe.x()).collect();
        assert!(xs.iter().all(|x| *x < play::PIPE_SPAWN_X));
    }

    #[test]
    fn test_registered_keymap_maps_keys() {
        let config = Config::new().unwrap();
        let mut scene = ready_scene();
        scene.register_keymap(&config.keybindings.scenes).unwrap();

        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(scene.handle_key_events(space).unwrap(), Some(flap()));

        let released = KeyEvent::new_with_kind(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(
            scene.handle_key_events(released).unwrap(),
            Some(act!(Command::Play(PlayAction::Flap), ActionState::End))
        );

        let unbound = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(scene.handle_key_events(unbound).unwrap(), None);
    }

    #[test]
    fn test_left_click_flaps() {
        let mut scene = ready_scene();
        let click =
            MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column: 3, row: 4, modifiers: KeyModifiers::NONE };
        assert_eq!(scene.handle_mouse_events(click).unwrap(), Some(flap()));

        let release = MouseEvent { kind: MouseEventKind::Up(MouseButton::Left), ..click };
        assert_eq!(scene.handle_mouse_events(release).unwrap(), None);
    }

    #[test]
    fn test_status_shows_score() {
        let mut scene = ready_scene();
        scene.update(flap()).unwrap();
        // Three pairs already behind the bird.
        for x in [10.0, 30.0, 50.0] {
            scene.session.pipes_mut().push_pair(x, 300.0);
        }
        assert_eq!(scene.session.update(0.0).scored, 3);

        let mut terminal = Terminal::new(TestBackend::new(20, 1)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                scene.draw_status(f, area).unwrap();
            })
            .unwrap();
        assert_eq!(rows(terminal.backend().buffer()), vec!["      Score: 3      ".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_font_falls_back_to_plain_text() {
        let mut scene = PlayScene::new();
        scene.font_path = Some(PathBuf::from("/nonexistent/font.json"));
        scene.init().unwrap();

        let load = scene.setup.take().unwrap().await.unwrap();
        assert_eq!(load, FontLoad::Fallback);
        scene.complete_setup(load).unwrap();

        let prompts = scene.prompts().unwrap();
        assert_eq!(prompts.game_over.banner(), None);
        assert!(prompts.start.is_visible());
    }
}
