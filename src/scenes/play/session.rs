//! Game session: the state machine tying bird, pipes, spawner and score together.
//!
//! Nothing in here knows about the terminal. The scene feeds it frame times in milliseconds
//! and flap inputs, and reads back the state to draw.

use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::Display;
use tracing::debug;

use crate::{
    constants::play,
    scenes::play::{
        bird::Bird,
        physics::{Body, World},
        pipe::{PairId, Pipes},
        score::ScoreTracker,
        spawner::Spawner,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum GameState {
    #[default]
    NotStarted,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GameState,
    pub to: GameState,
}

/// What happened during one call to [`GameSession::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: Option<PairId>,
    pub culled: usize,
    pub scored: u32,
}

pub struct GameSession<R = StdRng> {
    state: GameState,
    world: World,
    bird: Bird,
    road: Body,
    pipes: Pipes,
    spawner: Spawner,
    score: ScoreTracker,
    rng: R,
}

impl GameSession<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for GameSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(rng: R) -> Self {
        GameSession {
            state: GameState::NotStarted,
            world: World::new(play::WIDTH, play::HEIGHT, play::GRAVITY),
            bird: Bird::new(),
            road: Body::new(play::ROAD_X, play::ROAD_Y, play::ROAD_WIDTH, play::ROAD_HEIGHT),
            pipes: Pipes::new(),
            spawner: Spawner::default(),
            score: ScoreTracker::new(),
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    pub fn road(&self) -> &Body {
        &self.road
    }

    pub fn pipes(&self) -> &Pipes {
        &self.pipes
    }

    pub fn pipes_mut(&mut self) -> &mut Pipes {
        &mut self.pipes
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    /// Handles one flap input. Returns the transition it caused, if any.
    pub fn flap(&mut self, now: f64) -> Option<Transition> {
        match self.state {
            GameState::NotStarted => Some(self.start(now)),
            GameState::Playing => {
                self.bird.flap();
                None
            },
            GameState::GameOver => Some(self.restart()),
        }
    }

    fn start(&mut self, now: f64) -> Transition {
        self.bird.body.allow_gravity = true;
        self.bird.flap();
        self.spawner.reset(now);
        self.transition(GameState::Playing)
    }

    fn restart(&mut self) -> Transition {
        let removed = self.pipes.clear();
        self.bird.reset();
        self.score.reset();
        debug!(removed, "cleared pipes");
        self.transition(GameState::NotStarted)
    }

    /// Ends the run. A no-op unless the game is being played.
    pub fn game_over(&mut self) -> Option<Transition> {
        if self.state != GameState::Playing {
            return None;
        }
        self.pipes.freeze();
        self.bird.freeze();
        Some(self.transition(GameState::GameOver))
    }

    pub fn is_colliding(&self) -> bool {
        let bird = self.bird.body.bounds();
        bird.intersects(&self.road.bounds()) || self.pipes.iter().any(|pipe| bird.intersects(&pipe.body.bounds()))
    }

    /// Advances physics by `dt_ms` and reports a collision as a transition to game over.
    pub fn step(&mut self, dt_ms: f64) -> Option<Transition> {
        let dt = (dt_ms / 1000.0) as f32;
        self.world.step(&mut self.bird.body, dt);
        for pipe in self.pipes.iter_mut() {
            self.world.step(&mut pipe.body, dt);
        }

        if self.is_colliding() {
            self.game_over()
        } else {
            None
        }
    }

    /// Per-frame game logic at time `now`: rotation, spawning, culling and scoring.
    pub fn update(&mut self, now: f64) -> FrameReport {
        let mut report = FrameReport::default();
        let playing = self.state == GameState::Playing;

        if playing {
            self.bird.update_rotation();
            report.spawned = self.spawner.tick(now, &mut self.rng, &mut self.pipes);
        }

        report.culled = self.pipes.cull(play::PIPE_CULL_X);

        if playing {
            report.scored = self.score.check(&mut self.pipes, self.bird.body.x);
        }

        report
    }

    fn transition(&mut self, to: GameState) -> Transition {
        let from = self.state;
        self.state = to;
        debug!(%from, %to, score = self.score.score(), "state transition");
        Transition { from, to }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_debug_snapshot;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;

    use super::*;
    use crate::scenes::play::pipe::Segment;

    fn session() -> GameSession<StdRng> {
        GameSession::with_rng(StdRng::seed_from_u64(3))
    }

    fn playing_at(now: f64) -> GameSession<StdRng> {
        let mut session = session();
        session.flap(now);
        session
    }

    #[test]
    fn test_first_flap_starts() {
        let mut session = session();
        assert_eq!(session.state(), GameState::NotStarted);
        assert!(!session.bird().body.allow_gravity);

        let transition = session.flap(250.0);
        assert_eq!(transition, Some(Transition { from: GameState::NotStarted, to: GameState::Playing }));
        assert!(session.bird().body.allow_gravity);
        assert_eq!(session.bird().body.vy, play::FLAP_VELOCITY);
        assert_eq!(session.spawner.last_spawn(), 250.0);
    }

    #[test]
    fn test_later_flaps_only_set_velocity() {
        let mut session = playing_at(0.0);
        for now in [10.0, 20.0, 30.0] {
            session.bird_mut().body.vy = 120.0;
            assert_eq!(session.flap(now), None);
            assert_eq!(session.state(), GameState::Playing);
            assert_eq!(session.bird().body.vy, play::FLAP_VELOCITY);
        }
        assert_eq!(session.spawner.last_spawn(), 0.0);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut session = playing_at(0.0);
        session.pipes_mut().push_pair(500.0, 300.0);

        assert_eq!(session.game_over(), Some(Transition { from: GameState::Playing, to: GameState::GameOver }));
        assert!(session.pipes().iter().all(|pipe| pipe.body.vx == 0.0));
        assert_eq!((session.bird().body.vx, session.bird().body.vy), (0.0, 0.0));
        assert!(!session.bird().body.allow_gravity);

        assert_eq!(session.game_over(), None);
        assert_debug_snapshot!(session.state(), @"GameOver");
        assert!(session.pipes().iter().all(|pipe| pipe.body.vx == 0.0));
    }

    #[test]
    fn test_collision_needs_a_running_game() {
        let mut session = session();
        assert_eq!(session.game_over(), None);
        assert_eq!(session.state(), GameState::NotStarted);
    }

    #[test]
    fn test_hitting_a_pipe_ends_the_game() {
        let mut session = playing_at(0.0);
        // Gap well below the bird, so the top segment covers it.
        session.pipes_mut().push_pair(play::BIRD_INITIAL_X, 500.0);

        let transition = session.step(16.0);
        assert_eq!(transition.map(|t| t.to), Some(GameState::GameOver));
        assert_eq!(session.step(16.0), None);
    }

    #[test]
    fn test_falling_onto_the_road_ends_the_game() {
        let mut session = playing_at(0.0);
        let mut transitions = Vec::new();
        for _ in 0..200 {
            if let Some(transition) = session.step(16.0) {
                transitions.push(transition.to);
            }
        }
        assert_eq!(transitions, vec![GameState::GameOver]);
        assert!(session.bird().body.bounds().bottom > session.road().bounds().top);
    }

    #[test]
    fn test_pipes_spawn_only_while_playing() {
        let mut session = session();
        assert_eq!(session.update(5000.0).spawned, None);

        session.flap(5000.0);
        assert_eq!(session.update(6500.0).spawned, None);
        assert_eq!(session.update(6501.0).spawned, Some(0));
        assert_eq!(session.pipes().len(), 2);

        session.game_over();
        assert_eq!(session.update(9000.0).spawned, None);
    }

    #[test]
    fn test_scoring_when_bird_passes_top_segment() {
        let mut session = playing_at(0.0);
        session.pipes_mut().push_pair(70.0, 300.0);

        let report = session.update(100.0);
        assert_eq!(report.scored, 1);
        assert_eq!(session.score().score(), 1);
        assert_eq!(session.score().display().text(), "Score: 1");

        assert_eq!(session.update(116.0).scored, 0);
        assert_eq!(session.score().score(), 1);
    }

    #[test]
    fn test_bottom_segment_never_scores() {
        let mut session = playing_at(0.0);
        session.pipes_mut().push_pair(70.0, 300.0);
        for pipe in session.pipes_mut().iter_mut().filter(|pipe| pipe.segment == Segment::Top) {
            pipe.scored = true;
        }
        assert_eq!(session.update(100.0).scored, 0);
        assert_eq!(session.score().score(), 0);
    }

    #[test]
    fn test_score_frozen_during_game_over() {
        let mut session = playing_at(0.0);
        for x in [70.0, 60.0, 50.0] {
            session.pipes_mut().push_pair(x, 300.0);
        }
        session.update(10.0);
        assert_eq!(session.score().display().text(), "Score: 3");

        session.game_over();
        session.pipes_mut().push_pair(40.0, 300.0);
        session.update(20.0);
        assert_eq!(session.score().display().text(), "Score: 3");

        session.flap(30.0);
        assert_eq!(session.score().display().text(), "Score: 0");
    }

    #[test]
    fn test_restart_is_a_total_reset() {
        let mut session = playing_at(0.0);
        session.update(1501.0);
        session.pipes_mut().push_pair(70.0, 300.0);
        session.update(1502.0);
        for _ in 0..10 {
            session.step(16.0);
        }
        session.game_over();
        assert!(session.score().score() > 0);

        let transition = session.flap(2000.0);
        assert_eq!(transition, Some(Transition { from: GameState::GameOver, to: GameState::NotStarted }));
        assert_eq!(session.score().score(), 0);
        assert!(session.pipes().is_empty());
        assert_eq!(session.bird(), &Bird::new());
        assert!(!session.bird().body.allow_gravity);
    }

    #[test]
    fn test_offscreen_pipes_are_culled() {
        let mut session = playing_at(0.0);
        session.pipes_mut().push_pair(-40.0, 300.0);

        // 16 ms at -200 units/s moves the pipes 3.2 units left.
        session.step(16.0);
        assert_eq!(session.update(16.0).culled, 0);
        for _ in 0..3 {
            session.step(16.0);
        }
        assert_eq!(session.update(64.0).culled, 2);
        assert_eq!(session.update(80.0).culled, 0);
        assert!(session.pipes().is_empty());
    }
}
