use crate::{components::score_bar::ScoreBar, scenes::play::pipe::Pipes};

/// Score counter and the text element showing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u32,
    display: ScoreBar,
}

impl ScoreTracker {
    pub fn new() -> Self {
        let mut tracker = ScoreTracker { score: 0, display: ScoreBar::default() };
        tracker.refresh();
        tracker
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn display(&self) -> &ScoreBar {
        &self.display
    }

    pub fn increment(&mut self) {
        self.score += 1;
        self.refresh();
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.refresh();
    }

    /// Awards a point for every unscored pipe the bird has passed and marks it scored.
    pub fn check(&mut self, pipes: &mut Pipes, bird_x: f32) -> u32 {
        let mut awarded = 0;
        for pipe in pipes.iter_mut().filter(|pipe| !pipe.scored) {
            if pipe.x() < bird_x {
                pipe.scored = true;
                awarded += 1;
                self.increment();
            }
        }
        awarded
    }

    fn refresh(&mut self) {
        self.display.set_text(format!("Score: {}", self.score));
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_passing_a_pair_scores_once() {
        let mut tracker = ScoreTracker::new();
        let mut pipes = Pipes::new();
        pipes.push_pair(70.0, 300.0);

        assert_eq!(tracker.check(&mut pipes, 80.0), 1);
        assert_eq!(tracker.score(), 1);
        assert_eq!(tracker.display().text(), "Score: 1");
        assert!(pipes.iter().all(|pipe| pipe.scored));

        assert_eq!(tracker.check(&mut pipes, 80.0), 0);
        assert_eq!(tracker.score(), 1);
    }

    #[test]
    fn test_pipe_ahead_of_bird_is_not_scored() {
        let mut tracker = ScoreTracker::new();
        let mut pipes = Pipes::new();
        pipes.push_pair(80.0, 300.0);

        assert_eq!(tracker.check(&mut pipes, 80.0), 0);
        assert_eq!(tracker.display().text(), "Score: 0");
    }

    #[test]
    fn test_reset_refreshes_display() {
        let mut tracker = ScoreTracker::new();
        tracker.increment();
        tracker.increment();
        assert_eq!(tracker.display().text(), "Score: 2");

        tracker.reset();
        assert_eq!(tracker.score(), 0);
        assert_eq!(tracker.display().text(), "Score: 0");
    }
}
