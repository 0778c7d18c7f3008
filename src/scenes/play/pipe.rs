use crate::{constants::play, scenes::play::physics::Body};

pub type PipeId = u64;
pub type PairId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Top,
    Bottom,
}

/// One half of a pipe pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub id: PipeId,
    pub pair: PairId,
    pub segment: Segment,
    pub body: Body,
    /// Only the top segment starts unscored, so a pair is counted once.
    pub scored: bool,
}

impl Pipe {
    /// Lower edge sits at `gap_center - PIPE_GAP / 2`.
    pub fn top(id: PipeId, pair: PairId, x: f32, gap_center: f32) -> Self {
        let y = gap_center - play::PIPE_GAP / 2.0 - play::PIPE_HEIGHT / 2.0;
        Pipe { id, pair, segment: Segment::Top, body: Self::body(x, y), scored: false }
    }

    /// Upper edge sits at `gap_center + PIPE_GAP / 2`.
    pub fn bottom(id: PipeId, pair: PairId, x: f32, gap_center: f32) -> Self {
        let y = gap_center + play::PIPE_GAP / 2.0 + play::PIPE_HEIGHT / 2.0;
        Pipe { id, pair, segment: Segment::Bottom, body: Self::body(x, y), scored: true }
    }

    fn body(x: f32, y: f32) -> Body {
        Body::new(x, y, play::PIPE_WIDTH, play::PIPE_HEIGHT).with_velocity(play::PIPE_VELOCITY, 0.0)
    }

    pub fn x(&self) -> f32 {
        self.body.x
    }
}

/// Pipes currently on screen, in creation order.
#[derive(Debug, Clone, Default)]
pub struct Pipes {
    pipes: Vec<Pipe>,
    next_pipe: PipeId,
    next_pair: PairId,
}

impl Pipes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pair(&mut self, x: f32, gap_center: f32) -> PairId {
        let pair = self.next_pair;
        self.next_pair += 1;

        let top = Pipe::top(self.next_pipe, pair, x, gap_center);
        let bottom = Pipe::bottom(self.next_pipe + 1, pair, x, gap_center);
        self.next_pipe += 2;

        self.pipes.push(top);
        self.pipes.push(bottom);
        pair
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pipe> {
        self.pipes.iter_mut()
    }

    pub fn pair(&self, pair: PairId) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter().filter(move |pipe| pipe.pair == pair)
    }

    /// Drops every pipe left of `threshold` and returns how many went.
    pub fn cull(&mut self, threshold: f32) -> usize {
        let before = self.pipes.len();
        self.pipes.retain(|pipe| pipe.x() >= threshold);
        before - self.pipes.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.pipes.len();
        self.pipes.clear();
        removed
    }

    /// Zeroes every horizontal velocity.
    pub fn freeze(&mut self) {
        for pipe in self.pipes.iter_mut() {
            pipe.body.vx = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_pair_geometry() {
        let mut pipes = Pipes::new();
        let pair = pipes.push_pair(960.0, 300.0);

        let segments: Vec<&Pipe> = pipes.pair(pair).collect();
        assert_eq!(segments.len(), 2);

        let (top, bottom) = (segments[0], segments[1]);
        assert_eq!(top.segment, Segment::Top);
        assert_eq!(top.body.bounds().bottom, 240.0);
        assert!(!top.scored);

        assert_eq!(bottom.segment, Segment::Bottom);
        assert_eq!(bottom.body.bounds().top, 360.0);
        assert!(bottom.scored);

        assert_eq!(top.x(), bottom.x());
        assert_eq!(top.body.vx, play::PIPE_VELOCITY);
        assert!(!top.body.allow_gravity && !bottom.body.allow_gravity);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut pipes = Pipes::new();
        let first = pipes.push_pair(960.0, 200.0);
        let second = pipes.push_pair(960.0, 400.0);
        assert_ne!(first, second);

        let ids: Vec<PipeId> = pipes.iter().map(|pipe| pipe.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cull_removes_once() {
        let mut pipes = Pipes::new();
        pipes.push_pair(-60.0, 200.0);
        pipes.push_pair(400.0, 300.0);

        assert_eq!(pipes.cull(play::PIPE_CULL_X), 2);
        assert_eq!(pipes.cull(play::PIPE_CULL_X), 0);
        assert_eq!(pipes.len(), 2);
        assert!(pipes.iter().all(|pipe| pipe.x() >= play::PIPE_CULL_X));
    }

    #[test]
    fn test_freeze_and_clear() {
        let mut pipes = Pipes::new();
        pipes.push_pair(500.0, 300.0);
        pipes.freeze();
        assert!(pipes.iter().all(|pipe| pipe.body.vx == 0.0));

        assert_eq!(pipes.clear(), 2);
        assert!(pipes.is_empty());
    }
}
