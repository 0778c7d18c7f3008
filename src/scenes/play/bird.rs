use crate::{constants::play, scenes::play::physics::Body};

/// Sprite frame picked from the bird's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Climbing,
    Gliding,
    Diving,
}

impl Pose {
    pub fn frame(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub body: Body,
    /// Rotation in degrees, positive is nose down.
    pub angle: f32,
}

impl Bird {
    pub fn new() -> Self {
        let body = Body::new(play::BIRD_INITIAL_X, play::BIRD_INITIAL_Y, play::BIRD_WIDTH, play::BIRD_HEIGHT)
            .with_world_bounds();
        Bird { body, angle: 0.0 }
    }

    pub fn flap(&mut self) {
        self.body.vy = play::FLAP_VELOCITY;
    }

    pub fn update_rotation(&mut self) {
        self.angle = (self.body.vy / play::ROTATION_DIVISOR).clamp(play::ROTATION_MIN, play::ROTATION_MAX);
    }

    /// Stops the bird where it is.
    pub fn freeze(&mut self) {
        self.body.allow_gravity = false;
        self.body.stop();
    }

    /// Back to the spawn point, level and weightless.
    pub fn reset(&mut self) {
        self.body.x = play::BIRD_INITIAL_X;
        self.body.y = play::BIRD_INITIAL_Y;
        self.body.stop();
        self.body.allow_gravity = false;
        self.angle = 0.0;
    }

    pub fn pose(&self) -> Pose {
        if self.angle < -10.0 {
            Pose::Climbing
        } else if self.angle > 30.0 {
            Pose::Diving
        } else {
            Pose::Gliding
        }
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_rotation_is_clamped() {
        let mut bird = Bird::new();

        bird.body.vy = -350.0;
        bird.update_rotation();
        assert_eq!(bird.angle, -30.0);
        assert_eq!(bird.pose(), Pose::Climbing);

        bird.body.vy = 200.0;
        bird.update_rotation();
        assert_eq!(bird.angle, 20.0);
        assert_eq!(bird.pose(), Pose::Gliding);

        bird.body.vy = 2000.0;
        bird.update_rotation();
        assert_eq!(bird.angle, 90.0);
        assert_eq!(bird.pose(), Pose::Diving);
    }

    #[test]
    fn test_reset() {
        let mut bird = Bird::new();
        bird.body.allow_gravity = true;
        bird.body.x = 120.0;
        bird.body.y = 42.0;
        bird.body.vy = 300.0;
        bird.angle = 30.0;

        bird.reset();
        assert_eq!(bird, Bird::new());
    }
}
