//! Arcade-style physics: bodies are axis-aligned boxes positioned by their center.

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> Self {
        Aabb { left: x - width / 2.0, top: y - height / 2.0, right: x + width / 2.0, bottom: y + height / 2.0 }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Touching edges do not count as an overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        spans_overlap(self.left, self.right, other.left, other.right)
            && spans_overlap(self.top, self.bottom, other.top, other.bottom)
    }
}

fn spans_overlap(l1: f32, r1: f32, l2: f32, r2: f32) -> bool {
    l1 < r2 && l2 < r1
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Body { x, y, width, height, ..Default::default() }
    }

    pub fn with_velocity(self, vx: f32, vy: f32) -> Self {
        Body { vx, vy, ..self }
    }

    pub fn with_world_bounds(self) -> Self {
        Body { collide_world_bounds: true, ..self }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.x, self.y, self.width, self.height)
    }

    pub fn stop(&mut self) {
        self.vx = 0.0;
        self.vy = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub gravity: f32,
    pub bounds: Aabb,
}

impl World {
    pub fn new(width: f32, height: f32, gravity: f32) -> Self {
        World { gravity, bounds: Aabb { left: 0.0, top: 0.0, right: width, bottom: height } }
    }

    /// Integrates one body over `dt` seconds. Gravity feeds velocity before position.
    pub fn step(&self, body: &mut Body, dt: f32) {
        if body.allow_gravity {
            body.vy += self.gravity * dt;
        }
        body.x += body.vx * dt;
        body.y += body.vy * dt;

        if body.collide_world_bounds {
            self.clamp(body);
        }
    }

    fn clamp(&self, body: &mut Body) {
        let half_width = body.width / 2.0;
        let half_height = body.height / 2.0;

        if body.x - half_width < self.bounds.left {
            body.x = self.bounds.left + half_width;
            body.vx = 0.0;
        } else if body.x + half_width > self.bounds.right {
            body.x = self.bounds.right - half_width;
            body.vx = 0.0;
        }

        if body.y - half_height < self.bounds.top {
            body.y = self.bounds.top + half_height;
            body.vy = 0.0;
        } else if body.y + half_height > self.bounds.bottom {
            body.y = self.bounds.bottom - half_height;
            body.vy = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_intersects() {
        let a = Aabb::from_center(10.0, 10.0, 10.0, 10.0);
        assert!(a.intersects(&Aabb::from_center(18.0, 12.0, 10.0, 10.0)));
        assert!(!a.intersects(&Aabb::from_center(30.0, 10.0, 10.0, 10.0)));
        // Shared edge at x = 15
        assert!(!a.intersects(&Aabb::from_center(20.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_gravity_only_when_allowed() {
        let world = World::new(900.0, 600.0, 1000.0);
        let mut body = Body::new(100.0, 100.0, 10.0, 10.0);

        world.step(&mut body, 0.5);
        assert_eq!((body.y, body.vy), (100.0, 0.0));

        body.allow_gravity = true;
        world.step(&mut body, 0.5);
        assert_eq!(body.vy, 500.0);
        assert_eq!(body.y, 350.0);
    }

    #[test]
    fn test_velocity_integration() {
        let world = World::new(900.0, 600.0, 1000.0);
        let mut body = Body::new(960.0, 100.0, 52.0, 400.0).with_velocity(-200.0, 0.0);

        world.step(&mut body, 0.25);
        assert_eq!(body.x, 910.0);
        assert_eq!(body.y, 100.0);
    }

    #[test]
    fn test_world_bounds_clamp() {
        let world = World::new(900.0, 600.0, 1000.0);
        let mut body = Body::new(80.0, 20.0, 34.0, 24.0).with_velocity(0.0, -350.0).with_world_bounds();

        world.step(&mut body, 0.1);
        assert_eq!(body.y, 12.0);
        assert_eq!(body.vy, 0.0);
    }
}
