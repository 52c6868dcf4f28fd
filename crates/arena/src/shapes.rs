use crate::types::Vec2;

/// Axis-aligned obstacle rectangle anchored at its minimum corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[must_use]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The rectangle grown by `by` on every side.
    #[must_use]
    pub fn expanded(&self, by: f32) -> Self {
        Self::new(
            self.x - by,
            self.y - by,
            self.width + 2.0 * by,
            self.height + 2.0 * by,
        )
    }

    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Circular goal target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Goal {
    pub pos: Vec2,
    pub radius: f32,
}

impl Goal {
    pub const DEFAULT_RADIUS: f32 = 18.0;

    #[must_use]
    pub const fn new(pos: Vec2, radius: f32) -> Self {
        Self { pos, radius }
    }
}
