use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector in world units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along a heading given in degrees.
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        let rad = degrees.to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Wrap an angle into `[0, 360)` degrees.
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Wrap an angle into `[-180, 180)` degrees. Used for relative bearings and
/// for summing signed heading deltas across the 0/360 seam.
#[must_use]
pub fn wrap_relative_degrees(degrees: f32) -> f32 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_degrees_handles_negative_input() {
        assert!((wrap_degrees(-10.0) - 350.0).abs() < 1e-6);
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-6);
        assert!(wrap_degrees(360.0).abs() < 1e-6);
    }

    #[test]
    fn wrap_relative_crosses_the_seam() {
        // 350 -> 10 is a +20 degree turn, not -340.
        let delta = wrap_relative_degrees(10.0 - 350.0);
        assert!((delta - 20.0).abs() < 1e-6);
        let delta = wrap_relative_degrees(350.0 - 10.0);
        assert!((delta + 20.0).abs() < 1e-6);
    }

    #[test]
    fn from_degrees_is_unit_length() {
        for deg in [0.0, 45.0, 133.0, 270.0] {
            let v = Vec2::from_degrees(deg);
            assert!((v.length() - 1.0).abs() < 1e-6);
        }
    }
}
