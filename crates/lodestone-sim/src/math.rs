//! 2D vector and shape primitives with exact narrow-phase tests.
//!
//! Shapes are plain values; every overlap test and every resolution is pure
//! and leaves its operands untouched. `resolve_*` functions return the
//! minimum translation vector (MTV) that pushes the receiver out of the
//! argument, or [`Vec2::ZERO`] when the shapes do not overlap.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` radians.
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit-length copy of `self`.
    ///
    /// The exact zero vector normalizes to itself; callers treat a
    /// zero-length direction as "no direction", never as an error.
    pub fn normalized(self) -> Self {
        if self.x == 0.0 && self.y == 0.0 {
            return Vec2::ZERO;
        }
        self / self.length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = *self - rhs;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, n: f32) -> Vec2 {
        Vec2::new(self.x * n, self.y * n)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;
    fn mul(self, v: Vec2) -> Vec2 {
        v * self
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, n: f32) {
        *self = *self * n;
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, n: f32) -> Vec2 {
        debug_assert!(n != 0.0);
        Vec2::new(self.x / n, self.y / n)
    }
}

impl DivAssign<f32> for Vec2 {
    fn div_assign(&mut self, n: f32) {
        *self = *self / n;
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            w,
            h,
        }
    }

    /// Inclusive bounds test.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x <= self.pos.x + self.w
            && p.y >= self.pos.y
            && p.y <= self.pos.y + self.h
    }

    /// Interval overlap on both axes, edges touching counts as overlap.
    pub fn overlaps(&self, r: &Rect) -> bool {
        self.pos.x <= r.pos.x + r.w
            && self.pos.x + self.w >= r.pos.x
            && self.pos.y <= r.pos.y + r.h
            && self.pos.y + self.h >= r.pos.y
    }

    /// Closest-point test against a circle, compared in squared distance.
    pub fn overlaps_circle(&self, c: &Circle) -> bool {
        let closest = self.clamp_point(c.pos);
        let difference = closest - c.pos;
        difference.dot(difference) <= c.radius * c.radius
    }

    /// MTV pushing this rectangle out of `r`, zero when not overlapping.
    ///
    /// Penetration is measured per axis; the push goes along the axis with
    /// the smaller penetration, toward the side with the smaller overlap.
    /// Ties go to the y axis, and to the right/bottom side, always the same
    /// way.
    pub fn resolve_rect(&self, r: &Rect) -> Vec2 {
        let no_overlap = self.pos.x >= r.pos.x + r.w
            || self.pos.x + self.w <= r.pos.x
            || self.pos.y >= r.pos.y + r.h
            || self.pos.y + self.h <= r.pos.y;
        if no_overlap {
            return Vec2::ZERO;
        }

        let left = (r.pos.x + r.w) - self.pos.x;
        let right = (self.pos.x + self.w) - r.pos.x;
        let top = (r.pos.y + r.h) - self.pos.y;
        let bottom = (self.pos.y + self.h) - r.pos.y;

        let min_x = left.min(right);
        let min_y = top.min(bottom);

        let mut resolution = Vec2::ZERO;
        if min_x < min_y {
            resolution.x = if left < right { -left } else { right };
        } else {
            resolution.y = if top < bottom { -top } else { bottom };
        }
        resolution
    }

    /// MTV pushing this rectangle out of circle `c`, zero when separate.
    pub fn resolve_circle(&self, c: &Circle) -> Vec2 {
        let closest = self.clamp_point(c.pos);
        let difference = closest - c.pos;
        let distance_squared = difference.dot(difference);
        if distance_squared >= c.radius * c.radius {
            return Vec2::ZERO;
        }

        let distance = distance_squared.sqrt();
        if distance == 0.0 {
            // Circle center inside the rectangle: the closest-point normal
            // vanishes, so resolve along the single axis with the smallest
            // center-to-edge distance. That helper computes the push for the
            // circle; the rectangle moves the opposite way.
            return -resolve_contained_center(c.pos, self, c.radius);
        }

        let normal = difference / distance;
        let penetration = c.radius - distance;
        normal * penetration
    }

    fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.pos.x, self.pos.x + self.w),
            p.y.clamp(self.pos.y, self.pos.y + self.h),
        )
    }
}

// ---------------------------------------------------------------------------
// Circle
// ---------------------------------------------------------------------------

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            radius,
        }
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, p: Vec2) -> bool {
        (self.pos - p).length_squared() <= self.radius * self.radius
    }

    /// Closest-point test against a rectangle.
    pub fn overlaps_rect(&self, r: &Rect) -> bool {
        r.overlaps_circle(self)
    }

    /// Center distance against summed radii, touching counts.
    pub fn overlaps(&self, c: &Circle) -> bool {
        let sum = self.radius + c.radius;
        (self.pos - c.pos).length_squared() <= sum * sum
    }

    /// MTV pushing this circle out of rectangle `r`, zero when separate.
    pub fn resolve_rect(&self, r: &Rect) -> Vec2 {
        let closest = r.clamp_point(self.pos);
        let difference = closest - self.pos;
        let distance_squared = difference.dot(difference);
        if distance_squared >= self.radius * self.radius {
            return Vec2::ZERO;
        }

        let distance = distance_squared.sqrt();
        if distance == 0.0 {
            return resolve_contained_center(self.pos, r, self.radius);
        }

        // `difference` points from the circle center toward the rectangle,
        // so the circle moves along the opposite direction.
        let normal = difference / distance;
        let penetration = self.radius - distance;
        normal * -penetration
    }

    /// MTV pushing this circle out of circle `c`, zero when separate.
    ///
    /// Coincident centers have no usable normal; the push then goes along
    /// the positive x axis by the full radius sum, a deterministic choice.
    pub fn resolve_circle(&self, c: &Circle) -> Vec2 {
        let difference = self.pos - c.pos;
        let distance_squared = difference.dot(difference);
        let radius_sum = self.radius + c.radius;
        if distance_squared >= radius_sum * radius_sum {
            return Vec2::ZERO;
        }

        let distance = distance_squared.sqrt();
        if distance == 0.0 {
            return Vec2::new(radius_sum, 0.0);
        }

        let normal = difference / distance;
        let penetration = radius_sum - distance;
        normal * penetration
    }
}

/// Single-axis resolution for a circle whose center sits on or inside `r`.
///
/// Picks the axis and side with the smallest center-to-edge distance and
/// pushes by `radius - edge_distance`. Exact touch when the center lies on
/// the boundary; a center strictly inside undershoots, matching the
/// accumulated-push collision model this feeds into.
fn resolve_contained_center(center: Vec2, r: &Rect, radius: f32) -> Vec2 {
    let left = center.x - r.pos.x;
    let right = r.pos.x + r.w - center.x;
    let top = center.y - r.pos.y;
    let bottom = r.pos.y + r.h - center.y;

    let min_x = left.min(right);
    let min_y = top.min(bottom);

    if min_x < min_y {
        if left < right {
            Vec2::new(-(radius - left), 0.0)
        } else {
            Vec2::new(radius - right, 0.0)
        }
    } else if top < bottom {
        Vec2::new(0.0, -(radius - top))
    } else {
        Vec2::new(0.0, radius - bottom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
