use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance shared by every near-equality check in layout and geometry code.
pub const EPSILON: f32 = 1e-3;

pub fn near_zero(v: f32) -> bool {
    v.abs() <= EPSILON
}

pub fn near_equal(a: f32, b: f32) -> bool {
    near_zero(a - b)
}

/// `a < b` by more than [`EPSILON`].
pub fn less_not_equal(a: f32, b: f32) -> bool {
    b - a > EPSILON
}

/// `a > b` by more than [`EPSILON`].
pub fn great_not_equal(a: f32, b: f32) -> bool {
    a - b > EPSILON
}

pub fn great_or_equal(a: f32, b: f32) -> bool {
    a > b || near_equal(a, b)
}

pub fn less_or_equal(a: f32, b: f32) -> bool {
    a < b || near_equal(a, b)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    pub fn near_equal(self, other: Vec2) -> bool {
        near_equal(self.x, other.x) && near_equal(self.y, other.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn near_equal(self, other: Size) -> bool {
        near_equal(self.width, other.width) && near_equal(self.height, other.height)
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square bounding box of a circle.
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self {
            x: center.x - radius,
            y: center.y - radius,
            w: radius * 2.0,
            h: radius * 2.0,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn inflate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x - dx,
            y: self.y - dy,
            w: self.w + dx * 2.0,
            h: self.h + dy * 2.0,
        }
    }
}
