#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are in logical points (f64), origin at the top-left of the
//! viewport, `y` growing downward.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }
}

/// A displacement or velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// A purely vertical vector.
    #[inline]
    pub const fn vertical(dy: f64) -> Self {
        Self { dx: 0.0, dy }
    }

    /// Magnitude.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Whether both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }

    /// Drop the horizontal component.
    #[inline]
    #[must_use]
    pub fn vertical_only(self) -> Self {
        Self::vertical(self.dy)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl AddAssign<Vector> for Point {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.dx += rhs.dx;
        self.dy += rhs.dy;
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.dx * rhs, self.dy * rhs)
    }
}

/// Width and height of a viewport or view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Sizes with a zero, negative, or non-finite dimension are degenerate:
    /// nothing meaningful can be laid out inside them.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// A rectangle for view frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_minus_point_is_vector() {
        let v = Point::new(3.0, 10.0) - Point::new(1.0, 4.0);
        assert_eq!(v, Vector::new(2.0, 6.0));
    }

    #[test]
    fn point_plus_vector() {
        let mut p = Point::new(1.0, 1.0);
        p += Vector::new(0.5, -2.0);
        assert_eq!(p, Point::new(1.5, -1.0));
    }

    #[test]
    fn vector_length() {
        assert!((Vector::new(3.0, 4.0).length() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn vertical_only_drops_dx() {
        assert_eq!(Vector::new(12.0, -3.0).vertical_only(), Vector::vertical(-3.0));
    }

    #[test]
    fn degenerate_sizes() {
        assert!(Size::ZERO.is_degenerate());
        assert!(Size::new(100.0, 0.0).is_degenerate());
        assert!(Size::new(f64::NAN, 10.0).is_degenerate());
        assert!(Size::new(-1.0, 10.0).is_degenerate());
        assert!(!Size::new(375.0, 812.0).is_degenerate());
    }

    #[test]
    fn rect_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn rect_contains() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.9, 9.9)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn rect_finiteness() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!Rect::new(0.0, f64::INFINITY, 1.0, 1.0).is_finite());
    }
}
