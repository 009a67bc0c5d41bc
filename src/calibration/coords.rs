//! Screen-space geometry for the calibrated circle.
//!
//! All results that land back on the screen are truncated toward zero,
//! matching how cursor coordinates have always been derived here.

/// A position in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A fully calibrated circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Circle {
    /// Center point in screen coordinates.
    pub center: Point,
    /// Radius in pixels.
    pub radius: u32,
}

/// Distance between two points, truncated to whole pixels.
pub fn radius_between(a: Point, b: Point) -> u32 {
    let dx = (b.x as i64 - a.x as i64) as f64;
    let dy = (b.y as i64 - a.y as i64) as f64;
    // Float-to-int casts saturate, so this can't wrap.
    (dx * dx + dy * dy).sqrt() as u32
}

/// Angle of `p` around `center` in radians, in `(-PI, PI]`.
pub fn angle_from_center(center: Point, p: Point) -> f64 {
    let dy = (p.y as i64 - center.y as i64) as f64;
    let dx = (p.x as i64 - center.x as i64) as f64;
    dy.atan2(dx)
}

/// Point on `circle` at `angle` radians.
pub fn point_on_circle(circle: Circle, angle: f64) -> Point {
    let r = circle.radius as f64;
    let x = circle.center.x as f64 + r * angle.cos();
    let y = circle.center.y as f64 + r * angle.sin();
    Point::new(x as i32, y as i32)
}
