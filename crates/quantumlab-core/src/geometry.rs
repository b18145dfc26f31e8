//! Plane geometry for "every possible path" exercises (mirror strips, slits).

use serde::{Deserialize, Serialize};

use crate::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn segment_points(start: Point, end: Point, n: usize) -> Vec<Point> {
    match n {
        0 => Vec::new(),
        1 => vec![Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0)],
        _ => (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                Point::new(
                    start.x + (end.x - start.x) * t,
                    start.y + (end.y - start.y) * t,
                )
            })
            .collect(),
    }
}

/// One unit-amplitude path per waypoint: `source → waypoint → detector`.
pub fn paths_via(source: Point, detector: Point, waypoints: &[Point]) -> Vec<Path> {
    waypoints
        .iter()
        .map(|w| Path::new(source.distance(w) + w.distance(&detector)))
        .collect()
}
