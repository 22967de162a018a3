// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Primitive 2-D geometry shared by every pipeline stage.

use std::ops::{Add, Sub};

use crate::config::EPS;

/// A point in the drawing's planar coordinate system.
#[derive(Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 2-D cross product: z-component of the 3-D cross product.
    pub fn cross_2d(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    /// Unit vector in the same direction, or the zero vector if `self` is
    /// (numerically) zero-length.
    pub fn unit(self) -> Self {
        let n = self.length();
        if n < EPS { self } else { self.scale(1.0 / n) }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An immutable straight segment between two distinct points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p: Point,
    pub q: Point,
}

impl Segment {
    pub fn new(p: Point, q: Point) -> Self {
        Self { p, q }
    }

    pub fn vector(self) -> Point {
        self.q - self.p
    }

    pub fn length(self) -> f64 {
        self.vector().length()
    }

    pub fn midpoint(self) -> Point {
        Point::new((self.p.x + self.q.x) / 2.0, (self.p.y + self.q.y) / 2.0)
    }

    /// Orientation of the segment in degrees, folded into `[0, 180)`.
    pub fn orientation_deg(self) -> f64 {
        let v = self.vector();
        let deg = v.y.atan2(v.x).to_degrees();
        let folded = deg.rem_euclid(180.0);
        if folded >= 180.0 { 0.0 } else { folded }
    }

    /// Point at parametric position `t` along `p -> q`, `t` typically in `[0, 1]`.
    pub fn at(self, t: f64) -> Point {
        self.p + self.vector().scale(t)
    }

    /// Parametric position of `point`'s projection onto the segment's line,
    /// assuming `point` is already known to lie on that line.
    pub fn param_of(self, point: Point) -> f64 {
        let v = self.vector();
        let len_sq = v.dot(v);
        if len_sq < EPS {
            0.0
        } else {
            (point - self.p).dot(v) / len_sq
        }
    }

    /// True when `point` lies on the closed segment within `tol`, using a
    /// cross-product collinearity test and a dot-product betweenness test.
    pub fn contains_point(self, point: Point, tol: f64) -> bool {
        let v = self.vector();
        if v.cross_2d(point - self.p).abs() > tol {
            return false;
        }
        let dot1 = (point - self.p).dot(v);
        let dot2 = (point - self.q).dot(self.p - self.q);
        dot1 >= -tol && dot2 >= -tol
    }
}

/// Dense, zero-based index into the Flattener's segment list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentIndex(pub usize);

impl SegmentIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Intersection of a ray `P + t*d` (`t >= 0`) against a bounded segment
/// `Q1 + u*(Q2-Q1)` (`u` in `[0, 1]`). Returns `None` when the ray and
/// segment are parallel (denominator below [`EPS`]) or the intersection
/// falls outside either bound.
pub fn ray_segment_intersection(origin: Point, dir: Point, q1: Point, q2: Point) -> Option<Hit> {
    let r = q2 - q1;
    let denom = dir.cross_2d(r);
    if denom.abs() < EPS {
        return None;
    }
    let diff = q1 - origin;
    let t = diff.cross_2d(r) / denom;
    let u = diff.cross_2d(dir) / denom;
    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some(Hit {
            t,
            point: origin + dir.scale(t),
        })
    } else {
        None
    }
}

/// Result of a successful ray/segment intersection: `t >= 0` is the
/// parametric distance along the casting ray, `point` the hit location.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub t: f64,
    pub point: Point,
}

/// Angular difference between two `[0, 180)`-folded orientations, itself
/// folded into `[0, 90]` so that near-180-degree-apart lines still read as
/// parallel.
pub fn angular_difference_deg(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d <= 90.0 { d } else { 180.0 - d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_add_sub() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 4.0);
        let sum = a + b;
        assert!((sum.x - 4.0).abs() < f64::EPSILON);
        assert!((sum.y - 6.0).abs() < f64::EPSILON);
        let diff = b - a;
        assert!((diff.x - 2.0).abs() < f64::EPSILON);
        assert!((diff.y - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_cross_dot_length() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        assert!((a.cross_2d(b) - 1.0).abs() < f64::EPSILON);
        assert!((b.cross_2d(a) + 1.0).abs() < f64::EPSILON);
        assert!(a.dot(b).abs() < f64::EPSILON);
        let c = Point::new(3.0, 4.0);
        assert!((c.length() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn segment_orientation_folds_into_0_180() {
        let horizontal = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(horizontal.orientation_deg().abs() < 1e-9);

        let reversed = Segment::new(Point::new(10.0, 0.0), Point::new(0.0, 0.0));
        assert!((reversed.orientation_deg() - 180.0).abs() < 1e-9 || reversed.orientation_deg().abs() < 1e-9);

        let vertical = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert!((vertical.orientation_deg() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn segment_midpoint_and_length() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        let mid = s.midpoint();
        assert!((mid.x - 1.5).abs() < f64::EPSILON);
        assert!((mid.y - 2.0).abs() < f64::EPSILON);
        assert!((s.length() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ray_segment_intersection_basic() {
        // Ray from (0, -1) straight up, target segment is the horizontal unit segment.
        let hit = ray_segment_intersection(
            Point::new(0.5, -1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        );
        let hit = hit.expect("expected an intersection");
        assert!((hit.t - 1.0).abs() < 1e-9);
        assert!((hit.point.x - 0.5).abs() < 1e-9);
        assert!(hit.point.y.abs() < 1e-9);
    }

    #[test]
    fn ray_segment_intersection_parallel_is_none() {
        let hit = ray_segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn angular_difference_wraps_at_90() {
        assert!((angular_difference_deg(2.0, 179.0) - 3.0).abs() < 1e-9);
        assert!((angular_difference_deg(10.0, 12.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn segment_contains_point() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(s.contains_point(Point::new(5.0, 0.0), 1e-6));
        assert!(!s.contains_point(Point::new(5.0, 1.0), 1e-6));
        assert!(!s.contains_point(Point::new(-1.0, 0.0), 1e-6));
    }
}
