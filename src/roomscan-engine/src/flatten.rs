// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Stage F — expands polylines into primitive segments with precomputed
//! orientation, midpoint, and length.

use crate::config::Config;
use crate::geom::{Point, Segment};

/// One flattened wall-face segment, with the per-segment data every later
/// stage needs already computed once.
#[derive(Clone, Copy, Debug)]
pub struct FlatSegment {
    pub segment: Segment,
    pub orientation_deg: f64,
    pub midpoint: Point,
    pub length: f64,
}

impl FlatSegment {
    fn from_segment(segment: Segment) -> Self {
        Self {
            segment,
            orientation_deg: segment.orientation_deg(),
            midpoint: segment.midpoint(),
            length: segment.length(),
        }
    }
}

/// Flattens a sequence of polylines into consecutive-pair segments.
///
/// Zero-length consecutive pairs are dropped. Polyline order and
/// within-polyline point order are preserved, so the resulting index order
/// is deterministic for identical input.
pub fn flatten(polylines: &[Vec<Point>], config: &Config) -> Vec<FlatSegment> {
    let mut out = Vec::new();
    for poly in polylines {
        for window in poly.windows(2) {
            let (p, q) = (window[0], window[1]);
            let segment = Segment::new(p, q);
            if segment.length() > config.eps {
                out.push(FlatSegment::from_segment(segment));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_segments() {
        let config = Config::default();
        assert!(flatten(&[], &config).is_empty());
    }

    #[test]
    fn single_polyline_two_points() {
        let config = Config::default();
        let polylines = vec![vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]];
        let segments = flatten(&polylines, &config);
        assert_eq!(segments.len(), 1);
        assert!((segments[0].length - 10.0).abs() < 1e-9);
        assert!(segments[0].orientation_deg.abs() < 1e-9);
    }

    #[test]
    fn multi_point_polyline_yields_consecutive_pairs() {
        let config = Config::default();
        let polylines = vec![vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]];
        let segments = flatten(&polylines, &config);
        assert_eq!(segments.len(), 2);
        assert!((segments[1].orientation_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_pairs_are_dropped() {
        let config = Config::default();
        let polylines = vec![vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
        ]];
        let segments = flatten(&polylines, &config);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn preserves_insertion_order_across_polylines() {
        let config = Config::default();
        let polylines = vec![
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0)],
        ];
        let segments = flatten(&polylines, &config);
        assert_eq!(segments.len(), 2);
        assert!((segments[0].midpoint.x - 0.5).abs() < 1e-9);
        assert!((segments[1].midpoint.x - 5.5).abs() < 1e-9);
    }
}
