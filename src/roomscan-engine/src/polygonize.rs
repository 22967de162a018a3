// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Stage M — extracts the bounded faces of the planar arrangement formed by
//! the Skeletoniser's welded segments and reports each as a [`Room`].
//!
//! The arrangement is built by splitting every segment at any other
//! segment's endpoint that lands strictly inside it (a T-junction), then
//! tracing face boundaries with the standard planar-graph technique: sort
//! each vertex's incident edges by angle, and at every step of a walk take
//! the next edge in clockwise order from the one just arrived on. Every
//! bounded face is traced with positive signed area; the unbounded face(s)
//! surrounding each connected component come out negative and are dropped.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::geom::{Point, Segment};
use crate::room::{BBox, Room};

const SPLIT_TOL: f64 = 1.0e-6;

fn quantise(point: Point, dec: i32) -> (i64, i64) {
    let scale = 10f64.powi(dec);
    (
        (point.x * scale).round() as i64,
        (point.y * scale).round() as i64,
    )
}

/// Splits every segment at any other segment's endpoint lying strictly in
/// its interior, so the resulting set only meets at shared endpoints.
fn split_at_t_junctions(segments: &[Segment]) -> Vec<Segment> {
    let endpoints: Vec<Point> = segments.iter().flat_map(|s| [s.p, s.q]).collect();

    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        let mut cut_params: Vec<f64> = vec![0.0, 1.0];
        for &p in &endpoints {
            if !seg.contains_point(p, SPLIT_TOL) {
                continue;
            }
            let t = seg.param_of(p);
            if t > SPLIT_TOL && t < 1.0 - SPLIT_TOL {
                cut_params.push(t);
            }
        }
        cut_params.sort_by(|a, b| a.partial_cmp(b).unwrap());
        cut_params.dedup_by(|a, b| (*a - *b).abs() < SPLIT_TOL);

        for window in cut_params.windows(2) {
            let a = seg.at(window[0]);
            let b = seg.at(window[1]);
            if a.distance(b) > SPLIT_TOL {
                out.push(Segment::new(a, b));
            }
        }
    }
    out
}

/// An undirected planar graph built from the split segment set, vertices
/// deduplicated by quantised coordinate.
struct Graph {
    points: Vec<Point>,
    /// Each vertex's neighbors, sorted by ascending angle (atan2) to the
    /// vertex's outgoing edge.
    adjacency: Vec<Vec<usize>>,
}

fn build_graph(segments: &[Segment], dec: i32) -> Graph {
    let mut index: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    let mut points = Vec::new();
    let mut edges: Vec<(usize, usize)> = Vec::new();

    let mut vertex_of = |p: Point, index: &mut BTreeMap<(i64, i64), usize>, points: &mut Vec<Point>| {
        let key = quantise(p, dec);
        *index.entry(key).or_insert_with(|| {
            points.push(p);
            points.len() - 1
        })
    };

    for seg in segments {
        let u = vertex_of(seg.p, &mut index, &mut points);
        let v = vertex_of(seg.q, &mut index, &mut points);
        if u != v {
            edges.push((u, v));
        }
    }

    let mut adjacency = vec![Vec::new(); points.len()];
    for &(u, v) in &edges {
        adjacency[u].push(v);
        adjacency[v].push(u);
    }
    for (i, neighbors) in adjacency.iter_mut().enumerate() {
        let origin = points[i];
        neighbors.sort_by(|&a, &b| {
            let angle_a = (points[a] - origin).y.atan2((points[a] - origin).x);
            let angle_b = (points[b] - origin).y.atan2((points[b] - origin).x);
            angle_a.partial_cmp(&angle_b).unwrap()
        });
    }

    Graph { points, adjacency }
}

fn signed_area(ring: &[usize], points: &[Point]) -> f64 {
    let mut sum = 0.0;
    for w in ring.windows(2) {
        let a = points[w[0]];
        let b = points[w[1]];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Traces every bounded face of `graph` as a closed vertex-index ring
/// (first index repeated at the end), keeping only positively-oriented
/// (bounded, interior) faces.
fn trace_bounded_faces(graph: &Graph) -> Vec<Vec<usize>> {
    let mut visited: std::collections::BTreeSet<(usize, usize)> = std::collections::BTreeSet::new();
    let mut faces = Vec::new();
    let total_directed_edges: usize = graph.adjacency.iter().map(|n| n.len()).sum();

    for u in 0..graph.adjacency.len() {
        for &v in &graph.adjacency[u] {
            if visited.contains(&(u, v)) {
                continue;
            }
            let start = (u, v);
            let mut current = start;
            let mut ring = vec![u];
            loop {
                visited.insert(current);
                ring.push(current.1);
                let (from, to) = current;
                let neighbors = &graph.adjacency[to];
                let Some(pos) = neighbors.iter().position(|&n| n == from) else {
                    break;
                };
                let next_to = neighbors[(pos + neighbors.len() - 1) % neighbors.len()];
                let next_edge = (to, next_to);
                if next_edge == start {
                    break;
                }
                if ring.len() > 2 * total_directed_edges + 4 {
                    // Graph inconsistency guard; should be unreachable for a
                    // well-formed planar arrangement.
                    ring.clear();
                    break;
                }
                current = next_edge;
            }
            if ring.len() >= 4 {
                faces.push(ring);
            }
        }
    }
    faces
}

fn ring_bbox(ring: &[usize], points: &[Point]) -> BBox {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &i in ring {
        let p = points[i];
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BBox {
        x: min_x,
        y: min_y,
        w: max_x - min_x,
        h: max_y - min_y,
    }
}

/// Extracts bounded rooms from the Skeletoniser's welded segment set.
///
/// Zero-length segments (collapsed by welding to `p == q`) are dropped
/// before the arrangement is built. Faces below [`Config::min_room_area`]
/// or with a degenerate ring are discarded, and duplicate bounding boxes
/// (two faces that happen to share one, within quantisation tolerance) are
/// collapsed to a single [`Room`].
pub fn polygonize(segments: &[Segment], config: &Config) -> Vec<Room> {
    let cleaned: Vec<Segment> = segments
        .iter()
        .copied()
        .filter(|s| s.length() > config.eps)
        .collect();
    if cleaned.is_empty() {
        return Vec::new();
    }

    let split = split_at_t_junctions(&cleaned);
    let graph = build_graph(&split, config.point_quantise_dec);
    let faces = trace_bounded_faces(&graph);

    let mut rooms: Vec<Room> = Vec::new();
    for ring in &faces {
        let area = signed_area(ring, &graph.points);
        if area <= config.min_room_area {
            continue;
        }
        let bbox = ring_bbox(ring, &graph.points);
        if !bbox.is_valid() {
            continue;
        }
        let dup_tol = 10f64.powi(-config.point_quantise_dec);
        if rooms.iter().any(|r| r.bbox.approx_eq(bbox, dup_tol)) {
            continue;
        }
        rooms.push(Room { bbox });
    }
    rooms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Segment> {
        vec![
            Segment::new(Point::new(x0, y0), Point::new(x1, y0)),
            Segment::new(Point::new(x1, y0), Point::new(x1, y1)),
            Segment::new(Point::new(x1, y1), Point::new(x0, y1)),
            Segment::new(Point::new(x0, y1), Point::new(x0, y0)),
        ]
    }

    #[test]
    fn empty_segments_yield_no_rooms() {
        let config = Config::default();
        let rooms = polygonize(&[], &config);
        assert!(rooms.is_empty());
    }

    #[test]
    fn single_closed_rectangle_yields_one_room() {
        let config = Config::default();
        let segments = rect(0.0, 0.0, 100.0, 50.0);
        let rooms = polygonize(&segments, &config);
        assert_eq!(rooms.len(), 1);
        let bbox = rooms[0].bbox;
        assert!((bbox.x - 0.0).abs() < 1e-6);
        assert!((bbox.y - 0.0).abs() < 1e-6);
        assert!((bbox.w - 100.0).abs() < 1e-6);
        assert!((bbox.h - 50.0).abs() < 1e-6);
    }

    #[test]
    fn two_side_by_side_rooms_sharing_a_wall() {
        let config = Config::default();
        // An outer perimeter plus a single internal dividing wall, as the
        // Skeletoniser would emit after welding: the shared wall appears
        // exactly once, not as two coincident segments.
        let segments = vec![
            Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
            Segment::new(Point::new(100.0, 0.0), Point::new(200.0, 0.0)),
            Segment::new(Point::new(200.0, 0.0), Point::new(200.0, 50.0)),
            Segment::new(Point::new(200.0, 50.0), Point::new(100.0, 50.0)),
            Segment::new(Point::new(100.0, 50.0), Point::new(0.0, 50.0)),
            Segment::new(Point::new(0.0, 50.0), Point::new(0.0, 0.0)),
            Segment::new(Point::new(100.0, 0.0), Point::new(100.0, 50.0)),
        ];
        let rooms = polygonize(&segments, &config);
        assert_eq!(rooms.len(), 2);
        let mut widths: Vec<f64> = rooms.iter().map(|r| r.bbox.w).collect();
        widths.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((widths[0] - 100.0).abs() < 1e-6);
        assert!((widths[1] - 100.0).abs() < 1e-6);
    }

    #[test]
    fn dangling_segment_does_not_close_a_face() {
        let config = Config::default();
        let mut segments = rect(0.0, 0.0, 100.0, 50.0);
        segments.push(Segment::new(Point::new(100.0, 0.0), Point::new(150.0, 0.0)));
        let rooms = polygonize(&segments, &config);
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn tiny_sliver_face_is_dropped_by_min_area() {
        let mut config = Config::default();
        config.min_room_area = 10.0;
        let segments = rect(0.0, 0.0, 1.0, 1.0);
        let rooms = polygonize(&segments, &config);
        assert!(rooms.is_empty());
    }
}
