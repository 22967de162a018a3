// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Stage S — derives two mid-point connectors per stripe pair, clusters
//! co-linear connectors onto shared axes, snap-welds near-coincident
//! endpoints, and merges overlapping intervals per axis.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::unionfind::UnionFind;

use crate::config::Config;
use crate::flatten::FlatSegment;
use crate::geom::{Point, Segment, angular_difference_deg};
use crate::pair_grow::StripePair;

/// A fitted `(anchor, unit direction)` line shared by a cluster of
/// co-linear skeleton connectors. `direction.x` is always non-negative.
#[derive(Clone, Copy, Debug)]
struct Axis {
    anchor: Point,
    direction: Point,
}

/// Builds the raw mid-point connector for each stripe pair: the endpoint
/// pairing with smaller summed Euclidean distance, collapsed to its two
/// midpoints.
fn raw_midpoint_segments(segments: &[FlatSegment], stripe_pairs: &BTreeSet<StripePair>) -> Vec<Segment> {
    let mut raw = Vec::with_capacity(stripe_pairs.len());
    for pair in stripe_pairs {
        let a = segments[pair.a().index()].segment;
        let b = segments[pair.b().index()].segment;

        let same = a.p.distance(b.p) + a.q.distance(b.q);
        let cross = a.p.distance(b.q) + a.q.distance(b.p);
        let (c1, c2) = if same <= cross {
            ((a.p, b.p), (a.q, b.q))
        } else {
            ((a.p, b.q), (a.q, b.p))
        };

        let mid1 = Point::new((c1.0.x + c1.1.x) / 2.0, (c1.0.y + c1.1.y) / 2.0);
        let mid2 = Point::new((c2.0.x + c2.1.x) / 2.0, (c2.0.y + c2.1.y) / 2.0);
        raw.push(Segment::new(mid1, mid2));
    }
    raw
}

/// Perpendicular distance from `point` to the infinite line through
/// `anchor` with unit direction `dir`.
fn perp_distance(point: Point, anchor: Point, dir: Point) -> f64 {
    (point - anchor).cross_2d(dir).abs()
}

/// Clusters raw midpoint segments whose orientation and position agree,
/// using an index-keyed, path-compressing union-find.
fn cluster_indices(raw: &[Segment], config: &Config) -> UnionFind<usize> {
    let mut uf = UnionFind::new(raw.len().max(1));
    for i in 0..raw.len() {
        for j in (i + 1)..raw.len() {
            if angular_difference_deg(raw[i].orientation_deg(), raw[j].orientation_deg())
                > config.ang_tol_align
            {
                continue;
            }
            let dir_j = raw[j].vector().unit();
            let gap = perp_distance(raw[i].midpoint(), raw[j].p, dir_j);
            let max_len = raw[i].length().max(raw[j].length());
            if gap <= config.shift_tol_ratio * max_len {
                uf.union(i, j);
            }
        }
    }
    uf
}

/// Groups member indices by cluster root, iterated in root order so
/// downstream processing is deterministic.
fn group_by_root(raw_len: usize, uf: &mut UnionFind<usize>) -> BTreeMap<usize, Vec<usize>> {
    let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..raw_len {
        clusters.entry(uf.find_mut(i)).or_default().push(i);
    }
    clusters
}

/// Principal direction of a 2x2 mean-centred covariance matrix, i.e. the
/// first right-singular vector of the centred point matrix. Closed-form
/// for the symmetric 2x2 case, equivalent to a full SVD for two columns.
fn principal_direction(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let centroid = points.iter().fold(Point::new(0.0, 0.0), |acc, &p| acc + p) .scale(1.0 / n);
    let (mut a, mut b, mut d) = (0.0, 0.0, 0.0);
    for &p in points {
        let c = p - centroid;
        a += c.x * c.x;
        b += c.x * c.y;
        d += c.y * c.y;
    }
    let theta = 0.5 * (2.0 * b).atan2(a - d);
    Point::new(theta.cos(), theta.sin())
}

fn canonicalize_direction(dir: Point) -> Point {
    if dir.x < 0.0 { dir.scale(-1.0) } else { dir }
}

fn fit_axes(raw: &[Segment], clusters: &BTreeMap<usize, Vec<usize>>) -> BTreeMap<usize, Axis> {
    let mut axes = BTreeMap::new();
    for (&root, members) in clusters {
        let axis = if members.len() == 1 {
            let s = raw[members[0]];
            Axis {
                anchor: s.p,
                direction: canonicalize_direction(s.vector().unit()),
            }
        } else {
            let points: Vec<Point> = members.iter().flat_map(|&m| [raw[m].p, raw[m].q]).collect();
            let centroid = points
                .iter()
                .fold(Point::new(0.0, 0.0), |acc, &p| acc + p)
                .scale(1.0 / points.len() as f64);
            Axis {
                anchor: centroid,
                direction: canonicalize_direction(principal_direction(&points)),
            }
        };
        axes.insert(root, axis);
    }
    axes
}

/// Projects each raw segment's endpoints onto its cluster's axis, then
/// reorders so the second endpoint follows the first along the axis
/// direction.
fn align_to_axes(
    raw: &[Segment],
    uf: &mut UnionFind<usize>,
    axes: &BTreeMap<usize, Axis>,
) -> Vec<Segment> {
    raw.iter()
        .enumerate()
        .map(|(i, seg)| {
            let axis = axes[&uf.find_mut(i)];
            let project = |p: Point| axis.anchor + axis.direction.scale((p - axis.anchor).dot(axis.direction));
            let (mut p, mut q) = (project(seg.p), project(seg.q));
            if (q - p).dot(axis.direction) < 0.0 {
                std::mem::swap(&mut p, &mut q);
            }
            Segment::new(p, q)
        })
        .collect()
}

/// Coalesces endpoints within `tol` of an earlier-seen endpoint onto that
/// earlier point. Starts a fresh set of "seen" points on every call, as
/// the specification's two separate welding passes require.
fn weld_segments(segs: &[Segment], tol: f64) -> Vec<Segment> {
    let mut uniques: Vec<Point> = Vec::new();
    let mut canon = |p: Point| -> Point {
        for &c in &uniques {
            if p.distance(c) <= tol {
                return c;
            }
        }
        uniques.push(p);
        p
    };
    segs.iter().map(|s| Segment::new(canon(s.p), canon(s.q))).collect()
}

fn median_length(segs: &[Segment]) -> f64 {
    let mut lengths: Vec<f64> = segs.iter().map(|s| s.length()).collect();
    lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = lengths.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        lengths[n / 2]
    } else {
        (lengths[n / 2 - 1] + lengths[n / 2]) / 2.0
    }
}

/// Merges each cluster's welded members into non-overlapping intervals
/// along the cluster axis, materialised back to 2-D segments.
fn merge_intervals(
    welded: &[Segment],
    clusters: &BTreeMap<usize, Vec<usize>>,
    axes: &BTreeMap<usize, Axis>,
    tol: f64,
) -> Vec<Segment> {
    let mut unified = Vec::new();
    for (root, members) in clusters {
        let axis = axes[root];
        let mut intervals: Vec<(f64, f64)> = members
            .iter()
            .map(|&m| {
                let s = welded[m];
                let s1 = (s.p - axis.anchor).dot(axis.direction);
                let s2 = (s.q - axis.anchor).dot(axis.direction);
                if s1 <= s2 { (s1, s2) } else { (s2, s1) }
            })
            .collect();
        intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let mut merged: Vec<(f64, f64)> = Vec::new();
        for (a, b) in intervals.drain(..) {
            if let Some(last) = merged.last_mut()
                && a <= last.1 + tol
            {
                last.1 = last.1.max(b);
                continue;
            }
            merged.push((a, b));
        }

        for (a, b) in merged {
            let p = axis.anchor + axis.direction.scale(a);
            let q = axis.anchor + axis.direction.scale(b);
            unified.push(Segment::new(p, q));
        }
    }
    unified
}

/// Runs the Skeletoniser end to end, returning the unified skeleton
/// segments ready for polygonisation.
pub fn skeletonize(
    segments: &[FlatSegment],
    stripe_pairs: &BTreeSet<StripePair>,
    config: &Config,
) -> Vec<Segment> {
    let raw = raw_midpoint_segments(segments, stripe_pairs);
    if raw.is_empty() {
        return Vec::new();
    }

    let mut uf = cluster_indices(&raw, config);
    let clusters = group_by_root(raw.len(), &mut uf);
    let axes = fit_axes(&raw, &clusters);
    let aligned = align_to_axes(&raw, &mut uf, &axes);

    let tol = config.point_join_tol_factor * median_length(&raw);
    let welded = weld_segments(&aligned, tol);

    let unified = merge_intervals(&welded, &clusters, &axes, tol);
    weld_segments(&unified, tol)
}
