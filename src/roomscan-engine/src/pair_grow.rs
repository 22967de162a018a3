// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Stage G — iteratively absorbs remaining segments into new stripe pairs
//! by endpoint adjacency and parallelism, until a fixed point or stall.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;
use crate::flatten::FlatSegment;
use crate::geom::{Point, SegmentIndex, angular_difference_deg};

/// An unordered pair of distinct segment indices, canonicalized so the
/// smaller index is always first: equality and ordering are then plain
/// unordered-pair semantics without a manual symmetric `HashSet` insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StripePair(SegmentIndex, SegmentIndex);

impl StripePair {
    pub fn new(x: SegmentIndex, y: SegmentIndex) -> Self {
        if x <= y { StripePair(x, y) } else { StripePair(y, x) }
    }

    pub fn a(self) -> SegmentIndex {
        self.0
    }

    pub fn b(self) -> SegmentIndex {
        self.1
    }

    pub fn contains(self, seg: SegmentIndex) -> bool {
        self.0 == seg || self.1 == seg
    }
}

/// State the Pair-Grower's loop terminated in, for diagnostic purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthOutcome {
    /// Every segment ended up paired or connector-adjacent.
    Complete,
    /// At least one lonely segment remains, but no new pair could be formed.
    Stalled,
}

fn quantise(point: Point, dec: i32) -> (i64, i64) {
    let scale = 10f64.powi(dec);
    (
        (point.x * scale).round() as i64,
        (point.y * scale).round() as i64,
    )
}

/// Maps quantised endpoint coordinates to every segment touching that
/// point, in segment-index order.
fn build_point_index(segments: &[FlatSegment], dec: i32) -> BTreeMap<(i64, i64), Vec<usize>> {
    let mut index: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
    for (i, seg) in segments.iter().enumerate() {
        index.entry(quantise(seg.segment.p, dec)).or_default().push(i);
        index.entry(quantise(seg.segment.q, dec)).or_default().push(i);
    }
    index
}

fn endpoints_equal(a: Point, b: Point, dec: i32) -> bool {
    quantise(a, dec) == quantise(b, dec)
}

/// Segment indices, restricted to `allowed`, sharing a quantised endpoint
/// with `seg`. Returned in ascending index order.
fn adjacent_within(
    seg: usize,
    segments: &[FlatSegment],
    point_index: &BTreeMap<(i64, i64), Vec<usize>>,
    allowed: &BTreeSet<usize>,
    dec: i32,
) -> BTreeSet<usize> {
    let mut result = BTreeSet::new();
    for endpoint in [segments[seg].segment.p, segments[seg].segment.q] {
        if let Some(candidates) = point_index.get(&quantise(endpoint, dec)) {
            for &c in candidates {
                if c != seg && allowed.contains(&c) {
                    result.insert(c);
                }
            }
        }
    }
    result
}

/// Grows `stripe_pairs` in place until every segment is paired or
/// connector-adjacent to a pair, or no iteration adds a new pair.
pub fn grow(
    segments: &[FlatSegment],
    mut stripe_pairs: BTreeSet<StripePair>,
    config: &Config,
) -> (BTreeSet<StripePair>, GrowthOutcome) {
    let dec = config.point_quantise_dec;
    let point_index = build_point_index(segments, dec);
    let all: BTreeSet<usize> = (0..segments.len()).collect();

    loop {
        let paired: BTreeSet<usize> = stripe_pairs
            .iter()
            .flat_map(|p| [p.a().index(), p.b().index()])
            .collect();
        let ungrouped: BTreeSet<usize> = all.difference(&paired).copied().collect();

        let connector: BTreeSet<usize> = ungrouped
            .iter()
            .copied()
            .filter(|&u| {
                let (u1, u2) = (segments[u].segment.p, segments[u].segment.q);
                stripe_pairs.iter().any(|pair| {
                    let (a1, a2) = (
                        segments[pair.a().index()].segment.p,
                        segments[pair.a().index()].segment.q,
                    );
                    let (b1, b2) = (
                        segments[pair.b().index()].segment.p,
                        segments[pair.b().index()].segment.q,
                    );
                    let adj = |p: Point, q1: Point, q2: Point| {
                        endpoints_equal(p, q1, dec) || endpoints_equal(p, q2, dec)
                    };
                    (adj(u1, a1, a2) && adj(u2, b1, b2)) || (adj(u2, a1, a2) && adj(u1, b1, b2))
                })
            })
            .collect();

        let lonely: BTreeSet<usize> = ungrouped.difference(&connector).copied().collect();
        if lonely.is_empty() {
            return (stripe_pairs, GrowthOutcome::Complete);
        }

        let mut new_pairs = BTreeSet::new();
        let mut used: BTreeSet<usize> = BTreeSet::new();
        for pair in stripe_pairs.clone().into_iter() {
            let cand_a = adjacent_within(pair.a().index(), segments, &point_index, &lonely, dec);
            let cand_b = adjacent_within(pair.b().index(), segments, &point_index, &lonely, dec);
            'outer: for &r1 in cand_a.iter() {
                if used.contains(&r1) {
                    continue;
                }
                for &r2 in cand_b.iter() {
                    if r2 == r1 || used.contains(&r2) {
                        continue;
                    }
                    let ang = angular_difference_deg(
                        segments[r1].orientation_deg,
                        segments[r2].orientation_deg,
                    );
                    if ang <= config.ang_tol {
                        new_pairs.insert(StripePair::new(SegmentIndex(r1), SegmentIndex(r2)));
                        used.insert(r1);
                        used.insert(r2);
                        break 'outer;
                    }
                }
            }
        }

        if new_pairs.is_empty() {
            return (stripe_pairs, GrowthOutcome::Stalled);
        }
        stripe_pairs.extend(new_pairs);
    }
}
