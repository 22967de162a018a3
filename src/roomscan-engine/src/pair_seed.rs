// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Stage P — verifies the Caster's geometry against a maximum-gap ratio and
//! seeds the initial set of stripe pairs: two segments treated as the two
//! parallel faces of one wall.

use std::collections::BTreeSet;

use crate::cast::CastResult;
use crate::config::Config;
use crate::flatten::FlatSegment;
use crate::geom::{SegmentIndex, ray_segment_intersection};
use crate::pair_grow::StripePair;

const COLLINEAR_TOL: f64 = 1.0e-6;

/// Finds the segment (other than `exclude`) that `point` lies on, in
/// segment-index order so the result is deterministic when several
/// segments are collinear near `point`.
fn segment_containing(
    segments: &[FlatSegment],
    point: crate::geom::Point,
    exclude: usize,
) -> Option<usize> {
    segments.iter().enumerate().find_map(|(j, seg)| {
        if j == exclude {
            return None;
        }
        seg.segment
            .contains_point(point, COLLINEAR_TOL)
            .then_some(j)
    })
}

/// Seeds the initial stripe-pair set from the Caster's output.
///
/// Iterates cast results in segment-index order (the order [`crate::cast::cast`]
/// already returns them in) so that, for identical input, the same stripe
/// pairs are found in the same order.
pub fn seed_pairs(
    segments: &[FlatSegment],
    casts: &[CastResult],
    config: &Config,
) -> BTreeSet<StripePair> {
    let mut pairs = BTreeSet::new();

    for cast in casts {
        let idx_a = cast.segment.index();
        let Some(idx_b) = segment_containing(segments, cast.p1, idx_a) else {
            continue;
        };

        let dir = cast.p1 - cast.p0;
        let dist = dir.length();
        if dist < config.eps {
            continue;
        }
        let dir_hat = dir.unit();

        let seg_b = segments[idx_b].segment;
        let found = cast.mates.iter().find_map(|&mate| {
            let hit = ray_segment_intersection(mate, dir_hat, seg_b.p, seg_b.q)?;
            (hit.t <= config.max_gap_ratio * dist).then_some(())
        });

        if found.is_some() {
            pairs.insert(StripePair::new(SegmentIndex(idx_a), SegmentIndex(idx_b)));
        }
    }

    pairs
}
