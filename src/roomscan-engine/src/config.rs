// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Process-wide tunable constants for the room-identification pipeline.
//!
//! All of these are empirically tuned against a specific drawing corpus
//! (see spec §9's Open Questions) and are exposed as configuration rather
//! than inlined literals, so a caller can retune them without touching
//! pipeline code.

/// Generic numeric zero: any comparison against zero, or any denominator
/// check, goes through this rather than a bare `1e-9` at the call site.
pub const EPS: f64 = 1.0e-9;

/// Minimum wall stroke width an upstream reader must have already filtered
/// by; the Flattener assumes this has happened and does not re-filter.
pub const STROKE_THRESH: f64 = 1.5;

/// Caster's pseudo-random sample reproducibility seed.
pub const RANDOM_SEED: u64 = 42;

/// Pair-Seeder's maximum-gap allowance, as a multiple of the re-projected
/// mate distance.
pub const MAX_GAP_RATIO: f64 = 2.0;

/// Pair-Grower's parallelism tolerance, in degrees.
pub const ANG_TOL: f64 = 5.0;

/// Skeletoniser's cluster angular tolerance, in degrees.
pub const ANG_TOL_ALIGN: f64 = 3.0;

/// Skeletoniser's cluster perpendicular-shift tolerance, as a ratio of the
/// longer of the two connectors being compared.
pub const SHIFT_TOL_RATIO: f64 = 0.02;

/// Weld tolerance factor; multiplied by the median raw-midpoint connector
/// length to get the actual weld distance.
pub const POINT_JOIN_TOL_FACTOR: f64 = 0.005;

/// Polygoniser's minimum face area.
pub const MIN_ROOM_AREA: f64 = 1.0e-3;

/// Decimal places used when quantising endpoints into hash/lookup keys.
pub const POINT_QUANTISE_DEC: i32 = 6;

/// Collected tunables for one `identify` invocation.
///
/// Constructing via [`Config::default`] reproduces the behaviour documented
/// in the specification; every field may be overridden independently.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub stroke_thresh: f64,
    pub random_seed: u64,
    pub max_gap_ratio: f64,
    pub ang_tol: f64,
    pub ang_tol_align: f64,
    pub shift_tol_ratio: f64,
    pub point_join_tol_factor: f64,
    pub min_room_area: f64,
    pub point_quantise_dec: i32,
    pub eps: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stroke_thresh: STROKE_THRESH,
            random_seed: RANDOM_SEED,
            max_gap_ratio: MAX_GAP_RATIO,
            ang_tol: ANG_TOL,
            ang_tol_align: ANG_TOL_ALIGN,
            shift_tol_ratio: SHIFT_TOL_RATIO,
            point_join_tol_factor: POINT_JOIN_TOL_FACTOR,
            min_room_area: MIN_ROOM_AREA,
            point_quantise_dec: POINT_QUANTISE_DEC,
            eps: EPS,
        }
    }
}

impl Config {
    /// Clamp fields to physically meaningful ranges so that nonsensical
    /// caller-provided values (negative tolerances, a zero-gap ratio)
    /// don't produce undefined pipeline behavior.
    pub fn validate(&mut self) {
        self.stroke_thresh = self.stroke_thresh.max(0.0);
        self.max_gap_ratio = self.max_gap_ratio.max(0.0);
        self.ang_tol = self.ang_tol.clamp(0.0, 90.0);
        self.ang_tol_align = self.ang_tol_align.clamp(0.0, 90.0);
        self.shift_tol_ratio = self.shift_tol_ratio.max(0.0);
        self.point_join_tol_factor = self.point_join_tol_factor.max(0.0);
        self.min_room_area = self.min_room_area.max(0.0);
        self.point_quantise_dec = self.point_quantise_dec.clamp(0, 15);
        self.eps = self.eps.max(0.0);
    }
}
