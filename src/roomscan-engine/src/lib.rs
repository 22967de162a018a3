// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Reconstructs rectangular rooms from a floor plan's wall-centerline
//! polylines.
//!
//! The pipeline runs six stages in sequence, each a module of this crate:
//!
//! 1. [`flatten`] — expand polylines into primitive segments (Flattener).
//! 2. [`cast`] — random-point ray casting to find candidate mates (Caster).
//! 3. [`pair_seed`] — seed the initial stripe-pair set (Pair-Seeder).
//! 4. [`pair_grow`] — absorb remaining segments into stripe pairs (Pair-Grower).
//! 5. [`skeleton`] — cluster, weld, and merge into a unified skeleton (Skeletoniser).
//! 6. [`polygonize`] — extract bounded faces as rooms (Polygoniser).
//!
//! [`identify`] runs the full pipeline and is the crate's only public entry
//! point of consequence; everything else is exposed for testing and for
//! callers who want to inspect or override an intermediate stage.

pub mod cast;
pub mod config;
pub mod error;
pub mod flatten;
pub mod geom;
pub mod pair_grow;
pub mod pair_seed;
pub mod polygonize;
pub mod room;
pub mod skeleton;

pub use config::Config;
pub use error::RoomError;
pub use geom::{Point, Segment, SegmentIndex};
pub use room::{BBox, Room};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Runs the full pipeline over a set of wall-centerline polylines, returning
/// every room whose bounding box could be reconstructed.
///
/// Internal failures (an empty usable segment set, or a degenerate skeleton
/// that yields no bounded faces) are not errors from this function's point
/// of view: they simply produce an empty room list, mirroring the contract
/// the specification gives `identify`. Use [`try_identify`] to observe the
/// distinction.
pub fn identify(polylines: &[Vec<Point>], config: &Config) -> Vec<Room> {
    try_identify(polylines, config).unwrap_or_default()
}

/// Runs the full pipeline with [`Config::default`].
pub fn identify_default(polylines: &[Vec<Point>]) -> Vec<Room> {
    identify(polylines, &Config::default())
}

/// [`identify`], but surfaces the internal [`RoomError`] instead of
/// swallowing it into an empty result.
pub fn try_identify(polylines: &[Vec<Point>], config: &Config) -> error::Result<Vec<Room>> {
    let mut config = config.clone();
    config.validate();

    let flat = flatten::flatten(polylines, &config);
    if flat.is_empty() {
        return Err(RoomError::EmptyInput);
    }

    let mut rng = StdRng::seed_from_u64(config.random_seed);
    let casts = cast::cast(&flat, &mut rng, &config);
    let seeded = pair_seed::seed_pairs(&flat, &casts, &config);
    let (grown, _outcome) = pair_grow::grow(&flat, seeded, &config);
    let unified = skeleton::skeletonize(&flat, &grown, &config);

    Ok(polygonize::polygonize(&unified, &config))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A rectangular room drawn the way a floor plan actually draws a wall:
    /// two parallel centerlines per side, `half` apart from the wall's true
    /// centerline, rather than one line tracing the room's outline. Stage C's
    /// perpendicular casts are what pair the two faces of the same wall, so
    /// an outline with no thickness never seeds a stripe pair at all.
    fn thick_rect(x0: f64, y0: f64, x1: f64, y1: f64, half: f64) -> Vec<Vec<Point>> {
        vec![
            vec![Point::new(x0, y0 - half), Point::new(x1, y0 - half)],
            vec![Point::new(x0, y0 + half), Point::new(x1, y0 + half)],
            vec![Point::new(x1 - half, y0), Point::new(x1 - half, y1)],
            vec![Point::new(x1 + half, y0), Point::new(x1 + half, y1)],
            vec![Point::new(x0, y1 - half), Point::new(x1, y1 - half)],
            vec![Point::new(x0, y1 + half), Point::new(x1, y1 + half)],
            vec![Point::new(x0 - half, y0), Point::new(x0 - half, y1)],
            vec![Point::new(x0 + half, y0), Point::new(x0 + half, y1)],
        ]
    }

    #[test]
    fn empty_input_yields_no_rooms() {
        let config = Config::default();
        assert!(identify(&[], &config).is_empty());
    }

    #[test]
    fn empty_input_is_reported_as_empty_input_error() {
        let config = Config::default();
        let err = try_identify(&[], &config).unwrap_err();
        assert_eq!(err, RoomError::EmptyInput);
    }

    #[test]
    fn single_rectangular_room_is_recovered() {
        let config = Config::default();
        let polylines = thick_rect(0.0, 0.0, 100.0, 50.0, 1.0);
        let rooms = identify(&polylines, &config);
        assert_eq!(rooms.len(), 1);
        let bbox = rooms[0].bbox;
        assert!((bbox.w - 100.0).abs() < 1e-1);
        assert!((bbox.h - 50.0).abs() < 1e-1);
    }

    #[test]
    fn identical_input_is_deterministic() {
        let config = Config::default();
        let polylines = thick_rect(0.0, 0.0, 100.0, 50.0, 1.0);
        let a = identify(&polylines, &config);
        let b = identify(&polylines, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn identify_default_matches_explicit_default_config() {
        let polylines = thick_rect(0.0, 0.0, 100.0, 50.0, 1.0);
        assert_eq!(identify_default(&polylines), identify(&polylines, &Config::default()));
    }
}
