// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The pipeline's public output type.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, `(x, y)` the lower-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BBox {
    /// `true` when both dimensions are positive, per spec invariant.
    pub fn is_valid(self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }

    pub fn area(self) -> f64 {
        self.w * self.h
    }

    /// Approximate equality, used to deduplicate rooms whose bounding boxes
    /// coincide within weld tolerance.
    pub fn approx_eq(self, other: Self, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol
            && (self.y - other.y).abs() <= tol
            && (self.w - other.w).abs() <= tol
            && (self.h - other.h).abs() <= tol
    }
}

/// One identified room, serialized as `{"bbox": [x, y, w, h]}` to match the
/// canonical JSON encoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Room {
    pub bbox: BBox,
}

impl Serialize for Room {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Room", 1)?;
        state.serialize_field("bbox", &[self.bbox.x, self.bbox.y, self.bbox.w, self.bbox.h])?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Room {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            bbox: [f64; 4],
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Room {
            bbox: BBox {
                x: raw.bbox[0],
                y: raw.bbox[1],
                w: raw.bbox[2],
                h: raw.bbox[3],
            },
        })
    }
}
