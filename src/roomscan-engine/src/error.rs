// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Internal failure modes. Never surfaced through [`crate::identify`]: the
//! public entry point always returns a plain room list, degrading to an
//! empty one whenever a [`RoomError`] is raised internally.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomError {
    /// The input polyline set was empty or contained no usable segments.
    EmptyInput,
    /// The planar-arrangement backend could not polygonise the skeleton.
    PolygonizerUnavailable(String),
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::EmptyInput => write!(f, "empty input: no usable wall segments"),
            RoomError::PolygonizerUnavailable(reason) => {
                write!(f, "polygonizer unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for RoomError {}

pub type Result<T> = std::result::Result<T, RoomError>;
