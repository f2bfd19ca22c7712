//! Internal loads along a shaft by the method of sections.
//!
//! The left part of a cut at `c` holds every load with `x <= c`. Its resultant,
//! reduced to the cut point, is the internal load carried by the section.

use serde::{Deserialize, Serialize};

use crate::errors::GeometryError;
use crate::reactions::BearingReaction;
use crate::shaft::{Shaft, ShaftLoad};

/// Internal force and moment resultants at one axial coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalLoad {
    /// Axial coordinate in metres.
    pub position: f64,
    /// Normal force, tension positive.
    pub axial_force: f64,
    /// Shear force along Y.
    pub shear_y: f64,
    /// Shear force along Z.
    pub shear_z: f64,
    /// Torque about the shaft axis.
    pub torque: f64,
    /// Bending moment about Y.
    pub moment_y: f64,
    /// Bending moment about Z.
    pub moment_z: f64,
}

impl InternalLoad {
    /// Resultant shear force.
    #[must_use]
    pub fn shear(&self) -> f64 {
        self.shear_y.hypot(self.shear_z)
    }

    /// Resultant bending moment.
    #[must_use]
    pub fn bending_moment(&self) -> f64 {
        self.moment_y.hypot(self.moment_z)
    }
}

/// Resultants of the loads left of `position`, acting on the cut face.
fn cut<'a>(loads: impl Iterator<Item = &'a ShaftLoad>, position: f64) -> InternalLoad {
    let mut internal = InternalLoad {
        position,
        ..InternalLoad::default()
    };
    for load in loads.filter(|load| load.position <= position) {
        let arm = position - load.position;
        internal.axial_force -= load.force.x;
        internal.shear_y += load.force.y;
        internal.shear_z += load.force.z;
        internal.torque += load.moment.x;
        internal.moment_y += arm * load.force.z + load.moment.y;
        internal.moment_z += load.moment.z - arm * load.force.y;
    }
    internal
}

/// Returns `true` when a profile segment covers `position`.
fn covered(shaft: &Shaft, position: f64) -> bool {
    shaft.profile.iter().any(|segment| segment.covers(position))
}

/// Internal load at `position` on `shaft` under its loads and solved `reactions`.
///
/// # Errors
///
/// Returns [`GeometryError::UndefinedGeometry`] when no profile segment covers
/// `position`.
pub fn profile_shaft(
    shaft: &Shaft,
    reactions: &[BearingReaction],
    position: f64,
) -> Result<InternalLoad, GeometryError> {
    if !covered(shaft, position) {
        return Err(GeometryError::UndefinedGeometry {
            shaft: shaft.id.clone(),
            position,
        });
    }
    let reaction_loads: Vec<ShaftLoad> = reactions.iter().map(BearingReaction::to_load).collect();
    Ok(cut(shaft.loads.iter().chain(&reaction_loads), position))
}

/// Lazy sequence of internal loads at evenly spaced stations along a shaft.
///
/// Stations that fall in a gap of the profile are skipped. Each item is computed
/// from the borrowed load set when it is requested, so cloning the iterator
/// restarts the sequence.
#[derive(Clone, Debug)]
pub struct ProfileIter<'a> {
    /// Profiled shaft.
    shaft: &'a Shaft,
    /// Bearing reactions as point loads.
    reactions: Vec<ShaftLoad>,
    /// First station.
    start: f64,
    /// Spacing of the stations.
    step: f64,
    /// Index of the next station.
    next: usize,
    /// Number of stations.
    samples: usize,
}

impl Iterator for ProfileIter<'_> {
    type Item = InternalLoad;

    fn next(&mut self) -> Option<InternalLoad> {
        while self.next < self.samples {
            let position = self.start + self.step * self.next as f64;
            self.next += 1;
            if covered(self.shaft, position) {
                return Some(cut(self.shaft.loads.iter().chain(&self.reactions), position));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.samples - self.next))
    }
}

/// Sample the internal loads of `shaft` at `samples` stations across its span.
///
/// # Errors
///
/// Returns [`GeometryError::UndefinedGeometry`] when the shaft has no profile.
pub fn profile_samples<'a>(
    shaft: &'a Shaft,
    reactions: &[BearingReaction],
    samples: usize,
) -> Result<ProfileIter<'a>, GeometryError> {
    let (start, end) = shaft.span().ok_or_else(|| GeometryError::UndefinedGeometry {
        shaft: shaft.id.clone(),
        position: 0.0,
    })?;
    let step = if samples > 1 {
        (end - start) / (samples - 1) as f64
    } else {
        0.0
    };
    Ok(ProfileIter {
        shaft,
        reactions: reactions.iter().map(BearingReaction::to_load).collect(),
        start,
        step,
        next: 0,
        samples,
    })
}
