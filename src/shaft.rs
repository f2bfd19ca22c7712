//! Shaft descriptors: axial profile, attached components and applied loads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bearing::Bearing;
use crate::errors::GeometryError;
use crate::geometry::{Force, Moment};
use crate::material::Material;

/// Distance within which a section is considered to sit on a shoulder, in metres.
const SHOULDER_TOLERANCE: f64 = 1.0e-9;

/// Cylindrical stretch of a shaft between two axial coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileSegment {
    /// Axial start in metres.
    pub start: f64,
    /// Axial end in metres.
    pub end: f64,
    /// Diameter in metres.
    pub diameter: f64,
    /// Radius of the fillets joining this segment to larger neighbours.
    pub fillet_radius: f64,
    /// Whether the segment carries a keyway.
    pub keyway: bool,
}

impl ProfileSegment {
    /// Create a plain segment.
    #[must_use]
    pub const fn new(start: f64, end: f64, diameter: f64) -> Self {
        Self {
            start,
            end,
            diameter,
            fillet_radius: 0.0,
            keyway: false,
        }
    }

    /// Set the shoulder fillet radius.
    #[must_use]
    pub const fn with_fillet(mut self, fillet_radius: f64) -> Self {
        self.fillet_radius = fillet_radius;
        self
    }

    /// Mark the segment as keyed.
    #[must_use]
    pub const fn with_keyway(mut self) -> Self {
        self.keyway = true;
        self
    }

    /// Returns `true` when `position` lies on the segment, ends included.
    #[must_use]
    pub fn covers(&self, position: f64) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Step to a larger diameter next to a section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shoulder {
    /// Diameter of the larger neighbouring segment.
    pub larger_diameter: f64,
    /// Fillet radius at the step.
    pub fillet_radius: f64,
}

/// Geometry of the shaft at a single axial coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalGeometry {
    /// Diameter carrying the load.
    pub diameter: f64,
    /// Shoulder fillet at the section, if any.
    pub shoulder: Option<Shoulder>,
    /// Whether a keyway cuts the section.
    pub keyway: bool,
}

impl LocalGeometry {
    /// Plain section without notches.
    #[must_use]
    pub const fn plain(diameter: f64) -> Self {
        Self {
            diameter,
            shoulder: None,
            keyway: false,
        }
    }
}

/// Point load applied to a shaft, reduced to the shaft axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaftLoad {
    /// Origin of the load, used in reports.
    pub label: String,
    /// Axial coordinate in metres.
    pub position: f64,
    /// Force in newtons.
    pub force: Force,
    /// Moment in newton metres; the X component is a torque.
    pub moment: Moment,
}

impl ShaftLoad {
    /// Create a load with a force and a moment.
    pub fn new(label: impl Into<String>, position: f64, force: Force, moment: Moment) -> Self {
        Self {
            label: label.into(),
            position,
            force,
            moment,
        }
    }

    /// Create a pure force.
    pub fn force(label: impl Into<String>, position: f64, force: Force) -> Self {
        Self::new(label, position, force, Moment::default())
    }

    /// Create a pure torque about the shaft axis.
    pub fn torque(label: impl Into<String>, position: f64, torque: f64) -> Self {
        Self::new(label, position, Force::default(), Moment::new(torque, 0.0, 0.0))
    }
}

/// Named axial coordinate at which results are requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShaftSection {
    /// Section name.
    pub name: String,
    /// Axial coordinate in metres.
    pub position: f64,
}

impl ShaftSection {
    /// Create a section.
    pub fn new(name: impl Into<String>, position: f64) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Gear keyed to a shaft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GearMount {
    /// Identifier of the gear in the mesh chain.
    pub gear: String,
    /// Axial coordinate of the gear mid-plane.
    pub position: f64,
}

/// Role of a shaft coupling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouplingRole {
    /// Receives the operating-point torque from the motor.
    Input,
    /// Delivers the remaining torque to the driven machine.
    Output,
}

/// Coupling at a shaft end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    /// Axial coordinate in metres.
    pub position: f64,
    /// Input or output.
    pub role: CouplingRole,
}

/// Reaction component along one global axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Shaft axis.
    X,
    /// Global Y.
    Y,
    /// Global Z.
    Z,
}

impl Axis {
    /// Index of the axis in a 3-vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Prescribed value of one bearing reaction component.
///
/// Added constraints supply the extra equations that make a shaft with more than
/// two bearings solvable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionConstraint {
    /// Identifier of the constrained bearing.
    pub bearing: String,
    /// Constrained component.
    pub axis: Axis,
    /// Prescribed reaction in newtons.
    pub value: f64,
}

/// Shaft with its profile and everything attached to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shaft {
    /// Unique identifier.
    pub id: String,
    /// Shaft material.
    pub material: Arc<Material>,
    /// Profile segments ordered along X.
    pub profile: Vec<ProfileSegment>,
    /// Externally applied loads.
    pub loads: Vec<ShaftLoad>,
    /// Supporting bearings.
    pub bearings: Vec<Bearing>,
    /// Gears keyed to the shaft.
    pub gears: Vec<GearMount>,
    /// Couplings at the shaft ends.
    pub couplings: Vec<Coupling>,
    /// Sections at which results are requested.
    pub sections: Vec<ShaftSection>,
    /// Extra equations for the reaction solve.
    pub constraints: Vec<ReactionConstraint>,
}

impl Shaft {
    /// Create an empty shaft.
    pub fn new(id: impl Into<String>, material: Arc<Material>) -> Self {
        Self {
            id: id.into(),
            material,
            profile: Vec::new(),
            loads: Vec::new(),
            bearings: Vec::new(),
            gears: Vec::new(),
            couplings: Vec::new(),
            sections: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Append a profile segment, keeping the profile sorted by start.
    #[must_use]
    pub fn with_segment(mut self, segment: ProfileSegment) -> Self {
        self.profile.push(segment);
        self.profile.sort_by(|a, b| a.start.total_cmp(&b.start));
        self
    }

    /// Add an external load.
    #[must_use]
    pub fn with_load(mut self, load: ShaftLoad) -> Self {
        self.loads.push(load);
        self
    }

    /// Add a bearing.
    #[must_use]
    pub fn with_bearing(mut self, bearing: Bearing) -> Self {
        self.bearings.push(bearing);
        self
    }

    /// Key a gear to the shaft at `position`.
    #[must_use]
    pub fn with_gear(mut self, gear: impl Into<String>, position: f64) -> Self {
        self.gears.push(GearMount {
            gear: gear.into(),
            position,
        });
        self
    }

    /// Add a coupling.
    #[must_use]
    pub fn with_coupling(mut self, position: f64, role: CouplingRole) -> Self {
        self.couplings.push(Coupling { position, role });
        self
    }

    /// Request results at a named section.
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, position: f64) -> Self {
        self.sections.push(ShaftSection::new(name, position));
        self
    }

    /// Prescribe one bearing reaction component.
    #[must_use]
    pub fn with_constraint(mut self, bearing: impl Into<String>, axis: Axis, value: f64) -> Self {
        self.constraints.push(ReactionConstraint {
            bearing: bearing.into(),
            axis,
            value,
        });
        self
    }

    /// Axial extent `(start, end)` of the profile.
    #[must_use]
    pub fn span(&self) -> Option<(f64, f64)> {
        let start = self.profile.iter().map(|s| s.start).reduce(f64::min)?;
        let end = self.profile.iter().map(|s| s.end).reduce(f64::max)?;
        Some((start, end))
    }

    /// Geometry of the shaft at `position`.
    ///
    /// At a step between two segments the smaller diameter governs and the step is
    /// reported as a shoulder with the fillet radius of the smaller segment.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UndefinedGeometry`] when no segment covers
    /// `position` and [`GeometryError::InvalidSection`] when the covering segment has
    /// a non-positive diameter.
    pub fn local_geometry(&self, position: f64) -> Result<LocalGeometry, GeometryError> {
        let segment = self
            .profile
            .iter()
            .filter(|segment| segment.covers(position))
            .min_by(|a, b| a.diameter.total_cmp(&b.diameter))
            .ok_or_else(|| GeometryError::UndefinedGeometry {
                shaft: self.id.clone(),
                position,
            })?;
        if segment.diameter <= 0.0 {
            return Err(GeometryError::InvalidSection {
                shaft: self.id.clone(),
                position,
                diameter: segment.diameter,
            });
        }

        let reach = segment.fillet_radius + SHOULDER_TOLERANCE;
        let shoulder = self
            .profile
            .iter()
            .filter(|other| other.diameter > segment.diameter)
            .filter(|other| {
                let step_at_start = (other.end - segment.start).abs() <= SHOULDER_TOLERANCE
                    && (position - segment.start).abs() <= reach;
                let step_at_end = (other.start - segment.end).abs() <= SHOULDER_TOLERANCE
                    && (position - segment.end).abs() <= reach;
                step_at_start || step_at_end
            })
            .map(|other| other.diameter)
            .reduce(f64::max)
            .map(|larger_diameter| Shoulder {
                larger_diameter,
                fillet_radius: segment.fillet_radius,
            });

        Ok(LocalGeometry {
            diameter: segment.diameter,
            shoulder,
            keyway: segment.keyway,
        })
    }

    /// Look up a declared section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&ShaftSection> {
        self.sections.iter().find(|section| section.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialKind;

    fn stepped() -> Shaft {
        let steel = Arc::new(Material::new("steel", MaterialKind::Steel, 400.0e6, 700.0e6));
        Shaft::new("s", steel)
            .with_segment(ProfileSegment::new(0.1, 0.2, 0.040))
            .with_segment(ProfileSegment::new(0.0, 0.1, 0.030).with_fillet(0.002).with_keyway())
            .with_segment(ProfileSegment::new(0.25, 0.3, 0.030))
    }

    #[test]
    fn profile_is_sorted_and_spanned() {
        let shaft = stepped();
        assert_eq!(shaft.profile[0].start, 0.0);
        assert_eq!(shaft.span(), Some((0.0, 0.3)));
    }

    #[test]
    fn shoulder_is_detected_on_smaller_side() {
        let shaft = stepped();
        let local = shaft.local_geometry(0.1).expect("covered");
        assert_eq!(local.diameter, 0.030);
        assert!(local.keyway);
        assert_eq!(
            local.shoulder,
            Some(Shoulder {
                larger_diameter: 0.040,
                fillet_radius: 0.002
            })
        );

        let inside = shaft.local_geometry(0.05).expect("covered");
        assert_eq!(inside.shoulder, None);
        let large = shaft.local_geometry(0.15).expect("covered");
        assert_eq!(large, LocalGeometry::plain(0.040));
    }

    #[test]
    fn gaps_are_undefined() {
        let shaft = stepped();
        let error = shaft.local_geometry(0.22).expect_err("gap");
        assert_eq!(
            error,
            GeometryError::UndefinedGeometry {
                shaft: "s".into(),
                position: 0.22
            }
        );
        assert!(shaft.local_geometry(-0.01).is_err());
    }

    #[test]
    fn load_constructors() {
        let torque = ShaftLoad::torque("motor", 0.0, 50.0);
        assert_eq!(torque.moment.x, 50.0);
        assert_eq!(torque.force, Force::default());
        let push = ShaftLoad::force("belt", 0.1, Force::new(0.0, 10.0, 0.0));
        assert_eq!(push.moment, Moment::default());
    }
}
