//! Error types produced while resolving, solving or rating a gearbox.

use serde::Serialize;
use thiserror::Error;

use crate::shaft::Axis;

/// Error returned when a mesh or a mesh chain cannot be resolved.
///
/// # Examples
///
/// ```
/// use gearx::MeshError;
///
/// let error = MeshError::invalid("stage-1", "modules differ");
/// assert_eq!(error.to_string(), "mesh stage-1 is invalid: modules differ");
/// ```
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum MeshError {
    /// Returned when two gears cannot mesh or the chain topology is malformed.
    #[error("mesh {mesh} is invalid: {reason}")]
    InvalidMesh {
        /// Identifier of the offending mesh.
        mesh: String,
        /// Description of the defect.
        reason: String,
    },
}

impl MeshError {
    /// Create an [`MeshError::InvalidMesh`] for `mesh`.
    pub fn invalid(mesh: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMesh {
            mesh: mesh.into(),
            reason: reason.into(),
        }
    }
}

/// Error returned when the bearing reactions of a shaft cannot be determined.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum ReactionError {
    /// The equilibrium equations do not determine the reactions uniquely.
    #[error(
        "shaft {shaft} is statically indeterminate: {unknowns} unknown reactions, \
         {independent} independent equations"
    )]
    StaticallyIndeterminate {
        /// Identifier of the shaft.
        shaft: String,
        /// Number of unknown reaction components.
        unknowns: usize,
        /// Rank of the equilibrium system.
        independent: usize,
    },
    /// More bearings than the equilibrium equations can resolve.
    #[error(
        "shaft {shaft} is overconstrained: {bearings} bearings give {unknowns} unknowns \
         for {equations} equations"
    )]
    Overconstrained {
        /// Identifier of the shaft.
        shaft: String,
        /// Number of bearings on the shaft.
        bearings: usize,
        /// Number of unknown reaction components.
        unknowns: usize,
        /// Number of independent equations, including added constraints.
        equations: usize,
    },
    /// The supports cannot balance the applied loads.
    #[error("shaft {shaft} is not restrained against its loads (residual {residual:.3e})")]
    Unrestrained {
        /// Identifier of the shaft.
        shaft: String,
        /// Largest equilibrium residual left after the solve, in newtons or newton metres.
        residual: f64,
    },
    /// A reaction constraint acts on an axis its bearing does not support.
    #[error("shaft {shaft}: bearing {bearing} carries no {axis:?} reaction to constrain")]
    UnsupportedConstraint {
        /// Identifier of the shaft.
        shaft: String,
        /// Identifier of the bearing.
        bearing: String,
        /// Constrained axis.
        axis: Axis,
    },
    /// A reaction constraint names a bearing the shaft does not carry.
    #[error("shaft {shaft} has no bearing {bearing} to constrain")]
    UnknownBearing {
        /// Identifier of the shaft.
        shaft: String,
        /// Identifier named by the constraint.
        bearing: String,
    },
}

/// Error returned when the teeth of a mesh cannot be rated.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum ToothError {
    /// The gear material lacks a property the rating needs.
    #[error("gear {gear} on mesh {mesh}: material {material} has no {property}")]
    MissingMaterialData {
        /// Identifier of the mesh.
        mesh: String,
        /// Identifier of the gear.
        gear: String,
        /// Name of the material.
        material: String,
        /// Missing property.
        property: &'static str,
    },
}

/// Error returned when a shaft position has no defined geometry.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum GeometryError {
    /// No profile segment covers the requested axial coordinate.
    #[error("shaft {shaft} has no profile segment at x = {position} m")]
    UndefinedGeometry {
        /// Identifier of the shaft.
        shaft: String,
        /// Requested axial coordinate in metres.
        position: f64,
    },
    /// A profile segment carries a diameter that cannot hold stress.
    #[error("shaft {shaft} has a non-positive diameter {diameter} m at x = {position} m")]
    InvalidSection {
        /// Identifier of the shaft.
        shaft: String,
        /// Requested axial coordinate in metres.
        position: f64,
        /// Offending diameter in metres.
        diameter: f64,
    },
}

/// Error returned when a bearing life cannot be estimated.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum BearingError {
    /// The equivalent load is larger than the static load rating.
    #[error(
        "bearing {bearing}: equivalent load {equivalent_load:.1} N exceeds static rating \
         {static_rating:.1} N"
    )]
    LoadExceedsRating {
        /// Identifier of the bearing.
        bearing: String,
        /// Equivalent dynamic load in newtons.
        equivalent_load: f64,
        /// Catalog static load rating in newtons.
        static_rating: f64,
    },
}

/// Error returned while loading an [`AnalysisConfig`](crate::AnalysisConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid JSON for the expected schema.
    #[error("cannot decode configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure of a single analysis step.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum AnalysisError {
    /// Mesh resolution failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// Reaction solve failed.
    #[error(transparent)]
    Reaction(#[from] ReactionError),
    /// Section geometry is undefined.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Bearing rating failed.
    #[error(transparent)]
    Bearing(#[from] BearingError),
    /// Tooth rating failed.
    #[error(transparent)]
    Tooth(#[from] ToothError),
    /// A gear or shaft references an unknown component.
    #[error("{kind} {id} is not defined")]
    UnknownComponent {
        /// Kind of component that was looked up.
        kind: &'static str,
        /// Identifier that was not found.
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_keeps_source_message() {
        let error: AnalysisError = GeometryError::UndefinedGeometry {
            shaft: "input".into(),
            position: 0.5,
        }
        .into();
        assert_eq!(
            error.to_string(),
            "shaft input has no profile segment at x = 0.5 m"
        );
    }

    #[test]
    fn missing_gear_data_names_the_gear() {
        let error: AnalysisError = ToothError::MissingMaterialData {
            mesh: "stage-1".into(),
            gear: "g1".into(),
            material: "bare".into(),
            property: "bending allowable",
        }
        .into();
        assert_eq!(
            error.to_string(),
            "gear g1 on mesh stage-1: material bare has no bending allowable"
        );
    }

    #[test]
    fn errors_serialize_with_context() {
        let error = BearingError::LoadExceedsRating {
            bearing: "B1".into(),
            equivalent_load: 12_000.0,
            static_rating: 8_000.0,
        };
        let json = serde_json::to_value(&error).expect("error serializes");
        assert_eq!(json["LoadExceedsRating"]["bearing"], "B1");
    }
}
