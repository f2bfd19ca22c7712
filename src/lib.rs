#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod analysis;
mod bearing;
pub mod concentration;
mod config;
mod errors;
pub mod fatigue;
mod gear;
mod geometry;
pub mod interpolation;
mod material;
mod mesh;
mod profile;
mod reactions;
mod safety;
mod shaft;
pub mod tooth;
pub mod units;

pub use analysis::{analyze, Gearbox, GearboxReport, SectionReport, ShaftReport};
pub use bearing::{
    estimate_bearing_life, rated_viscosity, skf_factor, Bearing, BearingKind, BearingLife,
    BearingLifeSettings, LoadFactors,
};
pub use config::{AnalysisConfig, Requirements};
pub use errors::{
    AnalysisError, BearingError, ConfigError, GeometryError, MeshError, ReactionError, ToothError,
};
pub use fatigue::{FatigueSettings, LoadCycle, MarinFactors};
pub use gear::{Gear, QUALITY_RANGE};
pub use geometry::{force, moment, Force, Moment};
pub use material::{Material, MaterialKind, SurfaceFinish};
pub use mesh::{resolve_mesh, Mesh, MeshChain, MeshForces, MeshKind, MeshSide, OperatingPoint};
pub use profile::{profile_samples, profile_shaft, InternalLoad, ProfileIter};
pub use reactions::{residual, solve_reactions, BearingReaction, ReactionMethod};
pub use safety::{evaluate_safety, FatigueCriterion, NominalStresses, SafetyResult};
pub use shaft::{
    Axis, Coupling, CouplingRole, GearMount, LocalGeometry, ProfileSegment, ReactionConstraint,
    Shaft, ShaftLoad, ShaftSection, Shoulder,
};
pub use tooth::{verify_gear_tooth, MeshRating, Straddle, ToothRating, ToothRatingFactors};
