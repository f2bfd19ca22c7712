//! Whole-gearbox analysis at one operating point.
//!
//! Every step records its own `Result`, so a shaft that cannot be solved or a
//! bearing that is overloaded does not hide the results of the others.

use log::{debug, warn};
use serde::Serialize;

use crate::bearing::{estimate_bearing_life, BearingLife};
use crate::config::{AnalysisConfig, Requirements};
use crate::errors::AnalysisError;
use crate::mesh::{resolve_mesh, MeshChain, MeshForces, MeshSide, OperatingPoint};
use crate::profile::{profile_samples, profile_shaft, InternalLoad};
use crate::reactions::{solve_reactions, BearingReaction};
use crate::safety::{evaluate_safety, SafetyResult};
use crate::shaft::{CouplingRole, Shaft, ShaftLoad};
use crate::tooth::{verify_gear_tooth, MeshRating, Straddle};

/// Gear train and the shafts carrying it.
#[derive(Clone, Debug, Default)]
pub struct Gearbox {
    /// Meshes and coaxial couplings.
    pub chain: MeshChain,
    /// Shafts with their gears, bearings and couplings.
    pub shafts: Vec<Shaft>,
}

impl Gearbox {
    /// Create a gearbox from a chain and its shafts.
    #[must_use]
    pub fn new(chain: MeshChain, shafts: Vec<Shaft>) -> Self {
        Self { chain, shafts }
    }

    /// Shaft carrying gear `gear`.
    #[must_use]
    pub fn shaft_of(&self, gear: &str) -> Option<&Shaft> {
        self.shafts
            .iter()
            .find(|shaft| shaft.gears.iter().any(|mount| mount.gear == gear))
    }
}

/// Internal load and safety of one shaft section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionReport {
    /// Internal load at the section.
    pub internal: InternalLoad,
    /// Safety evaluation.
    pub safety: SafetyResult,
}

/// Results of one shaft.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShaftReport {
    /// Identifier of the shaft.
    pub shaft: String,
    /// Shaft speed in rpm.
    pub speed: f64,
    /// Applied loads, including tooth loads and coupling torques.
    pub loads: Vec<ShaftLoad>,
    /// Bearing reactions.
    pub reactions: Result<Vec<BearingReaction>, AnalysisError>,
    /// Sampled internal loads along the shaft.
    pub profile: Vec<InternalLoad>,
    /// Declared sections in declaration order.
    pub sections: Vec<Result<SectionReport, AnalysisError>>,
    /// Bearing lives in declaration order.
    pub bearings: Vec<Result<BearingLife, AnalysisError>>,
}

/// Results of a whole gearbox.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GearboxReport {
    /// Operating point analysed.
    pub operating_point: OperatingPoint,
    /// Resolved mesh forces.
    pub meshes: Result<Vec<MeshForces>, AnalysisError>,
    /// Tooth ratings in mesh order.
    pub ratings: Vec<Result<MeshRating, AnalysisError>>,
    /// Shaft results in declaration order.
    pub shafts: Vec<ShaftReport>,
}

impl GearboxReport {
    /// Smallest section safety factor, if any section was evaluated.
    #[must_use]
    pub fn min_section_safety(&self) -> Option<f64> {
        self.sections().map(|report| report.safety.safety()).reduce(f64::min)
    }

    /// Smallest tooth safety factor, if any mesh was rated.
    #[must_use]
    pub fn min_tooth_safety(&self) -> Option<f64> {
        self.ratings
            .iter()
            .flatten()
            .map(MeshRating::safety)
            .reduce(f64::min)
    }

    /// Shortest modified bearing life, if any bearing was rated.
    #[must_use]
    pub fn min_bearing_life(&self) -> Option<f64> {
        self.shafts
            .iter()
            .flat_map(|shaft| shaft.bearings.iter().flatten())
            .map(|life| life.modified_life)
            .reduce(f64::min)
    }

    /// Every failed step.
    pub fn errors(&self) -> impl Iterator<Item = &AnalysisError> {
        let mesh = self.meshes.as_ref().err();
        let ratings = self.ratings.iter().filter_map(|r| r.as_ref().err());
        let shafts = self.shafts.iter().flat_map(|shaft| {
            let reactions = shaft.reactions.as_ref().err();
            let sections = shaft.sections.iter().filter_map(|s| s.as_ref().err());
            let bearings = shaft.bearings.iter().filter_map(|b| b.as_ref().err());
            reactions.into_iter().chain(sections).chain(bearings)
        });
        mesh.into_iter().chain(ratings).chain(shafts)
    }

    /// Returns `true` when every step succeeded and every result meets `requirements`.
    #[must_use]
    pub fn passes(&self, requirements: &Requirements) -> bool {
        self.errors().next().is_none()
            && self.sections().all(|report| {
                report
                    .safety
                    .meets(requirements.static_safety, requirements.fatigue_safety)
            })
            && self.ratings.iter().flatten().all(|rating| {
                [&rating.driving, &rating.driven].iter().all(|gear| {
                    gear.bending_safety >= requirements.bending_safety
                        && gear.pitting_safety >= requirements.pitting_safety
                })
            })
            && self
                .shafts
                .iter()
                .flat_map(|shaft| shaft.bearings.iter().flatten())
                .all(|life| life.meets(requirements.bearing_life))
    }

    /// Every evaluated section.
    fn sections(&self) -> impl Iterator<Item = &SectionReport> {
        self.shafts
            .iter()
            .flat_map(|shaft| shaft.sections.iter().flatten())
    }
}

/// Tooth loads, coupling torques and speed of a shaft.
fn load_shaft(
    shaft: &Shaft,
    forces: &[MeshForces],
    operating_point: &OperatingPoint,
) -> Result<(Shaft, f64), AnalysisError> {
    let mut loaded = shaft.clone();
    let mut speed = None;
    for mount in &shaft.gears {
        let mut meshed = false;
        for mesh in forces {
            if mesh.driving_gear == mount.gear {
                loaded.loads.push(mesh.shaft_load(MeshSide::Driving, mount.position));
                speed.get_or_insert(mesh.speed_in);
                meshed = true;
            }
            if mesh.driven_gear == mount.gear {
                loaded.loads.push(mesh.shaft_load(MeshSide::Driven, mount.position));
                speed.get_or_insert(mesh.speed_out);
                meshed = true;
            }
        }
        if !meshed {
            return Err(AnalysisError::UnknownComponent {
                kind: "gear",
                id: mount.gear.clone(),
            });
        }
    }

    for coupling in &shaft.couplings {
        if coupling.role == CouplingRole::Input {
            loaded
                .loads
                .push(ShaftLoad::torque("input", coupling.position, operating_point.torque));
            speed.get_or_insert(operating_point.speed);
        }
    }
    let outputs: Vec<f64> = shaft
        .couplings
        .iter()
        .filter(|coupling| coupling.role == CouplingRole::Output)
        .map(|coupling| coupling.position)
        .collect();
    if !outputs.is_empty() {
        let unbalanced: f64 = loaded.loads.iter().map(|load| load.moment.x).sum();
        let share = -unbalanced / outputs.len() as f64;
        for position in outputs {
            loaded.loads.push(ShaftLoad::torque("output", position, share));
        }
    }
    Ok((loaded, speed.unwrap_or(0.0).abs()))
}

/// Offset of a gear from the middle of its shaft's bearing span, over the span.
fn straddle_ratio(gearbox: &Gearbox, gear: &str) -> f64 {
    let Some(shaft) = gearbox.shaft_of(gear) else {
        return 0.0;
    };
    let positions = shaft.bearings.iter().map(|bearing| bearing.position);
    let (Some(first), Some(last)) = (
        positions.clone().reduce(f64::min),
        positions.reduce(f64::max),
    ) else {
        return 0.0;
    };
    let span = last - first;
    let Some(mount) = shaft.gears.iter().find(|mount| mount.gear == gear) else {
        return 0.0;
    };
    if span <= 0.0 {
        0.0
    } else {
        (mount.position - (first + last) / 2.0).abs() / span
    }
}

/// Load, solve, profile and rate one shaft.
fn analyze_shaft(
    shaft: &Shaft,
    forces: &[MeshForces],
    operating_point: &OperatingPoint,
    config: &AnalysisConfig,
) -> ShaftReport {
    let (loaded, speed) = match load_shaft(shaft, forces, operating_point) {
        Ok(loaded) => loaded,
        Err(error) => {
            warn!("shaft {}: {error}", shaft.id);
            return ShaftReport {
                shaft: shaft.id.clone(),
                speed: 0.0,
                loads: Vec::new(),
                reactions: Err(error),
                profile: Vec::new(),
                sections: Vec::new(),
                bearings: Vec::new(),
            };
        }
    };

    let reactions = solve_reactions(&loaded, config.reaction_method).map_err(AnalysisError::from);
    let (profile, sections, bearings) = match &reactions {
        Ok(reactions) => {
            let profile = match profile_samples(&loaded, reactions, config.profile_samples) {
                Ok(samples) => samples.collect(),
                Err(error) => {
                    warn!("shaft {}: no load profile: {error}", shaft.id);
                    Vec::new()
                }
            };
            let sections = loaded
                .sections
                .iter()
                .map(|section| -> Result<SectionReport, AnalysisError> {
                    let internal = profile_shaft(&loaded, reactions, section.position)?;
                    let safety = evaluate_safety(
                        &loaded,
                        section,
                        &internal,
                        &config.load_cycle,
                        &config.fatigue,
                    )?;
                    Ok(SectionReport { internal, safety })
                })
                .collect();
            let bearings = loaded
                .bearings
                .iter()
                .zip(reactions)
                .map(|(bearing, reaction)| {
                    estimate_bearing_life(bearing, reaction.force, speed, &config.bearing_life)
                        .map_err(AnalysisError::from)
                })
                .collect();
            (profile, sections, bearings)
        }
        Err(error) => {
            warn!("shaft {}: {error}", shaft.id);
            (Vec::new(), Vec::new(), Vec::new())
        }
    };

    ShaftReport {
        shaft: shaft.id.clone(),
        speed,
        loads: loaded.loads,
        reactions,
        profile,
        sections,
        bearings,
    }
}

/// Run the complete analysis of `gearbox` at `operating_point`.
///
/// When the mesh chain cannot be resolved no shaft can be loaded, and the report
/// carries only the mesh error.
#[must_use]
pub fn analyze(
    gearbox: &Gearbox,
    operating_point: &OperatingPoint,
    config: &AnalysisConfig,
) -> GearboxReport {
    let forces = match resolve_mesh(&gearbox.chain, operating_point) {
        Ok(forces) => forces,
        Err(error) => {
            warn!("{error}");
            return GearboxReport {
                operating_point: *operating_point,
                meshes: Err(error.into()),
                ratings: Vec::new(),
                shafts: Vec::new(),
            };
        }
    };

    let ratings = gearbox
        .chain
        .meshes()
        .iter()
        .zip(&forces)
        .map(|(mesh, mesh_forces)| {
            let straddle = Straddle {
                driving: straddle_ratio(gearbox, &mesh.driving.id),
                driven: straddle_ratio(gearbox, &mesh.driven.id),
            };
            verify_gear_tooth(mesh, mesh_forces, &straddle, &config.tooth).map_err(|error| {
                warn!("{error}");
                AnalysisError::from(error)
            })
        })
        .collect();

    let shafts = gearbox
        .shafts
        .iter()
        .map(|shaft| analyze_shaft(shaft, &forces, operating_point, config))
        .collect();

    let report = GearboxReport {
        operating_point: *operating_point,
        meshes: Ok(forces),
        ratings,
        shafts,
    };
    debug!(
        "gearbox analysed: {} failed steps, passes = {}",
        report.errors().count(),
        report.passes(&config.requirements)
    );
    report
}
