//! Bearing reactions from static equilibrium of a shaft.
//!
//! Bearings are modelled as points on the shaft axis that resist radial load.
//! Locating bearings also resist axial load. No bearing resists torque about the
//! shaft axis, so the applied torques must balance among themselves.

use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::errors::ReactionError;
use crate::geometry::{Force, Moment};
use crate::shaft::{Axis, Shaft, ShaftLoad};

/// Relative tolerance of the rank and residual checks.
const TOLERANCE: f64 = 1.0e-9;

/// Strategy used to set up the equilibrium equations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionMethod {
    /// Plane-by-plane solve for two bearings, general solve otherwise.
    #[default]
    Auto,
    /// Plane-by-plane solve only; shafts it cannot handle are rejected.
    ClosedForm,
    /// Six-equation linear system for any bearing layout.
    General,
}

/// Reaction exerted by a bearing on its shaft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BearingReaction {
    /// Identifier of the bearing.
    pub bearing: String,
    /// Axial coordinate of the bearing.
    pub position: f64,
    /// Reaction force in newtons.
    pub force: Force,
}

impl BearingReaction {
    /// Radial component.
    #[must_use]
    pub fn radial(&self) -> f64 {
        self.force.radial()
    }

    /// Axial component.
    #[must_use]
    pub fn axial(&self) -> f64 {
        self.force.x
    }

    /// The reaction as a load applied to the shaft.
    #[must_use]
    pub fn to_load(&self) -> ShaftLoad {
        ShaftLoad::force(self.bearing.clone(), self.position, self.force)
    }
}

/// Net force and net moment about the origin of a set of loads and reactions.
///
/// Both vanish for a shaft in equilibrium.
#[must_use]
pub fn residual(loads: &[ShaftLoad], reactions: &[BearingReaction]) -> (Force, Moment) {
    let reaction_loads = reactions.iter().map(BearingReaction::to_load);
    let mut force = Force::default();
    let mut moment = Moment::default();
    for load in loads.iter().cloned().chain(reaction_loads) {
        force += load.force;
        let lever = Moment::new(0.0, -load.position * load.force.z, load.position * load.force.y);
        moment += load.moment + lever;
    }
    (force, moment)
}

/// Solve the bearing reactions of `shaft` under its applied loads.
///
/// Reactions are returned in the order the bearings are declared.
///
/// # Errors
///
/// Returns [`ReactionError::Overconstrained`] when more than two bearings leave
/// the reactions undetermined, [`ReactionError::StaticallyIndeterminate`] when two
/// bearings do (coincident bearings, two locating bearings) and
/// [`ReactionError::Unrestrained`] when the supports cannot balance the loads.
/// A constraint on a missing bearing or on an axis its bearing does not carry
/// returns [`ReactionError::UnknownBearing`] or
/// [`ReactionError::UnsupportedConstraint`].
pub fn solve_reactions(
    shaft: &Shaft,
    method: ReactionMethod,
) -> Result<Vec<BearingReaction>, ReactionError> {
    let two_bearing = shaft.bearings.len() == 2 && shaft.constraints.is_empty();
    let reactions = match method {
        ReactionMethod::Auto if two_bearing && locating_count(shaft) <= 1 => {
            solve_closed_form(shaft)?
        }
        ReactionMethod::ClosedForm => {
            if !two_bearing {
                return Err(closed_form_mismatch(shaft));
            }
            solve_closed_form(shaft)?
        }
        ReactionMethod::Auto | ReactionMethod::General => solve_general(shaft)?,
    };
    let (force, moment) = residual(&shaft.loads, &reactions);
    debug!(
        "shaft {}: {} reactions solved, residual |F| = {:.3e}, |M| = {:.3e}",
        shaft.id,
        reactions.len(),
        force.norm(),
        moment.norm()
    );
    Ok(reactions)
}

/// Number of bearings that take axial load.
fn locating_count(shaft: &Shaft) -> usize {
    shaft.bearings.iter().filter(|bearing| bearing.locating).count()
}

/// Magnitude used to scale the tolerances of a load set.
fn load_scale(loads: &[ShaftLoad]) -> f64 {
    loads
        .iter()
        .map(|load| {
            let lever = load.force.norm() * load.position.abs();
            load.force.norm().max(load.moment.norm()).max(lever)
        })
        .fold(1.0, f64::max)
}

/// Error of a shaft the two-bearing closed form cannot solve.
fn closed_form_mismatch(shaft: &Shaft) -> ReactionError {
    let bearings = shaft.bearings.len();
    let unknowns = 2 * bearings + locating_count(shaft);
    if bearings < 2 {
        let (force, moment) = residual(&shaft.loads, &[]);
        ReactionError::Unrestrained {
            shaft: shaft.id.clone(),
            residual: force.norm().max(moment.norm()),
        }
    } else {
        ReactionError::Overconstrained {
            shaft: shaft.id.clone(),
            bearings,
            unknowns,
            equations: 5 + shaft.constraints.len(),
        }
    }
}

/// Independent solves of the XY plane, the XZ plane and the axial direction.
fn solve_closed_form(shaft: &Shaft) -> Result<Vec<BearingReaction>, ReactionError> {
    let first = &shaft.bearings[0];
    let second = &shaft.bearings[1];
    let span = second.position - first.position;
    let length = first.position.abs().max(second.position.abs()).max(1.0);
    if span.abs() <= TOLERANCE * length {
        return Err(ReactionError::StaticallyIndeterminate {
            shaft: shaft.id.clone(),
            unknowns: 4 + locating_count(shaft),
            independent: 2 + locating_count(shaft),
        });
    }
    if first.locating && second.locating {
        return Err(ReactionError::StaticallyIndeterminate {
            shaft: shaft.id.clone(),
            unknowns: 6,
            independent: 5,
        });
    }

    let mut total = Force::default();
    let mut torque = 0.0;
    // Moments about the first bearing.
    let mut moment_y = 0.0;
    let mut moment_z = 0.0;
    for load in &shaft.loads {
        let arm = load.position - first.position;
        total += load.force;
        torque += load.moment.x;
        moment_z += arm * load.force.y + load.moment.z;
        moment_y += load.moment.y - arm * load.force.z;
    }

    let tolerance = TOLERANCE * load_scale(&shaft.loads);
    if torque.abs() > tolerance {
        return Err(ReactionError::Unrestrained {
            shaft: shaft.id.clone(),
            residual: torque.abs(),
        });
    }
    let locating = [first.locating, second.locating];
    if !locating.contains(&true) && total.x.abs() > tolerance {
        return Err(ReactionError::Unrestrained {
            shaft: shaft.id.clone(),
            residual: total.x.abs(),
        });
    }

    let second_y = -moment_z / span;
    let second_z = moment_y / span;
    let forces = [
        Force::new(0.0, -total.y - second_y, -total.z - second_z),
        Force::new(0.0, second_y, second_z),
    ];
    Ok(shaft
        .bearings
        .iter()
        .zip(forces)
        .zip(locating)
        .map(|((bearing, mut force), locating)| {
            if locating {
                force.x = -total.x;
            }
            BearingReaction {
                bearing: bearing.id.clone(),
                position: bearing.position,
                force,
            }
        })
        .collect())
}

/// Unknown reaction component: bearing index and axis.
type Unknown = (usize, Axis);

/// Collect the reaction components each bearing can carry.
fn collect_unknowns(shaft: &Shaft) -> Vec<Unknown> {
    let mut unknowns = Vec::new();
    for (idx, bearing) in shaft.bearings.iter().enumerate() {
        if bearing.locating {
            unknowns.push((idx, Axis::X));
        }
        unknowns.push((idx, Axis::Y));
        unknowns.push((idx, Axis::Z));
    }
    unknowns
}

/// Assemble the equilibrium matrix: six balance rows followed by one row per constraint.
fn build_equilibrium_matrix(
    shaft: &Shaft,
    unknowns: &[Unknown],
) -> Result<DMatrix<f64>, ReactionError> {
    let mut matrix = DMatrix::zeros(6 + shaft.constraints.len(), unknowns.len());
    for (col, &(idx, axis)) in unknowns.iter().enumerate() {
        let x = shaft.bearings[idx].position;
        match axis {
            Axis::X => matrix[(0, col)] = 1.0,
            Axis::Y => {
                matrix[(1, col)] = 1.0;
                matrix[(5, col)] = x;
            }
            Axis::Z => {
                matrix[(2, col)] = 1.0;
                matrix[(4, col)] = -x;
            }
        }
    }
    for (offset, constraint) in shaft.constraints.iter().enumerate() {
        let idx = shaft
            .bearings
            .iter()
            .position(|bearing| bearing.id == constraint.bearing)
            .ok_or_else(|| ReactionError::UnknownBearing {
                shaft: shaft.id.clone(),
                bearing: constraint.bearing.clone(),
            })?;
        let col = unknowns
            .iter()
            .position(|&u| u == (idx, constraint.axis))
            .ok_or_else(|| ReactionError::UnsupportedConstraint {
                shaft: shaft.id.clone(),
                bearing: constraint.bearing.clone(),
                axis: constraint.axis,
            })?;
        matrix[(6 + offset, col)] = 1.0;
    }
    Ok(matrix)
}

/// Assemble the right-hand side: negated applied resultants and constraint values.
fn build_load_vector(shaft: &Shaft) -> DVector<f64> {
    let (force, moment) = residual(&shaft.loads, &[]);
    let mut rhs = DVector::zeros(6 + shaft.constraints.len());
    rhs[0] = -force.x;
    rhs[1] = -force.y;
    rhs[2] = -force.z;
    rhs[3] = -moment.x;
    rhs[4] = -moment.y;
    rhs[5] = -moment.z;
    for (offset, constraint) in shaft.constraints.iter().enumerate() {
        rhs[6 + offset] = constraint.value;
    }
    rhs
}

/// Least-squares solve of the full equilibrium system with rank diagnosis.
fn solve_general(shaft: &Shaft) -> Result<Vec<BearingReaction>, ReactionError> {
    let unknowns = collect_unknowns(shaft);
    let matrix = build_equilibrium_matrix(shaft, &unknowns)?;
    let rhs = build_load_vector(shaft);
    let scale = load_scale(&shaft.loads);

    let solution = if unknowns.is_empty() {
        DVector::zeros(0)
    } else {
        let column_scale = shaft
            .bearings
            .iter()
            .map(|bearing| bearing.position.abs())
            .fold(1.0, f64::max);
        let svd = matrix.clone().svd(true, true);
        let rank = svd.rank(TOLERANCE * column_scale);
        if rank < unknowns.len() {
            let bearings = shaft.bearings.len();
            return Err(if bearings > 2 {
                ReactionError::Overconstrained {
                    shaft: shaft.id.clone(),
                    bearings,
                    unknowns: unknowns.len(),
                    equations: rank,
                }
            } else {
                ReactionError::StaticallyIndeterminate {
                    shaft: shaft.id.clone(),
                    unknowns: unknowns.len(),
                    independent: rank,
                }
            });
        }
        svd.solve(&rhs, TOLERANCE * column_scale)
            .map_err(|_| ReactionError::StaticallyIndeterminate {
                shaft: shaft.id.clone(),
                unknowns: unknowns.len(),
                independent: rank,
            })?
    };

    let misfit = (&matrix * &solution - &rhs).amax();
    if misfit > TOLERANCE * scale {
        return Err(ReactionError::Unrestrained {
            shaft: shaft.id.clone(),
            residual: misfit,
        });
    }

    let mut forces = vec![Force::default(); shaft.bearings.len()];
    for (&(idx, axis), value) in unknowns.iter().zip(solution.iter()) {
        match axis {
            Axis::X => forces[idx].x = *value,
            Axis::Y => forces[idx].y = *value,
            Axis::Z => forces[idx].z = *value,
        }
    }
    Ok(shaft
        .bearings
        .iter()
        .zip(forces)
        .map(|(bearing, force)| BearingReaction {
            bearing: bearing.id.clone(),
            position: bearing.position,
            force,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::bearing::{Bearing, BearingKind};
    use crate::material::{Material, MaterialKind};

    fn shaft(bearings: &[(&str, f64, bool)]) -> Shaft {
        let steel = Arc::new(Material::new("steel", MaterialKind::Steel, 400.0e6, 700.0e6));
        bearings
            .iter()
            .fold(Shaft::new("s", steel), |shaft, &(id, x, locating)| {
                let bearing = Bearing::new(id, x, BearingKind::Ball, 20_000.0, 12_000.0);
                shaft.with_bearing(if locating { bearing.locating() } else { bearing })
            })
    }

    fn assert_balanced(shaft: &Shaft, reactions: &[BearingReaction]) {
        let (force, moment) = residual(&shaft.loads, reactions);
        assert!(force.norm() < 1.0e-6, "unbalanced force {force:?}");
        assert!(moment.norm() < 1.0e-6, "unbalanced moment {moment:?}");
    }

    #[test]
    fn symmetric_midspan_load() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.4, false)])
            .with_load(ShaftLoad::force("gear", 0.2, Force::new(0.0, -1_000.0, 0.0)));
        for method in [ReactionMethod::Auto, ReactionMethod::ClosedForm, ReactionMethod::General] {
            let reactions = solve_reactions(&shaft, method).expect("solvable");
            assert_relative_eq!(reactions[0].force.y, 500.0, epsilon = 1.0e-6);
            assert_relative_eq!(reactions[1].force.y, 500.0, epsilon = 1.0e-6);
            assert_balanced(&shaft, &reactions);
        }
    }

    #[test]
    fn methods_agree_on_spatial_load() {
        let shaft = shaft(&[("A", 0.05, false), ("B", 0.35, true)])
            .with_load(ShaftLoad::new(
                "helical",
                0.12,
                Force::new(300.0, -1_200.0, 450.0),
                Moment::new(40.0, 15.0, -22.5),
            ))
            .with_load(ShaftLoad::new(
                "pinion",
                0.42,
                Force::new(-100.0, 800.0, -200.0),
                Moment::new(-40.0, -6.0, 8.0),
            ));
        let closed = solve_reactions(&shaft, ReactionMethod::ClosedForm).expect("solvable");
        let general = solve_reactions(&shaft, ReactionMethod::General).expect("solvable");
        assert_balanced(&shaft, &closed);
        for (a, b) in closed.iter().zip(&general) {
            assert_relative_eq!(a.force.x, b.force.x, epsilon = 1.0e-6);
            assert_relative_eq!(a.force.y, b.force.y, epsilon = 1.0e-6);
            assert_relative_eq!(a.force.z, b.force.z, epsilon = 1.0e-6);
        }
        assert_relative_eq!(closed[1].axial(), -200.0, epsilon = 1.0e-9);
        assert_eq!(closed[0].axial(), 0.0);
    }

    #[test]
    fn three_bearings_are_overconstrained() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.2, false), ("C", 0.4, false)])
            .with_load(ShaftLoad::force("gear", 0.1, Force::new(0.0, -1_000.0, 0.0)));
        let error = solve_reactions(&shaft, ReactionMethod::Auto).expect_err("overconstrained");
        assert!(matches!(error, ReactionError::Overconstrained { bearings: 3, .. }));
        let error = solve_reactions(&shaft, ReactionMethod::ClosedForm).expect_err("overconstrained");
        assert!(matches!(error, ReactionError::Overconstrained { .. }));
    }

    #[test]
    fn constraints_resolve_extra_bearings() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.2, false), ("C", 0.4, false)])
            .with_load(ShaftLoad::force("gear", 0.1, Force::new(0.0, -1_000.0, 0.0)))
            .with_constraint("B", Axis::Y, 200.0)
            .with_constraint("B", Axis::Z, 0.0);
        let reactions = solve_reactions(&shaft, ReactionMethod::Auto).expect("constrained");
        assert_relative_eq!(reactions[1].force.y, 200.0, epsilon = 1.0e-6);
        assert_balanced(&shaft, &reactions);
    }

    #[test]
    fn constraint_on_missing_bearing() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.4, false)]).with_constraint("Z", Axis::Y, 0.0);
        assert_eq!(
            solve_reactions(&shaft, ReactionMethod::General),
            Err(ReactionError::UnknownBearing {
                shaft: "s".into(),
                bearing: "Z".into()
            })
        );
    }

    #[test]
    fn constraint_on_an_unsupported_axis() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.4, false)])
            .with_load(ShaftLoad::force("gear", 0.2, Force::new(0.0, -1_000.0, 0.0)))
            .with_constraint("B", Axis::X, 0.0);
        for method in [ReactionMethod::Auto, ReactionMethod::General] {
            assert_eq!(
                solve_reactions(&shaft, method),
                Err(ReactionError::UnsupportedConstraint {
                    shaft: "s".into(),
                    bearing: "B".into(),
                    axis: Axis::X,
                })
            );
        }
    }

    #[test]
    fn coincident_bearings_are_indeterminate() {
        let shaft = shaft(&[("A", 0.1, true), ("B", 0.1, false)])
            .with_load(ShaftLoad::force("gear", 0.3, Force::new(0.0, -1_000.0, 0.0)));
        for method in [ReactionMethod::Auto, ReactionMethod::General] {
            let error = solve_reactions(&shaft, method).expect_err("indeterminate");
            assert!(matches!(error, ReactionError::StaticallyIndeterminate { .. }));
        }
    }

    #[test]
    fn two_locating_bearings_are_indeterminate() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.4, true)])
            .with_load(ShaftLoad::force("gear", 0.2, Force::new(100.0, -1_000.0, 0.0)));
        let error = solve_reactions(&shaft, ReactionMethod::Auto).expect_err("indeterminate");
        assert_eq!(
            error,
            ReactionError::StaticallyIndeterminate {
                shaft: "s".into(),
                unknowns: 6,
                independent: 5
            }
        );
    }

    #[test]
    fn unbalanced_torque_is_unrestrained() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.4, false)])
            .with_load(ShaftLoad::torque("motor", 0.0, 50.0));
        for method in [ReactionMethod::ClosedForm, ReactionMethod::General] {
            let error = solve_reactions(&shaft, method).expect_err("torque");
            assert!(matches!(error, ReactionError::Unrestrained { .. }));
        }
    }

    #[test]
    fn axial_load_needs_locating_bearing() {
        let shaft = shaft(&[("A", 0.0, false), ("B", 0.4, false)])
            .with_load(ShaftLoad::force("thrust", 0.2, Force::new(100.0, 0.0, 0.0)));
        for method in [ReactionMethod::Auto, ReactionMethod::General] {
            let error = solve_reactions(&shaft, method).expect_err("axial");
            assert!(matches!(error, ReactionError::Unrestrained { .. }));
        }
    }

    #[test]
    fn overhung_load() {
        let shaft = shaft(&[("A", 0.0, true), ("B", 0.2, false)])
            .with_load(ShaftLoad::force("pulley", 0.3, Force::new(0.0, 0.0, 100.0)));
        let reactions = solve_reactions(&shaft, ReactionMethod::Auto).expect("solvable");
        assert_relative_eq!(reactions[0].force.z, 50.0, epsilon = 1.0e-9);
        assert_relative_eq!(reactions[1].force.z, -150.0, epsilon = 1.0e-9);
    }
}
