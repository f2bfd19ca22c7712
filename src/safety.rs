//! Static and fatigue safety of shaft sections.

use std::f64::consts::PI;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::concentration::{notch_factor, LoadMode, NotchFactor};
use crate::errors::GeometryError;
use crate::fatigue::{marin_factors, FatigueSettings, LoadCycle, MarinFactors, AXIAL_LOAD_FACTOR};
use crate::profile::InternalLoad;
use crate::shaft::{Shaft, ShaftSection};

/// Nominal stresses of a solid round section, in pascals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NominalStresses {
    /// Outer fibre bending stress `32 M / (π d³)`.
    pub bending: f64,
    /// Outer fibre torsional stress `16 T / (π d³)`.
    pub torsion: f64,
    /// Axial stress `4 N / (π d²)`.
    pub axial: f64,
}

impl NominalStresses {
    /// Stresses of `internal` on a section of diameter `d`.
    #[must_use]
    pub fn of(internal: &InternalLoad, d: f64) -> Self {
        Self {
            bending: 32.0 * internal.bending_moment() / (PI * d.powi(3)),
            torsion: 16.0 * internal.torque.abs() / (PI * d.powi(3)),
            axial: 4.0 * internal.axial_force.abs() / (PI * d.powi(2)),
        }
    }
}

/// Which limit sets the fatigue safety factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatigueCriterion {
    /// The section carries no stress.
    Unloaded,
    /// No alternating stress; the static factor applies.
    Static,
    /// No mean stress; the corrected endurance limit applies.
    EnduranceLimit,
    /// Modified Goodman line.
    Goodman,
    /// First-cycle yield (Langer) line.
    Yield,
}

/// Safety evaluation of one section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SafetyResult {
    /// Section name.
    pub section: String,
    /// Axial coordinate in metres.
    pub position: f64,
    /// Diameter carrying the load.
    pub diameter: f64,
    /// Nominal stresses.
    pub nominal: NominalStresses,
    /// Bending notch factor.
    pub bending: NotchFactor,
    /// Torsion notch factor.
    pub torsion: NotchFactor,
    /// Axial notch factor.
    pub axial: NotchFactor,
    /// Endurance limit corrections.
    pub marin: MarinFactors,
    /// Corrected endurance limit `S_e`.
    pub endurance_limit: f64,
    /// Von Mises alternating stress.
    pub alternating_stress: f64,
    /// Von Mises mean stress.
    pub mean_stress: f64,
    /// Von Mises stress at the peak of the cycle.
    pub peak_stress: f64,
    /// Yield safety factor.
    pub static_safety: f64,
    /// Fatigue safety factor.
    pub fatigue_safety: f64,
    /// Limit governing the fatigue safety factor.
    pub criterion: FatigueCriterion,
}

impl SafetyResult {
    /// Smaller of the two safety factors.
    #[must_use]
    pub fn safety(&self) -> f64 {
        self.static_safety.min(self.fatigue_safety)
    }

    /// Returns `true` when both factors reach their required values.
    #[must_use]
    pub fn meets(&self, static_required: f64, fatigue_required: f64) -> bool {
        self.static_safety >= static_required && self.fatigue_safety >= fatigue_required
    }
}

/// Von Mises equivalent of a normal and a shear stress.
fn von_mises(normal: f64, shear: f64) -> f64 {
    (normal.powi(2) + 3.0 * shear.powi(2)).sqrt()
}

/// Evaluate the static and fatigue safety of `section` on `shaft` carrying `internal`.
///
/// Concentrated stresses use the fatigue notch factors for both checks and are
/// combined by von Mises. The fatigue factor is the smaller of the Goodman and
/// Langer factors along the load line through the operating point.
///
/// # Errors
///
/// Returns [`GeometryError::UndefinedGeometry`] when no profile segment covers the
/// section and [`GeometryError::InvalidSection`] when its diameter is not positive.
pub fn evaluate_safety(
    shaft: &Shaft,
    section: &ShaftSection,
    internal: &InternalLoad,
    cycle: &LoadCycle,
    settings: &FatigueSettings,
) -> Result<SafetyResult, GeometryError> {
    let geometry = shaft.local_geometry(section.position)?;
    let material = shaft.material.as_ref();
    let d = geometry.diameter;
    let nominal = NominalStresses::of(internal, d);
    let bending = notch_factor(&geometry, material, LoadMode::Bending);
    let torsion = notch_factor(&geometry, material, LoadMode::Torsion);
    let axial = notch_factor(&geometry, material, LoadMode::Axial);

    let bending_stress = bending.fatigue * nominal.bending;
    let torsion_stress = torsion.fatigue * nominal.torsion;
    let axial_stress = axial.fatigue * nominal.axial;

    let alternating_bending = cycle.bending * bending_stress;
    let alternating_torsion = cycle.torsion * torsion_stress;
    let alternating_axial = cycle.axial * axial_stress;
    let pure_axial = alternating_axial > 0.0 && alternating_bending == 0.0 && alternating_torsion == 0.0;
    // Under combined loading the axial share carries its load factor into the stress.
    let axial_share = if pure_axial {
        alternating_axial
    } else {
        alternating_axial / AXIAL_LOAD_FACTOR
    };
    let alternating_stress = von_mises(alternating_bending + axial_share, alternating_torsion);
    let mean_stress = von_mises(
        (1.0 - cycle.bending) * bending_stress + (1.0 - cycle.axial) * axial_stress,
        (1.0 - cycle.torsion) * torsion_stress,
    );
    let peak_stress = von_mises(bending_stress + axial_stress, torsion_stress);

    let marin = marin_factors(material, d, pure_axial, settings);
    let endurance_limit = material.fatigue_limit() * marin.product();
    let sy = material.yield_strength;
    let sut = material.ultimate_strength;

    let static_safety = if peak_stress > 0.0 {
        sy / peak_stress
    } else {
        f64::INFINITY
    };
    let (fatigue_safety, criterion) = if alternating_stress == 0.0 && mean_stress == 0.0 {
        (f64::INFINITY, FatigueCriterion::Unloaded)
    } else if alternating_stress == 0.0 {
        (static_safety, FatigueCriterion::Static)
    } else if mean_stress == 0.0 {
        (endurance_limit / alternating_stress, FatigueCriterion::EnduranceLimit)
    } else {
        let goodman = 1.0 / (alternating_stress / endurance_limit + mean_stress / sut);
        let langer = sy / (alternating_stress + mean_stress);
        if goodman <= langer {
            (goodman, FatigueCriterion::Goodman)
        } else {
            (langer, FatigueCriterion::Yield)
        }
    };

    debug!(
        "shaft {} section {}: d = {d:.4} m, Kf = {:.3}/{:.3}, SF static {static_safety:.3}, \
         fatigue {fatigue_safety:.3} ({criterion:?})",
        shaft.id, section.name, bending.fatigue, torsion.fatigue
    );
    if fatigue_safety < 1.0 || static_safety < 1.0 {
        warn!("shaft {} section {} fails: SF = {:.3}", shaft.id, section.name, static_safety.min(fatigue_safety));
    }

    Ok(SafetyResult {
        section: section.name.clone(),
        position: section.position,
        diameter: d,
        nominal,
        bending,
        torsion,
        axial,
        marin,
        endurance_limit,
        alternating_stress,
        mean_stress,
        peak_stress,
        static_safety,
        fatigue_safety,
        criterion,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::material::{Material, MaterialKind};
    use crate::shaft::ProfileSegment;

    fn shaft(fillet: f64) -> Shaft {
        let steel = Arc::new(Material::new("steel", MaterialKind::Steel, 420.0e6, 700.0e6));
        Shaft::new("s", steel)
            .with_segment(ProfileSegment::new(0.0, 0.1, 0.030).with_fillet(fillet))
            .with_segment(ProfileSegment::new(0.1, 0.3, 0.036))
            .with_section("plain", 0.05)
            .with_section("shoulder", 0.1)
    }

    fn load(moment: f64, torque: f64) -> InternalLoad {
        InternalLoad {
            moment_z: moment,
            torque,
            ..InternalLoad::default()
        }
    }

    #[test]
    fn nominal_stresses_of_plain_section() {
        let shaft = shaft(0.002);
        let section = shaft.section("plain").expect("declared").clone();
        let result = evaluate_safety(
            &shaft,
            &section,
            &load(100.0, 50.0),
            &LoadCycle::default(),
            &FatigueSettings::default(),
        )
        .expect("covered");
        let z = PI * 0.03_f64.powi(3) / 32.0;
        assert_relative_eq!(result.nominal.bending, 100.0 / z, max_relative = 1.0e-12);
        assert_relative_eq!(result.nominal.torsion, 50.0 / (2.0 * z), max_relative = 1.0e-12);
        assert_eq!(result.bending, NotchFactor::NONE);
        assert_eq!(result.criterion, FatigueCriterion::Goodman);
        assert_relative_eq!(result.alternating_stress, result.nominal.bending, max_relative = 1.0e-12);
        assert_relative_eq!(
            result.mean_stress,
            3.0_f64.sqrt() * result.nominal.torsion,
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn steady_stress_falls_back_to_static() {
        let shaft = shaft(0.002);
        let section = shaft.section("shoulder").expect("declared").clone();
        let steady = LoadCycle {
            bending: 0.0,
            torsion: 0.0,
            axial: 0.0,
        };
        let result = evaluate_safety(
            &shaft,
            &section,
            &load(80.0, 60.0),
            &steady,
            &FatigueSettings::default(),
        )
        .expect("covered");
        assert_eq!(result.criterion, FatigueCriterion::Static);
        assert_eq!(result.fatigue_safety, result.static_safety);
    }

    #[test]
    fn fully_reversed_uses_endurance_limit() {
        let shaft = shaft(0.002);
        let section = shaft.section("shoulder").expect("declared").clone();
        let result = evaluate_safety(
            &shaft,
            &section,
            &load(80.0, 0.0),
            &LoadCycle::default(),
            &FatigueSettings::default(),
        )
        .expect("covered");
        assert_eq!(result.criterion, FatigueCriterion::EnduranceLimit);
        assert_relative_eq!(
            result.fatigue_safety,
            result.endurance_limit / result.alternating_stress,
            max_relative = 1.0e-12
        );
        assert!(result.bending.fatigue > 1.0);
    }

    #[test]
    fn larger_fillet_never_lowers_fatigue_safety() {
        let mut previous = 0.0;
        for step in 1..=10 {
            let shaft = shaft(0.0003 * f64::from(step));
            let section = shaft.section("shoulder").expect("declared").clone();
            let result = evaluate_safety(
                &shaft,
                &section,
                &load(80.0, 40.0),
                &LoadCycle::default(),
                &FatigueSettings::default(),
            )
            .expect("covered");
            assert!(result.fatigue_safety >= previous);
            previous = result.fatigue_safety;
        }
    }

    #[test]
    fn unloaded_section_is_infinitely_safe() {
        let shaft = shaft(0.002);
        let section = shaft.section("plain").expect("declared").clone();
        let result = evaluate_safety(
            &shaft,
            &section,
            &InternalLoad::default(),
            &LoadCycle::default(),
            &FatigueSettings::default(),
        )
        .expect("covered");
        assert_eq!(result.criterion, FatigueCriterion::Unloaded);
        assert!(result.static_safety.is_infinite());
    }

    #[test]
    fn section_off_the_profile() {
        let shaft = shaft(0.002);
        let result = evaluate_safety(
            &shaft,
            &ShaftSection::new("beyond", 0.5),
            &InternalLoad::default(),
            &LoadCycle::default(),
            &FatigueSettings::default(),
        );
        assert!(matches!(result, Err(GeometryError::UndefinedGeometry { .. })));
    }
}
