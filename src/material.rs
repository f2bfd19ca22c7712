//! Material strength descriptors shared by gears and shafts.

use serde::{Deserialize, Serialize};

use crate::units::{mpa_to_pa, pa_to_mpa};

/// Material family, used to pick the elastic coefficient of a gear pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Carbon or alloy steel.
    Steel,
    /// Malleable cast iron.
    MalleableIron,
    /// Nodular (ductile) cast iron.
    NodularIron,
    /// Grey cast iron.
    CastIron,
    /// Aluminium bronze.
    AluminumBronze,
    /// Tin bronze.
    TinBronze,
}

impl MaterialKind {
    /// Row/column of this family in the elastic coefficient chart.
    pub(crate) fn chart_index(self) -> usize {
        match self {
            Self::Steel => 0,
            Self::MalleableIron => 1,
            Self::NodularIron => 2,
            Self::CastIron => 3,
            Self::AluminumBronze => 4,
            Self::TinBronze => 5,
        }
    }
}

/// Surface condition of a machined part, driving the Marin surface factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceFinish {
    /// Ground surface.
    Ground,
    /// Machined or cold drawn.
    Machined,
    /// Hot rolled.
    HotRolled,
    /// As forged.
    AsForged,
}

impl SurfaceFinish {
    /// Coefficients `(a, b)` of `k_a = a * S_ut^b` with `S_ut` in MPa.
    #[must_use]
    pub fn marin_coefficients(self) -> (f64, f64) {
        match self {
            Self::Ground => (1.58, -0.085),
            Self::Machined => (4.51, -0.265),
            Self::HotRolled => (57.7, -0.718),
            Self::AsForged => (272.0, -0.995),
        }
    }
}

/// Strength properties of a material. Stresses are in pascals.
///
/// # Examples
/// ```
/// use gearx::{Material, MaterialKind, SurfaceFinish};
///
/// let steel = Material::new("C45", MaterialKind::Steel, 370.0e6, 630.0e6)
///     .with_surface(SurfaceFinish::Ground);
/// assert_eq!(steel.fatigue_limit(), 315.0e6);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Human readable label.
    pub name: String,
    /// Material family.
    pub kind: MaterialKind,
    /// Tensile yield strength.
    pub yield_strength: f64,
    /// Ultimate tensile strength.
    pub ultimate_strength: f64,
    /// Rotating-beam fatigue limit; derived from the ultimate strength when absent.
    pub endurance_limit: Option<f64>,
    /// Surface finish of shafts made from this material.
    pub surface: SurfaceFinish,
    /// Brinell hardness, required to rate gears.
    pub brinell_hardness: Option<f64>,
    /// Allowable gear tooth bending stress `σ_FP`.
    pub bending_strength: Option<f64>,
    /// Allowable gear contact stress `σ_HP`.
    pub contact_strength: Option<f64>,
}

impl Material {
    /// Create a machined material with the given static strengths.
    ///
    /// Hardness and gear allowables are unknown until set with
    /// [`Material::with_hardness`] and [`Material::with_gear_allowables`]; a gear
    /// made from a material without them cannot be rated.
    pub fn new(
        name: impl Into<String>,
        kind: MaterialKind,
        yield_strength: f64,
        ultimate_strength: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            yield_strength,
            ultimate_strength,
            endurance_limit: None,
            surface: SurfaceFinish::Machined,
            brinell_hardness: None,
            bending_strength: None,
            contact_strength: None,
        }
    }

    /// Set a measured rotating-beam fatigue limit.
    #[must_use]
    pub fn with_fatigue_limit(mut self, endurance_limit: f64) -> Self {
        self.endurance_limit = Some(endurance_limit);
        self
    }

    /// Set the surface finish.
    #[must_use]
    pub fn with_surface(mut self, surface: SurfaceFinish) -> Self {
        self.surface = surface;
        self
    }

    /// Set the Brinell hardness.
    #[must_use]
    pub fn with_hardness(mut self, brinell_hardness: f64) -> Self {
        self.brinell_hardness = Some(brinell_hardness);
        self
    }

    /// Set the allowable tooth bending and contact stresses.
    #[must_use]
    pub fn with_gear_allowables(mut self, bending_strength: f64, contact_strength: f64) -> Self {
        self.bending_strength = Some(bending_strength);
        self.contact_strength = Some(contact_strength);
        self
    }

    /// Uncorrected fatigue limit `S'_e`.
    ///
    /// Steels without a measured value use `0.5 S_ut`, capped at 700 MPa for
    /// ultimate strengths above 1400 MPa.
    #[must_use]
    pub fn fatigue_limit(&self) -> f64 {
        self.endurance_limit.unwrap_or_else(|| {
            if pa_to_mpa(self.ultimate_strength) <= 1_400.0 {
                0.5 * self.ultimate_strength
            } else {
                mpa_to_pa(700.0)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn fatigue_limit_is_derived_and_capped() {
        let mild = Material::new("mild", MaterialKind::Steel, 250.0e6, 400.0e6);
        assert_relative_eq!(mild.fatigue_limit(), 200.0e6, epsilon = 1.0e-3);

        let hard = Material::new("hard", MaterialKind::Steel, 1_500.0e6, 1_800.0e6);
        assert_relative_eq!(hard.fatigue_limit(), 700.0e6, epsilon = 1.0e-3);

        let measured = mild.with_fatigue_limit(180.0e6);
        assert_eq!(measured.fatigue_limit(), 180.0e6);
    }

    #[test]
    fn builder_sets_gear_data() {
        let steel = Material::new("18NiCrMo5", MaterialKind::Steel, 800.0e6, 1_100.0e6)
            .with_hardness(300.0)
            .with_gear_allowables(480.0e6, 1_300.0e6);
        assert_eq!(steel.brinell_hardness, Some(300.0));
        assert_eq!(steel.bending_strength, Some(480.0e6));
        assert_eq!(steel.contact_strength, Some(1_300.0e6));
        assert_eq!(steel.surface, SurfaceFinish::Machined);

        let bare = Material::new("bare", MaterialKind::Steel, 500.0e6, 800.0e6);
        assert_eq!(bare.brinell_hardness, None);
        assert_eq!(bare.bending_strength, None);
        assert_eq!(bare.contact_strength, None);
    }
}
