//! Endurance limit correction and load cycle description.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::interpolation::{linear, out_of_range};
use crate::material::Material;
use crate::units::{m_to_mm, pa_to_mpa};

/// Survival probabilities of the reliability factor table.
const RELIABILITY: [f64; 8] = [0.5, 0.9, 0.95, 0.99, 0.999, 0.9999, 0.99999, 0.999_999];
/// Reliability factor `k_e` at each survival probability.
const RELIABILITY_FACTOR: [f64; 8] = [1.0, 0.897, 0.868, 0.814, 0.753, 0.702, 0.659, 0.620];

/// Load factor for purely axial fatigue loading.
pub const AXIAL_LOAD_FACTOR: f64 = 0.85;

/// Share of each nominal stress that alternates over one shaft revolution.
///
/// The rest of the stress is steady. The default describes a rotating shaft
/// under constant load: bending fully reversed, torsion and axial load steady.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadCycle {
    /// Alternating fraction of the bending stress.
    pub bending: f64,
    /// Alternating fraction of the torsional stress.
    pub torsion: f64,
    /// Alternating fraction of the axial stress.
    pub axial: f64,
}

impl Default for LoadCycle {
    fn default() -> Self {
        Self {
            bending: 1.0,
            torsion: 0.0,
            axial: 0.0,
        }
    }
}

/// Settings of the shaft fatigue evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FatigueSettings {
    /// Required survival probability.
    pub reliability: f64,
    /// Whether the diameter-dependent size factor is applied.
    pub size_factor: bool,
}

impl Default for FatigueSettings {
    fn default() -> Self {
        Self {
            reliability: 0.9,
            size_factor: true,
        }
    }
}

/// Marin correction factors of the endurance limit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarinFactors {
    /// Surface factor `k_a`.
    pub surface: f64,
    /// Size factor `k_b`.
    pub size: f64,
    /// Load factor `k_c`.
    pub load: f64,
    /// Reliability factor `k_e`.
    pub reliability: f64,
}

impl MarinFactors {
    /// Product of all factors.
    #[must_use]
    pub fn product(&self) -> f64 {
        self.surface * self.size * self.load * self.reliability
    }
}

/// Surface factor `k_a = a S_ut^b`, at most one.
#[must_use]
pub fn surface_factor(material: &Material) -> f64 {
    let (a, b) = material.surface.marin_coefficients();
    (a * pa_to_mpa(material.ultimate_strength).powf(b)).min(1.0)
}

/// Size factor `k_b` of a round section of diameter `d` in metres.
#[must_use]
pub fn size_factor(d: f64) -> f64 {
    let d = m_to_mm(d);
    if d < 2.79 {
        1.0
    } else if d <= 51.0 {
        1.24 * d.powf(-0.107)
    } else {
        if d > 254.0 {
            warn!("diameter {d:.1} mm beyond the size factor fit");
        }
        1.51 * d.powf(-0.157)
    }
}

/// Reliability factor `k_e`.
#[must_use]
pub fn reliability_factor(reliability: f64) -> f64 {
    if out_of_range(&RELIABILITY, reliability) {
        warn!("reliability {reliability} outside the tabulated range, k_e clamped");
    }
    linear(&RELIABILITY, &RELIABILITY_FACTOR, reliability)
}

/// Marin factors of a section of diameter `d`.
///
/// `pure_axial` selects the axial load factor; combined loading is evaluated with
/// von Mises stresses and a load factor of one.
#[must_use]
pub fn marin_factors(
    material: &Material,
    d: f64,
    pure_axial: bool,
    settings: &FatigueSettings,
) -> MarinFactors {
    MarinFactors {
        surface: surface_factor(material),
        size: if settings.size_factor && !pure_axial {
            size_factor(d)
        } else {
            1.0
        },
        load: if pure_axial { AXIAL_LOAD_FACTOR } else { 1.0 },
        reliability: reliability_factor(settings.reliability),
    }
}
