//! Stress concentration at shaft notches.
//!
//! Shoulder fillet factors follow the power fits `K_t = A (r/d)^b` of the stepped
//! round bar charts, with `A` and `b` interpolated over `D/d`. Notch sensitivity
//! uses the Neuber constant fitted against ultimate strength.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::interpolation::{linear, out_of_range};
use crate::material::Material;
use crate::shaft::LocalGeometry;
use crate::units::{m_to_in, pa_to_kpsi};

/// `(D/d, A, b)` rows for a shoulder fillet in bending, ascending in `D/d`.
const BENDING: [(f64, f64, f64); 11] = [
    (1.01, 0.91938, -0.17032),
    (1.02, 0.96048, -0.17711),
    (1.03, 0.98061, -0.18381),
    (1.05, 0.98137, -0.19653),
    (1.07, 0.97527, -0.20958),
    (1.10, 0.95120, -0.23757),
    (1.20, 0.97098, -0.21796),
    (1.50, 0.93836, -0.25759),
    (2.00, 0.90879, -0.28598),
    (3.00, 0.89334, -0.30860),
    (6.00, 0.87868, -0.33243),
];

/// Shoulder fillet in torsion.
const TORSION: [(f64, f64, f64); 4] = [
    (1.09, 0.90337, -0.12692),
    (1.20, 0.83425, -0.21649),
    (1.33, 0.84897, -0.23161),
    (2.00, 0.86331, -0.23865),
];

/// Shoulder fillet in tension.
const AXIAL: [(f64, f64, f64); 10] = [
    (1.01, 0.98413, -0.10474),
    (1.02, 1.01220, -0.12474),
    (1.05, 1.00480, -0.17076),
    (1.07, 0.98498, -0.19548),
    (1.10, 0.98450, -0.20818),
    (1.15, 0.98084, -0.22485),
    (1.20, 0.96272, -0.25527),
    (1.30, 0.99682, -0.25751),
    (1.50, 0.99957, -0.28221),
    (2.00, 1.01470, -0.30035),
];

/// End-milled keyway factors.
const KEYWAY_BENDING: f64 = 2.14;
/// End-milled keyway factor in torsion.
const KEYWAY_TORSION: f64 = 3.0;
/// Keyway root radius as a fraction of the shaft diameter.
const KEYWAY_RADIUS_RATIO: f64 = 0.02;

/// Smallest fillet ratio the fits are used at; sharper corners are clamped here.
const MIN_FILLET_RATIO: f64 = 0.002;

/// Kind of nominal stress a factor applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadMode {
    /// Bending normal stress.
    Bending,
    /// Torsional shear stress.
    Torsion,
    /// Axial normal stress.
    Axial,
}

impl LoadMode {
    /// Fitted `(A, b)` coefficients of the shoulder chart for this mode.
    fn shoulder_table(self) -> &'static [(f64, f64, f64)] {
        match self {
            Self::Bending => &BENDING,
            Self::Torsion => &TORSION,
            Self::Axial => &AXIAL,
        }
    }
}

/// Stress concentration at one notch for one load mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotchFactor {
    /// Theoretical factor `K_t`.
    pub theoretical: f64,
    /// Notch sensitivity `q`.
    pub sensitivity: f64,
    /// Fatigue notch factor `K_f = 1 + q (K_t - 1)`.
    pub fatigue: f64,
}

impl NotchFactor {
    /// Factor of an unnotched section.
    pub const NONE: Self = Self {
        theoretical: 1.0,
        sensitivity: 0.0,
        fatigue: 1.0,
    };

    /// Combine a theoretical factor with the notch sensitivity.
    fn new(theoretical: f64, sensitivity: f64) -> Self {
        Self {
            theoretical,
            sensitivity,
            fatigue: fatigue_notch_factor(theoretical, sensitivity),
        }
    }
}

/// Theoretical factor of a shoulder fillet of radius `r` stepping from `d` to `big_d`.
///
/// # Examples
/// ```
/// use gearx::concentration::{shoulder_kt, LoadMode};
///
/// let sharp = shoulder_kt(LoadMode::Bending, 0.036, 0.030, 0.0006);
/// let generous = shoulder_kt(LoadMode::Bending, 0.036, 0.030, 0.003);
/// assert!(sharp > generous);
/// ```
#[must_use]
pub fn shoulder_kt(mode: LoadMode, big_d: f64, d: f64, r: f64) -> f64 {
    let table = mode.shoulder_table();
    let ratios: Vec<f64> = table.iter().map(|row| row.0).collect();
    let a: Vec<f64> = table.iter().map(|row| row.1).collect();
    let b: Vec<f64> = table.iter().map(|row| row.2).collect();
    let step = big_d / d;
    if out_of_range(&ratios, step) {
        warn!("D/d = {step:.3} outside the {mode:?} shoulder chart, clamped");
    }
    let fillet = (r / d).max(MIN_FILLET_RATIO);
    let kt = linear(&ratios, &a, step) * fillet.powf(linear(&ratios, &b, step));
    kt.max(1.0)
}

/// Theoretical factor of an end-milled keyway.
#[must_use]
pub fn keyway_kt(mode: LoadMode) -> f64 {
    match mode {
        LoadMode::Bending | LoadMode::Axial => KEYWAY_BENDING,
        LoadMode::Torsion => KEYWAY_TORSION,
    }
}

/// Neuber notch sensitivity for a notch radius `r` in metres.
///
/// The Neuber constant is fitted for steels; torsion uses its own fit.
#[must_use]
pub fn notch_sensitivity(mode: LoadMode, ultimate_strength: f64, r: f64) -> f64 {
    if r <= 0.0 {
        return 0.0;
    }
    let sut = pa_to_kpsi(ultimate_strength);
    let sqrt_a = match mode {
        LoadMode::Bending | LoadMode::Axial => {
            0.246 - 3.08e-3 * sut + 1.51e-5 * sut.powi(2) - 2.67e-8 * sut.powi(3)
        }
        LoadMode::Torsion => {
            0.190 - 2.51e-3 * sut + 1.35e-5 * sut.powi(2) - 2.67e-8 * sut.powi(3)
        }
    };
    (1.0 / (1.0 + sqrt_a.max(0.0) / m_to_in(r).sqrt())).clamp(0.0, 1.0)
}

/// Fatigue notch factor `K_f = 1 + q (K_t - 1)`.
#[must_use]
pub fn fatigue_notch_factor(kt: f64, q: f64) -> f64 {
    1.0 + q * (kt - 1.0)
}

/// Governing notch factor of a section for one load mode.
///
/// When a section carries both a shoulder and a keyway, the notch with the larger
/// fatigue notch factor governs.
#[must_use]
pub fn notch_factor(geometry: &LocalGeometry, material: &Material, mode: LoadMode) -> NotchFactor {
    let d = geometry.diameter;
    let sut = material.ultimate_strength;
    let shoulder = geometry.shoulder.map(|shoulder| {
        let radius = shoulder.fillet_radius.max(MIN_FILLET_RATIO * d);
        NotchFactor::new(
            shoulder_kt(mode, shoulder.larger_diameter, d, radius),
            notch_sensitivity(mode, sut, radius),
        )
    });
    let keyway = geometry.keyway.then(|| {
        let radius = KEYWAY_RADIUS_RATIO * d;
        NotchFactor::new(keyway_kt(mode), notch_sensitivity(mode, sut, radius))
    });
    [shoulder, keyway]
        .into_iter()
        .flatten()
        .fold(NotchFactor::NONE, |worst, notch| {
            if notch.fatigue > worst.fatigue {
                notch
            } else {
                worst
            }
        })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::material::MaterialKind;
    use crate::shaft::Shoulder;

    #[test]
    fn tabulated_row_is_reproduced() {
        let kt = shoulder_kt(LoadMode::Bending, 0.060, 0.030, 0.003);
        assert_relative_eq!(kt, 0.90879 * 0.1_f64.powf(-0.28598), max_relative = 1.0e-12);
    }

    #[test]
    fn kt_decreases_with_fillet_ratio() {
        for mode in [LoadMode::Bending, LoadMode::Torsion, LoadMode::Axial] {
            let mut previous = f64::INFINITY;
            for step in 1..=30 {
                let r = 0.0002 * f64::from(step);
                let kt = shoulder_kt(mode, 0.045, 0.030, r);
                assert!(kt <= previous, "{mode:?} at r = {r}");
                assert!(kt >= 1.0);
                previous = kt;
            }
        }
    }

    #[test]
    fn sensitivity_grows_with_radius_and_strength() {
        let mild = 400.0e6;
        let hard = 1_200.0e6;
        let small = notch_sensitivity(LoadMode::Bending, mild, 0.0003);
        let large = notch_sensitivity(LoadMode::Bending, mild, 0.003);
        assert!(small < large);
        assert!(notch_sensitivity(LoadMode::Bending, hard, 0.0003) > small);
        assert!(large <= 1.0);
        assert_eq!(notch_sensitivity(LoadMode::Torsion, mild, 0.0), 0.0);
    }

    #[test]
    fn keyway_and_shoulder_take_the_worse_notch() {
        let steel = Material::new("steel", MaterialKind::Steel, 400.0e6, 700.0e6);
        let plain = LocalGeometry::plain(0.03);
        assert_eq!(notch_factor(&plain, &steel, LoadMode::Bending), NotchFactor::NONE);

        let keyed = LocalGeometry {
            keyway: true,
            ..plain
        };
        let key = notch_factor(&keyed, &steel, LoadMode::Torsion);
        assert_eq!(key.theoretical, 3.0);
        assert!(key.fatigue > 1.0 && key.fatigue < 3.0);

        let both = LocalGeometry {
            shoulder: Some(Shoulder {
                larger_diameter: 0.036,
                fillet_radius: 0.003,
            }),
            keyway: true,
            ..plain
        };
        let governing = notch_factor(&both, &steel, LoadMode::Torsion);
        assert_eq!(governing, key);
    }
}
