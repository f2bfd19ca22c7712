//! Rolling bearing descriptors and life estimation.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::BearingError;
use crate::geometry::Force;
use crate::interpolation::{linear, out_of_range};
use crate::units::m_to_mm;

/// `F_a/C_0` breakpoints of the deep groove ball bearing load factor table.
const RELATIVE_AXIAL_LOAD: [f64; 12] = [
    0.014, 0.021, 0.028, 0.042, 0.056, 0.070, 0.084, 0.110, 0.17, 0.28, 0.42, 0.56,
];
/// Limiting ratio `e` for each breakpoint.
const LIMITING_RATIO: [f64; 12] = [
    0.19, 0.21, 0.22, 0.24, 0.26, 0.27, 0.28, 0.30, 0.34, 0.38, 0.42, 0.44,
];
/// Axial load factor `Y` for each breakpoint.
const AXIAL_FACTOR: [f64; 12] = [
    2.30, 2.15, 1.99, 1.85, 1.71, 1.63, 1.55, 1.45, 1.31, 1.15, 1.04, 1.00,
];
/// Radial load factor used with [`AXIAL_FACTOR`] above the limiting ratio.
const RADIAL_FACTOR: f64 = 0.56;

/// Reliability levels of the life adjustment factor `a_1`.
const RELIABILITY: [f64; 6] = [0.90, 0.95, 0.96, 0.97, 0.98, 0.99];
/// Life adjustment factor `a_1` at each reliability level.
const A1: [f64; 6] = [1.0, 0.64, 0.55, 0.47, 0.37, 0.25];

/// Upper bound of the `a_SKF` factor.
const A_SKF_LIMIT: f64 = 50.0;

/// Rolling element family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BearingKind {
    /// Ball bearing, life exponent 3.
    Ball,
    /// Roller bearing, life exponent 10/3.
    Roller,
}

impl BearingKind {
    /// Catalog life exponent `p`.
    #[must_use]
    pub fn life_exponent(self) -> f64 {
        match self {
            Self::Ball => 3.0,
            Self::Roller => 10.0 / 3.0,
        }
    }
}

/// How radial and axial loads combine into the equivalent dynamic load.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LoadFactors {
    /// Deep groove ball bearing table keyed by `F_a/C_0`.
    DeepGrooveBall,
    /// Catalog factors applied when `F_a/F_r > e`; below `e` the radial load alone counts.
    Catalog {
        /// Radial factor.
        x: f64,
        /// Axial factor.
        y: f64,
        /// Limiting ratio.
        e: f64,
    },
    /// The bearing only sees radial load.
    RadialOnly,
}

/// Rolling bearing mounted on a shaft.
///
/// # Examples
/// ```
/// use gearx::{Bearing, BearingKind};
///
/// let bearing = Bearing::new("A", 0.0, BearingKind::Ball, 10_000.0, 6_000.0).locating();
/// assert!(bearing.locating);
/// assert_eq!(bearing.life_exponent, 3.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bearing {
    /// Unique identifier.
    pub id: String,
    /// Axial coordinate on the shaft in metres.
    pub position: f64,
    /// Rolling element family.
    pub kind: BearingKind,
    /// Basic dynamic load rating `C` in newtons.
    pub dynamic_rating: f64,
    /// Basic static load rating `C_0` in newtons.
    pub static_rating: f64,
    /// Life exponent `p`.
    pub life_exponent: f64,
    /// Whether the bearing takes axial load.
    pub locating: bool,
    /// Equivalent load composition.
    pub load_factors: LoadFactors,
    /// Fatigue load limit `P_u` in newtons.
    pub fatigue_load_limit: Option<f64>,
    /// Mean diameter `(d + D) / 2` in metres.
    pub mean_diameter: Option<f64>,
}

impl Bearing {
    /// Create a floating bearing with the catalog defaults of its family.
    pub fn new(
        id: impl Into<String>,
        position: f64,
        kind: BearingKind,
        dynamic_rating: f64,
        static_rating: f64,
    ) -> Self {
        let load_factors = match kind {
            BearingKind::Ball => LoadFactors::DeepGrooveBall,
            BearingKind::Roller => LoadFactors::RadialOnly,
        };
        Self {
            id: id.into(),
            position,
            kind,
            dynamic_rating,
            static_rating,
            life_exponent: kind.life_exponent(),
            locating: false,
            load_factors,
            fatigue_load_limit: None,
            mean_diameter: None,
        }
    }

    /// Make the bearing take the axial load of its shaft.
    #[must_use]
    pub fn locating(mut self) -> Self {
        self.locating = true;
        self
    }

    /// Override the equivalent load composition.
    #[must_use]
    pub fn with_load_factors(mut self, load_factors: LoadFactors) -> Self {
        self.load_factors = load_factors;
        self
    }

    /// Set the fatigue load limit and mean diameter used by `a_SKF`.
    #[must_use]
    pub fn with_skf_data(mut self, fatigue_load_limit: f64, mean_diameter: f64) -> Self {
        self.fatigue_load_limit = Some(fatigue_load_limit);
        self.mean_diameter = Some(mean_diameter);
        self
    }

    /// Equivalent dynamic load `P = X F_r + Y F_a`.
    #[must_use]
    pub fn equivalent_load(&self, radial: f64, axial: f64) -> f64 {
        let axial = axial.abs();
        if axial == 0.0 {
            return radial;
        }
        let (x, y, e) = match self.load_factors {
            LoadFactors::RadialOnly => return radial,
            LoadFactors::Catalog { x, y, e } => (x, y, e),
            LoadFactors::DeepGrooveBall => {
                let relative = axial / self.static_rating;
                if out_of_range(&RELATIVE_AXIAL_LOAD, relative) {
                    warn!(
                        "bearing {}: F_a/C_0 = {relative:.4} outside the load factor table",
                        self.id
                    );
                }
                let e = linear(&RELATIVE_AXIAL_LOAD, &LIMITING_RATIO, relative);
                let y = linear(&RELATIVE_AXIAL_LOAD, &AXIAL_FACTOR, relative);
                (RADIAL_FACTOR, y, e)
            }
        };
        if radial > 0.0 && axial / radial <= e {
            radial
        } else {
            x * radial + y * axial
        }
    }
}

/// Lubrication and reliability settings of the life calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BearingLifeSettings {
    /// Required survival probability, between 0.90 and 0.99.
    pub reliability: f64,
    /// Viscosity ratio `κ`; derived from the viscosities when absent.
    pub viscosity_ratio: Option<f64>,
    /// Operating kinematic viscosity `ν` in mm²/s.
    pub operating_viscosity: Option<f64>,
    /// Contamination factor `η_c`.
    pub contamination: f64,
}

impl Default for BearingLifeSettings {
    fn default() -> Self {
        Self {
            reliability: 0.90,
            viscosity_ratio: None,
            operating_viscosity: None,
            contamination: 0.5,
        }
    }
}

/// Life estimate of one bearing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BearingLife {
    /// Identifier of the bearing.
    pub bearing: String,
    /// Radial reaction in newtons.
    pub radial_load: f64,
    /// Axial reaction in newtons.
    pub axial_load: f64,
    /// Equivalent dynamic load in newtons.
    pub equivalent_load: f64,
    /// Basic rating life `L_10` in hours.
    pub basic_life: f64,
    /// Reliability factor `a_1`.
    pub reliability_factor: f64,
    /// Viscosity ratio used for `a_SKF`, if known.
    pub viscosity_ratio: Option<f64>,
    /// Life modification factor `a_SKF`.
    pub skf_factor: f64,
    /// Modified rating life `L_nm = a_1 a_SKF L_10` in hours.
    pub modified_life: f64,
}

impl BearingLife {
    /// Returns `true` when the modified life reaches `target_hours`.
    #[must_use]
    pub fn meets(&self, target_hours: f64) -> bool {
        self.modified_life >= target_hours
    }
}

/// Rated viscosity `ν_1` in mm²/s for a speed in rpm and a mean diameter in mm.
#[must_use]
pub fn rated_viscosity(speed: f64, mean_diameter_mm: f64) -> f64 {
    if speed < 1_000.0 {
        45_000.0 * speed.powf(-0.83) * mean_diameter_mm.powf(-0.5)
    } else {
        4_500.0 * speed.powf(-0.5) * mean_diameter_mm.powf(-0.5)
    }
}

/// Life modification factor `a_SKF` for a viscosity ratio and the load ratio `η_c P_u / P`.
#[must_use]
pub fn skf_factor(kind: BearingKind, viscosity_ratio: f64, load_ratio: f64) -> f64 {
    let kappa = viscosity_ratio.clamp(0.1, 4.0);
    let base = match kind {
        BearingKind::Ball => {
            let (c, e) = if kappa < 0.4 {
                (2.2649, 0.054_381)
            } else if kappa < 1.0 {
                (1.9987, 0.190_87)
            } else {
                (1.9987, 0.071_739)
            };
            1.0 - (2.5671 - c / kappa.powf(e)).max(0.0).powf(0.83) * load_ratio.powf(1.0 / 3.0)
        }
        BearingKind::Roller => {
            let (c, e) = if kappa < 0.4 {
                (1.3993, 0.054_381)
            } else if kappa < 1.0 {
                (1.2348, 0.190_87)
            } else {
                (1.2348, 0.071_739)
            };
            1.0 - (1.5859 - c / kappa.powf(e)).max(0.0) * load_ratio.powf(0.4)
        }
    };
    if base <= 0.0 {
        return A_SKF_LIMIT;
    }
    let exponent = match kind {
        BearingKind::Ball => -9.3,
        BearingKind::Roller => -9.185,
    };
    (0.1 * base.powf(exponent)).min(A_SKF_LIMIT)
}

/// Reliability factor `a_1`, interpolated between the tabulated levels.
#[must_use]
pub fn reliability_factor(reliability: f64) -> f64 {
    if out_of_range(&RELIABILITY, reliability) {
        warn!("reliability {reliability} outside 0.90..=0.99, a_1 clamped");
    }
    linear(&RELIABILITY, &A1, reliability)
}

/// Estimate the basic and modified life of `bearing` under `reaction` at `speed` rpm.
///
/// The reaction is split into its radial part and its axial part along the shaft.
/// A stationary or unloaded bearing has an infinite life.
///
/// # Errors
///
/// Returns [`BearingError::LoadExceedsRating`] when the equivalent load is larger
/// than the static rating.
pub fn estimate_bearing_life(
    bearing: &Bearing,
    reaction: Force,
    speed: f64,
    settings: &BearingLifeSettings,
) -> Result<BearingLife, BearingError> {
    let radial_load = reaction.radial();
    let axial_load = reaction.x.abs();
    let equivalent_load = bearing.equivalent_load(radial_load, axial_load);
    if equivalent_load > bearing.static_rating {
        return Err(BearingError::LoadExceedsRating {
            bearing: bearing.id.clone(),
            equivalent_load,
            static_rating: bearing.static_rating,
        });
    }

    let speed = speed.abs();
    let basic_life = if speed == 0.0 || equivalent_load == 0.0 {
        f64::INFINITY
    } else {
        (bearing.dynamic_rating / equivalent_load).powf(bearing.life_exponent) * 1.0e6
            / (60.0 * speed)
    };

    let viscosity_ratio = settings.viscosity_ratio.or_else(|| {
        let viscosity = settings.operating_viscosity?;
        let mean_diameter = bearing.mean_diameter?;
        (speed > 0.0).then(|| viscosity / rated_viscosity(speed, m_to_mm(mean_diameter)))
    });
    let skf = match (viscosity_ratio, bearing.fatigue_load_limit) {
        (Some(kappa), Some(limit)) if equivalent_load > 0.0 => skf_factor(
            bearing.kind,
            kappa,
            settings.contamination * limit / equivalent_load,
        ),
        (Some(_), Some(_)) => A_SKF_LIMIT,
        _ => 1.0,
    };
    let a1 = reliability_factor(settings.reliability);
    let modified_life = a1 * skf * basic_life;

    debug!(
        "bearing {}: P = {equivalent_load:.1} N, L10 = {basic_life:.0} h, a_SKF = {skf:.3}, \
         Lnm = {modified_life:.0} h",
        bearing.id
    );
    Ok(BearingLife {
        bearing: bearing.id.clone(),
        radial_load,
        axial_load,
        equivalent_load,
        basic_life,
        reliability_factor: a1,
        viscosity_ratio,
        skf_factor: skf,
        modified_life,
    })
}
