//! Gear tooth bending and pitting rating in the AGMA form with metric inputs.
//!
//! Every gear of a mesh is rated for root bending and for surface contact. The
//! rating factors that depend on the application rather than on the geometry are
//! collected in [`ToothRatingFactors`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ToothError;
use crate::gear::{Gear, QUALITY_RANGE};
use crate::interpolation::{linear, makima_2d};
use crate::mesh::{Mesh, MeshForces, MeshKind};
use crate::units::{m_to_in, m_to_mm};

/// Overload factor, rows by power source and columns by driven machine.
const OVERLOAD: [[f64; 3]; 3] = [[1.0, 1.25, 1.75], [1.25, 1.5, 2.0], [1.5, 1.75, 2.25]];

/// Lewis form factor against tooth count.
const LEWIS_TEETH: [f64; 25] = [
    12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0, 21.0, 22.0, 24.0, 26.0, 28.0, 30.0,
    34.0, 38.0, 43.0, 50.0, 60.0, 75.0, 100.0, 150.0, 300.0, 400.0,
];
/// Lewis form factor `Y` at each tooth count.
const LEWIS_FACTOR: [f64; 25] = [
    0.245, 0.261, 0.277, 0.29, 0.296, 0.303, 0.309, 0.314, 0.322, 0.328, 0.331, 0.337, 0.346,
    0.353, 0.359, 0.371, 0.384, 0.397, 0.409, 0.422, 0.435, 0.447, 0.46, 0.472, 0.48,
];

/// Helical geometry factor `J'` over helix angle in degrees (columns) and teeth (rows).
const JP_HELIX: [f64; 30] = [
    5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0,
    21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0, 30.0, 31.0, 32.0, 33.0, 34.0,
];
/// Tooth counts of the `J'` chart rows.
const JP_TEETH: [f64; 5] = [20.0, 30.0, 60.0, 150.0, 500.0];
/// `J'` chart values.
const JP: [[f64; 30]; 5] = [
    [
        0.465, 0.475, 0.48, 0.487, 0.492, 0.495, 0.497, 0.5, 0.502, 0.505, 0.506, 0.507, 0.508,
        0.507, 0.506, 0.505, 0.502, 0.5, 0.497, 0.494, 0.49, 0.486, 0.48, 0.476, 0.471, 0.465,
        0.458, 0.452, 0.445, 0.439,
    ],
    [
        0.525, 0.53, 0.535, 0.54, 0.542, 0.547, 0.55, 0.552, 0.553, 0.554, 0.555, 0.556, 0.555,
        0.554, 0.552, 0.551, 0.549, 0.545, 0.54, 0.537, 0.532, 0.527, 0.52, 0.515, 0.507, 0.5,
        0.492, 0.484, 0.476, 0.47,
    ],
    [
        0.58, 0.585, 0.595, 0.6, 0.602, 0.605, 0.61, 0.612, 0.614, 0.615, 0.615, 0.615, 0.614,
        0.611, 0.608, 0.605, 0.6, 0.595, 0.59, 0.582, 0.577, 0.571, 0.56, 0.555, 0.545, 0.537,
        0.527, 0.517, 0.507, 0.495,
    ],
    [
        0.62, 0.63, 0.635, 0.64, 0.645, 0.647, 0.652, 0.655, 0.657, 0.657, 0.656, 0.655, 0.654,
        0.65, 0.645, 0.64, 0.635, 0.63, 0.622, 0.617, 0.61, 0.6, 0.592, 0.582, 0.575, 0.56,
        0.552, 0.541, 0.53, 0.518,
    ],
    [
        0.65, 0.655, 0.66, 0.665, 0.67, 0.675, 0.677, 0.68, 0.681, 0.681, 0.681, 0.681, 0.679,
        0.676, 0.673, 0.667, 0.66, 0.655, 0.647, 0.64, 0.631, 0.62, 0.613, 0.602, 0.592, 0.58,
        0.57, 0.557, 0.545, 0.532,
    ],
];

/// Modifier `J''` over helix angle and the tooth count of the mating gear.
const JPP_HELIX: [f64; 7] = [5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0];
/// Mating gear tooth counts of the `J''` chart rows.
const JPP_TEETH: [f64; 6] = [20.0, 30.0, 50.0, 75.0, 150.0, 500.0];
/// `J''` chart values.
const JPP: [[f64; 7]; 6] = [
    [0.927, 0.929, 0.93, 0.932, 0.938, 0.943, 0.953],
    [0.952, 0.954, 0.957, 0.959, 0.961, 0.965, 0.973],
    [0.98, 0.981, 0.981, 0.982, 0.983, 0.987, 0.992],
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [1.02, 1.02, 1.02, 1.019, 1.017, 1.013, 1.01],
    [1.038, 1.037, 1.035, 1.032, 1.03, 1.026, 1.02],
];

/// Reliability factor against survival probability, ascending.
const RELIABILITY: [f64; 5] = [0.5, 0.9, 0.99, 0.999, 0.9999];
/// Reliability factor `Y_Z` at each survival probability.
const RELIABILITY_FACTOR: [f64; 5] = [0.7, 0.85, 1.0, 1.25, 1.5];

/// Elastic coefficient in √MPa, indexed by the material families of the pair.
const ELASTIC: [[f64; 6]; 6] = [
    [191.0, 181.0, 179.0, 174.0, 162.0, 158.0],
    [181.0, 174.0, 172.0, 168.0, 158.0, 154.0],
    [179.0, 172.0, 170.0, 166.0, 156.0, 152.0],
    [174.0, 168.0, 166.0, 163.0, 154.0, 149.0],
    [162.0, 158.0, 156.0, 154.0, 145.0, 141.0],
    [158.0, 154.0, 152.0, 149.0, 141.0, 137.0],
];

/// Temperature up to which the temperature factor is one, in °C.
const MAX_TEMPERATURE: f64 = 120.0;

/// Character of the prime mover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerSource {
    /// Electric motor or turbine.
    #[default]
    Uniform,
    /// Multi-cylinder engine.
    LightShock,
    /// Single-cylinder engine.
    MediumShock,
}

/// Character of the driven machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivenMachine {
    /// Generator, conveyor with uniform feed.
    #[default]
    Uniform,
    /// Machine tools, heavy-duty conveyors.
    ModerateShock,
    /// Crushers, presses.
    HeavyShock,
}

/// Accuracy class of the gear unit, selecting the mesh alignment factor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enclosure {
    /// Open gearing.
    Open,
    /// Commercial enclosed unit.
    #[default]
    Commercial,
    /// Precision enclosed unit.
    Precision,
    /// Extra-precision enclosed unit.
    ExtraPrecision,
}

impl Enclosure {
    /// Coefficients `(A, B, C)` of the mesh alignment factor.
    fn alignment_coefficients(self) -> (f64, f64, f64) {
        match self {
            Self::Open => (0.247, 0.0167, -0.765e-4),
            Self::Commercial => (0.127, 0.0158, -0.93e-4),
            Self::Precision => (0.0675, 0.0128, -0.926e-4),
            Self::ExtraPrecision => (0.0036, 0.0102, -0.822e-4),
        }
    }
}

/// Stress-cycle factor `b N^e`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifeFactor {
    /// Coefficient `b`.
    pub coefficient: f64,
    /// Exponent `e`.
    pub exponent: f64,
}

impl LifeFactor {
    /// Factor at `cycles` load cycles.
    #[must_use]
    pub fn at(&self, cycles: f64) -> f64 {
        self.coefficient * cycles.powf(self.exponent)
    }
}

/// Application data of the tooth rating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToothRatingFactors {
    /// Prime mover character.
    pub power_source: PowerSource,
    /// Driven machine character.
    pub driven_machine: DrivenMachine,
    /// Whether the teeth are crowned.
    pub crowned: bool,
    /// Accuracy class of the unit.
    pub enclosure: Enclosure,
    /// Mesh alignment correction factor `C_e`.
    pub alignment_correction: f64,
    /// Bending stress-cycle factor.
    pub bending_life: LifeFactor,
    /// Pitting stress-cycle factor.
    pub pitting_life: LifeFactor,
    /// Load cycles of the driving gear over the design life.
    pub load_cycles: f64,
    /// Operating temperature in °C.
    pub temperature: f64,
    /// Required survival probability.
    pub reliability: f64,
    /// Surface condition factor `Z_R`.
    pub surface_condition: f64,
}

impl Default for ToothRatingFactors {
    fn default() -> Self {
        Self {
            power_source: PowerSource::Uniform,
            driven_machine: DrivenMachine::Uniform,
            crowned: false,
            enclosure: Enclosure::Commercial,
            alignment_correction: 1.0,
            bending_life: LifeFactor {
                coefficient: 1.3558,
                exponent: -0.0178,
            },
            pitting_life: LifeFactor {
                coefficient: 1.4488,
                exponent: -0.023,
            },
            load_cycles: 1.0e8,
            temperature: 25.0,
            reliability: 0.99,
            surface_condition: 1.0,
        }
    }
}

/// Position of each gear between its bearings, as the offset of the gear from
/// midspan divided by the bearing span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Straddle {
    /// Offset ratio of the driving gear.
    pub driving: f64,
    /// Offset ratio of the driven gear.
    pub driven: f64,
}

/// Stress modifying factors of one gear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RatingFactors {
    /// Overload factor `K_o`.
    pub overload: f64,
    /// Dynamic factor `K_v`.
    pub dynamic: f64,
    /// Size factor `K_s`.
    pub size: f64,
    /// Load distribution factor `K_H`.
    pub load_distribution: f64,
    /// Rim thickness factor `K_B`.
    pub rim_thickness: f64,
    /// Bending geometry factor `Y_J`.
    pub bending_geometry: f64,
    /// Pitting geometry factor `Z_I`.
    pub pitting_geometry: f64,
    /// Elastic coefficient `Z_E` in √Pa.
    pub elastic: f64,
    /// Hardness ratio factor `Z_W`.
    pub hardness_ratio: f64,
}

/// Rating of one gear of a mesh.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToothRating {
    /// Identifier of the gear.
    pub gear: String,
    /// Root bending stress `σ_F` in pascals.
    pub bending_stress: f64,
    /// Contact stress `σ_H` in pascals.
    pub contact_stress: f64,
    /// Bending safety factor `S_F`.
    pub bending_safety: f64,
    /// Pitting safety factor `S_H`.
    pub pitting_safety: f64,
    /// Factors used.
    pub factors: RatingFactors,
}

impl ToothRating {
    /// Governing safety factor of the gear.
    #[must_use]
    pub fn safety(&self) -> f64 {
        self.bending_safety.min(self.pitting_safety)
    }
}

/// Rating of both gears of a mesh.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeshRating {
    /// Identifier of the mesh.
    pub mesh: String,
    /// Driving gear rating.
    pub driving: ToothRating,
    /// Driven gear rating.
    pub driven: ToothRating,
}

impl MeshRating {
    /// Governing safety factor of the pair.
    #[must_use]
    pub fn safety(&self) -> f64 {
        self.driving.safety().min(self.driven.safety())
    }
}

/// Dynamic factor `K_v` for accuracy grade `quality` at pitch-line velocity `v` in m/s.
///
/// Grades outside [`QUALITY_RANGE`] are clamped to it.
#[must_use]
pub fn dynamic_factor(quality: f64, v: f64) -> f64 {
    let [lowest, highest] = QUALITY_RANGE;
    if !(lowest..=highest).contains(&quality) {
        warn!("accuracy grade {quality} clamped to {lowest}..={highest}");
    }
    let quality = quality.clamp(lowest, highest);
    let b = 0.25 * (12.0 - quality).powf(2.0 / 3.0);
    let a = 50.0 + 56.0 * (1.0 - b);
    ((a + (200.0 * v).sqrt()) / a).powf(b)
}

/// Rim thickness factor `K_B`; solid gears return one.
#[must_use]
pub fn rim_thickness_factor(gear: &Gear) -> f64 {
    let Some(bore) = gear.bore_diameter else {
        return 1.0;
    };
    let backup = (gear.root_diameter() - bore) / 2.0 / gear.tooth_height();
    if backup <= 0.0 {
        warn!("gear {}: bore reaches the tooth roots", gear.id);
        f64::INFINITY
    } else if backup < 1.2 {
        1.6 * (2.242 / backup).ln()
    } else {
        1.0
    }
}

/// Lewis form factor at the virtual tooth count.
#[must_use]
pub fn lewis_factor(gear: &Gear) -> f64 {
    linear(&LEWIS_TEETH, &LEWIS_FACTOR, gear.virtual_teeth())
}

/// Size factor `K_s` for face width `b`.
#[must_use]
pub fn size_factor(gear: &Gear, b: f64) -> f64 {
    let product = m_to_mm(b) * m_to_mm(gear.transverse_module()) * lewis_factor(gear).sqrt();
    0.843 * product.powf(0.0535)
}

/// Load distribution factor `K_H = 1 + C_mc (C_pf C_pm + C_ma C_e)`.
#[must_use]
pub fn load_distribution_factor(
    gear: &Gear,
    b: f64,
    straddle: f64,
    factors: &ToothRatingFactors,
) -> f64 {
    let lead = if factors.crowned { 0.8 } else { 1.0 };
    let width = m_to_in(b);
    let aspect = (b / (10.0 * gear.pitch_diameter())).max(0.05);
    let proportion = if width <= 1.0 {
        aspect - 0.025
    } else if width <= 17.0 {
        aspect - 0.0375 + 0.0125 * width
    } else {
        aspect - 0.1109 + 0.0207 * width - 0.000_228 * width.powi(2)
    };
    let modifier = if straddle.abs() < 0.175 { 1.0 } else { 1.1 };
    let (a, bb, c) = factors.enclosure.alignment_coefficients();
    let alignment = a + bb * width + c * width.powi(2);
    1.0 + lead * (proportion * modifier + alignment * factors.alignment_correction)
}

/// Bending geometry factor `Y_J = J' J''` against the mating gear's tooth count.
#[must_use]
pub fn bending_geometry_factor(gear: &Gear, mate: &Gear) -> f64 {
    let helix = gear.helix_angle.abs().to_degrees();
    let base = makima_2d(&JP_HELIX, &JP_TEETH, &JP, helix, f64::from(gear.teeth));
    let modifier = makima_2d(&JPP_HELIX, &JPP_TEETH, &JPP, helix, f64::from(mate.teeth));
    base * modifier
}

/// Reliability factor `Y_Z`.
#[must_use]
pub fn reliability_factor(reliability: f64) -> f64 {
    linear(&RELIABILITY, &RELIABILITY_FACTOR, reliability)
}

/// Elastic coefficient `Z_E` of a gear pair in √Pa.
#[must_use]
pub fn elastic_coefficient(mesh: &Mesh) -> f64 {
    let row = mesh.driving.material.kind.chart_index();
    let col = mesh.driven.material.kind.chart_index();
    ELASTIC[row][col] * 1.0e3
}

/// Pitting geometry factor `Z_I` of a mesh.
///
/// The pinion is the gear with fewer teeth. Spur meshes take a load sharing ratio
/// of one; helical meshes derive it from the length of the line of action.
#[must_use]
pub fn pitting_geometry_factor(mesh: &Mesh) -> f64 {
    let (pinion, wheel) = pinion_and_wheel(mesh);
    let ratio = f64::from(wheel.teeth) / f64::from(pinion.teeth);
    let phi_t = pinion.transverse_pressure_angle();
    let sharing = if pinion.is_spur() {
        1.0
    } else {
        let length = line_of_action(pinion, wheel, mesh.kind);
        pinion.normal_pitch() * pinion.pressure_angle.cos() / (0.95 * length)
    };
    let sign = match mesh.kind {
        MeshKind::External => 1.0,
        MeshKind::Internal => -1.0,
    };
    phi_t.cos() * phi_t.sin() * ratio / (2.0 * sharing * (ratio + sign))
}

/// Length of the line of action in the transverse plane.
fn line_of_action(pinion: &Gear, wheel: &Gear, kind: MeshKind) -> f64 {
    let phi_t = pinion.transverse_pressure_angle();
    let (rp, rg) = (pinion.pitch_radius(), wheel.pitch_radius());
    let pinion_tip = pinion.tip_diameter() / 2.0;
    let pinion_term = (pinion_tip.powi(2) - pinion.base_radius().powi(2)).sqrt();
    match kind {
        MeshKind::External => {
            let centre = (rp + rg) * phi_t.sin();
            let wheel_tip = wheel.tip_diameter() / 2.0;
            let wheel_term = (wheel_tip.powi(2) - wheel.base_radius().powi(2)).sqrt();
            pinion_term.min(centre) + wheel_term.min(centre) - centre
        }
        MeshKind::Internal => {
            let centre = (rg - rp) * phi_t.sin();
            let ring_tip = rg - wheel.addendum();
            let ring_term = (ring_tip.powi(2) - wheel.base_radius().powi(2)).max(0.0).sqrt();
            pinion_term - ring_term + centre
        }
    }
}

/// Gear with fewer teeth first.
fn pinion_and_wheel(mesh: &Mesh) -> (&Gear, &Gear) {
    if mesh.driving.teeth <= mesh.driven.teeth {
        (&mesh.driving, &mesh.driven)
    } else {
        (&mesh.driven, &mesh.driving)
    }
}

/// Material property of `gear` needed by the rating.
fn required(
    mesh: &Mesh,
    gear: &Gear,
    value: Option<f64>,
    property: &'static str,
) -> Result<f64, ToothError> {
    value.ok_or_else(|| ToothError::MissingMaterialData {
        mesh: mesh.id.clone(),
        gear: gear.id.clone(),
        material: gear.material.name.clone(),
        property,
    })
}

/// Hardness ratio factor `Z_W` applied to the wheel of a through-hardened pair.
///
/// # Errors
///
/// Returns [`ToothError::MissingMaterialData`] when either gear material has no
/// Brinell hardness.
pub fn hardness_ratio_factor(mesh: &Mesh) -> Result<f64, ToothError> {
    let (pinion, wheel) = pinion_and_wheel(mesh);
    let brinell = |gear: &Gear| {
        required(mesh, gear, gear.material.brinell_hardness, "Brinell hardness")
    };
    let hardness = brinell(pinion)? / brinell(wheel)?;
    let a = if hardness < 1.2 {
        0.0
    } else if hardness <= 1.7 {
        (8.98 * hardness - 8.29) * 1.0e-3
    } else {
        0.006_98
    };
    let ratio = f64::from(wheel.teeth) / f64::from(pinion.teeth);
    Ok(1.0 + a * (ratio - 1.0))
}

/// Rate the teeth of both gears of `mesh` under its resolved `forces`.
///
/// The overall verdict of a gear is its smaller safety factor and the verdict of
/// the mesh the smaller of its two gears.
///
/// # Errors
///
/// Returns [`ToothError::MissingMaterialData`] naming the gear when its material
/// lacks the Brinell hardness or the bending or contact allowable.
pub fn verify_gear_tooth(
    mesh: &Mesh,
    forces: &MeshForces,
    straddle: &Straddle,
    factors: &ToothRatingFactors,
) -> Result<MeshRating, ToothError> {
    if factors.temperature > MAX_TEMPERATURE {
        warn!(
            "mesh {}: temperature {} °C above the range of the temperature factor",
            mesh.id, factors.temperature
        );
    }
    let driving_cycles = factors.load_cycles;
    let driven_cycles = factors.load_cycles / forces.ratio;
    let driving = rate_gear(
        mesh,
        forces,
        &mesh.driving,
        &mesh.driven,
        straddle.driving,
        driving_cycles,
        factors,
    )?;
    let driven = rate_gear(
        mesh,
        forces,
        &mesh.driven,
        &mesh.driving,
        straddle.driven,
        driven_cycles,
        factors,
    )?;
    let rating = MeshRating {
        mesh: mesh.id.clone(),
        driving,
        driven,
    };
    debug!(
        "mesh {}: SF bending {:.3}/{:.3}, pitting {:.3}/{:.3}",
        mesh.id,
        rating.driving.bending_safety,
        rating.driven.bending_safety,
        rating.driving.pitting_safety,
        rating.driven.pitting_safety
    );
    Ok(rating)
}

/// Bending and pitting rating of `gear` against `mate`.
fn rate_gear(
    mesh: &Mesh,
    forces: &MeshForces,
    gear: &Gear,
    mate: &Gear,
    straddle: f64,
    cycles: f64,
    factors: &ToothRatingFactors,
) -> Result<ToothRating, ToothError> {
    let material = &gear.material;
    required(mesh, gear, material.brinell_hardness, "Brinell hardness")?;
    let bending_strength = required(mesh, gear, material.bending_strength, "bending allowable")?;
    let contact_strength = required(mesh, gear, material.contact_strength, "contact allowable")?;

    let b = gear.face_width.min(mate.face_width);
    let ft = forces.tangential.abs();
    let overload = OVERLOAD[factors.power_source as usize][factors.driven_machine as usize];
    let dynamic = dynamic_factor(gear.quality, forces.pitch_line_velocity);
    let size = size_factor(gear, b);
    let load_distribution = load_distribution_factor(gear, b, straddle, factors);
    let rim_thickness = rim_thickness_factor(gear);
    let bending_geometry = bending_geometry_factor(gear, mate);
    let reliability = reliability_factor(factors.reliability);
    let temperature = 1.0;

    let bending_stress = ft * overload * dynamic * size * load_distribution * rim_thickness
        / (b * gear.transverse_module() * bending_geometry);
    let bending_safety = bending_strength * factors.bending_life.at(cycles)
        / (bending_stress * temperature * reliability);

    let (pinion, wheel) = pinion_and_wheel(mesh);
    let pitting_geometry = pitting_geometry_factor(mesh);
    let elastic = elastic_coefficient(mesh);
    let contact_stress = elastic
        * (ft * overload * dynamic * size * load_distribution * factors.surface_condition
            / (b * pinion.pitch_diameter() * pitting_geometry))
            .sqrt();
    let hardness_ratio = if gear.id == wheel.id {
        hardness_ratio_factor(mesh)?
    } else {
        1.0
    };
    let pitting_safety = contact_strength * factors.pitting_life.at(cycles) * hardness_ratio
        / (contact_stress * temperature * reliability);

    if bending_safety < 1.0 || pitting_safety < 1.0 {
        warn!(
            "gear {} on mesh {}: SF bending {bending_safety:.3}, pitting {pitting_safety:.3}",
            gear.id, mesh.id
        );
    }

    Ok(ToothRating {
        gear: gear.id.clone(),
        bending_stress,
        contact_stress,
        bending_safety,
        pitting_safety,
        factors: RatingFactors {
            overload,
            dynamic,
            size,
            load_distribution,
            rim_thickness,
            bending_geometry,
            pitting_geometry,
            elastic,
            hardness_ratio,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::material::{Material, MaterialKind};

    fn steel(hardness: f64) -> Arc<Material> {
        Arc::new(
            Material::new("steel", MaterialKind::Steel, 600.0e6, 900.0e6)
                .with_hardness(hardness)
                .with_gear_allowables(300.0e6, 1_000.0e6),
        )
    }

    fn spur_mesh() -> Mesh {
        let pinion = Gear::new("p", 0.003, 20, 0.03, steel(300.0));
        let wheel = Gear::new("w", 0.003, 60, 0.03, steel(240.0));
        Mesh::new("m", pinion, wheel)
    }

    #[test]
    fn overload_table_order() {
        assert_eq!(OVERLOAD[PowerSource::Uniform as usize][DrivenMachine::Uniform as usize], 1.0);
        assert_eq!(
            OVERLOAD[PowerSource::MediumShock as usize][DrivenMachine::HeavyShock as usize],
            2.25
        );
    }

    #[test]
    fn dynamic_factor_grows_with_speed_and_drops_with_quality() {
        assert_eq!(dynamic_factor(6.0, 0.0), 1.0);
        assert!(dynamic_factor(6.0, 10.0) > dynamic_factor(6.0, 5.0));
        assert!(dynamic_factor(10.0, 10.0) < dynamic_factor(6.0, 10.0));
    }

    #[test]
    fn dynamic_factor_clamps_the_accuracy_grade() {
        assert_eq!(dynamic_factor(12.0, 10.0), 1.0);
        assert_eq!(dynamic_factor(13.0, 10.0), 1.0);
        assert!(dynamic_factor(13.0, 10.0).is_finite());
        assert_eq!(dynamic_factor(3.0, 10.0), dynamic_factor(5.0, 10.0));
    }

    #[test]
    fn rim_factor_only_for_thin_rims() {
        let solid = Gear::new("g", 0.003, 40, 0.03, steel(300.0));
        assert_eq!(rim_thickness_factor(&solid), 1.0);
        let thick = solid.clone().with_bore(0.05);
        assert_eq!(rim_thickness_factor(&thick), 1.0);
        // Root diameter 0.1125 m, whole depth 6.75 mm.
        let thin = solid.with_bore(0.1125 - 2.0 * 0.00675);
        assert_relative_eq!(rim_thickness_factor(&thin), 1.6 * 2.242_f64.ln(), max_relative = 1.0e-9);
    }

    #[test]
    fn geometry_factor_matches_chart_nodes() {
        let steel = steel(300.0);
        let gear = Gear::new("g", 0.003, 30, 0.03, steel.clone()).with_helix_angle(20.0_f64.to_radians());
        let mate = Gear::new("m", 0.003, 75, 0.03, steel);
        assert_relative_eq!(bending_geometry_factor(&gear, &mate), 0.551, max_relative = 1.0e-9);
    }

    #[test]
    fn spur_pair_is_rated() {
        let mesh = spur_mesh();
        let forces = MeshForces::compute(&mesh, 60.0, 1_500.0, 1.0);
        let rating = verify_gear_tooth(&mesh, &forces, &Straddle::default(), &ToothRatingFactors::default())
            .expect("both gears have allowables");
        assert_eq!(rating.driving.gear, "p");
        assert_eq!(rating.driven.gear, "w");
        assert!(rating.driving.bending_safety > 0.0);
        assert!(rating.driving.pitting_safety > 0.0);
        // Both gears share the contact stress apart from their own factors.
        assert_eq!(rating.driving.factors.elastic, 191.0e3);
        assert_eq!(rating.driving.factors.hardness_ratio, 1.0);
        assert_eq!(rating.driven.factors.hardness_ratio, 1.0 + (8.98 * 1.25 - 8.29) * 1.0e-3 * 2.0);
        assert_eq!(
            rating.safety(),
            rating.driving.safety().min(rating.driven.safety())
        );
    }

    #[test]
    fn doubling_torque_scales_stresses() {
        let mesh = spur_mesh();
        let factors = ToothRatingFactors::default();
        let light = verify_gear_tooth(&mesh, &MeshForces::compute(&mesh, 50.0, 1_000.0, 1.0), &Straddle::default(), &factors)
            .expect("rated");
        let heavy = verify_gear_tooth(&mesh, &MeshForces::compute(&mesh, 100.0, 1_000.0, 1.0), &Straddle::default(), &factors)
            .expect("rated");
        assert_relative_eq!(heavy.driving.bending_stress, 2.0 * light.driving.bending_stress, max_relative = 1.0e-12);
        assert_relative_eq!(
            heavy.driving.contact_stress,
            2.0_f64.sqrt() * light.driving.contact_stress,
            max_relative = 1.0e-12
        );
        assert!(heavy.safety() < light.safety());
    }

    #[test]
    fn gear_without_allowables_is_not_rated() {
        let bare = Arc::new(Material::new("bare", MaterialKind::Steel, 500.0e6, 800.0e6));
        let pinion = Gear::new("p", 0.003, 20, 0.03, steel(300.0));
        let wheel = Gear::new("w", 0.003, 60, 0.03, bare.clone());
        let mesh = Mesh::new("m", pinion, wheel);
        let forces = MeshForces::compute(&mesh, 60.0, 1_500.0, 1.0);
        let error = verify_gear_tooth(&mesh, &forces, &Straddle::default(), &ToothRatingFactors::default())
            .expect_err("wheel material has no gear data");
        assert!(matches!(
            error,
            ToothError::MissingMaterialData { ref gear, ref material, .. } if gear == "w" && material == "bare"
        ));

        let hardened = Arc::new(Material::new("bare", MaterialKind::Steel, 500.0e6, 800.0e6).with_hardness(250.0));
        let mesh = Mesh::new(
            "m",
            Gear::new("p", 0.003, 20, 0.03, hardened),
            Gear::new("w", 0.003, 60, 0.03, steel(240.0)),
        );
        let error = verify_gear_tooth(&mesh, &forces, &Straddle::default(), &ToothRatingFactors::default())
            .expect_err("pinion material has no allowables");
        assert_eq!(
            error,
            ToothError::MissingMaterialData {
                mesh: "m".into(),
                gear: "p".into(),
                material: "bare".into(),
                property: "bending allowable",
            }
        );
    }

    #[test]
    fn pitting_geometry_of_spur_mesh() {
        let mesh = spur_mesh();
        let phi = 20.0_f64.to_radians();
        assert_relative_eq!(
            pitting_geometry_factor(&mesh),
            phi.cos() * phi.sin() / 2.0 * 3.0 / 4.0,
            max_relative = 1.0e-12
        );
        let internal = spur_mesh().with_kind(MeshKind::Internal);
        assert_relative_eq!(
            pitting_geometry_factor(&internal),
            phi.cos() * phi.sin() / 2.0 * 3.0 / 2.0,
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn reliability_factor_table() {
        assert_eq!(reliability_factor(0.99), 1.0);
        assert_eq!(reliability_factor(0.9999), 1.5);
        assert_relative_eq!(reliability_factor(0.95), 0.85 + 0.15 * 0.05 / 0.09, max_relative = 1.0e-9);
    }
}
