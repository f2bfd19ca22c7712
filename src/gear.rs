//! Gear tooth geometry.

use std::f64::consts::PI;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::material::Material;

/// Accuracy grades `Q_v` covered by the dynamic factor.
pub const QUALITY_RANGE: [f64; 2] = [5.0, 12.0];

/// A spur or helical involute gear. Lengths are in metres, angles in radians.
///
/// A helix angle of zero gives a spur gear. The sign of the helix angle encodes
/// the hand: positive for right hand, negative for left hand.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use gearx::{Gear, Material, MaterialKind};
///
/// let steel = Arc::new(Material::new("steel", MaterialKind::Steel, 400.0e6, 700.0e6));
/// let pinion = Gear::new("pinion", 0.003, 20, 0.03, steel);
/// assert!((pinion.pitch_diameter() - 0.060).abs() < 1.0e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gear {
    /// Unique identifier.
    pub id: String,
    /// Normal module.
    pub normal_module: f64,
    /// Number of teeth.
    pub teeth: u32,
    /// Signed helix angle.
    pub helix_angle: f64,
    /// Normal pressure angle.
    pub pressure_angle: f64,
    /// Face width.
    pub face_width: f64,
    /// Transmission accuracy grade `Q_v`, within [`QUALITY_RANGE`].
    pub quality: f64,
    /// Diameter of the bore or hub the rim sits on, if the gear is not solid.
    pub bore_diameter: Option<f64>,
    /// Gear material.
    pub material: Arc<Material>,
}

impl Gear {
    /// Create a spur gear with a 20° pressure angle and accuracy grade 6.
    pub fn new(
        id: impl Into<String>,
        normal_module: f64,
        teeth: u32,
        face_width: f64,
        material: Arc<Material>,
    ) -> Self {
        Self {
            id: id.into(),
            normal_module,
            teeth,
            helix_angle: 0.0,
            pressure_angle: 20.0_f64.to_radians(),
            face_width,
            quality: 6.0,
            bore_diameter: None,
            material,
        }
    }

    /// Set the signed helix angle.
    #[must_use]
    pub fn with_helix_angle(mut self, helix_angle: f64) -> Self {
        self.helix_angle = helix_angle;
        self
    }

    /// Set the normal pressure angle.
    #[must_use]
    pub fn with_pressure_angle(mut self, pressure_angle: f64) -> Self {
        self.pressure_angle = pressure_angle;
        self
    }

    /// Set the transmission accuracy grade.
    #[must_use]
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    /// Set the bore diameter under the rim.
    #[must_use]
    pub fn with_bore(mut self, bore_diameter: f64) -> Self {
        self.bore_diameter = Some(bore_diameter);
        self
    }

    /// Returns `true` for a spur gear.
    #[must_use]
    pub fn is_spur(&self) -> bool {
        self.helix_angle == 0.0
    }

    /// Normal circular pitch `p_n = π m_n`.
    #[must_use]
    pub fn normal_pitch(&self) -> f64 {
        PI * self.normal_module
    }

    /// Transverse circular pitch.
    #[must_use]
    pub fn transverse_pitch(&self) -> f64 {
        self.normal_pitch() / self.helix_angle.cos()
    }

    /// Axial pitch, zero for a spur gear.
    #[must_use]
    pub fn axial_pitch(&self) -> f64 {
        if self.is_spur() {
            0.0
        } else {
            self.transverse_pitch() / self.helix_angle.abs().tan()
        }
    }

    /// Transverse module `m_t = m_n / cos ψ`.
    #[must_use]
    pub fn transverse_module(&self) -> f64 {
        self.normal_module / self.helix_angle.cos()
    }

    /// Pitch diameter `d = m_t z`.
    #[must_use]
    pub fn pitch_diameter(&self) -> f64 {
        self.transverse_module() * f64::from(self.teeth)
    }

    /// Pitch radius.
    #[must_use]
    pub fn pitch_radius(&self) -> f64 {
        self.pitch_diameter() / 2.0
    }

    /// Transverse pressure angle `φ_t = atan(tan φ_n / cos ψ)`.
    #[must_use]
    pub fn transverse_pressure_angle(&self) -> f64 {
        (self.pressure_angle.tan() / self.helix_angle.cos()).atan()
    }

    /// Base circle radius.
    #[must_use]
    pub fn base_radius(&self) -> f64 {
        self.pitch_radius() * self.transverse_pressure_angle().cos()
    }

    /// Virtual tooth count `ceil(z / cos³ψ)` used for form factor lookups.
    #[must_use]
    pub fn virtual_teeth(&self) -> f64 {
        (f64::from(self.teeth) / self.helix_angle.cos().powi(3)).ceil()
    }

    /// Base helix angle.
    #[must_use]
    pub fn base_helix_angle(&self) -> f64 {
        (self.helix_angle.tan() * self.pressure_angle.cos()).atan()
    }

    /// Addendum `h_a = m_n`.
    #[must_use]
    pub fn addendum(&self) -> f64 {
        self.normal_module
    }

    /// Dedendum `h_f = 1.25 m_n`.
    #[must_use]
    pub fn dedendum(&self) -> f64 {
        1.25 * self.normal_module
    }

    /// Whole tooth depth.
    #[must_use]
    pub fn tooth_height(&self) -> f64 {
        self.addendum() + self.dedendum()
    }

    /// Tip diameter.
    #[must_use]
    pub fn tip_diameter(&self) -> f64 {
        self.pitch_diameter() + 2.0 * self.addendum()
    }

    /// Root diameter.
    #[must_use]
    pub fn root_diameter(&self) -> f64 {
        self.pitch_diameter() - 2.0 * self.dedendum()
    }
}
