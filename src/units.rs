//! Unit conversions for the empirical correlations.
//!
//! The public API works in SI base units. Chart fits from gear and shaft design
//! handbooks are stated in millimetres, inches, kpsi or megapascals, so the
//! conversions are routed through `uom` quantities here rather than scattered as
//! magic factors.

use uom::si::{
    angular_velocity::{radian_per_second, revolution_per_minute},
    f64::{AngularVelocity, Length, Pressure, Time},
    length::{inch, meter, millimeter},
    pressure::{megapascal, pascal, pound_force_per_square_inch},
    time::{hour, second},
};

/// Convert a rotational speed in rpm to rad/s.
#[must_use]
pub fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    AngularVelocity::new::<revolution_per_minute>(rpm).get::<radian_per_second>()
}

/// Convert a length in metres to millimetres.
#[must_use]
pub fn m_to_mm(value: f64) -> f64 {
    Length::new::<meter>(value).get::<millimeter>()
}

/// Convert a length in metres to inches.
#[must_use]
pub fn m_to_in(value: f64) -> f64 {
    Length::new::<meter>(value).get::<inch>()
}

/// Convert a stress in pascals to megapascals.
#[must_use]
pub fn pa_to_mpa(value: f64) -> f64 {
    Pressure::new::<pascal>(value).get::<megapascal>()
}

/// Convert a stress in megapascals to pascals.
#[must_use]
pub fn mpa_to_pa(value: f64) -> f64 {
    Pressure::new::<megapascal>(value).get::<pascal>()
}

/// Convert a stress in pascals to kpsi.
#[must_use]
pub fn pa_to_kpsi(value: f64) -> f64 {
    Pressure::new::<pascal>(value).get::<pound_force_per_square_inch>() / 1_000.0
}

/// Convert a duration in seconds to hours.
#[must_use]
pub fn s_to_h(value: f64) -> f64 {
    Time::new::<second>(value).get::<hour>()
}
