use std::sync::Arc;

use gearx::{
    Bearing, BearingKind, CouplingRole, Gear, Gearbox, Material, MaterialKind, Mesh, MeshChain,
    MeshError, OperatingPoint, ProfileSegment, Shaft, SurfaceFinish,
};

/// Motor driving the demonstration reducer: 15 kW at 1450 rpm.
pub fn motor() -> OperatingPoint {
    OperatingPoint::from_power(15_000.0, 1_450.0)
}

fn helical(id: &str, module: f64, teeth: u32, face: f64, helix: f64, steel: &Arc<Material>) -> Gear {
    Gear::new(id, module, teeth, face, steel.clone())
        .with_helix_angle(helix.to_radians())
        .with_quality(7.0)
}

/// Build a two-stage helical reducer with a total ratio of about 11.9.
///
/// The layout follows a common parallel-shaft arrangement: every shaft runs on a
/// locating deep groove ball bearing and a floating bearing, the pinions sit
/// between the bearings and the output shaft overhangs to its coupling. See
/// <https://en.wikipedia.org/wiki/Gear_train> for the kinematics.
pub fn build_reducer() -> Result<Gearbox, MeshError> {
    let gear_steel = Arc::new(
        Material::new("18CrNiMo7-6", MaterialKind::Steel, 850.0e6, 1_150.0e6)
            .with_hardness(300.0)
            .with_gear_allowables(380.0e6, 1_150.0e6),
    );
    let shaft_steel = Arc::new(
        Material::new("42CrMo4", MaterialKind::Steel, 650.0e6, 900.0e6)
            .with_surface(SurfaceFinish::Ground)
            .with_hardness(270.0),
    );

    // Mating helical gears have opposite hands.
    let mut chain = MeshChain::new();
    chain.add_mesh(
        Mesh::new(
            "stage-1",
            helical("g1", 0.003, 19, 0.040, 15.0, &gear_steel),
            helical("g2", 0.003, 71, 0.036, -15.0, &gear_steel),
        )
        .with_efficiency(0.98),
    )?;
    chain.add_mesh(
        Mesh::new(
            "stage-2",
            helical("g3", 0.004, 21, 0.055, -12.0, &gear_steel),
            helical("g4", 0.004, 67, 0.050, 12.0, &gear_steel).with_bore(0.110),
        )
        .with_efficiency(0.98),
    )?;
    chain.couple("g2", "g3")?;

    let input = Shaft::new("input", shaft_steel.clone())
        .with_segment(ProfileSegment::new(0.000, 0.050, 0.032).with_keyway())
        .with_segment(ProfileSegment::new(0.050, 0.070, 0.040).with_fillet(0.0015))
        .with_segment(ProfileSegment::new(0.070, 0.200, 0.046))
        .with_segment(ProfileSegment::new(0.200, 0.220, 0.040).with_fillet(0.0015))
        .with_bearing(
            Bearing::new("A", 0.060, BearingKind::Ball, 42_300.0, 24_000.0)
                .locating()
                .with_skf_data(1_020.0, 0.065),
        )
        .with_bearing(
            Bearing::new("B", 0.210, BearingKind::Ball, 42_300.0, 24_000.0)
                .with_skf_data(1_020.0, 0.065),
        )
        .with_gear("g1", 0.100)
        .with_coupling(0.025, CouplingRole::Input)
        .with_section("coupling", 0.040)
        .with_section("seat A", 0.070)
        .with_section("pinion", 0.100);

    let intermediate = Shaft::new("intermediate", shaft_steel.clone())
        .with_segment(ProfileSegment::new(0.000, 0.020, 0.050).with_fillet(0.002))
        .with_segment(ProfileSegment::new(0.020, 0.180, 0.058).with_keyway())
        .with_segment(ProfileSegment::new(0.180, 0.220, 0.050).with_fillet(0.002))
        .with_bearing(
            Bearing::new("C", 0.010, BearingKind::Ball, 61_800.0, 38_000.0)
                .locating()
                .with_skf_data(1_600.0, 0.080),
        )
        .with_bearing(
            Bearing::new("D", 0.210, BearingKind::Roller, 73_500.0, 69_500.0)
                .with_skf_data(8_300.0, 0.070),
        )
        .with_gear("g2", 0.060)
        .with_gear("g3", 0.140)
        .with_section("wheel", 0.060)
        .with_section("pinion", 0.140)
        .with_section("seat D", 0.180);

    let output = Shaft::new("output", shaft_steel)
        .with_segment(ProfileSegment::new(0.000, 0.020, 0.070).with_fillet(0.002))
        .with_segment(ProfileSegment::new(0.020, 0.180, 0.080).with_keyway())
        .with_segment(ProfileSegment::new(0.180, 0.220, 0.070).with_fillet(0.002))
        .with_segment(ProfileSegment::new(0.220, 0.300, 0.065).with_fillet(0.0025).with_keyway())
        .with_bearing(
            Bearing::new("E", 0.010, BearingKind::Ball, 63_700.0, 45_000.0)
                .locating()
                .with_skf_data(1_900.0, 0.097),
        )
        .with_bearing(
            Bearing::new("F", 0.210, BearingKind::Roller, 137_000.0, 156_000.0)
                .with_skf_data(19_000.0, 0.097),
        )
        .with_gear("g4", 0.140)
        .with_coupling(0.270, CouplingRole::Output)
        .with_section("wheel", 0.140)
        .with_section("seat F", 0.220)
        .with_section("coupling", 0.250);

    Ok(Gearbox::new(chain, vec![input, intermediate, output]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearx::{analyze, AnalysisConfig};

    #[test]
    fn produces_expected_results() {
        let gearbox = build_reducer().expect("demo reducer builds");
        let report = analyze(&gearbox, &motor(), &AnalysisConfig::default());
        assert_eq!(report.errors().count(), 0);
        assert_eq!(report.ratings.len(), 2);

        // Speed falls by the tooth ratio of each stage.
        let ratio = (71.0 / 19.0) * (67.0 / 21.0);
        let output = &report.shafts[2];
        assert!((output.speed - 1_450.0 / ratio).abs() < 1.0e-9);
        assert!((ratio - 11.92).abs() < 0.01);

        let meshes = report.meshes.as_ref().expect("meshes resolve");
        let output_torque = motor().torque * ratio * 0.98 * 0.98;
        assert!((meshes[1].torque_out.abs() - output_torque).abs() < 1.0e-6);
    }
}
