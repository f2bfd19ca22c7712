use std::fmt::Write;

use gearx::{GearboxReport, Requirements, ShaftReport};

/// Render a textual summary of a gearbox analysis.
///
/// Failed steps are listed in place of their results so one bad bearing or
/// section does not hide the rest of the report.
#[must_use]
pub fn render_report(report: &GearboxReport, requirements: &Requirements) -> String {
    let mut output = String::new();
    let point = &report.operating_point;

    writeln!(
        &mut output,
        "Gearbox analysis at T = {:.1} N m, n = {:.0} rpm (P = {:.2} kW)",
        point.torque,
        point.speed,
        point.power() / 1_000.0
    )
    .expect("writing to string cannot fail");

    match &report.meshes {
        Ok(meshes) => {
            writeln!(&mut output, "\nMeshes").expect("writing to string cannot fail");
            for mesh in meshes {
                writeln!(
                    &mut output,
                    "  {:<10} Ft = {:>8.1} N  Fr = {:>8.1} N  Fa = {:>8.1} N  T_out = {:>8.1} N m  v = {:.2} m/s",
                    mesh.mesh,
                    mesh.tangential,
                    mesh.radial,
                    mesh.axial,
                    mesh.torque_out,
                    mesh.pitch_line_velocity
                )
                .expect("writing to string cannot fail");
            }
        }
        Err(error) => {
            writeln!(&mut output, "Mesh resolution failed: {error}")
                .expect("writing to string cannot fail");
            return output;
        }
    }

    writeln!(&mut output, "\nGear teeth").expect("writing to string cannot fail");
    for rating in &report.ratings {
        let rating = match rating {
            Ok(rating) => rating,
            Err(error) => {
                writeln!(&mut output, "  {error}").expect("writing to string cannot fail");
                continue;
            }
        };
        for gear in [&rating.driving, &rating.driven] {
            writeln!(
                &mut output,
                "  {:<10} {:<4} σF = {:>6.1} MPa  SF = {:>5.2}   σH = {:>7.1} MPa  SH = {:>5.2}",
                rating.mesh,
                gear.gear,
                gear.bending_stress / 1.0e6,
                gear.bending_safety,
                gear.contact_stress / 1.0e6,
                gear.pitting_safety
            )
            .expect("writing to string cannot fail");
        }
    }

    for shaft in &report.shafts {
        render_shaft(&mut output, shaft);
    }

    let verdict = if report.passes(requirements) {
        "PASS"
    } else {
        "FAIL"
    };
    writeln!(&mut output, "\nVerdict: {verdict}").expect("writing to string cannot fail");
    if let Some(safety) = report.min_section_safety() {
        writeln!(&mut output, "  lowest shaft safety factor: {safety:.2}")
            .expect("writing to string cannot fail");
    }
    if let Some(safety) = report.min_tooth_safety() {
        writeln!(&mut output, "  lowest tooth safety factor: {safety:.2}")
            .expect("writing to string cannot fail");
    }
    if let Some(life) = report.min_bearing_life() {
        writeln!(&mut output, "  shortest bearing life: {life:.0} h")
            .expect("writing to string cannot fail");
    }
    output
}

fn render_shaft(output: &mut String, shaft: &ShaftReport) {
    writeln!(output, "\nShaft {} ({:.0} rpm)", shaft.shaft, shaft.speed)
        .expect("writing to string cannot fail");

    let reactions = match &shaft.reactions {
        Ok(reactions) => reactions,
        Err(error) => {
            writeln!(output, "  {error}").expect("writing to string cannot fail");
            return;
        }
    };
    for reaction in reactions {
        writeln!(
            output,
            "  bearing {:<4} x = {:.3} m  Fr = {:>8.1} N  Fa = {:>8.1} N",
            reaction.bearing,
            reaction.position,
            reaction.radial(),
            reaction.axial()
        )
        .expect("writing to string cannot fail");
    }

    // The peak of the sampled profile locates the most loaded region.
    if let Some(peak) = shaft
        .profile
        .iter()
        .max_by(|a, b| a.bending_moment().total_cmp(&b.bending_moment()))
    {
        writeln!(
            output,
            "  peak bending moment {:.1} N m at x = {:.3} m",
            peak.bending_moment(),
            peak.position
        )
        .expect("writing to string cannot fail");
    }

    for section in &shaft.sections {
        match section {
            Ok(section) => {
                let safety = &section.safety;
                writeln!(
                    output,
                    "  section {:<9} d = {:.1} mm  M = {:>7.1} N m  T = {:>7.1} N m  \
                     SF static = {:>5.2}  SF fatigue = {:>5.2} ({:?})",
                    safety.section,
                    safety.diameter * 1_000.0,
                    section.internal.bending_moment(),
                    section.internal.torque,
                    safety.static_safety,
                    safety.fatigue_safety,
                    safety.criterion
                )
                .expect("writing to string cannot fail");
            }
            Err(error) => {
                writeln!(output, "  {error}").expect("writing to string cannot fail");
            }
        }
    }

    for bearing in &shaft.bearings {
        match bearing {
            Ok(life) => {
                writeln!(
                    output,
                    "  bearing {:<4} P = {:>8.1} N  L10h = {:>9.0} h  Lnm = {:>9.0} h",
                    life.bearing, life.equivalent_load, life.basic_life, life.modified_life
                )
                .expect("writing to string cannot fail");
            }
            Err(error) => {
                writeln!(output, "  {error}").expect("writing to string cannot fail");
            }
        }
    }
}
