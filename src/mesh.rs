//! Gear meshes, mesh chains and tooth force resolution.
//!
//! A [`MeshChain`] is a directed graph whose nodes are gears. A mesh edge runs from
//! the driving gear to the driven gear; a coaxial edge joins two gears keyed to the
//! same shaft, pointing along the power flow. Torque enters at the driving gear of
//! the first mesh added to the chain.

use std::collections::HashMap;

use log::debug;
use nalgebra::Vector3;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::errors::MeshError;
use crate::gear::{Gear, QUALITY_RANGE};
use crate::geometry::{radial_direction, Force, Moment};
use crate::shaft::ShaftLoad;
use crate::units::rpm_to_rad_per_s;

/// Relative tolerance used when comparing modules and angles of mating gears.
const MATCH_TOLERANCE: f64 = 1.0e-9;

/// Input torque and speed at the driving gear of the first mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Input torque in newton metres.
    pub torque: f64,
    /// Input speed in revolutions per minute.
    pub speed: f64,
}

impl OperatingPoint {
    /// Create an operating point from torque and speed.
    #[must_use]
    pub const fn new(torque: f64, speed: f64) -> Self {
        Self { torque, speed }
    }

    /// Create an operating point from motor power in watts and speed in rpm.
    ///
    /// # Examples
    /// ```
    /// use gearx::OperatingPoint;
    ///
    /// let motor = OperatingPoint::from_power(15_000.0, 1_450.0);
    /// assert!((motor.power() - 15_000.0).abs() < 1.0e-9);
    /// ```
    #[must_use]
    pub fn from_power(power: f64, speed: f64) -> Self {
        let omega = rpm_to_rad_per_s(speed);
        let torque = if omega == 0.0 { 0.0 } else { power / omega };
        Self { torque, speed }
    }

    /// Angular velocity in rad/s.
    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        rpm_to_rad_per_s(self.speed)
    }

    /// Transmitted power in watts.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.torque * self.angular_velocity()
    }
}

/// Whether the driven gear has external or internal teeth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshKind {
    /// Two external gears; the driven gear turns the other way.
    #[default]
    External,
    /// One of the gears is a ring gear; both turn the same way.
    Internal,
}

/// Which gear of a mesh a load is requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshSide {
    /// The gear that delivers torque into the mesh.
    Driving,
    /// The gear that receives torque from the mesh.
    Driven,
}

/// Contact between a driving and a driven gear.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Unique identifier.
    pub id: String,
    /// Gear delivering torque.
    pub driving: Gear,
    /// Gear receiving torque.
    pub driven: Gear,
    /// External or internal contact.
    pub kind: MeshKind,
    /// Ratio of output to input power.
    pub efficiency: f64,
    /// Angle of the pitch point about the shaft axis, seen from the driving gear,
    /// measured from +Y towards +Z in radians.
    pub placement: f64,
}

impl Mesh {
    /// Create a lossless external mesh with the pitch point on +Y.
    pub fn new(id: impl Into<String>, driving: Gear, driven: Gear) -> Self {
        Self {
            id: id.into(),
            driving,
            driven,
            kind: MeshKind::External,
            efficiency: 1.0,
            placement: 0.0,
        }
    }

    /// Set the mesh kind.
    #[must_use]
    pub fn with_kind(mut self, kind: MeshKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the mesh efficiency.
    #[must_use]
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// Set the angular position of the pitch point.
    #[must_use]
    pub fn with_placement(mut self, placement: f64) -> Self {
        self.placement = placement;
        self
    }

    /// Gear ratio `z_driven / z_driving`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        f64::from(self.driven.teeth) / f64::from(self.driving.teeth)
    }

    /// Distance between the gear axes.
    #[must_use]
    pub fn center_distance(&self) -> f64 {
        let (a, b) = (self.driving.pitch_radius(), self.driven.pitch_radius());
        match self.kind {
            MeshKind::External => a + b,
            MeshKind::Internal => (a - b).abs(),
        }
    }

    /// Check that the two gears can mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMesh`] when both sides are the same gear, when the
    /// normal modules, pressure angles or helix angle magnitudes differ, or when the
    /// efficiency is outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.driving.id == self.driven.id {
            return Err(MeshError::invalid(&self.id, "a gear cannot mesh with itself"));
        }
        if !close(self.driving.normal_module, self.driven.normal_module) {
            return Err(MeshError::invalid(
                &self.id,
                format!(
                    "modules differ ({} m vs {} m)",
                    self.driving.normal_module, self.driven.normal_module
                ),
            ));
        }
        if !close(self.driving.pressure_angle, self.driven.pressure_angle) {
            return Err(MeshError::invalid(&self.id, "pressure angles differ"));
        }
        if !close(self.driving.helix_angle.abs(), self.driven.helix_angle.abs()) {
            return Err(MeshError::invalid(&self.id, "helix angles differ"));
        }
        if self.driving.teeth == 0 || self.driven.teeth == 0 {
            return Err(MeshError::invalid(&self.id, "gears need at least one tooth"));
        }
        for gear in [&self.driving, &self.driven] {
            if !(QUALITY_RANGE[0]..=QUALITY_RANGE[1]).contains(&gear.quality) {
                return Err(MeshError::invalid(
                    &self.id,
                    format!(
                        "gear {} has accuracy grade {} outside {}..={}",
                        gear.id, gear.quality, QUALITY_RANGE[0], QUALITY_RANGE[1]
                    ),
                ));
            }
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(MeshError::invalid(
                &self.id,
                format!("efficiency {} is outside (0, 1]", self.efficiency),
            ));
        }
        Ok(())
    }
}

/// Relative comparison of two positive quantities.
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= MATCH_TOLERANCE * a.abs().max(b.abs()).max(1.0e-12)
}

/// Tooth forces and transmitted torque of one mesh.
///
/// Forces are in the local mesh frame and are the loads on the driving gear:
/// `tangential` along the pitch-line velocity, `radial` towards the gear centre and
/// `axial` along the gear axis with the sign of the helix angle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshForces {
    /// Identifier of the mesh.
    pub mesh: String,
    /// Identifier of the driving gear.
    pub driving_gear: String,
    /// Identifier of the driven gear.
    pub driven_gear: String,
    /// Mesh kind.
    pub kind: MeshKind,
    /// Tangential force `F_t = T_in / r_driving` in newtons.
    pub tangential: f64,
    /// Radial force `F_r = F_t tan φ_n / cos ψ` in newtons.
    pub radial: f64,
    /// Axial force `F_a = F_t tan ψ` in newtons.
    pub axial: f64,
    /// Torque on the driving gear's shaft in newton metres.
    pub torque_in: f64,
    /// Torque delivered to the driven gear's shaft in newton metres.
    pub torque_out: f64,
    /// Gear ratio `z_driven / z_driving`.
    pub ratio: f64,
    /// Mesh efficiency.
    pub efficiency: f64,
    /// Driving gear speed in rpm.
    pub speed_in: f64,
    /// Driven gear speed in rpm.
    pub speed_out: f64,
    /// Rotation sense of the driving gear about +X (`1.0` or `-1.0`).
    pub driving_direction: f64,
    /// Rotation sense of the driven gear about +X.
    pub driven_direction: f64,
    /// Pitch-line velocity in m/s.
    pub pitch_line_velocity: f64,
    /// Pitch radius of the driving gear.
    pub driving_radius: f64,
    /// Pitch radius of the driven gear.
    pub driven_radius: f64,
    /// Angular position of the pitch point.
    pub placement: f64,
}

impl MeshForces {
    /// Resolve the forces of `mesh` for a torque and speed at its driving gear.
    ///
    /// `direction` is the rotation sense of the driving gear about +X.
    #[must_use]
    pub fn compute(mesh: &Mesh, torque_in: f64, speed_in: f64, direction: f64) -> Self {
        let gear = &mesh.driving;
        let radius = gear.pitch_radius();
        let tangential = torque_in / radius;
        let radial = tangential * gear.pressure_angle.tan() / gear.helix_angle.cos();
        let axial = tangential * gear.helix_angle.tan();
        let ratio = mesh.ratio();
        let driven_direction = match mesh.kind {
            MeshKind::External => -direction,
            MeshKind::Internal => direction,
        };
        Self {
            mesh: mesh.id.clone(),
            driving_gear: gear.id.clone(),
            driven_gear: mesh.driven.id.clone(),
            kind: mesh.kind,
            tangential,
            radial,
            axial,
            torque_in,
            torque_out: torque_in * ratio * mesh.efficiency,
            ratio,
            efficiency: mesh.efficiency,
            speed_in,
            speed_out: speed_in / ratio,
            driving_direction: direction,
            driven_direction,
            pitch_line_velocity: rpm_to_rad_per_s(speed_in).abs() * radius,
            driving_radius: radius,
            driven_radius: mesh.driven.pitch_radius(),
            placement: mesh.placement,
        }
    }

    /// Tangential force on the driven gear, reduced by the mesh losses.
    #[must_use]
    pub fn driven_tangential(&self) -> f64 {
        self.tangential * self.efficiency
    }

    /// Tooth load on one gear, rotated into the shaft frame and reduced to the axis.
    ///
    /// The returned load sits at `position` on the shaft and carries the tooth force
    /// plus the moment of that force about the axis, which includes the torque.
    #[must_use]
    pub fn shaft_load(&self, side: MeshSide, position: f64) -> ShaftLoad {
        let axis = Vector3::x();
        let towards_pitch = radial_direction(self.placement);
        let tangent = axis.cross(&towards_pitch);
        let s = self.driving_direction;
        let on_driving = -s * self.tangential * tangent - self.radial * towards_pitch
            + -s * self.axial * axis;

        let (force, arm, label) = match side {
            MeshSide::Driving => (
                on_driving,
                self.driving_radius * towards_pitch,
                &self.driving_gear,
            ),
            MeshSide::Driven => {
                let driven_arm = match self.kind {
                    MeshKind::External => -towards_pitch,
                    MeshKind::Internal => towards_pitch,
                };
                (
                    -on_driving * self.efficiency,
                    self.driven_radius * driven_arm,
                    &self.driven_gear,
                )
            }
        };
        ShaftLoad::new(
            format!("{}@{}", label, self.mesh),
            position,
            Force::from(force),
            Moment::from(arm.cross(&force)),
        )
    }
}

/// Link between two gears in a [`MeshChain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Link {
    /// Index into the chain's mesh list.
    Mesh(usize),
    /// Both gears sit on the same shaft.
    Coaxial,
}

/// Torque state carried along the chain while resolving.
#[derive(Clone, Copy, Debug)]
struct GearState {
    /// Torque on the gear's shaft.
    torque: f64,
    /// Speed in rpm.
    speed: f64,
    /// Rotation sense about +X.
    direction: f64,
}

/// Ordered set of meshes forming a gear train.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use gearx::{resolve_mesh, Gear, Material, MaterialKind, Mesh, MeshChain, OperatingPoint};
///
/// let steel = Arc::new(Material::new("steel", MaterialKind::Steel, 400.0e6, 700.0e6));
/// let pinion = Gear::new("pinion", 0.002, 20, 0.02, steel.clone());
/// let wheel = Gear::new("wheel", 0.002, 60, 0.02, steel);
///
/// let mut chain = MeshChain::new();
/// chain.add_mesh(Mesh::new("stage", pinion, wheel)).expect("gears mesh");
/// let forces = resolve_mesh(&chain, &OperatingPoint::new(10.0, 1_500.0)).expect("resolves");
/// assert!((forces[0].torque_out - 30.0).abs() < 1.0e-9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MeshChain {
    /// Gear topology.
    graph: DiGraph<String, Link>,
    /// Node of each gear id.
    index: HashMap<String, NodeIndex>,
    /// Meshes in insertion order.
    meshes: Vec<Mesh>,
}

impl MeshChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes in the chain.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Meshes in insertion order.
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Look up a mesh by id.
    #[must_use]
    pub fn mesh(&self, id: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|mesh| mesh.id == id)
    }

    /// Look up a gear by id in any mesh of the chain.
    #[must_use]
    pub fn gear(&self, id: &str) -> Option<&Gear> {
        self.meshes.iter().find_map(|mesh| {
            if mesh.driving.id == id {
                Some(&mesh.driving)
            } else if mesh.driven.id == id {
                Some(&mesh.driven)
            } else {
                None
            }
        })
    }

    /// Identifier of the gear that receives the input torque.
    #[must_use]
    pub fn input_gear(&self) -> Option<&str> {
        self.meshes.first().map(|mesh| mesh.driving.id.as_str())
    }

    /// Add a mesh to the chain and return its position.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMesh`] when the gears cannot mesh or the mesh id is
    /// already used.
    pub fn add_mesh(&mut self, mesh: Mesh) -> Result<usize, MeshError> {
        mesh.validate()?;
        if self.mesh(&mesh.id).is_some() {
            return Err(MeshError::invalid(&mesh.id, "duplicate mesh id"));
        }
        let driving = self.node(&mesh.driving.id);
        let driven = self.node(&mesh.driven.id);
        let position = self.meshes.len();
        self.graph.add_edge(driving, driven, Link::Mesh(position));
        self.meshes.push(mesh);
        Ok(position)
    }

    /// Declare that `downstream` is keyed to the same shaft as `upstream`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMesh`] when either gear is not part of the chain.
    pub fn couple(&mut self, upstream: &str, downstream: &str) -> Result<(), MeshError> {
        let from = self.index.get(upstream).copied();
        let to = self.index.get(downstream).copied();
        match (from, to) {
            (Some(from), Some(to)) if from != to => {
                self.graph.add_edge(from, to, Link::Coaxial);
                Ok(())
            }
            _ => Err(MeshError::invalid(
                format!("{upstream}->{downstream}"),
                "coupling must join two distinct gears of the chain",
            )),
        }
    }

    /// Node for a gear id, created on first use.
    fn node(&mut self, id: &str) -> NodeIndex {
        if let Some(node) = self.index.get(id) {
            return *node;
        }
        let node = self.graph.add_node(id.to_owned());
        self.index.insert(id.to_owned(), node);
        node
    }

    /// Propagate the operating point through the chain.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMesh`] when the chain is empty or cyclic, when a
    /// gear is driven from two places, or when a mesh is not reachable from the
    /// input gear.
    pub fn resolve(&self, operating_point: &OperatingPoint) -> Result<Vec<MeshForces>, MeshError> {
        let Some(first) = self.meshes.first() else {
            return Err(MeshError::invalid("chain", "no meshes to resolve"));
        };
        let order = toposort(&self.graph, None).map_err(|cycle| {
            MeshError::invalid(
                "chain",
                format!("cycle through gear {}", self.graph[cycle.node_id()]),
            )
        })?;

        let input = self.index[&first.driving.id];
        let mut states: HashMap<NodeIndex, GearState> = HashMap::new();
        states.insert(
            input,
            GearState {
                torque: operating_point.torque,
                speed: operating_point.speed,
                direction: 1.0,
            },
        );
        let mut resolved: Vec<Option<MeshForces>> = vec![None; self.meshes.len()];

        for node in order {
            let Some(state) = states.get(&node).copied() else {
                continue;
            };
            for edge in self.graph.edges(node) {
                let next = match *edge.weight() {
                    Link::Mesh(position) => {
                        let mesh = &self.meshes[position];
                        let forces =
                            MeshForces::compute(mesh, state.torque, state.speed, state.direction);
                        debug!(
                            "mesh {}: Ft = {:.1} N, Fr = {:.1} N, Fa = {:.1} N, T_out = {:.2} N m",
                            mesh.id, forces.tangential, forces.radial, forces.axial, forces.torque_out
                        );
                        let next = GearState {
                            torque: forces.torque_out,
                            speed: forces.speed_out,
                            direction: forces.driven_direction,
                        };
                        resolved[position] = Some(forces);
                        next
                    }
                    Link::Coaxial => state,
                };
                if states.insert(edge.target(), next).is_some() {
                    return Err(MeshError::invalid(
                        "chain",
                        format!("gear {} is driven more than once", self.graph[edge.target()]),
                    ));
                }
            }
        }

        resolved
            .into_iter()
            .zip(&self.meshes)
            .map(|(forces, mesh)| {
                forces.ok_or_else(|| {
                    MeshError::invalid(&mesh.id, "not connected to the input gear")
                })
            })
            .collect()
    }
}

/// Resolve tooth forces and torques for every mesh of `chain`.
///
/// # Errors
///
/// See [`MeshChain::resolve`].
pub fn resolve_mesh(
    chain: &MeshChain,
    operating_point: &OperatingPoint,
) -> Result<Vec<MeshForces>, MeshError> {
    chain.resolve(operating_point)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::material::{Material, MaterialKind};

    fn steel() -> Arc<Material> {
        Arc::new(Material::new("steel", MaterialKind::Steel, 400.0e6, 700.0e6))
    }

    fn gear(id: &str, teeth: u32) -> Gear {
        Gear::new(id, 0.002, teeth, 0.02, steel())
    }

    fn two_stage() -> MeshChain {
        let mut chain = MeshChain::new();
        chain
            .add_mesh(Mesh::new("s1", gear("g1", 20), gear("g2", 50)).with_efficiency(0.98))
            .expect("stage 1");
        chain
            .add_mesh(Mesh::new("s2", gear("g3", 18), gear("g4", 54)).with_efficiency(0.98))
            .expect("stage 2");
        chain.couple("g2", "g3").expect("intermediate shaft");
        chain
    }

    #[test]
    fn spur_forces_follow_pitch_radius() {
        let mut chain = MeshChain::new();
        chain
            .add_mesh(Mesh::new("m", gear("a", 20), gear("b", 40)))
            .expect("valid mesh");
        let forces = resolve_mesh(&chain, &OperatingPoint::new(20.0, 1_000.0)).expect("resolves");
        let mesh = &forces[0];

        assert_relative_eq!(mesh.tangential, 1_000.0, epsilon = 1.0e-9);
        assert_relative_eq!(
            mesh.radial,
            1_000.0 * 20.0_f64.to_radians().tan(),
            epsilon = 1.0e-9
        );
        assert_eq!(mesh.axial, 0.0);
        assert_relative_eq!(mesh.torque_out, 40.0, epsilon = 1.0e-9);
        assert_relative_eq!(mesh.speed_out, 500.0, epsilon = 1.0e-9);
        assert_eq!(mesh.driven_direction, -1.0);
    }

    #[test]
    fn helical_forces_include_axial_thrust() {
        let helix = 20.0_f64.to_radians();
        let mut chain = MeshChain::new();
        chain
            .add_mesh(Mesh::new(
                "m",
                gear("a", 20).with_helix_angle(helix),
                gear("b", 40).with_helix_angle(-helix),
            ))
            .expect("valid mesh");
        let forces = resolve_mesh(&chain, &OperatingPoint::new(20.0, 1_000.0)).expect("resolves");
        let radius = 0.002 / helix.cos() * 20.0 / 2.0;
        let tangential = 20.0 / radius;

        assert_relative_eq!(forces[0].tangential, tangential, epsilon = 1.0e-9);
        assert_relative_eq!(forces[0].axial, tangential * helix.tan(), epsilon = 1.0e-9);
        assert_relative_eq!(
            forces[0].radial,
            tangential * 20.0_f64.to_radians().tan() / helix.cos(),
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn torque_propagates_through_coaxial_gears() {
        let forces = two_stage()
            .resolve(&OperatingPoint::new(100.0, 1_500.0))
            .expect("two stages resolve");
        assert_relative_eq!(forces[0].torque_out, 100.0 * 2.5 * 0.98, epsilon = 1.0e-9);
        assert_relative_eq!(forces[1].torque_in, forces[0].torque_out, epsilon = 1.0e-12);
        assert_relative_eq!(forces[1].torque_out, forces[1].torque_in * 3.0 * 0.98, epsilon = 1.0e-9);
        assert_relative_eq!(forces[1].speed_out, 1_500.0 / 7.5, epsilon = 1.0e-9);
        assert_eq!(forces[1].driving_direction, -1.0);
        assert_eq!(forces[1].driven_direction, 1.0);

        for mesh in &forces {
            assert_relative_eq!(mesh.torque_out / mesh.torque_in, mesh.ratio * mesh.efficiency, epsilon = 1.0e-12);
            assert_relative_eq!(
                mesh.tangential * mesh.driving_radius,
                mesh.tangential * mesh.driven_radius / mesh.ratio,
                epsilon = 1.0e-9
            );
        }
    }

    #[test]
    fn internal_mesh_keeps_direction() {
        let mut chain = MeshChain::new();
        chain
            .add_mesh(Mesh::new("ring", gear("sun", 20), gear("annulus", 80)).with_kind(MeshKind::Internal))
            .expect("valid mesh");
        let forces = chain.resolve(&OperatingPoint::new(10.0, 800.0)).expect("resolves");
        assert_eq!(forces[0].driven_direction, 1.0);
        assert_relative_eq!(chain.meshes()[0].center_distance(), 0.06, epsilon = 1.0e-12);
    }

    #[test]
    fn module_mismatch_is_rejected() {
        let mut chain = MeshChain::new();
        let wrong = Gear::new("b", 0.003, 40, 0.02, steel());
        let error = chain
            .add_mesh(Mesh::new("m", gear("a", 20), wrong))
            .expect_err("modules differ");
        assert!(matches!(error, MeshError::InvalidMesh { ref mesh, .. } if mesh == "m"));
    }

    #[test]
    fn self_mesh_and_bad_efficiency_are_rejected() {
        let mut chain = MeshChain::new();
        assert!(chain.add_mesh(Mesh::new("m", gear("a", 20), gear("a", 20))).is_err());
        assert!(chain
            .add_mesh(Mesh::new("m", gear("a", 20), gear("b", 20)).with_efficiency(1.2))
            .is_err());
    }

    #[test]
    fn accuracy_grade_outside_the_dynamic_factor_is_rejected() {
        let mut chain = MeshChain::new();
        let error = chain
            .add_mesh(Mesh::new("m", gear("a", 20), gear("b", 40).with_quality(13.0)))
            .expect_err("grade 13 is not covered");
        assert!(matches!(
            error,
            MeshError::InvalidMesh { ref reason, .. } if reason.contains("gear b")
        ));
        assert!(chain
            .add_mesh(Mesh::new("m", gear("a", 20).with_quality(f64::NAN), gear("b", 40)))
            .is_err());
        chain
            .add_mesh(Mesh::new("m", gear("a", 20).with_quality(12.0), gear("b", 40)))
            .expect("grade 12 is covered");
    }

    #[test]
    fn cycles_are_rejected() {
        let mut chain = two_stage();
        chain
            .add_mesh(Mesh::new("back", gear("g4", 54), gear("g1", 20)))
            .expect("mesh itself is valid");
        let error = chain
            .resolve(&OperatingPoint::new(1.0, 100.0))
            .expect_err("cycle detected");
        assert!(error.to_string().contains("cycle"));
    }

    #[test]
    fn disconnected_meshes_are_rejected() {
        let mut chain = MeshChain::new();
        chain.add_mesh(Mesh::new("s1", gear("g1", 20), gear("g2", 40))).expect("stage 1");
        chain.add_mesh(Mesh::new("s2", gear("g3", 20), gear("g4", 40))).expect("stage 2");
        let error = chain
            .resolve(&OperatingPoint::new(1.0, 100.0))
            .expect_err("s2 is not driven");
        assert_eq!(error, MeshError::invalid("s2", "not connected to the input gear"));
    }

    #[test]
    fn shaft_loads_are_equal_and_opposite_without_losses() {
        let mut chain = MeshChain::new();
        chain
            .add_mesh(Mesh::new("m", gear("a", 20), gear("b", 40)).with_placement(0.3))
            .expect("valid mesh");
        let forces = chain.resolve(&OperatingPoint::new(20.0, 1_000.0)).expect("resolves");
        let driving = forces[0].shaft_load(MeshSide::Driving, 0.1);
        let driven = forces[0].shaft_load(MeshSide::Driven, 0.2);

        assert_relative_eq!(driving.force.x, -driven.force.x, epsilon = 1.0e-9);
        assert_relative_eq!(driving.force.y, -driven.force.y, epsilon = 1.0e-9);
        assert_relative_eq!(driving.force.z, -driven.force.z, epsilon = 1.0e-9);
        // The tooth force resists the input torque and drives the output shaft backwards.
        assert_relative_eq!(driving.moment.x, -20.0, epsilon = 1.0e-9);
        assert_relative_eq!(driven.moment.x, -40.0, epsilon = 1.0e-9);
        assert_eq!(driving.position, 0.1);
    }

    #[test]
    fn operating_point_from_power() {
        let point = OperatingPoint::from_power(1_000.0 * PI, 3_000.0);
        assert_relative_eq!(point.torque, 10.0, epsilon = 1.0e-12);
        assert_eq!(OperatingPoint::from_power(1_000.0, 0.0).torque, 0.0);
    }
}
