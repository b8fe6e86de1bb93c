//! Exact pairwise Newtonian gravity.
//!
//! Plain functions over co-indexed position/velocity/mass slices. Every pair
//! is summed directly (O(n²)); there is no softening, only a hard cutoff at
//! [`COINCIDENT_DISTANCE`] below which a pair contributes nothing.

use gs_core::constants::G;
use gs_core::numeric::{COINCIDENT_DISTANCE, ensure_positive};
use gs_core::Vec3;
use rayon::prelude::*;

use crate::error::{SimError, SimResult};
use crate::model::DerivativeFunction;
use crate::state::SystemState;

/// Force exerted on body A by body B (N), pointing from A toward B.
///
/// Returns the zero vector for near-coincident bodies.
pub fn gravitational_force(pos_a: Vec3, mass_a: f64, pos_b: Vec3, mass_b: f64) -> Vec3 {
    let r = pos_b - pos_a;
    let distance = r.magnitude();
    if distance < COINCIDENT_DISTANCE {
        return Vec3::zero();
    }

    // F = G * m_a * m_b / d^2
    let magnitude = G * mass_a * mass_b / (distance * distance);
    r.normalized() * magnitude
}

/// Sum of the forces from every other body on `positions[target]`.
pub fn net_force(positions: &[Vec3], masses: &[f64], target: usize) -> Vec3 {
    let pos_t = positions[target];
    let mass_t = masses[target];

    positions
        .iter()
        .zip(masses)
        .enumerate()
        .filter(|(j, _)| *j != target)
        .map(|(_, (&pos_j, &mass_j))| gravitational_force(pos_t, mass_t, pos_j, mass_j))
        .sum()
}

/// Fill `derivatives` with dr/dt = v and dv/dt = F/m for every body.
///
/// `masses` must be co-indexed with `state`; `derivatives` must already be
/// sized to the same body count.
pub fn gravitational_derivatives(
    state: &SystemState,
    masses: &[f64],
    derivatives: &mut SystemState,
) {
    derivatives.positions.copy_from_slice(&state.velocities);

    for (i, acc) in derivatives.velocities.iter_mut().enumerate() {
        *acc = net_force(&state.positions, masses, i) / masses[i];
    }

    derivatives.time = 1.0;
}

/// Same as [`gravitational_derivatives`] with bodies spread across the rayon pool.
///
/// Each task reads the shared position snapshot and writes only its own slot,
/// so results match the serial version exactly.
pub fn gravitational_derivatives_par(
    state: &SystemState,
    masses: &[f64],
    derivatives: &mut SystemState,
) {
    derivatives.positions.copy_from_slice(&state.velocities);

    let positions = &state.positions;
    derivatives
        .velocities
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, acc)| {
            *acc = net_force(positions, masses, i) / masses[i];
        });

    derivatives.time = 1.0;
}

/// Σ ½ mᵢ |vᵢ|²
pub fn kinetic_energy(velocities: &[Vec3], masses: &[f64]) -> f64 {
    velocities
        .iter()
        .zip(masses)
        .map(|(v, &m)| 0.5 * m * v.magnitude_squared())
        .sum()
}

/// −G Σ_{i<j} mᵢ mⱼ / dᵢⱼ, skipping near-coincident pairs.
pub fn potential_energy(positions: &[Vec3], masses: &[f64]) -> f64 {
    let n = positions.len();
    let mut potential = 0.0;

    for i in 0..n {
        for j in (i + 1)..n {
            let distance = positions[i].distance_to(&positions[j]);
            if distance >= COINCIDENT_DISTANCE {
                potential -= G * masses[i] * masses[j] / distance;
            }
        }
    }

    potential
}

/// Kinetic plus potential energy (J). Diagnostic only.
pub fn total_energy(positions: &[Vec3], velocities: &[Vec3], masses: &[f64]) -> f64 {
    kinetic_energy(velocities, masses) + potential_energy(positions, masses)
}

/// Σ mᵢ vᵢ (kg·m/s). Diagnostic only.
pub fn total_momentum(velocities: &[Vec3], masses: &[f64]) -> Vec3 {
    velocities.iter().zip(masses).map(|(&v, &m)| v * m).sum()
}

/// Gravity bound to a fixed mass sequence, usable as a [`DerivativeFunction`].
#[derive(Clone, Debug)]
pub struct GravityModel {
    masses: Vec<f64>,
    parallel: bool,
}

impl GravityModel {
    /// Every mass must be finite and strictly positive.
    pub fn new(masses: Vec<f64>) -> SimResult<Self> {
        for &m in &masses {
            ensure_positive(m, "body mass").map_err(|source| SimError::NonPhysical {
                what: "body mass",
                source,
            })?;
        }
        Ok(Self {
            masses,
            parallel: false,
        })
    }

    /// Evaluate per-body net forces on the rayon pool.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn total_energy(&self, state: &SystemState) -> f64 {
        total_energy(&state.positions, &state.velocities, &self.masses)
    }

    pub fn total_momentum(&self, state: &SystemState) -> Vec3 {
        total_momentum(&state.velocities, &self.masses)
    }
}

impl DerivativeFunction for GravityModel {
    fn derive(&mut self, state: &SystemState, out: &mut SystemState) {
        debug_assert_eq!(state.len(), self.masses.len(), "masses not co-indexed with state");
        if self.parallel {
            gravitational_derivatives_par(state, &self.masses, out);
        } else {
            gravitational_derivatives(state, &self.masses, out);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use gs_core::numeric::{Tolerances, nearly_equal, nearly_equal_vec};
    use proptest::prelude::*;

    fn position() -> impl Strategy<Value = Vec3> {
        (-1e3_f64..1e3, -1e3_f64..1e3, -1e3_f64..1e3).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn force_follows_inverse_square(
            a in position(),
            b in position(),
            ma in 1.0_f64..1e6,
            mb in 1.0_f64..1e6,
        ) {
            let d = a.distance_to(&b);
            prop_assume!(d > 1e-3);

            let f = gravitational_force(a, ma, b, mb);
            let tol = Tolerances {
                abs: 0.0,
                rel: 1e-9,
            };
            prop_assert!(nearly_equal(f.magnitude(), G * ma * mb / (d * d), tol));
            // aligned with the separation
            prop_assert!(f.dot(&(b - a)) > 0.0);
        }

        #[test]
        fn internal_forces_sum_to_zero(
            pts in prop::collection::vec(position(), 2..6),
        ) {
            let masses: Vec<f64> = (0..pts.len()).map(|i| 1.0 + i as f64).collect();
            let total: Vec3 = (0..pts.len()).map(|i| net_force(&pts, &masses, i)).sum();
            let mut scale = 0.0;
            for i in 0..pts.len() {
                for j in 0..pts.len() {
                    scale += gravitational_force(pts[i], masses[i], pts[j], masses[j]).magnitude();
                }
            }
            let tol = Tolerances {
                abs: 1e-9 * scale.max(1e-300),
                rel: 0.0,
            };
            prop_assert!(nearly_equal_vec(total, Vec3::zero(), tol));
        }
    }
}
