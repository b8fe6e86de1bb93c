//! Initial conditions for common orbital setups.

use std::f64::consts::TAU;

use gs_core::constants::{AU, EARTH_MASS, G, SOLAR_MASS};
use gs_core::Vec3;

use crate::body::{CelestialBody, to_state};
use crate::error::SimResult;
use crate::gravity::GravityModel;
use crate::state::SystemState;

const SUN_RADIUS_M: f64 = 6.957e8;
const EARTH_RADIUS_M: f64 = 6.371e6;

/// A named set of bodies ready to be integrated.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub bodies: Vec<CelestialBody>,
}

impl Scenario {
    /// Initial state (time 0) and the co-indexed masses.
    pub fn state(&self) -> (SystemState, Vec<f64>) {
        to_state(&self.bodies)
    }

    pub fn masses(&self) -> Vec<f64> {
        self.bodies.iter().map(CelestialBody::mass).collect()
    }

    /// Gravity bound to this scenario's masses.
    pub fn model(&self) -> SimResult<GravityModel> {
        GravityModel::new(self.masses())
    }
}

/// Period (s) of a circular two-body orbit with separation `separation`.
pub fn orbital_period(m_central: f64, m_orbiter: f64, separation: f64) -> f64 {
    TAU * (separation.powi(3) / (G * (m_central + m_orbiter))).sqrt()
}

/// Two bodies on a circular orbit in the centre-of-mass frame.
///
/// Separation lies along x and the orbit is counter-clockwise in the xy
/// plane; total momentum is zero.
pub fn circular_two_body(m_central: f64, m_orbiter: f64, separation: f64) -> Scenario {
    let total = m_central + m_orbiter;
    let v_rel = (G * total / separation).sqrt();

    let central = CelestialBody::new("primary", m_central, 0.0)
        .with_position(Vec3::new(-separation * m_orbiter / total, 0.0, 0.0))
        .with_velocity(Vec3::new(0.0, -v_rel * m_orbiter / total, 0.0));
    let orbiter = CelestialBody::new("secondary", m_orbiter, 0.0)
        .with_position(Vec3::new(separation * m_central / total, 0.0, 0.0))
        .with_velocity(Vec3::new(0.0, v_rel * m_central / total, 0.0));

    Scenario {
        bodies: vec![central, orbiter],
    }
}

/// Sun and Earth 1 AU apart on a circular orbit.
pub fn sun_earth() -> Scenario {
    let Scenario { bodies } = circular_two_body(SOLAR_MASS, EARTH_MASS, AU);
    let named = [("Sun", SUN_RADIUS_M), ("Earth", EARTH_RADIUS_M)];

    let bodies = bodies
        .into_iter()
        .zip(named)
        .map(|(b, (name, radius))| {
            CelestialBody::new(name, b.mass(), radius)
                .with_position(b.position())
                .with_velocity(b.velocity())
        })
        .collect();

    Scenario { bodies }
}

/// A resting central mass with `count` light bodies evenly spaced on a ring.
///
/// Ring bodies get the circular speed about the central mass alone; their
/// mutual pull is ignored when setting velocities.
pub fn ring(m_central: f64, m_orbiter: f64, count: usize, radius: f64) -> Scenario {
    let v = (G * m_central / radius).sqrt();

    let mut bodies = Vec::with_capacity(count + 1);
    bodies.push(CelestialBody::new("center", m_central, 0.0));
    for i in 0..count {
        let (sin, cos) = (TAU * i as f64 / count as f64).sin_cos();
        bodies.push(
            CelestialBody::new(format!("ring-{i}"), m_orbiter, 0.0)
                .with_position(Vec3::new(cos, sin, 0.0) * radius)
                .with_velocity(Vec3::new(-sin, cos, 0.0) * v),
        );
    }

    Scenario { bodies }
}
