//! Named celestial body.

use core::fmt;

use gs_core::Vec3;

use crate::error::{SimError, SimResult};
use crate::state::SystemState;

/// Point mass with a name and a physical radius.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CelestialBody {
    name: String,
    /// kg
    mass: f64,
    /// m
    radius: f64,
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
}

impl CelestialBody {
    /// Body at rest at the origin.
    pub fn new(name: impl Into<String>, mass: f64, radius: f64) -> Self {
        Self {
            name: name.into(),
            mass,
            radius,
            position: Vec3::zero(),
            velocity: Vec3::zero(),
            acceleration: Vec3::zero(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    /// x += v * dt
    pub fn update_position(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// v += a * dt
    pub fn update_velocity(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [M={:e}, R={:e}, Pos={}, Vel={}]",
            self.name, self.mass, self.radius, self.position, self.velocity
        )
    }
}

/// Pack bodies into a state (time 0) plus their co-indexed masses.
pub fn to_state(bodies: &[CelestialBody]) -> (SystemState, Vec<f64>) {
    let state = SystemState {
        positions: bodies.iter().map(CelestialBody::position).collect(),
        velocities: bodies.iter().map(CelestialBody::velocity).collect(),
        time: 0.0,
    };
    let masses = bodies.iter().map(CelestialBody::mass).collect();
    (state, masses)
}

/// Write positions and velocities from `state` back into `bodies`.
pub fn apply_state(bodies: &mut [CelestialBody], state: &SystemState) -> SimResult<()> {
    state.validate()?;
    if bodies.len() != state.len() {
        return Err(SimError::ShapeMismatch {
            what: "bodies vs state",
            expected: bodies.len(),
            found: state.len(),
        });
    }

    for ((body, &x), &v) in bodies.iter_mut().zip(&state.positions).zip(&state.velocities) {
        body.position = x;
        body.velocity = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::constants::EARTH_MASS;

    #[test]
    fn new_body_is_at_rest() {
        let b = CelestialBody::new("Earth", EARTH_MASS, 6.371e6);
        assert_eq!(b.name(), "Earth");
        assert_eq!(b.mass(), EARTH_MASS);
        assert_eq!(b.radius(), 6.371e6);
        assert_eq!(b.position(), Vec3::zero());
        assert_eq!(b.velocity(), Vec3::zero());
        assert_eq!(b.acceleration(), Vec3::zero());
    }

    #[test]
    fn steppers_apply_kinematics() {
        let mut b = CelestialBody::new("probe", 1.0, 1.0);
        b.set_velocity(Vec3::new(1.0, 2.0, 0.0));
        b.set_acceleration(Vec3::new(0.0, 0.0, -1.0));

        b.update_position(2.0);
        assert_eq!(b.position(), Vec3::new(2.0, 4.0, 0.0));

        b.update_velocity(2.0);
        assert_eq!(b.velocity(), Vec3::new(1.0, 2.0, -2.0));
    }

    #[test]
    fn display_lists_name_and_kinematics() {
        let b = CelestialBody::new("Moon", 7.0e22, 1.5e6).with_position(Vec3::new(1.0, 0.0, 0.0));
        let s = b.to_string();
        assert!(s.starts_with("Moon [M=7e22, R=1.5e6"));
        assert!(s.contains("Pos=(1, 0, 0)"));
        assert!(s.ends_with("Vel=(0, 0, 0)]"));
    }

    #[test]
    fn state_round_trip_through_bodies() {
        let mut bodies = vec![
            CelestialBody::new("a", 1.0, 0.1),
            CelestialBody::new("b", 2.0, 0.1).with_velocity(Vec3::one()),
        ];
        let (mut state, masses) = to_state(&bodies);
        assert_eq!(masses, vec![1.0, 2.0]);
        assert_eq!(state.velocities[1], Vec3::one());

        state.positions[0] = Vec3::new(5.0, 0.0, 0.0);
        apply_state(&mut bodies, &state).unwrap();
        assert_eq!(bodies[0].position(), Vec3::new(5.0, 0.0, 0.0));

        assert!(apply_state(&mut bodies[..1], &state).is_err());
    }
}
