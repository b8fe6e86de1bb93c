//! N-body gravity simulation for gravsim.
//!
//! Provides:
//! - `SystemState` snapshots and the `DerivativeFunction` abstraction
//! - Exact pairwise Newtonian gravity plus energy/momentum diagnostics
//! - Fixed-step Euler, RK4 and position-Verlet integrators
//! - Named celestial bodies and ready-made orbital scenarios
//! - A recording runner with a conservation report

pub mod body;
pub mod error;
pub mod gravity;
pub mod integrator;
pub mod model;
pub mod scenario;
pub mod sim;
pub mod state;

// Re-exports for public API
pub use body::{CelestialBody, apply_state, to_state};
pub use error::{SimError, SimResult};
pub use gravity::{
    GravityModel, gravitational_derivatives, gravitational_force, kinetic_energy, net_force,
    potential_energy, total_energy, total_momentum,
};
pub use integrator::{
    ForwardEuler, Integrator, Method, RK4, Stepper, Verlet, VerletHistory, integrate,
    integrate_step,
};
pub use model::DerivativeFunction;
pub use scenario::{Scenario, circular_two_body, orbital_period, ring, sun_earth};
pub use sim::{ConservationReport, SimOptions, SimRecord, run_sim};
pub use state::SystemState;
