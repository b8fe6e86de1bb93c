//! Integration test: ring of bodies around a central mass.

use gs_core::numeric::relative_change;
use gs_core::Vec3;
use gs_sim::{
    ConservationReport, DerivativeFunction, GravityModel, Method, SimOptions, SystemState,
    VerletHistory, gravitational_derivatives, integrate, run_sim, scenario::ring,
};

const CENTRAL: f64 = 1.0e30;
const ORBITER: f64 = 1.0e22;
const RADIUS: f64 = 1.0e11;

#[test]
fn parallel_model_matches_serial_over_a_run() {
    let scenario = ring(CENTRAL, ORBITER, 12, RADIUS);
    let (initial, _) = scenario.state();

    let mut serial = scenario.model().unwrap();
    let mut parallel = scenario.model().unwrap().parallel(true);

    let opts = SimOptions {
        dt: 3600.0,
        t_end: 3600.0 * 48.0,
        record_every: 12,
        ..SimOptions::default()
    };
    let a = run_sim(initial.clone(), &mut serial, &opts).unwrap();
    let b = run_sim(initial, &mut parallel, &opts).unwrap();
    assert_eq!(a.x, b.x);
}

#[test]
fn ring_conserves_momentum_and_energy() {
    let scenario = ring(CENTRAL, ORBITER, 8, RADIUS);
    let (mut state, masses) = scenario.state();
    let mut model = scenario.model().unwrap();

    let before = state.clone();
    let mut history = VerletHistory::new();
    let steps = integrate(
        &mut state,
        &mut model,
        3600.0 * 24.0 * 30.0,
        3600.0,
        Method::RungeKutta4,
        &mut history,
    )
    .unwrap();
    assert_eq!(steps, 720);
    assert!(history.is_empty(), "rk4 never touches verlet history");

    let report = ConservationReport::from_states(&[before, state], &masses).unwrap();
    let p_scale = ORBITER * (gs_core::constants::G * CENTRAL / RADIUS).sqrt();
    assert!(report.max_momentum_drift < 1e-6 * p_scale);
    assert!(relative_change(report.final_energy, report.initial_energy) < 1e-8);
}

#[test]
fn closure_binding_masses_matches_model() {
    let scenario = ring(CENTRAL, ORBITER, 3, RADIUS);
    let (state, masses) = scenario.state();

    let mut by_closure = |s: &SystemState, out: &mut SystemState| {
        gravitational_derivatives(s, &masses, out);
    };
    let mut model = GravityModel::new(masses.clone()).unwrap();

    let mut a = SystemState::new(state.len());
    let mut b = SystemState::new(state.len());
    by_closure.derive(&state, &mut a);
    model.derive(&state, &mut b);
    assert_eq!(a, b);
    assert!(a.velocities[1..].iter().all(|acc| *acc != Vec3::zero()));
}
