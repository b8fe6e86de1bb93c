//! Simulation runner, result recording and conservation checks.

use gs_core::constants::{DAY_SECONDS, JULIAN_YEAR_SECONDS};
use gs_core::numeric::{ensure_finite, relative_change};
use gs_core::Vec3;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::gravity::{total_energy, total_momentum};
use crate::integrator::{Integrator, Method};
use crate::model::DerivativeFunction;
use crate::state::SystemState;

/// Options for simulation runs.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integration method (default: RK4)
    pub method: Method,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: DAY_SECONDS / 24.0,
            t_end: JULIAN_YEAR_SECONDS,
            max_steps: 1_000_000,
            record_every: 24,
            method: Method::default(),
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be finite and positive",
            });
        }
        ensure_finite(self.t_end, "t_end")?;
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<SystemState>,
    /// Steps actually taken
    pub steps: usize,
}

impl SimRecord {
    pub fn final_state(&self) -> Option<&SystemState> {
        self.x.last()
    }
}

/// Number of steps needed to reach `span`, tolerating round-off in the ratio.
fn steps_to_cover(span: f64, dt: f64) -> usize {
    if span <= 0.0 {
        return 0;
    }
    let ratio = span / dt;
    let nearest = ratio.round();
    if (ratio - nearest).abs() < 1e-9 * nearest.max(1.0) {
        nearest as usize
    } else {
        ratio.ceil() as usize
    }
}

/// Run a fixed-step simulation from `initial` until `opts.t_end`.
///
/// The first and final states are always recorded; in between every
/// `record_every`-th step is kept. Verlet history is primed before the first
/// step, so every recorded state sits at its recorded time.
pub fn run_sim<F: DerivativeFunction + ?Sized>(
    initial: SystemState,
    f: &mut F,
    opts: &SimOptions,
) -> SimResult<SimRecord> {
    opts.validate()?;
    initial.validate()?;

    let t0 = initial.time;
    let planned = steps_to_cover(opts.t_end - t0, opts.dt);
    let steps = planned.min(opts.max_steps);
    debug!(method = %opts.method, steps, dt = opts.dt, bodies = initial.len(), "run_sim");

    let mut integrator = Integrator::new(opts.method);
    let mut state = initial;
    integrator.prime(&state, f, opts.dt)?;

    let mut t_record = vec![state.time];
    let mut x_record = vec![state.clone()];

    for step in 1..=steps {
        integrator.integrate_step(&mut state, f, opts.dt)?;
        state.time = t0 + step as f64 * opts.dt;

        if step % opts.record_every == 0 {
            t_record.push(state.time);
            x_record.push(state.clone());
        }
    }

    // Always record final state
    if steps % opts.record_every != 0 {
        t_record.push(state.time);
        x_record.push(state);
    }

    Ok(SimRecord {
        t: t_record,
        x: x_record,
        steps,
    })
}

/// Energy and momentum bookkeeping over a recorded run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConservationReport {
    pub samples: usize,
    pub initial_energy: f64,
    pub final_energy: f64,
    /// Largest |E - E0| / |E0| over all samples
    pub max_relative_energy_drift: f64,
    pub initial_momentum: Vec3,
    pub final_momentum: Vec3,
    /// Largest |p - p0| over all samples
    pub max_momentum_drift: f64,
}

impl ConservationReport {
    pub fn from_record(record: &SimRecord, masses: &[f64]) -> SimResult<Self> {
        Self::from_states(&record.x, masses)
    }

    pub fn from_states(states: &[SystemState], masses: &[f64]) -> SimResult<Self> {
        let (first, last) = match (states.first(), states.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(SimError::InvalidArg {
                    what: "no states to audit",
                });
            }
        };

        let energy = |s: &SystemState| total_energy(&s.positions, &s.velocities, masses);
        let momentum = |s: &SystemState| total_momentum(&s.velocities, masses);

        let mut report = Self {
            samples: states.len(),
            initial_energy: 0.0,
            final_energy: 0.0,
            max_relative_energy_drift: 0.0,
            initial_momentum: Vec3::zero(),
            final_momentum: Vec3::zero(),
            max_momentum_drift: 0.0,
        };

        for s in states {
            s.validate_masses(masses)?;
        }

        report.initial_energy = energy(first);
        report.final_energy = energy(last);
        report.initial_momentum = momentum(first);
        report.final_momentum = momentum(last);

        for s in states {
            let de = relative_change(energy(s), report.initial_energy);
            let dp = momentum(s).distance_to(&report.initial_momentum);
            report.max_relative_energy_drift = report.max_relative_energy_drift.max(de);
            report.max_momentum_drift = report.max_momentum_drift.max(dp);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_particle(state: &SystemState, out: &mut SystemState) {
        out.positions.copy_from_slice(&state.velocities);
        out.time = 1.0;
    }

    fn moving(n: usize) -> SystemState {
        let mut s = SystemState::new(n);
        for v in s.velocities.iter_mut() {
            *v = Vec3::new(1.0, 0.0, 0.0);
        }
        s
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.dt, 3600.0);
        assert_eq!(opts.t_end, JULIAN_YEAR_SECONDS);
        assert_eq!(opts.max_steps, 1_000_000);
        assert_eq!(opts.record_every, 24);
        assert_eq!(opts.method, Method::RungeKutta4);
    }

    #[test]
    fn sim_options_invalid() {
        let bad = [
            SimOptions {
                dt: 0.0,
                ..SimOptions::default()
            },
            SimOptions {
                dt: f64::NAN,
                ..SimOptions::default()
            },
            SimOptions {
                t_end: f64::INFINITY,
                ..SimOptions::default()
            },
            SimOptions {
                max_steps: 0,
                ..SimOptions::default()
            },
            SimOptions {
                record_every: 0,
                ..SimOptions::default()
            },
        ];
        for opts in bad {
            assert!(run_sim(SystemState::new(1), &mut free_particle, &opts).is_err());
        }
    }

    #[test]
    fn records_decimated_and_final() {
        let opts = SimOptions {
            dt: 0.1,
            t_end: 1.0,
            max_steps: 100,
            record_every: 3,
            method: Method::Euler,
        };
        let rec = run_sim(moving(1), &mut free_particle, &opts).unwrap();

        assert_eq!(rec.steps, 10);
        // t=0, steps 3, 6, 9, then final step 10
        assert_eq!(rec.t.len(), 5);
        assert_eq!(rec.t[0], 0.0);
        assert!((rec.t[4] - 1.0).abs() < 1e-12);
        let last = rec.final_state().unwrap();
        assert!((last.positions[0].x() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn max_steps_caps_the_run() {
        let opts = SimOptions {
            dt: 1.0,
            t_end: 100.0,
            max_steps: 4,
            record_every: 1,
            method: Method::RungeKutta4,
        };
        let rec = run_sim(moving(2), &mut free_particle, &opts).unwrap();
        assert_eq!(rec.steps, 4);
        assert_eq!(rec.t, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn partial_last_step_still_reaches_t_end() {
        let opts = SimOptions {
            dt: 0.3,
            t_end: 1.0,
            max_steps: 100,
            record_every: 100,
            method: Method::Euler,
        };
        let rec = run_sim(moving(1), &mut free_particle, &opts).unwrap();
        assert_eq!(rec.steps, 4);
        assert_eq!(rec.t.len(), 2);
    }

    #[test]
    fn every_method_lands_on_t_end() {
        for method in Method::ALL {
            let opts = SimOptions {
                dt: 0.1,
                t_end: 1.0,
                max_steps: 100,
                record_every: 1,
                method,
            };
            let rec = run_sim(moving(1), &mut free_particle, &opts).unwrap();
            assert_eq!(rec.steps, 10);
            for (t, s) in rec.t.iter().zip(&rec.x) {
                assert!((s.positions[0].x() - t).abs() < 1e-12, "{method} at t={t}");
            }
            let last = rec.final_state().unwrap();
            assert!((last.time - 1.0).abs() < 1e-12);
            assert!((last.positions[0].x() - 1.0).abs() < 1e-12, "{method}");
        }
    }

    #[test]
    fn report_for_free_particles_is_flat() {
        let opts = SimOptions {
            dt: 0.5,
            t_end: 5.0,
            max_steps: 100,
            record_every: 1,
            method: Method::Verlet,
        };
        let masses = [2.0, 3.0];
        let rec = run_sim(moving(2), &mut free_particle, &opts).unwrap();
        let report = ConservationReport::from_record(&rec, &masses).unwrap();

        assert_eq!(report.samples, 11);
        assert_eq!(report.initial_momentum, Vec3::new(5.0, 0.0, 0.0));
        assert!(report.max_momentum_drift < 1e-12);
        assert!(report.max_relative_energy_drift < 1e-12);
    }

    #[test]
    fn report_rejects_empty_and_mismatched_input() {
        assert!(ConservationReport::from_states(&[], &[1.0]).is_err());
        assert!(ConservationReport::from_states(&[SystemState::new(2)], &[1.0]).is_err());
    }
}
