//! Fixed-step time integrators.
//!
//! All steppers mutate a [`SystemState`] in place and leave `state.time`
//! alone; [`integrate`] advances the clock between steps.

use core::fmt;
use core::str::FromStr;

use gs_core::Vec3;
use tracing::{debug, trace, warn};

use crate::error::{SimError, SimResult};
use crate::model::{DerivativeFunction, evaluate};
use crate::state::SystemState;

/// Integration method selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Explicit Euler (1st order, 1 derivative call per step).
    Euler,
    /// Classical 4th-order Runge-Kutta (default, 4 derivative calls per step).
    #[default]
    RungeKutta4,
    /// Position Verlet (2nd order, 1 derivative call, needs position history).
    Verlet,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Euler, Method::RungeKutta4, Method::Verlet];

    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::RungeKutta4 => "rk4",
            Method::Verlet => "verlet",
        }
    }

    /// Parse `name`, substituting RK4 (with a warning) when it is not recognized.
    pub fn from_name_or_default(name: &str) -> Method {
        match name.parse() {
            Ok(method) => method,
            Err(_) => {
                warn!(method = name, "unknown integration method, using rk4");
                Method::RungeKutta4
            }
        }
    }
}

impl FromStr for Method {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Method::Euler),
            "rk4" | "runge-kutta-4" | "rungekutta4" | "runge_kutta_4" => Ok(Method::RungeKutta4),
            "verlet" => Ok(Method::Verlet),
            _ => Err(SimError::UnknownMethod {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Previous-step positions carried between Verlet steps.
///
/// Owned by the caller (or an [`Integrator`]) so that independent systems
/// never share history. A history whose length differs from the state's body
/// count is treated as unprimed.
#[derive(Clone, Debug, Default)]
pub struct VerletHistory {
    previous: Vec<Vec3>,
}

impl VerletHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    /// True when the next Verlet step on `state` will use the recurrence.
    pub fn is_primed_for(&self, state: &SystemState) -> bool {
        !state.is_empty() && self.previous.len() == state.len()
    }

    pub fn previous(&self) -> &[Vec3] {
        &self.previous
    }

    /// Forget the stored positions; the next step cold-starts.
    pub fn clear(&mut self) {
        self.previous.clear();
    }
}

/// `a + b * scale` over positions, velocities and time.
pub fn add_states(a: &SystemState, b: &SystemState, scale: f64) -> SystemState {
    let combine = |x: &[Vec3], y: &[Vec3]| -> Vec<Vec3> {
        x.iter().zip(y).map(|(&p, &q)| p + q * scale).collect()
    };

    SystemState {
        positions: combine(&a.positions, &b.positions),
        velocities: combine(&a.velocities, &b.velocities),
        time: a.time + b.time * scale,
    }
}

/// Explicit Euler: y += dt * f(y).
pub fn euler_step<F: DerivativeFunction + ?Sized>(state: &mut SystemState, f: &mut F, dt: f64) {
    let d = evaluate(f, state);

    for (x, dx) in state.positions.iter_mut().zip(&d.positions) {
        *x += *dx * dt;
    }
    for (v, dv) in state.velocities.iter_mut().zip(&d.velocities) {
        *v += *dv * dt;
    }
}

/// Classical RK4.
pub fn rk4_step<F: DerivativeFunction + ?Sized>(state: &mut SystemState, f: &mut F, dt: f64) {
    let t = state.time;
    let half = 0.5 * dt;

    let k1 = evaluate(f, state);

    let mut temp = add_states(state, &k1, half);
    temp.time = t + half;
    let k2 = evaluate(f, &temp);

    let mut temp = add_states(state, &k2, half);
    temp.time = t + half;
    let k3 = evaluate(f, &temp);

    let mut temp = add_states(state, &k3, dt);
    temp.time = t + dt;
    let k4 = evaluate(f, &temp);

    // Combine: k1 + 2*k2 + 2*k3 + k4
    let k_sum = add_states(&add_states(&add_states(&k1, &k2, 2.0), &k3, 2.0), &k4, 1.0);

    let w = dt / 6.0;
    for (x, dx) in state.positions.iter_mut().zip(&k_sum.positions) {
        *x += *dx * w;
    }
    for (v, dv) in state.velocities.iter_mut().zip(&k_sum.velocities) {
        *v += *dv * w;
    }
}

/// Position (Störmer) Verlet with a central-difference velocity.
///
/// When `history` does not match the body count the step only primes it,
/// back-extrapolating one step from the current velocity and acceleration,
/// and positions are left untouched.
pub fn verlet_step<F: DerivativeFunction + ?Sized>(
    state: &mut SystemState,
    f: &mut F,
    dt: f64,
    history: &mut VerletHistory,
) {
    let d = evaluate(f, state);
    let dt2 = dt * dt;

    if history.previous.len() != state.len() {
        trace!(bodies = state.len(), "priming verlet history");
        // r_{n-1} = r_n - v_n*dt + a_n*dt^2/2
        history.previous = state
            .positions
            .iter()
            .zip(&state.velocities)
            .zip(&d.velocities)
            .map(|((&x, &v), &a)| x - v * dt + a * (0.5 * dt2))
            .collect();
        return;
    }

    let next: Vec<Vec3> = state
        .positions
        .iter()
        .zip(&history.previous)
        .zip(&d.velocities)
        .map(|((&x, &prev), &a)| x * 2.0 - prev + a * dt2)
        .collect();

    // v_n = (r_{n+1} - r_{n-1}) / (2 dt)
    for ((v, &x_next), &prev) in state.velocities.iter_mut().zip(&next).zip(&history.previous) {
        *v = (x_next - prev) / (2.0 * dt);
    }

    history.previous = std::mem::replace(&mut state.positions, next);
}

/// Advance `state` by one step of `method`.
///
/// `history` is only read or written by [`Method::Verlet`].
pub fn integrate_step<F: DerivativeFunction + ?Sized>(
    state: &mut SystemState,
    f: &mut F,
    dt: f64,
    method: Method,
    history: &mut VerletHistory,
) -> SimResult<()> {
    state.validate()?;

    match method {
        Method::Euler => euler_step(state, f, dt),
        Method::RungeKutta4 => rk4_step(state, f, dt),
        Method::Verlet => verlet_step(state, f, dt, history),
    }
    Ok(())
}

/// Run `floor(total_time / time_step)` steps, advancing `state.time` after each.
///
/// Any remainder shorter than one step is not integrated. Returns the number
/// of steps taken.
pub fn integrate<F: DerivativeFunction + ?Sized>(
    state: &mut SystemState,
    f: &mut F,
    total_time: f64,
    time_step: f64,
    method: Method,
    history: &mut VerletHistory,
) -> SimResult<usize> {
    if !time_step.is_finite() || time_step <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "time_step must be finite and positive",
        });
    }
    if !total_time.is_finite() || total_time < 0.0 {
        return Err(SimError::InvalidArg {
            what: "total_time must be finite and non-negative",
        });
    }

    let steps = (total_time / time_step).floor() as usize;
    debug!(%method, steps, time_step, bodies = state.len(), "integrating");

    for _ in 0..steps {
        integrate_step(state, f, time_step, method, history)?;
        state.time += time_step;
    }
    Ok(steps)
}

/// A single stepping algorithm.
pub trait Stepper {
    /// Advance `state` by `dt` (time is not advanced).
    fn step<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &mut SystemState,
        f: &mut F,
        dt: f64,
    );
}

/// Forward Euler stepper.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Stepper for ForwardEuler {
    fn step<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &mut SystemState,
        f: &mut F,
        dt: f64,
    ) {
        euler_step(state, f, dt);
    }
}

/// Classical RK4 stepper.
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl Stepper for RK4 {
    fn step<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &mut SystemState,
        f: &mut F,
        dt: f64,
    ) {
        rk4_step(state, f, dt);
    }
}

/// Position Verlet stepper owning its history.
#[derive(Clone, Debug, Default)]
pub struct Verlet {
    pub history: VerletHistory,
}

impl Stepper for Verlet {
    fn step<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &mut SystemState,
        f: &mut F,
        dt: f64,
    ) {
        verlet_step(state, f, dt, &mut self.history);
    }
}

/// Method selection bundled with the history it needs.
///
/// Use one `Integrator` per simulated system.
#[derive(Clone, Debug, Default)]
pub struct Integrator {
    method: Method,
    history: VerletHistory,
}

impl Integrator {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            history: VerletHistory::new(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn history(&self) -> &VerletHistory {
        &self.history
    }

    /// Drop any Verlet history (e.g. after editing the state by hand).
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Prime the Verlet history for `state` without moving it.
    ///
    /// After this the next [`Integrator::integrate_step`] advances the state
    /// by a full `dt`. No-op for the single-step methods or when the history
    /// already matches the body count.
    pub fn prime<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &SystemState,
        f: &mut F,
        dt: f64,
    ) -> SimResult<()> {
        state.validate()?;
        if self.method != Method::Verlet || self.history.is_primed_for(state) {
            return Ok(());
        }
        let mut scratch = state.clone();
        verlet_step(&mut scratch, f, dt, &mut self.history);
        Ok(())
    }

    pub fn integrate_step<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &mut SystemState,
        f: &mut F,
        dt: f64,
    ) -> SimResult<()> {
        integrate_step(state, f, dt, self.method, &mut self.history)
    }

    pub fn integrate<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &mut SystemState,
        f: &mut F,
        total_time: f64,
        time_step: f64,
    ) -> SimResult<usize> {
        integrate(state, f, total_time, time_step, self.method, &mut self.history)
    }
}

impl Stepper for Integrator {
    fn step<F: DerivativeFunction + ?Sized>(
        &mut self,
        state: &mut SystemState,
        f: &mut F,
        dt: f64,
    ) {
        match self.method {
            Method::Euler => euler_step(state, f, dt),
            Method::RungeKutta4 => rk4_step(state, f, dt),
            Method::Verlet => verlet_step(state, f, dt, &mut self.history),
        }
    }
}
