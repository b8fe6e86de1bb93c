//! DerivativeFunction trait for pluggable force models.

use crate::state::SystemState;

/// Right-hand side of the equations of motion.
///
/// An implementation reads `state` and fills `out`, which is already sized to
/// the same body count:
/// - `out.positions[i]` = velocity of body `i` (dr/dt = v)
/// - `out.velocities[i]` = acceleration of body `i`
/// - `out.time` = 1.0
///
/// The integrators treat this as a black box and may call it several times
/// per step with intermediate states. Any
/// `FnMut(&SystemState, &mut SystemState)` closure qualifies.
pub trait DerivativeFunction {
    fn derive(&mut self, state: &SystemState, out: &mut SystemState);
}

impl<F> DerivativeFunction for F
where
    F: FnMut(&SystemState, &mut SystemState),
{
    fn derive(&mut self, state: &SystemState, out: &mut SystemState) {
        self(state, out)
    }
}

/// Evaluate `f` into a freshly sized output state.
pub(crate) fn evaluate<F: DerivativeFunction + ?Sized>(
    f: &mut F,
    state: &SystemState,
) -> SystemState {
    let mut out = SystemState::new(state.len());
    f.derive(state, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_core::Vec3;

    #[test]
    fn closures_are_derivative_functions() {
        let mut calls = 0;
        let mut f = |s: &SystemState, out: &mut SystemState| {
            calls += 1;
            out.positions.clone_from(&s.velocities);
            out.time = 1.0;
        };

        let mut state = SystemState::new(1);
        state.velocities[0] = Vec3::new(1.0, 2.0, 3.0);

        let d = evaluate(&mut f, &state);
        assert_eq!(d.positions[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(d.time, 1.0);
        assert_eq!(calls, 1);
    }
}
