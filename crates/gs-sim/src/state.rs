//! Snapshot of the integrated system.

use gs_core::Vec3;

use crate::error::{SimError, SimResult};

/// Positions and velocities of N bodies at one instant.
///
/// `positions[i]` and `velocities[i]` both describe body `i`; masses are kept
/// outside the state since they are not integrated.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemState {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub time: f64,
}

impl SystemState {
    /// State for `n` bodies, everything zeroed.
    pub fn new(n: usize) -> Self {
        Self {
            positions: vec![Vec3::zero(); n],
            velocities: vec![Vec3::zero(); n],
            time: 0.0,
        }
    }

    pub fn from_parts(positions: Vec<Vec3>, velocities: Vec<Vec3>, time: f64) -> SimResult<Self> {
        let state = Self {
            positions,
            velocities,
            time,
        };
        state.validate()?;
        Ok(state)
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Checks that positions and velocities are co-indexed.
    pub fn validate(&self) -> SimResult<()> {
        if self.velocities.len() != self.positions.len() {
            return Err(SimError::ShapeMismatch {
                what: "velocities vs positions",
                expected: self.positions.len(),
                found: self.velocities.len(),
            });
        }
        Ok(())
    }

    /// Checks that `masses` is co-indexed with this state.
    pub fn validate_masses(&self, masses: &[f64]) -> SimResult<()> {
        if masses.len() != self.len() {
            return Err(SimError::ShapeMismatch {
                what: "masses vs bodies",
                expected: self.len(),
                found: masses.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_zeroed() {
        let s = SystemState::new(3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.velocities.len(), 3);
        assert!(s.positions.iter().all(|p| *p == Vec3::zero()));
        assert!(s.velocities.iter().all(|v| *v == Vec3::zero()));
        assert_eq!(s.time, 0.0);
    }

    #[test]
    fn from_parts_rejects_mismatched_lengths() {
        let err = SystemState::from_parts(vec![Vec3::zero(); 2], vec![Vec3::zero()], 0.0)
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::ShapeMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn validate_masses_checks_length() {
        let s = SystemState::new(2);
        assert!(s.validate_masses(&[1.0, 2.0]).is_ok());
        assert!(s.validate_masses(&[1.0]).is_err());
    }

    #[test]
    fn empty_state() {
        let s = SystemState::new(0);
        assert!(s.is_empty());
        assert!(s.validate().is_ok());
    }
}
