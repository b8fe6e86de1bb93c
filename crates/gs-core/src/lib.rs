//! gs-core: shared foundation for gravsim.
//!
//! Contains:
//! - vector (`Vec3`, the 3-component arithmetic type used everywhere)
//! - units (uom SI constructors + physical constants)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;
pub mod vector;

// Re-exports: nice ergonomics for downstream crates
pub use error::{GsError, GsResult};
pub use numeric::*;
pub use units::constants;
pub use vector::Vec3;
