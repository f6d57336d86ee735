//! Ambient medium surrounding the bench.
//!
//! Every beam-geometry derivation depends on the refractive index of the
//! medium the beam travels through. The index is carried as an explicit
//! [`Medium`] value and passed into signal, source, and element
//! construction, so alternate media can be swapped in without touching any
//! shared state.

use serde::Serialize;

use crate::error::{BenchError, Result};

/// Refractive index of dry air at standard temperature and pressure.
pub const AIR_REFRACTIVE_INDEX: f64 = 1.000_293;

/// A homogeneous, non-dispersive ambient medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Medium {
    refractive_index: f64,
}

impl Default for Medium {
    fn default() -> Self {
        Self::air()
    }
}

impl Medium {
    /// Create a medium with the given (real, positive) refractive index.
    pub fn new(refractive_index: f64) -> Result<Self> {
        if !refractive_index.is_finite() || refractive_index <= 0.0 {
            return Err(BenchError::configuration(
                "medium",
                format!("refractive index must be positive and finite, got {refractive_index}"),
            ));
        }
        Ok(Self { refractive_index })
    }

    /// Air at STP.
    pub const fn air() -> Self {
        Self {
            refractive_index: AIR_REFRACTIVE_INDEX,
        }
    }

    /// Vacuum (n = 1).
    pub const fn vacuum() -> Self {
        Self {
            refractive_index: 1.0,
        }
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }
}
