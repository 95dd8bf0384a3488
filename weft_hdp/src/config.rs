use serde::{Deserialize, Serialize};

use crate::transition::{SweepTransition, DEFAULT_SWEEP_TRANSITIONS};

/// Configuration for a run of sweeps
///
/// Sets the number of sweeps and which transitions each sweep performs, in
/// order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SweepConfig {
    /// The number of sweeps to run
    pub n_iters: usize,
    /// Which transitions to run per sweep
    pub transitions: Vec<SweepTransition>,
}

impl SweepConfig {
    pub fn new(n_iters: usize) -> Self {
        SweepConfig {
            n_iters,
            transitions: DEFAULT_SWEEP_TRANSITIONS.into(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig::new(1)
    }
}
