#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! Default values for priors and inference-type things
pub use rv;

use rv::dist::Gamma;

/// The default number of inner iterations of the alpha0 resampler per sweep
pub const ALPHA0_UPDATE_ITERS: usize = 5;

/// Default prior on the top-level concentration, gamma
pub fn gamma_prior() -> Gamma {
    Gamma::new(1.0, 1.0).unwrap()
}

/// Default prior on the document-level concentration, alpha0
pub fn alpha0_prior() -> Gamma {
    Gamma::new(1.0, 1.0).unwrap()
}
