#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! Probability plumbing for the weft sampler: the log-rising-factorial kernel
//! behind the block marginal likelihood, and the auxiliary-variable samplers
//! for the Dirichlet-process concentration parameters.
pub mod concentration;
pub mod rising;

pub use rv;
