#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! The Chinese-restaurant-franchise sampler core.
//!
//! Documents are restaurants, tokens are customers, per-document clusters are
//! tables, and the topics shared across documents are the dishes on the
//! franchise menu. Two collapsed Gibbs sweeps drive inference: a per-customer
//! table reassignment and a per-table dish reassignment that moves each
//! table's whole block of tokens at once.
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod franchise;
pub mod restaurant;
pub mod table;
pub mod topic;
pub mod transition;

pub use franchise::Franchise;

/// The designator for a detached back-reference: a customer between tables or
/// a table between dishes. Never observable outside a sampler step.
pub const UNASSIGNED: usize = usize::MAX;
