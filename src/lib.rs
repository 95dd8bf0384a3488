#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! A nonparametric topic-model inference engine.
//!
//! `weft` infers an unbounded, data-driven number of latent topics from a
//! corpus of tokenized documents under a hierarchical Dirichlet process whose
//! base mixture is latent Dirichlet allocation. Inference is a collapsed
//! Gibbs sampler over the Chinese-restaurant-franchise representation: a
//! per-token table sweep, a per-table topic sweep, and auxiliary-variable
//! updates of both concentration parameters.
//!
//! # Example
//!
//! ```rust
//! use weft::prelude::*;
//!
//! let corpus = Corpus::from_tokens(
//!     4,
//!     vec![vec![0, 1, 0, 1], vec![2, 3, 3], vec![0, 0, 1]],
//! );
//!
//! let mut engine = Builder::new(corpus)
//!     .seed_from_u64(1337)
//!     .beta(0.1)
//!     .build()
//!     .unwrap();
//!
//! engine.run(&SweepConfig::new(50));
//!
//! let phi = engine.phi();
//! let theta = engine.theta();
//! let perplexity = engine.perplexity(&phi, &theta);
//! assert!(perplexity.is_finite());
//! ```
pub mod engine;
pub mod prelude;

pub use engine::{BuildEngineError, Builder, Engine};
pub use weft_data::{Corpus, Document};
pub use weft_hdp::config::SweepConfig;
pub use weft_hdp::transition::SweepTransition;
pub use weft_hdp::Franchise;
