//! Brings in everything needed to build and run an engine
pub use crate::engine::{BuildEngineError, Builder, Engine};
pub use weft_data::{Corpus, Document};
pub use weft_hdp::config::SweepConfig;
pub use weft_hdp::transition::{SweepTransition, DEFAULT_SWEEP_TRANSITIONS};
pub use weft_hdp::Franchise;
pub use weft_stats::rv::dist::Gamma;
