use serde::{Deserialize, Serialize};

use weft_consts::ALPHA0_UPDATE_ITERS;

pub const DEFAULT_SWEEP_TRANSITIONS: [SweepTransition; 4] = [
    SweepTransition::TableAssignment,
    SweepTransition::TopicAssignment,
    SweepTransition::Gamma,
    SweepTransition::Alpha0(ALPHA0_UPDATE_ITERS),
];

/// MCMC transitions in the franchise
#[derive(Deserialize, Serialize, Clone, Copy, Eq, PartialEq, Debug)]
pub enum SweepTransition {
    /// Reseat every customer (token) at a table, one collapsed Gibbs draw
    /// per customer
    #[serde(rename = "table_assignment")]
    TableAssignment,
    /// Reassign every table's dish jointly over its whole block of customers
    #[serde(rename = "topic_assignment")]
    TopicAssignment,
    /// Resample the top-level concentration gamma
    #[serde(rename = "gamma")]
    Gamma,
    /// Resample the document-level concentration alpha0, iterating the
    /// auxiliary-variable update the given number of times
    #[serde(rename = "alpha0")]
    Alpha0(usize),
}
