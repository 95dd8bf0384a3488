use serde::{Deserialize, Serialize};

/// A dish on the franchise menu: one topic's sufficient statistics.
///
/// All counts aggregate over every table serving this dish, in every
/// restaurant.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Topic {
    /// The total number of tokens assigned to this topic
    pub n: usize,
    /// Per-word token counts, dense over the vocabulary
    pub n_v: Vec<usize>,
    /// The number of tables serving this topic
    pub m: usize,
}

impl Topic {
    /// A fresh dish with zero counts. The caller must restore the count
    /// invariants before yielding control.
    pub fn new(n_vocab: usize) -> Self {
        Topic {
            n: 0,
            n_v: vec![0; n_vocab],
            m: 0,
        }
    }

    /// The predictive word probability phi_k(v) under beta smoothing
    #[inline]
    pub fn predictive(&self, v: usize, beta: f64, n_vocab: usize) -> f64 {
        (self.n_v[v] as f64 + beta)
            / ((n_vocab as f64).mul_add(beta, self.n as f64))
    }

    /// Count one token of word `v` toward this topic
    #[inline]
    pub fn observe(&mut self, v: usize) {
        self.n += 1;
        self.n_v[v] += 1;
    }

    /// Remove one token of word `v` from this topic
    #[inline]
    pub fn forget(&mut self, v: usize) {
        assert!(self.n_v[v] > 0, "topic count underflow for word {v}");
        self.n -= 1;
        self.n_v[v] -= 1;
    }
}
