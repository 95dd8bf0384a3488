//! Point estimates read off the current counts: the topic-word and
//! document-topic distributions, held-in perplexity, top-level mixing
//! proportions, and per-topic entropies.
use super::Franchise;

impl Franchise {
    /// The topic-by-word predictive distributions under the current counts.
    /// Row `k` is `phi_k`, each entry `(n_kv + beta) / (n_k + V beta)`.
    pub fn phi(&self) -> Vec<Vec<f64>> {
        self.topics
            .iter()
            .map(|topic| {
                (0..self.n_vocab())
                    .map(|v| topic.predictive(v, self.beta, self.n_vocab()))
                    .collect()
            })
            .collect()
    }

    /// The document-by-topic mixture weights.
    ///
    /// Table occupancies are smoothed by `alpha0` times each dish's share of
    /// the top-level mixture, with the unseen-dish residual `gamma` spread
    /// uniformly over the current menu. The residual spread is a point
    /// estimate, not the stick-breaking posterior. Rows sum to one.
    pub fn theta(&self) -> Vec<Vec<f64>> {
        let n_topics = self.n_topics();
        let mix_z = self.m as f64 + self.gamma;
        let residual = self.gamma / n_topics as f64;

        self.restaurants
            .iter()
            .map(|restaurant| {
                let mut theta_j = vec![0.0; n_topics];
                for table in &restaurant.tables {
                    theta_j[table.topic] += table.n as f64;
                }

                let z = restaurant.n() as f64 + self.alpha0;
                for (k, w) in theta_j.iter_mut().enumerate() {
                    *w += self.alpha0 * (self.topics[k].m as f64 + residual)
                        / mix_z;
                    *w /= z;
                }
                theta_j
            })
            .collect()
    }

    /// `exp(-mean log p)` of the held-in tokens under the given estimates
    pub fn perplexity(&self, phi: &[Vec<f64>], theta: &[Vec<f64>]) -> f64 {
        let mut neg_ln_p = 0.0;
        for (theta_j, restaurant) in theta.iter().zip(&self.restaurants) {
            for &v in &restaurant.words {
                let p_v: f64 = theta_j
                    .iter()
                    .zip(phi.iter())
                    .map(|(&w, phi_k)| w * phi_k[v])
                    .sum();
                neg_ln_p -= p_v.ln();
            }
        }
        (neg_ln_p / self.n_tokens() as f64).exp()
    }

    /// The top-level mixing proportions: one stick per dish proportional to
    /// its token count `n_k`, plus a `gamma`-weighted tail, normalized to
    /// sum to one.
    ///
    /// Weighting by customers rather than by tables diverges from the
    /// textbook stick-breaking of the top-level measure; read it as a
    /// mass-by-tokens summary, not a posterior.
    pub fn g0_sticks(&self) -> Vec<f64> {
        let mut sticks: Vec<f64> =
            self.topics.iter().map(|topic| topic.n as f64).collect();
        sticks.push(self.gamma);

        let total: f64 = sticks.iter().sum();
        sticks.iter_mut().for_each(|len| *len /= total);
        sticks
    }

    /// The entropy of each topic's word distribution, in nats
    pub fn topic_entropies(&self, phi: &[Vec<f64>]) -> Vec<f64> {
        phi.iter()
            .map(|phi_k| {
                -phi_k.iter().map(|&p| p * p.ln()).sum::<f64>()
            })
            .collect()
    }
}
