//! The per-table dish sweep.
//!
//! Each table's whole block of tokens is moved at once: the block is detached
//! from its dish and reassigned by a collapsed Gibbs draw over the menu plus
//! a fresh dish, using the closed-form Dirichlet-multinomial block marginal.
//! The weights are products of rising-factorial ratios, so everything is
//! computed in log space and normalized by max-subtraction before
//! exponentiating.
use rand::Rng;
use rayon::prelude::*;
use weft_stats::rising::ln_rising_factorial;
use weft_stats::rv::misc::ln_pflip;

use super::Franchise;
use crate::UNASSIGNED;

impl Franchise {
    /// Pull a table's aggregate block out of its dish, striking the dish from
    /// the menu if this was its last table. Returns the table's occupied
    /// words with their counts.
    pub(crate) fn detach_table(
        &mut self,
        j: usize,
        t: usize,
    ) -> Vec<(usize, usize)> {
        let (k, block_n, words) = {
            let table = &self.restaurants[j].tables[t];
            (table.topic, table.n, table.occupied_words())
        };
        debug_assert_ne!(k, UNASSIGNED);
        self.restaurants[j].tables[t].topic = UNASSIGNED;

        assert!(self.m > 0, "franchise table count underflow");
        self.m -= 1;
        let topic = &mut self.topics[k];
        assert!(topic.m > 0, "table count underflow on topic {k}");
        topic.m -= 1;

        if topic.m == 0 {
            // the dish dies with its last table; its residual counts are
            // exactly this block, so there is nothing to subtract
            self.remove_topic(k);
        } else {
            assert!(topic.n >= block_n, "token count underflow on topic {k}");
            topic.n -= block_n;
            for &(v, ct) in &words {
                assert!(
                    topic.n_v[v] >= ct,
                    "topic count underflow for word {v}"
                );
                topic.n_v[v] -= ct;
            }
        }

        words
    }

    /// Serve dish `k` at a detached table, absorbing its block into the
    /// dish's counts
    pub(crate) fn attach_table(
        &mut self,
        j: usize,
        t: usize,
        k: usize,
        words: &[(usize, usize)],
    ) {
        let block_n = {
            let table = &mut self.restaurants[j].tables[t];
            debug_assert_eq!(table.topic, UNASSIGNED);
            table.topic = k;
            table.n
        };

        let topic = &mut self.topics[k];
        topic.m += 1;
        topic.n += block_n;
        for &(v, ct) in words {
            topic.n_v[v] += ct;
        }
        self.m += 1;
    }

    /// The unnormalized log-weight of serving each dish (and a fresh one) to
    /// a block of `block_n` tokens with the given word counts.
    ///
    /// The per-dish computation reads only that dish's counts, so it fans out
    /// across topics in parallel; the caller's decrement and increment phases
    /// stay serial on either side.
    fn ln_dish_weights(
        &self,
        block_n: usize,
        words: &[(usize, usize)],
    ) -> Vec<f64> {
        let v_beta = self.n_vocab() as f64 * self.beta;

        let mut ln_weights: Vec<f64> = self
            .topics
            .par_iter()
            .map(|topic| {
                let mut lw = (topic.m as f64).ln();
                lw -= ln_rising_factorial(topic.n as f64 + v_beta, block_n);
                for &(v, ct) in words {
                    lw += ln_rising_factorial(
                        topic.n_v[v] as f64 + self.beta,
                        ct,
                    );
                }
                lw
            })
            .collect();

        let mut lw = self.gamma.ln();
        lw -= ln_rising_factorial(v_beta, block_n);
        for &(v, ct) in words {
            lw += ln_rising_factorial(self.beta, ct);
        }
        ln_weights.push(lw);

        ln_weights
    }

    /// Gibbs-resample the dish served at one table, jointly over its whole
    /// block of customers
    pub(crate) fn reassign_table_dish<R: Rng>(
        &mut self,
        j: usize,
        t: usize,
        rng: &mut R,
    ) {
        let words = self.detach_table(j, t);
        let block_n = self.restaurants[j].tables[t].n;

        let ln_weights = self.ln_dish_weights(block_n, &words);
        let k_drawn = ln_pflip(&ln_weights, 1, false, rng)[0];
        let k_new = if k_drawn == self.topics.len() {
            self.add_topic()
        } else {
            k_drawn
        };

        self.attach_table(j, t, k_new, &words);
    }

    /// One dish-resampling pass over every table of every restaurant
    pub fn reassign_topics<R: Rng>(&mut self, rng: &mut R) {
        for j in 0..self.restaurants.len() {
            for t in 0..self.restaurants[j].n_tables() {
                self.reassign_table_dish(j, t, rng);
            }
        }
        debug_assert!(self.validate().is_valid());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;
    use weft_consts::{alpha0_prior, gamma_prior};
    use weft_data::Corpus;

    fn franchise(docs: Vec<Vec<usize>>, n_vocab: usize) -> Franchise {
        let corpus = Corpus::from_tokens(n_vocab, docs);
        Franchise::new(&corpus, 1.0, 1.0, 0.1, gamma_prior(), alpha0_prior())
            .unwrap()
    }

    #[test]
    fn moving_every_table_off_a_dish_strikes_it_from_the_menu() {
        // Two restaurants, one table each, both serving dish 0. Marching
        // both tables onto a fresh dish must leave a single-dish menu with
        // dish 0 gone and the fresh dish renumbered to 0.
        let mut hdp = franchise(vec![vec![0, 0, 1], vec![1, 2]], 3);
        let fresh = hdp.add_topic();
        assert_eq!(fresh, 1);

        let words0 = hdp.detach_table(0, 0);
        hdp.attach_table(0, 0, fresh, &words0);

        let words1 = hdp.detach_table(1, 0);
        // dish 0 lost its last table, so the fresh dish is now index 0
        assert_eq!(hdp.n_topics(), 1);
        assert_eq!(hdp.restaurants[0].tables[0].topic, 0);
        hdp.attach_table(1, 0, 0, &words1);

        assert_eq!(hdp.n_topics(), 1);
        assert_eq!(hdp.topics[0].m, 2);
        assert_eq!(hdp.topics[0].n, 5);
        assert_eq!(hdp.topics[0].n_v, vec![2, 2, 1]);
        assert!(hdp.validate().is_valid());
    }

    #[test]
    fn detach_then_attach_to_same_dish_restores_counts_exactly() {
        let mut hdp = franchise(vec![vec![0, 1, 1], vec![2, 0]], 3);
        let before = hdp.clone();

        let words = hdp.detach_table(0, 0);
        hdp.attach_table(0, 0, 0, &words);

        assert_eq!(hdp, before);
    }

    #[test]
    fn dish_weights_prefer_the_dish_already_serving_the_words() {
        // dish 0 holds many copies of word 0, dish 1 many copies of word 1;
        // a block of word-0 tokens must weigh dish 0 higher
        let mut hdp = franchise(vec![vec![0, 0, 0, 0], vec![1, 1, 1, 1]], 2);
        let fresh = hdp.add_topic();
        let words = hdp.detach_table(1, 0);
        hdp.attach_table(1, 0, fresh, &words);
        assert!(hdp.validate().is_valid());

        let block = [(0, 3)];
        let ln_weights = hdp.ln_dish_weights(3, &block);
        assert_eq!(ln_weights.len(), 3);
        assert!(ln_weights[0] > ln_weights[1]);
        // the fresh-dish tail exists and is finite
        assert!(ln_weights[2].is_finite());
    }

    #[test]
    fn sweep_preserves_invariants_and_token_counts() {
        let mut hdp = franchise(
            vec![vec![0, 1, 2, 0], vec![3, 3, 1], vec![2, 2, 2, 2, 4]],
            5,
        );
        let mut rng = Xoshiro256Plus::seed_from_u64(0xfeed);
        let n_tokens = hdp.n_tokens();

        for _ in 0..20 {
            hdp.reassign_tables(&mut rng);
            hdp.reassign_topics(&mut rng);
            assert!(hdp.validate().is_valid());
            assert_eq!(hdp.n_tokens(), n_tokens);
        }
    }
}
