use rand::Rng;
use serde::{Deserialize, Serialize};
use weft_data::Corpus;
use weft_stats::concentration;
use weft_stats::rv::dist::Gamma;

use crate::error::NewFranchiseError;
use crate::restaurant::Restaurant;
use crate::table::Table;
use crate::topic::Topic;
use crate::transition::SweepTransition;
use crate::UNASSIGNED;

mod estimate;
mod tables;
mod topics;

/// The Chinese restaurant franchise: the full sampler state.
///
/// Owns the global dish menu and one restaurant per document, together with
/// the concentration parameters and their priors. All cross-entity references
/// are dense indices: a customer's seat indexes its restaurant's `tables`, a
/// table's `topic` indexes `topics`. Removal of a table or topic shifts the
/// larger indices down by one, so indices stay contiguous and iteration order
/// is creation order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Franchise {
    /// One restaurant per document, in corpus order (fixed)
    pub restaurants: Vec<Restaurant>,
    /// The dish menu shared by all restaurants, in creation order
    pub topics: Vec<Topic>,
    /// The franchise-wide table count, `sum_k topics[k].m`
    pub m: usize,
    /// The top-level concentration
    pub gamma: f64,
    /// The document-level concentration
    pub alpha0: f64,
    /// The symmetric Dirichlet smoothing on topic-word distributions
    pub beta: f64,
    /// The Gamma(shape, rate) prior on `gamma`
    pub gamma_prior: Gamma,
    /// The Gamma(shape, rate) prior on `alpha0`
    pub alpha0_prior: Gamma,
    n_vocab: usize,
}

impl Franchise {
    /// Seat the whole corpus at its initial configuration: one shared dish,
    /// and per document a single table holding every token. Afterwards the
    /// table count equals the document count.
    pub fn new(
        corpus: &Corpus,
        gamma: f64,
        alpha0: f64,
        beta: f64,
        gamma_prior: Gamma,
        alpha0_prior: Gamma,
    ) -> Result<Self, NewFranchiseError> {
        if corpus.is_empty() {
            return Err(NewFranchiseError::EmptyCorpus);
        }
        if corpus.n_vocab() == 0 {
            return Err(NewFranchiseError::EmptyVocabulary);
        }
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(NewFranchiseError::BadGamma(gamma));
        }
        if !(alpha0.is_finite() && alpha0 > 0.0) {
            return Err(NewFranchiseError::BadAlpha0(alpha0));
        }
        if !(beta.is_finite() && beta > 0.0) {
            return Err(NewFranchiseError::BadBeta(beta));
        }

        let n_vocab = corpus.n_vocab();
        for (doc_ix, doc) in corpus.iter().enumerate() {
            if doc.is_empty() {
                return Err(NewFranchiseError::EmptyDocument { doc_ix });
            }
            for (token_ix, &token) in doc.tokens().iter().enumerate() {
                if token >= n_vocab {
                    return Err(NewFranchiseError::TokenOutOfBounds {
                        doc_ix,
                        token_ix,
                        token,
                        n_vocab,
                    });
                }
            }
        }

        let mut shared_topic = Topic::new(n_vocab);
        let mut restaurants = Vec::with_capacity(corpus.n_docs());
        let mut m = 0;
        for doc in corpus.iter() {
            let mut table = Table::new(n_vocab, 0);
            for &v in doc.tokens() {
                table.seat(v);
                shared_topic.observe(v);
            }
            shared_topic.m += 1;
            m += 1;

            restaurants.push(Restaurant {
                words: doc.tokens().to_vec(),
                seats: vec![0; doc.len()],
                tables: vec![table],
            });
        }

        Ok(Franchise {
            restaurants,
            topics: vec![shared_topic],
            m,
            gamma,
            alpha0,
            beta,
            gamma_prior,
            alpha0_prior,
            n_vocab,
        })
    }

    /// The vocabulary size `V`
    #[inline]
    pub fn n_vocab(&self) -> usize {
        self.n_vocab
    }

    /// The number of documents `D`
    #[inline]
    pub fn n_docs(&self) -> usize {
        self.restaurants.len()
    }

    /// The number of dishes currently on the menu, `K`
    #[inline]
    pub fn n_topics(&self) -> usize {
        self.topics.len()
    }

    /// The franchise-wide table count
    #[inline]
    pub fn n_tables(&self) -> usize {
        self.m
    }

    /// The total token count `N`
    #[inline]
    pub fn n_tokens(&self) -> usize {
        self.restaurants.iter().map(Restaurant::n).sum()
    }

    /// Open a fresh dish with zero counts and return its index. The caller
    /// must restore the count invariants before yielding control.
    pub(crate) fn add_topic(&mut self) -> usize {
        self.topics.push(Topic::new(self.n_vocab));
        self.topics.len() - 1
    }

    /// Strike a dish from the menu. Requires that no table serves it.
    /// All larger topic indices shift down by one.
    pub(crate) fn remove_topic(&mut self, k: usize) {
        debug_assert_eq!(self.topics[k].m, 0);
        self.topics.remove(k);
        for restaurant in &mut self.restaurants {
            for table in &mut restaurant.tables {
                if table.topic != UNASSIGNED && table.topic > k {
                    table.topic -= 1;
                }
            }
        }
    }

    /// Open a fresh table serving dish `k` in restaurant `j` and return its
    /// index. Counts the table toward the dish and the franchise; the caller
    /// must seat a customer before yielding control.
    pub(crate) fn add_table(&mut self, j: usize, k: usize) -> usize {
        self.topics[k].m += 1;
        self.m += 1;
        let tables = &mut self.restaurants[j].tables;
        tables.push(Table::new(self.n_vocab, k));
        tables.len() - 1
    }

    /// Close table `t` of restaurant `j`. Requires that the table is empty.
    /// All larger table indices in the restaurant shift down by one; the
    /// dish is struck from the menu if this was its last table.
    pub(crate) fn remove_table(&mut self, j: usize, t: usize) {
        let restaurant = &mut self.restaurants[j];
        debug_assert_eq!(restaurant.tables[t].n, 0);

        let table = restaurant.tables.remove(t);
        for seat in &mut restaurant.seats {
            if *seat != UNASSIGNED && *seat > t {
                *seat -= 1;
            }
        }

        let k = table.topic;
        assert!(self.topics[k].m > 0, "table count underflow on topic {k}");
        self.topics[k].m -= 1;
        self.m -= 1;
        if self.topics[k].m == 0 {
            self.remove_topic(k);
        }
    }

    /// Resample the top-level concentration
    pub fn update_gamma<R: Rng>(&mut self, rng: &mut R) {
        self.gamma = concentration::update_gamma(
            self.gamma,
            self.topics.len(),
            self.m,
            &self.gamma_prior,
            rng,
        );
    }

    /// Resample the document-level concentration, iterating `n_iters` times
    pub fn update_alpha0<R: Rng>(&mut self, n_iters: usize, rng: &mut R) {
        let doc_lens: Vec<usize> =
            self.restaurants.iter().map(Restaurant::n).collect();
        self.alpha0 = concentration::update_alpha0(
            self.alpha0,
            self.m,
            &doc_lens,
            &self.alpha0_prior,
            n_iters,
            rng,
        );
    }

    /// Run the given transitions once, in order
    pub fn step<R: Rng>(
        &mut self,
        transitions: &[SweepTransition],
        mut rng: &mut R,
    ) {
        for transition in transitions {
            match transition {
                SweepTransition::TableAssignment => {
                    self.reassign_tables(&mut rng);
                }
                SweepTransition::TopicAssignment => {
                    self.reassign_topics(&mut rng);
                }
                SweepTransition::Gamma => self.update_gamma(&mut rng),
                SweepTransition::Alpha0(n_iters) => {
                    self.update_alpha0(*n_iters, &mut rng);
                }
            }
        }
        debug_assert!(crate::validate_franchise!(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_consts::{alpha0_prior, gamma_prior};

    fn tiny_franchise() -> Franchise {
        // V = 3, documents [[0, 1], [2, 2, 0]]
        let corpus = Corpus::from_tokens(3, vec![vec![0, 1], vec![2, 2, 0]]);
        Franchise::new(&corpus, 1.0, 1.0, 0.1, gamma_prior(), alpha0_prior())
            .unwrap()
    }

    #[test]
    fn init_seats_everything_at_one_shared_dish() {
        let hdp = tiny_franchise();

        assert_eq!(hdp.n_topics(), 1);
        assert_eq!(hdp.m, 2);
        assert_eq!(hdp.topics[0].n, 5);
        assert_eq!(hdp.topics[0].n_v, vec![2, 1, 2]);
        assert_eq!(hdp.topics[0].m, 2);
        for restaurant in &hdp.restaurants {
            assert_eq!(restaurant.n_tables(), 1);
            assert!(restaurant.seats.iter().all(|&s| s == 0));
        }
        assert!(hdp.validate().is_valid());
    }

    #[test]
    fn init_conserves_document_lengths() {
        let hdp = tiny_franchise();
        assert_eq!(hdp.n_tokens(), 5);
        assert_eq!(hdp.restaurants[0].n(), 2);
        assert_eq!(hdp.restaurants[1].n(), 3);
    }

    #[test]
    fn empty_corpus_fails_construction() {
        let corpus = Corpus::from_tokens(3, vec![]);
        let res = Franchise::new(
            &corpus,
            1.0,
            1.0,
            0.1,
            gamma_prior(),
            alpha0_prior(),
        );
        assert_eq!(res.unwrap_err(), NewFranchiseError::EmptyCorpus);
    }

    #[test]
    fn empty_document_fails_construction() {
        let corpus = Corpus::from_tokens(3, vec![vec![0], vec![]]);
        let res = Franchise::new(
            &corpus,
            1.0,
            1.0,
            0.1,
            gamma_prior(),
            alpha0_prior(),
        );
        assert_eq!(
            res.unwrap_err(),
            NewFranchiseError::EmptyDocument { doc_ix: 1 }
        );
    }

    #[test]
    fn out_of_vocabulary_token_fails_construction() {
        let corpus = Corpus::from_tokens(3, vec![vec![0, 3]]);
        let res = Franchise::new(
            &corpus,
            1.0,
            1.0,
            0.1,
            gamma_prior(),
            alpha0_prior(),
        );
        assert_eq!(
            res.unwrap_err(),
            NewFranchiseError::TokenOutOfBounds {
                doc_ix: 0,
                token_ix: 1,
                token: 3,
                n_vocab: 3,
            }
        );
    }

    #[test]
    fn non_positive_hyperparameters_fail_construction() {
        let corpus = Corpus::from_tokens(2, vec![vec![0, 1]]);
        let build = |gamma: f64, alpha0: f64, beta: f64| {
            Franchise::new(
                &corpus,
                gamma,
                alpha0,
                beta,
                gamma_prior(),
                alpha0_prior(),
            )
        };

        assert_eq!(
            build(0.0, 1.0, 0.1).unwrap_err(),
            NewFranchiseError::BadGamma(0.0)
        );
        assert_eq!(
            build(1.0, -2.0, 0.1).unwrap_err(),
            NewFranchiseError::BadAlpha0(-2.0)
        );
        assert!(matches!(
            build(1.0, 1.0, f64::NAN).unwrap_err(),
            NewFranchiseError::BadBeta(_)
        ));
    }

    #[test]
    fn detaching_every_table_empties_the_menu() {
        let mut hdp = tiny_franchise();

        let words0 = hdp.detach_table(0, 0);
        let words1 = hdp.detach_table(1, 0);
        // both detached: dish 0 is now unserved and gone
        assert_eq!(hdp.n_topics(), 0);

        let k = hdp.add_topic();
        hdp.attach_table(0, 0, k, &words0);
        hdp.attach_table(1, 0, k, &words1);

        assert_eq!(hdp.n_topics(), 1);
        assert_eq!(hdp.m, 2);
        assert!(hdp.validate().is_valid());
    }

    #[test]
    fn add_table_counts_toward_dish_and_franchise() {
        let mut hdp = tiny_franchise();
        let t = hdp.add_table(0, 0);

        assert_eq!(t, 1);
        assert_eq!(hdp.m, 3);
        assert_eq!(hdp.topics[0].m, 3);

        // a fresh table is empty until the caller seats someone
        assert_eq!(hdp.restaurants[0].tables[t].n, 0);
    }
}
