use log::{debug, info};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use thiserror::Error;
use weft_data::Corpus;
use weft_hdp::config::SweepConfig;
use weft_hdp::error::NewFranchiseError;
use weft_hdp::Franchise;
use weft_stats::rv::dist::Gamma;

/// The sampler plus the single logical random stream that drives it.
///
/// The stream is consumed only in the serial portions of the sweeps, so a
/// fixed seed reproduces a run exactly regardless of how many worker threads
/// the topic sweep fans out over.
#[derive(Debug)]
pub struct Engine {
    pub franchise: Franchise,
    pub rng: Xoshiro256Plus,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum BuildEngineError {
    #[error("invalid corpus or hyperparameters: {0}")]
    Franchise(#[from] NewFranchiseError),
}

/// Builds an [`Engine`]
///
/// Construction is all-or-nothing: every input is validated before any state
/// is assembled, and a partially initialized sampler is never observable.
pub struct Builder {
    corpus: Corpus,
    seed: Option<u64>,
    gamma: f64,
    alpha0: f64,
    beta: f64,
    gamma_prior: Option<Gamma>,
    alpha0_prior: Option<Gamma>,
    initial_n_topics: Option<usize>,
}

impl Builder {
    /// Start building an engine over the given corpus
    pub fn new(corpus: Corpus) -> Self {
        Builder {
            corpus,
            seed: None,
            gamma: 1.0,
            alpha0: 1.0,
            beta: 0.1,
            gamma_prior: None,
            alpha0_prior: None,
            initial_n_topics: None,
        }
    }

    /// Set the RNG seed
    #[must_use]
    pub fn seed_from_u64(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the initial top-level concentration
    #[must_use]
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the initial document-level concentration
    #[must_use]
    pub fn alpha0(mut self, alpha0: f64) -> Self {
        self.alpha0 = alpha0;
        self
    }

    /// Set the symmetric Dirichlet smoothing on topic-word distributions
    #[must_use]
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Put a custom Gamma prior on the top-level concentration
    #[must_use]
    pub fn gamma_prior(mut self, prior: Gamma) -> Self {
        self.gamma_prior = Some(prior);
        self
    }

    /// Put a custom Gamma prior on the document-level concentration
    #[must_use]
    pub fn alpha0_prior(mut self, prior: Gamma) -> Self {
        self.alpha0_prior = Some(prior);
        self
    }

    /// Advise an initial topic count.
    ///
    /// Advisory only: the initializer always seats the whole corpus on a
    /// single shared topic and lets the sweeps grow the menu from there. The
    /// value is recorded for logging and otherwise ignored.
    #[must_use]
    pub fn initial_n_topics(mut self, n_topics: usize) -> Self {
        self.initial_n_topics = Some(n_topics);
        self
    }

    /// Build the engine and consume the builder
    pub fn build(self) -> Result<Engine, BuildEngineError> {
        let rng = self
            .seed
            .map_or_else(Xoshiro256Plus::from_entropy, Xoshiro256Plus::seed_from_u64);

        if let Some(n_topics) = self.initial_n_topics {
            debug!(
                "initial topic count {n_topics} is advisory; \
                 seeding one shared topic"
            );
        }

        let franchise = Franchise::new(
            &self.corpus,
            self.gamma,
            self.alpha0,
            self.beta,
            self.gamma_prior.unwrap_or_else(weft_consts::gamma_prior),
            self.alpha0_prior.unwrap_or_else(weft_consts::alpha0_prior),
        )?;

        Ok(Engine { franchise, rng })
    }
}

impl Engine {
    /// Run the configured sweeps to completion
    pub fn run(&mut self, config: &SweepConfig) {
        for iter in 0..config.n_iters {
            self.franchise.step(&config.transitions, &mut self.rng);
            debug!(
                "sweep {}/{}: {} topics over {} tables, gamma {:.4}, \
                 alpha0 {:.4}",
                iter + 1,
                config.n_iters,
                self.franchise.n_topics(),
                self.franchise.n_tables(),
                self.franchise.gamma,
                self.franchise.alpha0,
            );
        }
        info!(
            "finished {} sweeps: {} topics over {} tokens in {} documents",
            config.n_iters,
            self.franchise.n_topics(),
            self.franchise.n_tokens(),
            self.franchise.n_docs(),
        );
    }

    /// The number of topics currently instantiated
    #[inline]
    pub fn n_topics(&self) -> usize {
        self.franchise.n_topics()
    }

    /// The topic-by-word predictive distributions
    #[inline]
    pub fn phi(&self) -> Vec<Vec<f64>> {
        self.franchise.phi()
    }

    /// The document-by-topic mixture weights
    #[inline]
    pub fn theta(&self) -> Vec<Vec<f64>> {
        self.franchise.theta()
    }

    /// Held-in perplexity under the given estimates
    #[inline]
    pub fn perplexity(&self, phi: &[Vec<f64>], theta: &[Vec<f64>]) -> f64 {
        self.franchise.perplexity(phi, theta)
    }

    /// The top-level mixing proportions with their tail component
    #[inline]
    pub fn g0_sticks(&self) -> Vec<f64> {
        self.franchise.g0_sticks()
    }

    /// The entropy of each topic's word distribution, in nats
    #[inline]
    pub fn topic_entropies(&self, phi: &[Vec<f64>]) -> Vec<f64> {
        self.franchise.topic_entropies(phi)
    }
}
