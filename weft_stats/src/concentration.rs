//! Auxiliary-variable resamplers for the Dirichlet-process concentrations.
//!
//! Both concentrations carry Gamma priors. The top-level concentration is
//! updated with the Escobar & West scheme (*Bayesian Density Estimation and
//! Inference Using Mixtures*, 1995, eq. 13–14); the group-level concentration
//! with the multi-group extension of Teh et al. (2006, appendix A). Each
//! update draws Beta and Bernoulli auxiliaries and then a single Gamma.
use rand::Rng;
use rv::dist::{Bernoulli, Gamma};
use rv::traits::Rv;

/// Draw from Beta(a, b) as x/(x+y) with x ~ Gamma(a, 1) and y ~ Gamma(b, 1)
fn draw_beta<R: Rng>(a: f64, b: f64, rng: &mut R) -> f64 {
    let x: f64 = Gamma::new_unchecked(a, 1.0).draw(rng);
    let y: f64 = Gamma::new_unchecked(b, 1.0).draw(rng);
    x / (x + y)
}

/// One Escobar–West update of the top-level concentration.
///
/// # Arguments
/// - gamma: the current concentration value
/// - n_topics: the number of mixture components currently instantiated
/// - n_tables: the number of draws the components were instantiated from
///   (the franchise-wide table count)
/// - prior: the Gamma(shape, rate) prior on gamma
/// - rng: the random number generator
pub fn update_gamma<R: Rng>(
    gamma: f64,
    n_topics: usize,
    n_tables: usize,
    prior: &Gamma,
    rng: &mut R,
) -> f64 {
    let k = n_topics as f64;
    let m = n_tables as f64;
    let (a, b) = (prior.shape(), prior.rate());

    let eta = draw_beta(gamma + 1.0, m, rng);
    let rate = b - eta.ln();

    let p_shift = {
        let odds = a + k - 1.0;
        odds / (odds + m * rate)
    };
    let shift: bool = Bernoulli::new_unchecked(p_shift).draw(rng);
    let shape = if shift { a + k } else { a + k - 1.0 };

    Gamma::new_unchecked(shape, rate).draw(rng)
}

/// Update the group-level concentration given the group sizes.
///
/// Draws one Beta and one Bernoulli auxiliary per group, then resamples
/// alpha0 from its conditional Gamma; iterating sharpens the conditional
/// around the stationary value.
///
/// # Arguments
/// - alpha0: the current concentration value
/// - n_tables: the total number of clusters across all groups
/// - group_sizes: the number of draws in each group (document lengths)
/// - prior: the Gamma(shape, rate) prior on alpha0
/// - n_iters: the number of times to iterate the update
/// - rng: the random number generator
pub fn update_alpha0<R: Rng>(
    alpha0: f64,
    n_tables: usize,
    group_sizes: &[usize],
    prior: &Gamma,
    n_iters: usize,
    rng: &mut R,
) -> f64 {
    let m = n_tables as f64;
    let (a, b) = (prior.shape(), prior.rate());

    let mut alpha0 = alpha0;
    for _ in 0..n_iters {
        let mut sum_ln_w = 0.0;
        let mut sum_s = 0.0;
        for &n_j in group_sizes {
            let n_j = n_j as f64;
            sum_ln_w += draw_beta(alpha0 + 1.0, n_j, rng).ln();
            let s: bool =
                Bernoulli::new_unchecked(n_j / (alpha0 + n_j)).draw(rng);
            if s {
                sum_s += 1.0;
            }
        }
        let shape = a + m - sum_s;
        let rate = b - sum_ln_w;
        alpha0 = Gamma::new_unchecked(shape, rate).draw(rng);
    }
    alpha0
}
