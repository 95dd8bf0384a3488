use thiserror::Error;

/// The ways franchise construction can be handed invalid inputs.
///
/// Construction either succeeds completely or fails with one of these; a
/// partially initialized franchise is never observable.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NewFranchiseError {
    #[error("the corpus contains no documents")]
    EmptyCorpus,
    #[error("the vocabulary is empty")]
    EmptyVocabulary,
    #[error("document {doc_ix} contains no tokens")]
    EmptyDocument { doc_ix: usize },
    #[error(
        "token {token} at position {token_ix} of document {doc_ix} is \
         outside the vocabulary (size {n_vocab})"
    )]
    TokenOutOfBounds {
        doc_ix: usize,
        token_ix: usize,
        token: usize,
        n_vocab: usize,
    },
    #[error("gamma ({0}) must be positive and finite")]
    BadGamma(f64),
    #[error("alpha0 ({0}) must be positive and finite")]
    BadAlpha0(f64),
    #[error("beta ({0}) must be positive and finite")]
    BadBeta(f64),
}
