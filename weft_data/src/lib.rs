#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! Read-only corpus containers consumed by the sampler.
//!
//! Tokenization and vocabulary construction happen upstream; by the time data
//! reaches this crate every token is an integer word id in `[0, n_vocab)`.

use serde::{Deserialize, Serialize};

/// A tokenized document: an ordered sequence of word ids.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Document {
    tokens: Vec<usize>,
}

impl Document {
    pub fn new(tokens: Vec<usize>) -> Self {
        Document { tokens }
    }

    /// The word ids in document order
    #[inline]
    pub fn tokens(&self) -> &[usize] {
        &self.tokens
    }

    /// The number of tokens in the document
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<usize>> for Document {
    fn from(tokens: Vec<usize>) -> Self {
        Document::new(tokens)
    }
}

/// A fixed corpus over a fixed vocabulary.
///
/// The corpus is immutable once constructed; the sampler never mutates it and
/// re-reads it only through shared references.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Corpus {
    n_vocab: usize,
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(n_vocab: usize, documents: Vec<Document>) -> Self {
        Corpus { n_vocab, documents }
    }

    /// Build a corpus directly from per-document token vectors
    pub fn from_tokens(n_vocab: usize, docs: Vec<Vec<usize>>) -> Self {
        Corpus {
            n_vocab,
            documents: docs.into_iter().map(Document::new).collect(),
        }
    }

    /// The vocabulary size `V`
    #[inline]
    pub fn n_vocab(&self) -> usize {
        self.n_vocab
    }

    /// The number of documents `D`
    #[inline]
    pub fn n_docs(&self) -> usize {
        self.documents.len()
    }

    /// The total token count across all documents
    #[inline]
    pub fn n_tokens(&self) -> usize {
        self.documents.iter().map(Document::len).sum()
    }

    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}
