//! Bigram hidden Markov model part-of-speech tagger.
//!
//! Training is plain maximum-likelihood counting with a choice of two
//! transition smoothing schemes; decoding is either exact Viterbi dynamic
//! programming or top-k beam search over the same scoring function.

pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod hmm;
pub mod submission;
pub mod vocab;

pub use dataset::{Dataset, Sentence};
pub use error::Error;
pub use evaluation::{Performance, Suboptimality};
pub use hmm::decoder::Decode;
pub use hmm::model::HmmModel;
pub use hmm::trainer::{train, Smoothing};
pub use vocab::Vocab;
