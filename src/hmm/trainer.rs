use std::collections::HashMap;

use clap::ValueEnum;

use crate::{dataset::Dataset, error::Error, vocab::Vocab};

use super::model::HmmModel;

/// Transition smoothing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Smoothing {
    /// Laplace add-one over every (prev, next) tag pair.
    AddOne,
    /// Linear interpolation of the bigram and unigram estimates.
    Interpolated,
}

impl std::fmt::Display for Smoothing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Smoothing::AddOne => "add-one".fmt(f),
            Smoothing::Interpolated => "interpolated".fmt(f),
        }
    }
}

/// Weight of the bigram term under `Smoothing::Interpolated`; the unigram
/// term gets the remainder.
pub const DEFAULT_LAMBDA: f64 = 0.8;

/// Estimates a bigram HMM from a labeled corpus with maximum likelihood.
///
/// Emissions are unsmoothed: only observed `(word, tag)` pairs get a
/// probability, everything else stays at zero. Partially labeled sentences
/// are skipped with a warning; a corpus with no labeled sentence is an
/// error.
pub fn train(ds: &Dataset, smoothing: Smoothing, lambda: f64) -> Result<HmmModel, Error> {
    if !(0.0..=1.0).contains(&lambda) {
        return Err(Error::InvalidLambdas(lambda, 1.0 - lambda));
    }

    let mut tags = Vocab::default();
    let mut words = Vocab::default();
    let mut skipped = 0usize;
    for sent in &ds.sentences {
        if !sent.is_labeled() {
            skipped += 1;
            continue;
        }
        for (word, tag) in sent.words.iter().zip(&sent.tags) {
            words.intern(word);
            tags.intern(tag);
        }
    }
    if skipped > 0 {
        log::warn!("skipped {} sentence(s) without complete tags", skipped);
    }
    if tags.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let l = tags.len();
    let mut emit_count: HashMap<(usize, usize), usize> = HashMap::new();
    let mut tag_count = vec![0usize; l];
    let mut trans_count = vec![0usize; (l + 1) * l];
    let mut prev_count = vec![0usize; l + 1];
    let mut total_tokens = 0usize;

    for sent in ds.sentences.iter().filter(|s| s.is_labeled()) {
        let mut prev = l; // start-of-sentence row
        for (word, tag) in sent.words.iter().zip(&sent.tags) {
            let w = words.intern(word);
            let t = tags.intern(tag);
            *emit_count.entry((w, t)).or_default() += 1;
            tag_count[t] += 1;
            trans_count[prev * l + t] += 1;
            prev_count[prev] += 1;
            total_tokens += 1;
            prev = t;
        }
    }

    let mut emissions = vec![Vec::new(); words.len()];
    for (&(w, t), &n) in &emit_count {
        emissions[w].push((t, (n as f64 / tag_count[t] as f64).ln()));
    }
    for tag_probs in &mut emissions {
        tag_probs.sort_unstable_by_key(|&(t, _)| t);
    }

    let trans = match smoothing {
        Smoothing::AddOne => add_one(&trans_count, &prev_count, l),
        Smoothing::Interpolated => {
            interpolate(&trans_count, &prev_count, &tag_count, total_tokens, l, lambda)
        }
    };

    log::info!(
        "trained on {} sentence(s): {} tags, {} words, {} emission pairs ({:?})",
        ds.len() - skipped,
        l,
        words.len(),
        emit_count.len(),
        smoothing,
    );
    Ok(HmmModel::new(tags, words, trans, emissions))
}

/// `(c(prev, next) + 1) / (c(prev) + L)`: every row is a proper
/// distribution over the L next tags, including rows never observed.
fn add_one(trans_count: &[usize], prev_count: &[usize], l: usize) -> Vec<f64> {
    let mut trans = vec![0.0; (l + 1) * l];
    for prev in 0..=l {
        let denom = (prev_count[prev] + l) as f64;
        for next in 0..l {
            trans[prev * l + next] = ((trans_count[prev * l + next] + 1) as f64 / denom).ln();
        }
    }
    trans
}

/// `λ * c(next|prev)/c(prev) + (1 - λ) * c(next)/total`; cells with zero
/// mass under both terms stay at log zero.
fn interpolate(
    trans_count: &[usize],
    prev_count: &[usize],
    next_count: &[usize],
    total_tokens: usize,
    l: usize,
    lambda: f64,
) -> Vec<f64> {
    let mut trans = vec![f64::NEG_INFINITY; (l + 1) * l];
    for prev in 0..=l {
        for next in 0..l {
            let mut p = (1.0 - lambda) * next_count[next] as f64 / total_tokens as f64;
            if prev_count[prev] > 0 {
                p += lambda * trans_count[prev * l + next] as f64 / prev_count[prev] as f64;
            }
            if p > 0.0 {
                trans[prev * l + next] = p.ln();
            }
        }
    }
    trans
}
