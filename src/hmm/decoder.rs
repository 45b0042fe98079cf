use clap::ValueEnum;

use super::model::HmmModel;

/// Decoding strategy. Viterbi is exact; beam search prunes to the `width`
/// best partial hypotheses per position and can return a lower-scoring path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Decode {
    Viterbi,
    Beam,
}

impl std::fmt::Display for Decode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decode::Viterbi => "viterbi".fmt(f),
            Decode::Beam => "beam".fmt(f),
        }
    }
}

/// Dispatches to the chosen decoder. `width` is only consulted for beam
/// search.
pub fn decode<S: AsRef<str>>(
    model: &HmmModel,
    words: &[S],
    strategy: Decode,
    width: usize,
) -> (Vec<usize>, f64) {
    match strategy {
        Decode::Viterbi => viterbi(model, words),
        Decode::Beam => beam(model, words, width),
    }
}

/// The tags a word may take at decode time: the emission shortlist for a
/// known word, every tag (with the emission factor dropped) for an unknown
/// one.
fn candidates(model: &HmmModel, word: &str) -> Vec<(usize, f64)> {
    match model.emission_tags(word) {
        Some(pairs) => pairs.to_vec(),
        None => (0..model.num_tags()).map(|t| (t, 0.0)).collect(),
    }
}

/// Exact max-product decoding in log space.
///
/// Flat `[T][L]` score and backward-edge matrices, filled left to right,
/// then a backtrace from the best final state. An empty sentence decodes to
/// an empty path with score 0.
pub fn viterbi<S: AsRef<str>>(model: &HmmModel, words: &[S]) -> (Vec<usize>, f64) {
    let t_len = words.len();
    let l = model.num_tags();
    if t_len == 0 {
        return (Vec::new(), 0.0);
    }

    let mut score = vec![f64::NEG_INFINITY; t_len * l];
    let mut backward_edge = vec![0usize; t_len * l];

    for (j, lp) in candidates(model, words[0].as_ref()) {
        score[j] = model.transition(model.bos(), j) + lp;
    }
    for t in 1..t_len {
        for (j, lp) in candidates(model, words[t].as_ref()) {
            let mut max_score = f64::NEG_INFINITY;
            let mut argmax = 0;
            for i in 0..l {
                let s = score[(t - 1) * l + i] + model.transition(i, j);
                if s > max_score {
                    max_score = s;
                    argmax = i;
                }
            }
            score[t * l + j] = max_score + lp;
            backward_edge[t * l + j] = argmax;
        }
    }

    // Best final state; ties keep the lowest tag id.
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for j in 0..l {
        if score[(t_len - 1) * l + j] > best_score {
            best_score = score[(t_len - 1) * l + j];
            best = j;
        }
    }

    let mut path = vec![0usize; t_len];
    path[t_len - 1] = best;
    for t in (0..t_len - 1).rev() {
        path[t] = backward_edge[(t + 1) * l + path[t + 1]];
    }
    (path, best_score)
}

#[derive(Debug, Clone)]
struct Hypothesis {
    path: Vec<usize>,
    score: f64,
}

/// Approximate decoding that keeps the `width` best partial hypotheses at
/// each position. Scores the same function as [`viterbi`], so its result is
/// never higher-scoring; with `width >= L` on a bigram model it is exact.
pub fn beam<S: AsRef<str>>(model: &HmmModel, words: &[S], width: usize) -> (Vec<usize>, f64) {
    let width = width.max(1);
    if words.is_empty() {
        return (Vec::new(), 0.0);
    }

    let mut hyps = vec![Hypothesis { path: Vec::new(), score: 0.0 }];
    for word in words {
        let mut expanded = Vec::with_capacity(hyps.len() * model.num_tags());
        for hyp in &hyps {
            let prev = hyp.path.last().copied().unwrap_or_else(|| model.bos());
            for (j, lp) in candidates(model, word.as_ref()) {
                let mut path = hyp.path.clone();
                path.push(j);
                expanded.push(Hypothesis {
                    path,
                    score: hyp.score + model.transition(prev, j) + lp,
                });
            }
        }
        expanded.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        expanded.truncate(width);
        hyps = expanded;
    }

    let best = hyps
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(Hypothesis { path: Vec::new(), score: 0.0 });
    (best.path, best.score)
}
