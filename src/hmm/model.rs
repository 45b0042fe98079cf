use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, vocab::Vocab};

/// Parameters of a trained bigram HMM, all in natural-log space.
///
/// Transitions are a flat `(L + 1) x L` matrix; row `L` is the
/// start-of-sentence row, so `P(first tag)` and `P(next | prev)` live in the
/// same table. Emissions are stored sparsely per word: a `(word, tag)` pair
/// unseen in training has probability zero, which decoders treat as log -inf.
#[derive(Debug, Serialize, Deserialize)]
pub struct HmmModel {
    pub tags: Vocab,
    pub words: Vocab,
    #[serde(with = "log_space")]
    trans: Vec<f64>,
    emissions: Vec<Vec<(usize, f64)>>,
}

impl HmmModel {
    pub(crate) fn new(tags: Vocab, words: Vocab, trans: Vec<f64>, emissions: Vec<Vec<(usize, f64)>>) -> Self {
        debug_assert_eq!(trans.len(), (tags.len() + 1) * tags.len());
        debug_assert_eq!(emissions.len(), words.len());
        Self { tags, words, trans, emissions }
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    /// Index of the implicit start-of-sentence state in the transition rows.
    pub fn bos(&self) -> usize {
        self.tags.len()
    }

    /// Log P(next | prev). `prev == self.bos()` scores the sentence start.
    pub fn transition(&self, prev: usize, next: usize) -> f64 {
        self.trans[prev * self.tags.len() + next]
    }

    /// Log P(word | tag), or -inf for a pair unseen in training. An unknown
    /// word scores 0 for every tag: the emission factor is dropped and
    /// transitions alone drive the choice.
    pub fn emission(&self, word: &str, tag: usize) -> f64 {
        match self.words.get(word) {
            Some(w) => self.emissions[w]
                .iter()
                .find(|(t, _)| *t == tag)
                .map(|(_, lp)| *lp)
                .unwrap_or(f64::NEG_INFINITY),
            None => 0.0,
        }
    }

    /// The candidate tags a word can emit, with their log-probabilities.
    /// `None` means the word was never seen and every tag is a candidate.
    pub fn emission_tags(&self, word: &str) -> Option<&[(usize, f64)]> {
        self.words.get(word).map(|w| self.emissions[w].as_slice())
    }

    /// Joint log-score of a tag path for a sentence, the quantity both
    /// decoders maximize. Paths using a transition or emission of
    /// probability zero score -inf.
    pub fn score<S: AsRef<str>>(&self, words: &[S], path: &[usize]) -> f64 {
        debug_assert_eq!(words.len(), path.len());
        let mut prev = self.bos();
        let mut total = 0.0;
        for (word, &tag) in words.iter().zip(path) {
            total += self.transition(prev, tag) + self.emission(word.as_ref(), tag);
            prev = tag;
        }
        total
    }

    /// Maps gold tag strings to ids; `None` if any tag is unseen.
    pub fn tag_ids(&self, tags: &[String]) -> Option<Vec<usize>> {
        tags.iter().map(|t| self.tags.get(t)).collect()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let f = File::create(path)?;
        serde_json::to_writer(BufWriter::new(f), self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let f = File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(f))?;
        Ok(model)
    }
}

/// JSON has no -inf, so zero-probability transition cells are written as
/// `null` and read back as `NEG_INFINITY`.
mod log_space {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &[f64], ser: S) -> Result<S::Ok, S::Error> {
        let cells: Vec<Option<f64>> = v
            .iter()
            .map(|&x| if x.is_finite() { Some(x) } else { None })
            .collect();
        cells.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<f64>, D::Error> {
        let cells = Vec::<Option<f64>>::deserialize(de)?;
        Ok(cells
            .into_iter()
            .map(|x| x.unwrap_or(f64::NEG_INFINITY))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_model() -> HmmModel {
        let tags = Vocab::from(vec!["DT".to_string(), "NN".to_string()]);
        let words = Vocab::from(vec!["the".to_string(), "dog".to_string()]);
        // rows: DT, NN, BOS
        let trans = vec![
            0.1_f64.ln(), 0.9_f64.ln(),
            0.5_f64.ln(), 0.5_f64.ln(),
            0.8_f64.ln(), 0.2_f64.ln(),
        ];
        let emissions = vec![vec![(0, 0.0)], vec![(1, 0.0)]];
        HmmModel::new(tags, words, trans, emissions)
    }

    #[test]
    fn score_sums_transitions_and_emissions() {
        let model = toy_model();
        let s = model.score(&["the", "dog"], &[0, 1]);
        let expect = 0.8_f64.ln() + 0.9_f64.ln();
        assert!((s - expect).abs() < 1e-12, "{} != {}", s, expect);
    }

    #[test]
    fn unseen_pair_scores_neg_infinity() {
        let model = toy_model();
        assert_eq!(model.emission("the", 1), f64::NEG_INFINITY);
        assert_eq!(model.score(&["the"], &[1]), f64::NEG_INFINITY);
    }

    #[test]
    fn unknown_word_drops_emission_factor() {
        let model = toy_model();
        assert_eq!(model.emission("cat", 0), 0.0);
        assert_eq!(model.emission_tags("cat"), None);
        let s = model.score(&["cat"], &[0]);
        assert!((s - 0.8_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn roundtrips_neg_infinity_through_json() {
        let tags = Vocab::from(vec!["A".to_string(), "B".to_string()]);
        let words = Vocab::from(vec!["x".to_string()]);
        let trans = vec![
            0.0, f64::NEG_INFINITY,
            f64::NEG_INFINITY, 0.0,
            0.0, f64::NEG_INFINITY,
        ];
        let model = HmmModel::new(tags, words, trans, vec![vec![(0, 0.0)]]);
        let json = serde_json::to_string(&model).unwrap();
        let back: HmmModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transition(0, 1), f64::NEG_INFINITY);
        assert_eq!(back.transition(back.bos(), 0), 0.0);
    }
}
