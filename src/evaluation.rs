use std::{collections::HashMap, fmt::Display, iter::zip};

/// Label-wise performance values.
#[derive(Debug, Default)]
struct LabelMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /// Number of occurrences of the label in the gold-standard data.
    num_observation: usize,
    /// Number of predictions.
    num_prediction: usize,
    precision: f64,
    recall: f64,
    fmeasure: f64,
}

/// Overall tagging performance, accumulated sentence by sentence.
#[derive(Debug, Default)]
pub struct Performance {
    /// Array of label-wise evaluations.
    tbl: HashMap<String, LabelMeasure>,

    /// Number of correctly predicted items.
    item_total_correct: usize,
    /// Total number of items.
    item_total_num: usize,
    /// Item-level accuracy.
    item_accuracy: f64,

    /// Number of correctly predicted sentences.
    inst_total_correct: usize,
    /// Total number of sentences.
    inst_total_num: usize,
    /// Sentence-level accuracy.
    inst_accuracy: f64,

    macro_precision: f64,
    macro_recall: f64,
    macro_fmeasure: f64,
}

/// Summary figures extracted by [`Performance::evaluate`].
#[derive(Debug)]
pub struct Estimation {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Performance {
    pub fn accumulate<S: AsRef<str>>(&mut self, reference: &[String], prediction: &[S]) {
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let p = p.as_ref();
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.item_total_num += 1;
        }

        if matched == reference.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    pub fn evaluate(&mut self) -> Estimation {
        self.item_total_correct = 0;
        self.macro_precision = 0.0;
        self.macro_recall = 0.0;
        self.macro_fmeasure = 0.0;
        let mut num_observed_labels = 0;
        for lev in self.tbl.values_mut() {
            if lev.num_observation == 0 {
                continue;
            }
            num_observed_labels += 1;
            self.item_total_correct += lev.num_correct;

            lev.precision = 0.0;
            lev.recall = 0.0;
            lev.fmeasure = 0.0;
            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            if lev.num_observation > 0 {
                lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            }
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }

        if num_observed_labels > 0 {
            self.macro_precision /= num_observed_labels as f64;
            self.macro_recall /= num_observed_labels as f64;
            self.macro_fmeasure /= num_observed_labels as f64;
        }
        if self.item_total_num > 0 {
            self.item_accuracy = self.item_total_correct as f64 / self.item_total_num as f64;
        }
        if self.inst_total_num > 0 {
            self.inst_accuracy = self.inst_total_correct as f64 / self.inst_total_num as f64;
        }
        Estimation {
            accuracy: self.item_accuracy,
            precision: self.macro_precision,
            recall: self.macro_recall,
            fmeasure: self.macro_fmeasure,
        }
    }
}

impl Display for Performance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by tag (#match, #model, #ref) (precision, recall, F1):")?;
        let mut labels: Vec<&String> = self.tbl.keys().collect();
        labels.sort();
        for label in labels {
            let lev = &self.tbl[label];
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    label,
                    lev.num_correct,
                    lev.num_prediction,
                    lev.num_observation,
                    lev.precision,
                    lev.recall,
                    lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({:.4}, {:.4}, {:.4})",
            self.macro_precision, self.macro_recall, self.macro_fmeasure
        )?;
        writeln!(
            f,
            "Item accuracy: {}/{} => {:.4}",
            self.item_total_correct, self.item_total_num, self.item_accuracy
        )?;
        writeln!(
            f,
            "Sentence accuracy: {}/{} => {:.4}",
            self.inst_total_correct, self.inst_total_num, self.inst_accuracy
        )
    }
}

const SCORE_EPS: f64 = 1e-9;

/// Compares the decoder's path score against the gold path score, sentence
/// by sentence. A gold path that outscores the prediction proves the decoder
/// pruned away the optimum, which exact Viterbi never does; a tie means the
/// decoder found a path at least as good as the gold one.
#[derive(Debug, Default)]
pub struct Suboptimality {
    pub sentences: usize,
    pub suboptimal: usize,
    pub score_matched: usize,
}

impl Suboptimality {
    pub fn accumulate(&mut self, pred_score: f64, gold_score: f64) {
        self.sentences += 1;
        if gold_score > pred_score + SCORE_EPS {
            self.suboptimal += 1;
        } else if (gold_score - pred_score).abs() <= SCORE_EPS {
            self.score_matched += 1;
        }
    }

    pub fn suboptimal_rate(&self) -> f64 {
        self.suboptimal as f64 / self.sentences.max(1) as f64
    }

    pub fn score_match_rate(&self) -> f64 {
        self.score_matched as f64 / self.sentences.max(1) as f64
    }
}

impl Display for Suboptimality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Suboptimal sequences: {}/{} => {:.4}",
            self.suboptimal,
            self.sentences,
            self.suboptimal_rate()
        )?;
        writeln!(
            f,
            "Gold-score matches:   {}/{} => {:.4}",
            self.score_matched,
            self.sentences,
            self.score_match_rate()
        )
    }
}
