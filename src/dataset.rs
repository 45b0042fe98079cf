use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::Error;

/// One sentence of the corpus: tokens in order, with gold tags when the
/// input is labeled. `tags` is either empty (unlabeled input) or exactly as
/// long as `words`.
#[derive(Debug, Default, Clone)]
pub struct Sentence {
    pub words: Vec<String>,
    pub tags: Vec<String>,
}

impl Sentence {
    pub fn push(&mut self, word: &str, tag: Option<&str>) {
        self.words.push(word.to_string());
        if let Some(tag) = tag {
            self.tags.push(tag.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_labeled(&self) -> bool {
        !self.words.is_empty() && self.tags.len() == self.words.len()
    }
}

/// A corpus of sentences read from `word<TAB>tag` lines, one token per line,
/// with a blank line closing each sentence. Lines without a tab are read as
/// bare tokens, which is how unlabeled test data is written.
#[derive(Debug, Default)]
pub struct Dataset {
    pub sentences: Vec<Sentence>,
}

impl Dataset {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::read(BufReader::new(File::open(path)?))
    }

    pub fn read<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut ds = Self::default();
        let mut sent = Sentence::default();
        for line in reader.lines() {
            ds.push_line(&line?, &mut sent);
        }
        ds.push(sent);
        Ok(ds)
    }

    /// Builds a dataset from in-memory lines, mostly useful in tests.
    pub fn from_lines<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> Self {
        let mut ds = Self::default();
        let mut sent = Sentence::default();
        for line in lines {
            ds.push_line(line, &mut sent);
        }
        ds.push(sent);
        ds
    }

    fn push_line(&mut self, line: &str, sent: &mut Sentence) {
        let line = line.trim_end();
        if line.is_empty() {
            self.push(std::mem::take(sent));
        } else if let Some((word, tag)) = line.split_once('\t') {
            sent.push(word, Some(tag));
        } else {
            sent.push(line, None);
        }
    }

    fn push(&mut self, sent: Sentence) {
        if !sent.is_empty() {
            self.sentences.push(sent);
        }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn max_sentence_len(&self) -> usize {
        self.sentences.iter().map(|s| s.len()).max().unwrap_or_default()
    }

    pub fn total_tokens(&self) -> usize {
        self.sentences.iter().map(|s| s.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_labeled() {
        let ds = Dataset::from_lines("the\tDT\ndog\tNN\nbarks\tVB\n\na\tDT\ncat\tNN\n\n".lines());
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.total_tokens(), 5);
        assert_eq!(ds.max_sentence_len(), 3);
        assert!(ds.sentences[0].is_labeled());
        assert_eq!(ds.sentences[1].words, ["a", "cat"]);
        assert_eq!(ds.sentences[1].tags, ["DT", "NN"]);
    }

    #[test]
    fn read_unlabeled() {
        let ds = Dataset::from_lines("the\ndog\n\nbarks\n".lines());
        assert_eq!(ds.len(), 2);
        assert!(!ds.sentences[0].is_labeled());
        assert_eq!(ds.sentences[0].words, ["the", "dog"]);
    }

    #[test]
    fn missing_trailing_blank_line() {
        let ds = Dataset::from_lines("the\tDT\ndog\tNN".lines());
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.sentences[0].len(), 2);
    }

    #[test]
    fn consecutive_blank_lines() {
        let ds = Dataset::from_lines("the\tDT\n\n\n\ndog\tNN\n\n".lines());
        assert_eq!(ds.len(), 2);
    }
}
