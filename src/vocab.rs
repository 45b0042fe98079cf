use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bidirectional map between strings and dense ids.
///
/// Ids are assigned in first-seen order, so a vocabulary built from a corpus
/// enumerates its symbols in corpus order. Only the string list is
/// serialized; the reverse index is rebuilt on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocab {
    syms: Vec<String>,
    index: HashMap<String, usize>,
}

impl From<Vec<String>> for Vocab {
    fn from(syms: Vec<String>) -> Self {
        let index = syms
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self { syms, index }
    }
}

impl From<Vocab> for Vec<String> {
    fn from(vocab: Vocab) -> Self {
        vocab.syms
    }
}

impl Vocab {
    /// Returns the id of `sym`, inserting it if unseen.
    pub fn intern(&mut self, sym: &str) -> usize {
        if let Some(&id) = self.index.get(sym) {
            return id;
        }
        let id = self.syms.len();
        self.index.insert(sym.to_string(), id);
        self.syms.push(sym.to_string());
        id
    }

    pub fn get(&self, sym: &str) -> Option<usize> {
        self.index.get(sym).copied()
    }

    pub fn resolve(&self, id: usize) -> Option<&str> {
        self.syms.get(id).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.syms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.syms.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut vocab = Vocab::default();
        for (s, id) in [("NN", 0), ("VB", 1), ("DT", 2), ("VB", 1), ("NN", 0), ("JJ", 3)] {
            assert_eq!(id, vocab.intern(s), "{} != {}", s, id);
        }
        assert_eq!(vocab.len(), 4);
    }

    #[test]
    fn resolve_by_id() {
        let mut vocab = Vocab::default();
        vocab.intern("NN");
        vocab.intern("VB");
        assert_eq!(vocab.resolve(0), Some("NN"));
        assert_eq!(vocab.resolve(1), Some("VB"));
        assert_eq!(vocab.resolve(2), None);
        assert_eq!(vocab.get("VB"), Some(1));
        assert_eq!(vocab.get("JJ"), None);
    }

    #[test]
    fn serde_rebuilds_index() {
        let mut vocab = Vocab::default();
        vocab.intern("NN");
        vocab.intern("VB");
        let json = serde_json::to_string(&vocab).unwrap();
        let back: Vocab = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("VB"), Some(1));
        assert_eq!(back.len(), 2);
    }
}
