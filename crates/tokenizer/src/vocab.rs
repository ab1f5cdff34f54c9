use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VocabError};

/// Sorted, case-folded character alphabet with dense indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabFile", into = "VocabFile")]
pub struct CharVocab {
    chars: Vec<char>,
    char_to_ix: HashMap<char, u32>,
    data_size: usize,
}

/// On-disk layout: the alphabet in index order plus the corpus size.
#[derive(Serialize, Deserialize)]
struct VocabFile {
    chars: Vec<char>,
    data_size: usize,
}

impl CharVocab {
    /// Builds the vocabulary of the lower-cased `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        let folded = text.to_lowercase();
        let mut chars: Vec<char> = folded.chars().collect();
        let data_size = chars.len();
        if data_size == 0 {
            return Err(VocabError::EmptyCorpus);
        }
        chars.sort_unstable();
        chars.dedup();

        log::debug!(
            "character vocabulary: {} distinct of {} total",
            chars.len(),
            data_size
        );
        Ok(Self::from_parts(chars, data_size))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    fn from_parts(chars: Vec<char>, data_size: usize) -> Self {
        let char_to_ix = chars
            .iter()
            .enumerate()
            .map(|(ix, &c)| (c, ix as u32))
            .collect();
        Self {
            chars,
            char_to_ix,
            data_size,
        }
    }

    /// Number of distinct characters.
    pub fn vocab_size(&self) -> usize {
        self.chars.len()
    }

    /// Index reserved for padding, one past the last character.
    pub fn pad_index(&self) -> u32 {
        self.chars.len() as u32
    }

    /// Embedding rows needed to cover the alphabet plus the padding slot.
    pub fn size_with_pad(&self) -> usize {
        self.chars.len() + 1
    }

    /// Number of characters in the corpus the vocabulary was built from.
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// The alphabet in index order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Looks up a single character as-is; no case folding happens here.
    pub fn char_to_ix(&self, c: char) -> Option<u32> {
        self.char_to_ix.get(&c).copied()
    }

    pub fn ix_to_char(&self, ix: u32) -> Option<char> {
        self.chars.get(ix as usize).copied()
    }

    /// Lower-cases `text` and maps every character to its index.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        text.to_lowercase()
            .chars()
            .map(|c| self.char_to_ix(c).ok_or(VocabError::UnknownChar(c)))
            .collect()
    }

    /// Encodes then truncates or right-pads with `pad` to exactly `len` indices.
    pub fn encode_padded(&self, text: &str, len: usize, pad: u32) -> Result<Vec<u32>> {
        let mut ids = self.encode(text)?;
        ids.resize(len, pad);
        Ok(ids)
    }

    pub fn decode(&self, indices: &[u32]) -> Result<String> {
        indices
            .iter()
            .map(|&index| {
                self.ix_to_char(index).ok_or(VocabError::UnknownIndex {
                    index,
                    vocab_size: self.vocab_size(),
                })
            })
            .collect()
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl TryFrom<VocabFile> for CharVocab {
    type Error = VocabError;

    fn try_from(file: VocabFile) -> Result<Self> {
        if file.chars.is_empty() {
            return Err(VocabError::EmptyCorpus);
        }
        if file.chars.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(VocabError::Malformed(
                "characters must be unique and in ascending order".into(),
            ));
        }
        Ok(Self::from_parts(file.chars, file.data_size))
    }
}

impl From<CharVocab> for VocabFile {
    fn from(vocab: CharVocab) -> Self {
        Self {
            chars: vocab.chars,
            data_size: vocab.data_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_sorted_and_case_folded() {
        let vocab = CharVocab::from_text("Hello World").unwrap();
        assert_eq!(vocab.chars(), &[' ', 'd', 'e', 'h', 'l', 'o', 'r', 'w']);
        assert_eq!(vocab.vocab_size(), 8);
        assert_eq!(vocab.data_size(), 11);
        assert_eq!(vocab.char_to_ix('h'), Some(3));
        assert_eq!(vocab.char_to_ix('H'), None);
        assert_eq!(vocab.ix_to_char(0), Some(' '));
        assert_eq!(vocab.ix_to_char(8), None);
    }

    #[test]
    fn encode_folds_case() {
        let vocab = CharVocab::from_text("abc").unwrap();
        assert_eq!(vocab.encode("CaB").unwrap(), vec![2, 0, 1]);
        assert_eq!(vocab.decode(&[2, 0, 1]).unwrap(), "cab");
    }

    #[test]
    fn unknown_symbols_are_errors() {
        let vocab = CharVocab::from_text("abc").unwrap();
        assert!(matches!(
            vocab.encode("abz"),
            Err(VocabError::UnknownChar('z'))
        ));
        assert!(matches!(
            vocab.decode(&[0, 3]),
            Err(VocabError::UnknownIndex {
                index: 3,
                vocab_size: 3
            })
        ));
    }

    #[test]
    fn padding_and_truncation() {
        let vocab = CharVocab::from_text("abcd").unwrap();
        assert_eq!(vocab.encode_padded("ab", 4, 3).unwrap(), vec![0, 1, 3, 3]);
        assert_eq!(vocab.encode_padded("dcba", 2, 0).unwrap(), vec![3, 2]);
    }

    #[test]
    fn pad_index_lies_outside_the_alphabet() {
        let vocab = CharVocab::from_text("a b").unwrap();
        assert_eq!(vocab.pad_index(), 2);
        assert_eq!(vocab.size_with_pad(), 3);
        assert_eq!(vocab.ix_to_char(vocab.pad_index()), None);
        assert!(!vocab.encode("b a").unwrap().contains(&vocab.pad_index()));
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(
            CharVocab::from_text(""),
            Err(VocabError::EmptyCorpus)
        ));
    }
}
