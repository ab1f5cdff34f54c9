use std::fs;

use anyhow::Result;
use tokenizer::{CharVocab, VocabError};

const CORPUS: &str = "The quick brown fox jumps over the lazy dog.\nPack my box with five dozen liquor jugs!";

#[test]
fn decode_inverts_encode_up_to_case() -> Result<()> {
    let vocab = CharVocab::from_text(CORPUS)?;
    for line in CORPUS.lines() {
        let ids = vocab.encode(line)?;
        assert_eq!(ids.len(), line.chars().count());
        assert!(ids.iter().all(|&ix| (ix as usize) < vocab.vocab_size()));
        assert_eq!(vocab.decode(&ids)?, line.to_lowercase());
    }
    Ok(())
}

#[test]
fn indices_are_dense_and_ordered() -> Result<()> {
    let vocab = CharVocab::from_text(CORPUS)?;
    for (ix, &c) in vocab.chars().iter().enumerate() {
        assert_eq!(vocab.char_to_ix(c), Some(ix as u32));
        assert!(!c.is_uppercase());
    }
    assert!(vocab.chars().windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(vocab.data_size(), CORPUS.chars().count());
    Ok(())
}

#[test]
fn builds_from_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("corpus.txt");
    fs::write(&path, CORPUS)?;

    let vocab = CharVocab::from_file(&path)?;
    assert_eq!(vocab, CharVocab::from_text(CORPUS)?);

    let missing = CharVocab::from_file(dir.path().join("absent.txt"));
    assert!(matches!(missing, Err(VocabError::Io(_))));
    Ok(())
}

#[test]
fn json_persistence_keeps_the_alphabet() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("vocab.json");
    let vocab = CharVocab::from_text(CORPUS)?;

    vocab.save_json(&path)?;
    let restored = CharVocab::load_json(&path)?;

    assert_eq!(restored, vocab);
    assert_eq!(restored.encode("lazy dog")?, vocab.encode("lazy dog")?);
    Ok(())
}

#[test]
fn rejects_malformed_json() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let unsorted = dir.path().join("unsorted.json");
    fs::write(&unsorted, r#"{"chars":["b","a"],"data_size":2}"#)?;
    assert!(matches!(
        CharVocab::load_json(&unsorted),
        Err(VocabError::Json(_))
    ));

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "not json")?;
    assert!(matches!(
        CharVocab::load_json(&garbage),
        Err(VocabError::Json(_))
    ));
    Ok(())
}
