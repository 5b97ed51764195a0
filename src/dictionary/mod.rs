use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::error::{Error, Result};
use crate::random::RandomSource;

/// The built-in word list embedded at compile time.
static WORD_LIST: &str = include_str!("words.txt");

/// Built-in lists, initialised once per process and never mutated.
static WORDS: LazyLock<Arc<Dictionary>> =
    LazyLock::new(|| Arc::new(Dictionary::collect(WORD_LIST.lines())));

static SYLLABLES: LazyLock<Arc<Dictionary>> =
    LazyLock::new(|| Arc::new(Dictionary::collect(synthesize_syllables())));

const ONSETS: &[&str] = &[
    "", "b", "c", "d", "f", "g", "h", "j", "k", "l", "m", "n", "p", "r", "s", "t", "v", "w", "y",
    "z", "bl", "br", "ch", "cl", "cr", "dr", "fl", "fr", "gl", "gr", "pl", "pr", "sc", "sh", "sk",
    "sl", "sm", "sn", "sp", "st", "th", "tr", "tw", "wh",
];
const NUCLEI: &[&str] = &["a", "e", "i", "o", "u", "ai", "au", "ea", "ee", "oa", "oo", "ou"];
const CODAS: &[&str] = &[
    "", "b", "d", "g", "k", "l", "m", "n", "p", "r", "s", "t", "x", "ck", "nd", "ng", "nt", "st",
];

/// Every onset + nucleus + coda combination of at least two letters.
fn synthesize_syllables() -> Vec<String> {
    let mut out = Vec::with_capacity(ONSETS.len() * NUCLEI.len() * CODAS.len());
    for onset in ONSETS {
        for nucleus in NUCLEI {
            for coda in CODAS {
                let syllable = format!("{}{}{}", onset, nucleus, coda);
                if syllable.len() >= 2 {
                    out.push(syllable);
                }
            }
        }
    }
    out.sort();
    out
}

/// An immutable list of distinct entries with random access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<String>,
}

impl Dictionary {
    /// Built-in English word list.
    pub fn words() -> Arc<Dictionary> {
        Arc::clone(&WORDS)
    }

    /// Built-in pronounceable syllable list.
    pub fn syllables() -> Arc<Dictionary> {
        Arc::clone(&SYLLABLES)
    }

    /// Trimmed, non-blank, first-occurrence-unique entries.
    pub fn from_entries<I, S>(entries: I) -> Result<Dictionary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dict = Self::collect(entries);
        if dict.is_empty() {
            return Err(Error::InvalidArgs("dictionary has no entries".into()));
        }
        Ok(dict)
    }

    /// Load a newline-separated list from disk.
    pub fn load(path: &Path) -> Result<Dictionary> {
        let contents = std::fs::read_to_string(path)?;
        let dict = Self::from_entries(contents.lines()).map_err(|_| {
            Error::InvalidArgs(format!("dictionary {} has no entries", path.display()))
        })?;
        log::debug!("loaded {} entries from {}", dict.len(), path.display());
        Ok(dict)
    }

    fn collect<I, S>(entries: I) -> Dictionary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty() && seen.insert(e.clone()))
            .collect();
        Dictionary { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Uniformly drawn entry.
    pub fn pick<R>(&self, rng: &mut R) -> Result<&str>
    where
        R: RandomSource + ?Sized,
    {
        let i = rng.below(self.entries.len())?;
        Ok(&self.entries[i])
    }
}

/// The pair of lists a passphrase generator samples from.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    pub words: Arc<Dictionary>,
    pub syllables: Arc<Dictionary>,
}

impl Default for Dictionaries {
    fn default() -> Self {
        Self {
            words: Dictionary::words(),
            syllables: Dictionary::syllables(),
        }
    }
}

impl Dictionaries {
    /// Built-ins, with either list optionally replaced by a file.
    pub fn load(word_list: Option<&Path>, syllable_list: Option<&Path>) -> Result<Self> {
        let mut dicts = Self::default();
        if let Some(path) = word_list {
            dicts.words = Arc::new(Dictionary::load(path)?);
        }
        if let Some(path) = syllable_list {
            dicts.syllables = Arc::new(Dictionary::load(path)?);
        }
        Ok(dicts)
    }
}
