use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::Limits;
use crate::dictionary::Dictionaries;
use crate::error::{Error, Result};
use crate::random::{self, ChaChaSource, RandomSource};

pub const DEFAULT_SEPARATOR: &str = " ";

const VOWELS: &[u8] = b"aeiou";
const CONSONANTS: &[u8] = b"bcdfghjklmnpqrstvwxyz";

/// Where passphrase words come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Random lowercase words of 3 to 12 letters.
    #[default]
    Freeform,
    /// Uniform picks from the word list.
    WordList,
    /// Uniform picks from the syllable list.
    SyllableList,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Freeform => "freeform",
            Strategy::WordList => "word-list",
            Strategy::SyllableList => "syllable-list",
        }
    }
}

/// Parameters for one passphrase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassphraseSpec {
    pub words: usize,
    /// Joins the words; empty means a single space.
    pub separator: String,
    pub strategy: Strategy,
    /// Words that must appear, each counted towards `words`.
    pub include: Vec<String>,
    /// Words that must not appear.
    pub exclude: Vec<String>,
}

impl PassphraseSpec {
    pub fn new(words: usize, strategy: Strategy) -> Self {
        Self {
            words,
            strategy,
            ..Default::default()
        }
    }

    /// The separator actually placed between words.
    pub fn separator(&self) -> &str {
        if self.separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            &self.separator
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.words < 1 {
            return Err(Error::InvalidLength);
        }
        if self.include.len() > self.words {
            return Err(Error::IncludeExceedsLength {
                include: self.include.len(),
                length: self.words,
            });
        }

        let sep = self.separator();
        if sep.graphemes(true).count() != 1 || sep.chars().any(char::is_control) {
            return Err(Error::InvalidSeparator(sep.to_string()));
        }

        for word in &self.include {
            if self.exclude.contains(word) {
                return Err(Error::IncludeExcludeConflict(word.clone()));
            }
            if word.is_empty() || !word.bytes().all(|b| b.is_ascii_graphic()) || word.contains(sep)
            {
                return Err(Error::InvalidIncludeWord(word.clone()));
            }
        }
        Ok(())
    }
}

/// Produces passphrases from a shared, read-only pair of dictionaries.
#[derive(Debug, Clone)]
pub struct PassphraseGenerator {
    dictionaries: Dictionaries,
    limits: Limits,
    parallel_freeform: bool,
}

impl PassphraseGenerator {
    pub fn new(dictionaries: Dictionaries, limits: Limits) -> Self {
        Self {
            dictionaries,
            limits,
            parallel_freeform: false,
        }
    }

    /// Synthesize freeform words on scoped worker threads, one forked
    /// ChaCha20 stream per word.
    pub fn parallel_freeform(mut self, enabled: bool) -> Self {
        self.parallel_freeform = enabled;
        self
    }

    pub fn set_dictionaries(&mut self, dictionaries: Dictionaries) {
        self.dictionaries = dictionaries;
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    /// Size of the list `strategy` samples from; zero for freeform.
    pub fn dictionary_len(&self, strategy: Strategy) -> usize {
        match strategy {
            Strategy::Freeform => 0,
            Strategy::WordList => self.dictionaries.words.len(),
            Strategy::SyllableList => self.dictionaries.syllables.len(),
        }
    }

    /// Entropy in bits. Freeform needs the generated value and is zero
    /// without it.
    pub fn entropy(&self, spec: &PassphraseSpec, secret: Option<&str>) -> f64 {
        let dict_len = self.dictionary_len(spec.strategy);
        match (spec.strategy, secret) {
            (Strategy::Freeform, None) => 0.0,
            (_, Some(s)) => crate::strength::passphrase_secret(spec, s, dict_len),
            (_, None) => crate::strength::passphrase(spec, dict_len),
        }
    }

    pub fn generate<R>(&self, rng: &mut R, spec: &PassphraseSpec) -> Result<String>
    where
        R: RandomSource + ?Sized,
    {
        spec.validate()?;
        let count = spec.words - spec.include.len();
        log::debug!(
            "passphrase: {} words ({} included), strategy {}",
            spec.words,
            spec.include.len(),
            spec.strategy.name()
        );

        let mut words = if self.parallel_freeform && spec.strategy == Strategy::Freeform && count > 1
        {
            self.freeform_parallel(rng, count)?
        } else {
            (0..count)
                .map(|_| self.word(rng, spec.strategy))
                .collect::<Result<Vec<_>>>()?
        };

        if !spec.include.is_empty() {
            for word in &spec.include {
                random::insert_random(rng, &mut words, word.clone())?;
            }
            random::shuffle(rng, &mut words)?;
        }

        if !spec.exclude.is_empty() {
            self.replace_excluded(rng, spec, &mut words)?;
        }

        let passphrase = words.join(spec.separator());
        zeroize::Zeroize::zeroize(&mut words);
        Ok(passphrase)
    }

    fn word<R>(&self, rng: &mut R, strategy: Strategy) -> Result<String>
    where
        R: RandomSource + ?Sized,
    {
        match strategy {
            Strategy::Freeform => freeform_word(rng),
            Strategy::WordList => Ok(self.dictionaries.words.pick(rng)?.to_string()),
            Strategy::SyllableList => Ok(self.dictionaries.syllables.pick(rng)?.to_string()),
        }
    }

    /// Regenerate every excluded word until none is left.
    ///
    /// Included words can never match an excluded one, so only generated
    /// words are ever replaced.
    fn replace_excluded<R>(
        &self,
        rng: &mut R,
        spec: &PassphraseSpec,
        words: &mut [String],
    ) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        let cap = self.limits.max_exclude_retries_per_word as usize * spec.words;
        let mut retries = 0usize;
        for slot in words.iter_mut() {
            while spec.exclude.contains(slot) {
                if retries >= cap {
                    return Err(Error::RetriesExhausted("excluded word repair"));
                }
                *slot = self.word(rng, spec.strategy)?;
                retries += 1;
            }
        }
        if retries > 0 {
            log::debug!("replaced excluded words {} times", retries);
        }
        Ok(())
    }

    fn freeform_parallel<R>(&self, rng: &mut R, count: usize) -> Result<Vec<String>>
    where
        R: RandomSource + ?Sized,
    {
        let children = (0..count)
            .map(|_| rng.fork())
            .collect::<Result<Vec<ChaChaSource>>>()?;

        std::thread::scope(|s| {
            let handles: Vec<_> = children
                .into_iter()
                .map(|mut child| s.spawn(move || freeform_word(&mut child)))
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .map_err(|_| Error::NoEntropy("word worker panicked".into()))?
                })
                .collect()
        })
    }
}

impl Default for PassphraseGenerator {
    fn default() -> Self {
        Self::new(Dictionaries::default(), Limits::default())
    }
}

/// A lowercase word of 3 to 12 letters; each letter is a vowel with
/// probability 4/11.
pub fn freeform_word<R>(rng: &mut R) -> Result<String>
where
    R: RandomSource + ?Sized,
{
    let len = rng.below(10)? + 3;
    let mut word = String::with_capacity(len);
    for _ in 0..len {
        let c = if rng.below(11)? <= 3 {
            VOWELS[rng.below(VOWELS.len())?]
        } else {
            CONSONANTS[rng.below(CONSONANTS.len())?]
        };
        word.push(c as char);
    }
    Ok(word)
}
