use crate::error::Result;
use crate::passphrase::{PassphraseSpec, Strategy};
use crate::password::PasswordSpec;
use crate::pool::Pool;

/// 1 trillion is the guess rate an attacker should be assumed to manage.
pub const GUESSES_PER_SECOND: f64 = 1e12;

/// Letters a freeform passphrase word is synthesized from (5 vowels + 21 consonants).
pub const FREEFORM_ALPHABET: usize = 26;

/// `log2(alphabet ^ length)`, evaluated as `length * log2(alphabet)` so large
/// secrets never overflow. Zero when the alphabet has fewer than two symbols.
pub fn bits(alphabet: f64, length: usize) -> f64 {
    if alphabet <= 1.0 || length == 0 {
        return 0.0;
    }
    length as f64 * alphabet.log2()
}

/// Password entropy from the deduplicated pool plus the included characters.
pub fn password(spec: &PasswordSpec) -> Result<f64> {
    let pool = Pool::build(&spec.classes, &spec.exclude)?;
    let alphabet = pool.len() + spec.include.chars().count();
    Ok(bits(alphabet as f64, spec.length))
}

/// List-backed passphrase entropy for a dictionary of `dictionary_len` entries.
pub fn passphrase(spec: &PassphraseSpec, dictionary_len: usize) -> f64 {
    let alphabet =
        dictionary_len as f64 + spec.include.len() as f64 - spec.exclude.len() as f64;
    bits(alphabet, spec.words)
}

/// Freeform passphrase entropy from the realized secret.
///
/// Word lengths are drawn at random, so only the generated value tells how
/// many letters there are.
pub fn freeform(secret: &str, separator: &str, words: usize) -> f64 {
    let separators = separator.chars().count() * words.saturating_sub(1);
    let letters = secret.chars().count().saturating_sub(separators);
    bits(FREEFORM_ALPHABET as f64, letters)
}

/// Entropy of a generated passphrase, picking the model by strategy.
pub fn passphrase_secret(spec: &PassphraseSpec, secret: &str, dictionary_len: usize) -> f64 {
    match spec.strategy {
        Strategy::Freeform => freeform(secret, spec.separator(), spec.words),
        Strategy::WordList | Strategy::SyllableList => passphrase(spec, dictionary_len),
    }
}

/// `2^bits`; saturates to infinity.
pub fn keyspace(bits: f64) -> f64 {
    2f64.powf(bits.max(0.0))
}

/// Expected seconds for an exhaustive search at `guesses_per_second`.
pub fn seconds_to_crack(bits: f64, guesses_per_second: f64) -> f64 {
    keyspace(bits) / guesses_per_second
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rating {
    VeryWeak,
    Weak,
    Reasonable,
    Strong,
    VeryStrong,
}

impl Rating {
    pub fn from_bits(bits: f64) -> Rating {
        match bits {
            b if b < 28.0 => Rating::VeryWeak,
            b if b < 36.0 => Rating::Weak,
            b if b < 60.0 => Rating::Reasonable,
            b if b < 128.0 => Rating::Strong,
            _ => Rating::VeryStrong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::VeryWeak => "very weak",
            Rating::Weak => "weak",
            Rating::Reasonable => "reasonable",
            Rating::Strong => "strong",
            Rating::VeryStrong => "very strong",
        }
    }
}

/// Human-readable duration, from seconds up to "longer than the universe".
pub fn describe_duration(seconds: f64) -> String {
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 60.0 * MINUTE;
    const DAY: f64 = 24.0 * HOUR;
    const YEAR: f64 = 365.25 * DAY;
    const UNIVERSE: f64 = 13.8e9 * YEAR;

    if !seconds.is_finite() || seconds >= UNIVERSE {
        return "longer than the age of the universe".into();
    }
    if seconds < 1.0 {
        return "less than a second".into();
    }
    let (value, unit) = match seconds {
        s if s < MINUTE => (s, "seconds"),
        s if s < HOUR => (s / MINUTE, "minutes"),
        s if s < DAY => (s / HOUR, "hours"),
        s if s < YEAR => (s / DAY, "days"),
        s => (s / YEAR, "years"),
    };
    format!("{:.1} {}", value, unit)
}
