pub mod config;
pub mod dictionary;
pub mod error;
pub mod infer;
pub mod passphrase;
pub mod password;
pub mod patterns;
pub mod pool;
pub mod random;
pub mod strength;

use std::fmt;

use zeroize::Zeroize;

pub use config::Config;
pub use dictionary::{Dictionaries, Dictionary};
pub use error::{Error, Result};
pub use infer::infer_spec;
pub use passphrase::{PassphraseGenerator, PassphraseSpec, Strategy};
pub use password::PasswordSpec;
pub use patterns::PatternSanitizer;
pub use pool::CharClass;
pub use random::{RandomSource, Source};

/// A generated secret and its entropy in bits.
///
/// The value is wiped on drop and never shown by `Debug`.
pub struct Secret {
    value: String,
    entropy: f64,
}

impl Secret {
    pub fn new(value: String, entropy: f64) -> Self {
        Self { value, entropy }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    pub fn keyspace(&self) -> f64 {
        strength::keyspace(self.entropy)
    }

    pub fn seconds_to_crack(&self, guesses_per_second: f64) -> f64 {
        strength::seconds_to_crack(self.entropy, guesses_per_second)
    }

    pub fn rating(&self) -> strength::Rating {
        strength::Rating::from_bits(self.entropy)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("value", &"<redacted>")
            .field("entropy", &self.entropy)
            .finish()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

/// Generator context: one random source plus shared immutable state (compiled
/// weak-pattern matcher, dictionaries, retry limits). Specs are plain values and
/// generation never mutates them.
pub struct Engine<R> {
    rng: R,
    sanitizer: PatternSanitizer,
    passphrases: PassphraseGenerator,
    guesses_per_second: f64,
}

impl<R: RandomSource> Engine<R> {
    /// Built-in dictionaries and default limits.
    pub fn new(rng: R) -> Self {
        let limits = config::Limits::default();
        Self {
            rng,
            sanitizer: PatternSanitizer::new(limits.max_shuffles),
            passphrases: PassphraseGenerator::new(Dictionaries::default(), limits),
            guesses_per_second: strength::GUESSES_PER_SECOND,
        }
    }

    /// Limits, dictionaries and guess rate taken from `config`.
    pub fn from_config(rng: R, config: &Config) -> Result<Self> {
        let dictionaries = Dictionaries::load(
            config.passphrase.word_list.as_deref(),
            config.passphrase.syllable_list.as_deref(),
        )?;
        Ok(Self {
            rng,
            sanitizer: PatternSanitizer::new(config.limits.max_shuffles),
            passphrases: PassphraseGenerator::new(dictionaries, config.limits)
                .parallel_freeform(config.strength.parallel_freeform),
            guesses_per_second: config.strength.guesses_per_second,
        })
    }

    pub fn with_dictionaries(mut self, dictionaries: Dictionaries) -> Self {
        self.passphrases.set_dictionaries(dictionaries);
        self
    }

    pub fn guesses_per_second(&self) -> f64 {
        self.guesses_per_second
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        self.passphrases.dictionaries()
    }

    pub fn password(&mut self, spec: &PasswordSpec) -> Result<Secret> {
        let value = password::generate(&mut self.rng, spec, &self.sanitizer)?;
        let entropy = spec.entropy()?;
        Ok(Secret::new(value, entropy))
    }

    pub fn passphrase(&mut self, spec: &PassphraseSpec) -> Result<Secret> {
        let value = self.passphrases.generate(&mut self.rng, spec)?;
        let entropy = self.passphrases.entropy(spec, Some(&value));
        Ok(Secret::new(value, entropy))
    }

    /// Entropy of a passphrase spec without generating one. Freeform
    /// passphrases report zero.
    pub fn passphrase_entropy(&self, spec: &PassphraseSpec) -> f64 {
        self.passphrases.entropy(spec, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::testing::seeded;
    use std::sync::Arc;

    #[test]
    fn test_engine_password() {
        let mut engine = Engine::new(seeded(1));
        let spec = PasswordSpec {
            length: 20,
            classes: CharClass::PREDEFINED.to_vec(),
            exclude: "a1r/ö".into(),
            allow_repeat: true,
            ..Default::default()
        };
        let secret = engine.password(&spec).unwrap();
        assert_eq!(secret.expose().chars().count(), 20);
        assert!((secret.entropy() - 130.15589280397393).abs() < 1e-9);
        assert_eq!(secret.rating(), strength::Rating::VeryStrong);
    }

    #[test]
    fn test_engine_passphrase_list_entropy() {
        let dict = Arc::new(Dictionary::from_entries((0..1024).map(|i| format!("w{}", i))).unwrap());
        let mut engine = Engine::new(seeded(2)).with_dictionaries(Dictionaries {
            words: Arc::clone(&dict),
            syllables: dict,
        });
        let spec = PassphraseSpec::new(3, Strategy::WordList);
        let secret = engine.passphrase(&spec).unwrap();
        assert_eq!(secret.expose().split(' ').count(), 3);
        assert!((secret.entropy() - 30.0).abs() < 1e-9);
        assert!((engine.passphrase_entropy(&spec) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_engine_freeform_entropy_uses_secret() {
        let mut engine = Engine::new(seeded(3));
        let spec = PassphraseSpec {
            words: 4,
            separator: "-".into(),
            ..Default::default()
        };
        let secret = engine.passphrase(&spec).unwrap();
        let letters = secret.expose().chars().filter(|c| *c != '-').count();
        assert!((secret.entropy() - letters as f64 * 26f64.log2()).abs() < 1e-9);
        assert_eq!(engine.passphrase_entropy(&spec), 0.0);
    }

    #[test]
    fn test_engine_from_config() {
        let mut config = Config::default();
        config.strength.guesses_per_second = 1e9;
        config.strength.parallel_freeform = true;
        let mut engine = Engine::from_config(seeded(4), &config).unwrap();
        assert_eq!(engine.guesses_per_second(), 1e9);
        assert_eq!(engine.dictionaries().words.len(), Dictionary::words().len());
        let secret = engine.passphrase(&PassphraseSpec::new(5, Strategy::Freeform)).unwrap();
        assert_eq!(secret.expose().split(' ').count(), 5);
    }

    #[test]
    fn test_engine_errors_propagate() {
        let mut engine = Engine::new(seeded(5));
        let err = engine.password(&PasswordSpec::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidLength));
    }

    #[test]
    fn test_secret_debug_redacts() {
        let secret = Secret::new("hunter2".into(), 12.5);
        let shown = format!("{:?}", secret);
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("12.5"));
    }

    #[test]
    fn test_secret_estimates() {
        let secret = Secret::new("x".into(), 40.0);
        assert_eq!(secret.keyspace(), 2f64.powi(40));
        assert_eq!(secret.seconds_to_crack(2f64.powi(20)), 2f64.powi(20));
        assert_eq!(secret.rating(), strength::Rating::Reasonable);
    }
}
