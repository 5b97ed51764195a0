use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::passphrase::Strategy;
use crate::pool::CharClass;

const DEFAULT_CONFIG_PATH: &str = "/etc/secretforge.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RngBackend {
    Os,
    Chacha,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RngConfig {
    pub backend: RngBackend,
    /// Draws served by a ChaCha20 stream before it is reseeded.
    pub reseed_after: u64,
}

impl Default for RngConfig {
    fn default() -> Self {
        Self {
            backend: RngBackend::Os,
            reseed_after: 1 << 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordDefaults {
    pub length: usize,
    pub classes: Vec<CharClass>,
    pub allow_repeat: bool,
}

impl Default for PasswordDefaults {
    fn default() -> Self {
        Self {
            length: 20,
            classes: vec![
                CharClass::Lower,
                CharClass::Upper,
                CharClass::Digit,
                CharClass::Special,
            ],
            allow_repeat: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PassphraseDefaults {
    pub words: usize,
    pub separator: String,
    pub strategy: Strategy,
    /// Replaces the built-in word list.
    pub word_list: Option<PathBuf>,
    /// Replaces the built-in syllable list.
    pub syllable_list: Option<PathBuf>,
}

impl Default for PassphraseDefaults {
    fn default() -> Self {
        Self {
            words: 6,
            separator: " ".into(),
            strategy: Strategy::Freeform,
            word_list: None,
            syllable_list: None,
        }
    }
}

/// Caps on the repair loops that have no proven termination bound.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_shuffles: u32,
    pub max_exclude_retries_per_word: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_shuffles: 10_000,
            max_exclude_retries_per_word: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    pub guesses_per_second: f64,
    /// Synthesize freeform passphrase words on worker threads.
    pub parallel_freeform: bool,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            guesses_per_second: crate::strength::GUESSES_PER_SECOND,
            parallel_freeform: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rng: RngConfig,
    pub password: PasswordDefaults,
    pub passphrase: PassphraseDefaults,
    pub limits: Limits,
    pub strength: StrengthConfig,
}

impl Config {
    /// Clamp fields to valid ranges.
    pub fn validate(&mut self) {
        self.password.length = self.password.length.clamp(1, 4096);
        self.passphrase.words = self.passphrase.words.clamp(1, 1024);
        self.limits.max_shuffles = self.limits.max_shuffles.clamp(1, 1_000_000);
        self.limits.max_exclude_retries_per_word =
            self.limits.max_exclude_retries_per_word.clamp(1, 10_000);
        if !self.strength.guesses_per_second.is_finite() || self.strength.guesses_per_second < 1.0 {
            self.strength.guesses_per_second = crate::strength::GUESSES_PER_SECOND;
        }
        if self.password.classes.is_empty() {
            self.password.classes = PasswordDefaults::default().classes;
        }
    }
}

/// Load configuration from a TOML file.
///
/// - If `explicit_path` is `Some` and the file is missing, returns an error.
/// - If `explicit_path` is `None`, tries `/etc/secretforge.toml`; if missing, returns defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, Error> {
    let path = match explicit_path {
        Some(p) => {
            if !p.exists() {
                return Err(Error::InvalidArgs(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok(Config::default());
            }
            default.to_path_buf()
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        Error::InvalidArgs(format!("failed to read config {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| {
        Error::InvalidArgs(format!("failed to parse config {}: {}", path.display(), e))
    })?;

    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}
