use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::pool::WorkingPool;
use crate::random::{self, RandomSource};

/// Sequences, keyboard walks and common words an attacker tries first.
pub const WEAK_PATTERNS: &[&str] = &[
    "abc", "123", "qwerty", "asdf", "zxcv", "1qaz", "zaq1", "qazwsx", "pass", "login", "admin",
    "master", "!@#$", "!234", "!Q@W",
];

static COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = WEAK_PATTERNS
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){}", alternation)).expect("weak pattern catalogue compiles")
});

/// Post-processing pass that removes boundary whitespace and weak patterns
/// while keeping the target length.
///
/// Cloning is cheap: the compiled matcher is shared process-wide.
#[derive(Debug, Clone)]
pub struct PatternSanitizer {
    matcher: Regex,
    max_shuffles: u32,
}

impl Default for PatternSanitizer {
    fn default() -> Self {
        Self::new(crate::config::Limits::default().max_shuffles)
    }
}

impl PatternSanitizer {
    pub fn new(max_shuffles: u32) -> Self {
        Self {
            matcher: COMPILED.clone(),
            max_shuffles: max_shuffles.max(1),
        }
    }

    /// Sanitizer over a caller-supplied catalogue of literal substrings.
    pub fn with_catalogue(patterns: &[&str], max_shuffles: u32) -> Result<Self> {
        let alternation = patterns
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = Regex::new(&format!("(?i){}", alternation))
            .map_err(|e| Error::InvalidArgs(format!("bad pattern catalogue: {}", e)))?;
        Ok(Self {
            matcher,
            max_shuffles: max_shuffles.max(1),
        })
    }

    pub fn is_weak(&self, secret: &str) -> bool {
        self.matcher.is_match(secret)
    }

    /// A candidate is clean when nothing in the catalogue matches and
    /// neither end is whitespace.
    pub fn is_clean(&self, secret: &[char]) -> bool {
        let boundary_ok = match (secret.first(), secret.last()) {
            (Some(first), Some(last)) => !first.is_whitespace() && !last.is_whitespace(),
            _ => true,
        };
        boundary_ok && !self.is_weak(&secret.iter().collect::<String>())
    }

    /// Trim, backfill to `target_len`, then reshuffle until clean.
    ///
    /// `consume` mirrors the repetition policy: when set, every character
    /// drawn from `pool` is removed from it.
    pub fn sanitize<R>(
        &self,
        rng: &mut R,
        secret: &mut Vec<char>,
        pool: &mut WorkingPool,
        target_len: usize,
        consume: bool,
    ) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        let trimmed = trim_whitespace(secret);
        if !trimmed.is_empty() {
            log::trace!("trimmed {} boundary whitespace characters", trimmed.len());
        }
        backfill(rng, secret, pool, target_len, consume, &trimmed)?;

        let mut shuffles = 0u32;
        while !self.is_clean(secret) {
            if shuffles >= self.max_shuffles {
                return Err(Error::RetriesExhausted("weak-pattern reshuffle"));
            }
            random::shuffle(rng, secret)?;
            shuffles += 1;
        }
        if shuffles > 0 {
            log::debug!("secret reshuffled {} times to clear weak patterns", shuffles);
        }
        Ok(())
    }
}

/// Remove leading and trailing whitespace, returning what was removed.
fn trim_whitespace(secret: &mut Vec<char>) -> Vec<char> {
    let mut removed = Vec::new();
    while secret.last().is_some_and(|c| c.is_whitespace()) {
        removed.extend(secret.pop());
    }
    let lead = secret.iter().take_while(|c| c.is_whitespace()).count();
    removed.extend(secret.drain(..lead));
    removed
}

/// Restore `target_len` with visible pool characters at random positions.
///
/// With a consuming pool that has run dry the trimmed whitespace goes back
/// in, strictly between two visible characters.
fn backfill<R>(
    rng: &mut R,
    secret: &mut Vec<char>,
    pool: &mut WorkingPool,
    target_len: usize,
    consume: bool,
    trimmed: &[char],
) -> Result<()>
where
    R: RandomSource + ?Sized,
{
    let mut spare = trimmed.iter().copied();
    while secret.len() < target_len {
        let candidates = pool.visible();
        if !candidates.is_empty() {
            let c = candidates[rng.below(candidates.len())?];
            if consume {
                pool.remove(c);
            }
            random::insert_random(rng, secret, c)?;
            continue;
        }

        match spare.next() {
            Some(ws) if secret.len() >= 2 => {
                let at = 1 + rng.below(secret.len() - 1)?;
                secret.insert(at, ws);
            }
            _ => {
                return Err(Error::PoolExhausted {
                    length: target_len,
                    available: secret.len(),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{CharClass, Pool};
    use crate::random::testing::seeded;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_catalogue_is_case_insensitive() {
        let s = PatternSanitizer::default();
        assert!(s.is_weak("xxQWERTYxx"));
        assert!(s.is_weak("my-PassWord"));
        assert!(s.is_weak("ABC"));
        assert!(s.is_weak("a!@#$b"));
        assert!(s.is_weak("!q@w"));
        assert!(!s.is_weak("ab1c"));
        assert!(!s.is_weak("Tr0ub4dor&3"));
    }

    #[test]
    fn test_dollar_is_literal() {
        let s = PatternSanitizer::default();
        assert!(!s.is_weak("!@#"));
        assert!(s.is_weak("!@#$"));
    }

    #[test]
    fn test_is_clean_checks_boundaries() {
        let s = PatternSanitizer::default();
        assert!(s.is_clean(&chars("x y")));
        assert!(!s.is_clean(&chars(" xy")));
        assert!(!s.is_clean(&chars("xy ")));
        assert!(s.is_clean(&[]));
    }

    #[test]
    fn test_trim_whitespace() {
        let mut secret = chars("  ab c ");
        let removed = trim_whitespace(&mut secret);
        assert_eq!(secret, chars("ab c"));
        assert_eq!(removed.len(), 3);
    }

    #[test]
    fn test_sanitize_restores_length() {
        let pool = Pool::build(&[CharClass::Lower, CharClass::Space], "").unwrap();
        let mut work = pool.working_copy();
        let mut rng = seeded(7);
        let mut secret = chars(" xyz ");
        PatternSanitizer::default()
            .sanitize(&mut rng, &mut secret, &mut work, 5, false)
            .unwrap();
        assert_eq!(secret.len(), 5);
        assert!(!secret[0].is_whitespace());
        assert!(!secret[4].is_whitespace());
    }

    #[test]
    fn test_sanitize_consumes_backfill() {
        let pool = Pool::build(&[CharClass::Digit, CharClass::Space], "").unwrap();
        let mut work = pool.working_copy();
        work.remove(' ');
        let mut rng = seeded(8);
        let mut secret = chars("90 ");
        work.remove('9');
        work.remove('0');
        PatternSanitizer::default()
            .sanitize(&mut rng, &mut secret, &mut work, 3, true)
            .unwrap();
        assert_eq!(secret.len(), 3);
        assert_eq!(work.len(), 7);
        let mut unique = secret.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_sanitize_reinserts_whitespace_when_pool_is_dry() {
        let pool = Pool::build(&[CharClass::Custom("xy ".into())], "").unwrap();
        let mut work = pool.working_copy();
        for c in ['x', 'y', ' '] {
            work.remove(c);
        }
        let mut rng = seeded(9);
        let mut secret = chars("xy ");
        PatternSanitizer::default()
            .sanitize(&mut rng, &mut secret, &mut work, 3, true)
            .unwrap();
        assert_eq!(secret.len(), 3);
        assert_eq!(secret[1], ' ');
    }

    #[test]
    fn test_sanitize_exhausted_pool_errors() {
        let pool = Pool::build(&[CharClass::Space], "").unwrap();
        let mut work = pool.working_copy();
        work.remove(' ');
        let mut rng = seeded(10);
        let mut secret = chars(" ");
        let err = PatternSanitizer::default()
            .sanitize(&mut rng, &mut secret, &mut work, 1, true)
            .unwrap_err();
        assert!(matches!(err, Error::PoolExhausted { .. }));
    }

    #[test]
    fn test_sanitize_breaks_weak_patterns() {
        let pool = Pool::build(&[CharClass::Lower], "").unwrap();
        let mut rng = seeded(11);
        for _ in 0..50 {
            let mut work = pool.working_copy();
            let mut secret = chars("zzadminzz");
            let s = PatternSanitizer::default();
            s.sanitize(&mut rng, &mut secret, &mut work, 9, false).unwrap();
            assert!(s.is_clean(&secret));
            assert_eq!(secret.len(), 9);
        }
    }

    #[test]
    fn test_unfixable_secret_hits_retry_cap() {
        let s = PatternSanitizer::with_catalogue(&["a"], 25).unwrap();
        let pool = Pool::build(&[CharClass::Custom("a".into())], "").unwrap();
        let mut work = pool.working_copy();
        let mut rng = seeded(12);
        let mut secret = chars("aaaa");
        let err = s
            .sanitize(&mut rng, &mut secret, &mut work, 4, false)
            .unwrap_err();
        assert!(matches!(err, Error::RetriesExhausted(_)));
    }

    #[test]
    fn test_custom_catalogue_rejects_bad_regex_input_safely() {
        // entries are literals, so regex metacharacters are matched verbatim
        let s = PatternSanitizer::with_catalogue(&["a.c"], 1).unwrap();
        assert!(s.is_weak("xA.Cx"));
        assert!(!s.is_weak("abc"));
    }
}
