use crate::error::{Error, Result};
use crate::patterns::PatternSanitizer;
use crate::pool::{dedup_classes, CharClass, Pool, WorkingPool};
use crate::random::{self, RandomSource};

/// Parameters for one password.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordSpec {
    /// Length in characters, not bytes.
    pub length: usize,
    pub classes: Vec<CharClass>,
    /// Characters that must appear in the result.
    pub include: String,
    /// Characters that must not appear in the result.
    pub exclude: String,
    pub allow_repeat: bool,
}

impl PasswordSpec {
    pub fn new(length: usize, classes: Vec<CharClass>) -> Self {
        Self {
            length,
            classes,
            ..Default::default()
        }
    }

    /// Check everything that does not need the pool.
    pub fn validate(&self) -> Result<()> {
        if self.length < 1 {
            return Err(Error::InvalidLength);
        }
        if self.classes.is_empty() {
            return Err(Error::NoClassesSpecified);
        }
        for c in self.include.chars() {
            if self.exclude.contains(c) {
                return Err(Error::IncludeExcludeConflict(c.to_string()));
            }
            if !c.is_ascii() || c.is_ascii_control() {
                return Err(Error::InvalidIncludeCharacter(c));
            }
        }
        let include = self.include.chars().count();
        if include > self.length {
            return Err(Error::IncludeExceedsLength {
                include,
                length: self.length,
            });
        }
        Ok(())
    }

    /// Theoretical strength in bits, independent of any generated value.
    pub fn entropy(&self) -> Result<f64> {
        crate::strength::password(self)
    }
}

/// Generate a password for `spec`.
pub fn generate<R>(rng: &mut R, spec: &PasswordSpec, sanitizer: &PatternSanitizer) -> Result<String>
where
    R: RandomSource + ?Sized,
{
    spec.validate()?;
    let pool = Pool::build(&spec.classes, &spec.exclude)?;
    let include: Vec<char> = spec.include.chars().collect();
    let consume = !spec.allow_repeat;

    let mut work = pool.working_copy();
    if consume {
        for &c in &include {
            work.remove(c);
        }
        if spec.length > work.len() + include.len() {
            return Err(Error::PoolExhausted {
                length: spec.length,
                available: work.len() + include.len(),
            });
        }
    }

    log::debug!(
        "password: length {}, pool of {} characters, {} included, repeat {}",
        spec.length,
        pool.len(),
        include.len(),
        spec.allow_repeat
    );

    let body_len = spec.length - include.len();
    let mut secret: Vec<char> = Vec::with_capacity(spec.length);

    // one character per class, as long as that fits beside the included ones
    let classes = dedup_classes(&spec.classes);
    if spec.length > classes.len() && body_len >= classes.len() {
        for class in classes {
            let available = work.available_from(class);
            if available.is_empty() {
                log::trace!("no {} characters left for coverage", class);
                continue;
            }
            let c = available[rng.below(available.len())?];
            if consume {
                work.remove(c);
            }
            random::insert_random(rng, &mut secret, c)?;
        }
    }

    while secret.len() < body_len {
        let c = draw(rng, &mut work, consume)?;
        random::insert_random(rng, &mut secret, c)?;
    }

    for c in include {
        random::insert_random(rng, &mut secret, c)?;
    }

    sanitizer.sanitize(rng, &mut secret, &mut work, spec.length, consume)?;

    let password: String = secret.iter().collect();
    zeroize::Zeroize::zeroize(&mut secret);
    Ok(password)
}

fn draw<R>(rng: &mut R, work: &mut WorkingPool, consume: bool) -> Result<char>
where
    R: RandomSource + ?Sized,
{
    let i = rng.below(work.len())?;
    Ok(if consume { work.take(i) } else { work.get(i) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{DIGITS, LOWERCASE, SPECIAL, UPPERCASE};
    use crate::random::testing::{seeded, Scripted};

    fn gen(spec: &PasswordSpec, seed: u8) -> Result<String> {
        generate(&mut seeded(seed), spec, &PatternSanitizer::default())
    }

    fn all_classes() -> Vec<CharClass> {
        CharClass::PREDEFINED.to_vec()
    }

    #[test]
    fn test_length_in_characters() {
        let spec = PasswordSpec {
            length: 15,
            classes: vec![CharClass::Custom("äöüßé".into())],
            allow_repeat: true,
            ..Default::default()
        };
        let p = gen(&spec, 1).unwrap();
        assert_eq!(p.chars().count(), 15);
        assert!(p.len() > 15);
    }

    #[test]
    fn test_include_and_exclude_honoured() {
        let spec = PasswordSpec {
            length: 20,
            classes: all_classes(),
            include: "=n_.".into(),
            exclude: "a1r/ö".into(),
            allow_repeat: true,
        };
        let mut rng = seeded(2);
        let sanitizer = PatternSanitizer::default();
        for _ in 0..100 {
            let p = generate(&mut rng, &spec, &sanitizer).unwrap();
            assert_eq!(p.chars().count(), 20);
            for c in spec.include.chars() {
                assert!(p.contains(c), "{:?} missing {:?}", p, c);
            }
            for c in spec.exclude.chars() {
                assert!(!p.contains(c), "{:?} has excluded {:?}", p, c);
            }
        }
    }

    #[test]
    fn test_no_repeat_gives_distinct_characters() {
        let spec = PasswordSpec {
            length: 60,
            classes: vec![CharClass::Lower, CharClass::Upper, CharClass::Digit],
            ..Default::default()
        };
        let mut rng = seeded(3);
        let sanitizer = PatternSanitizer::default();
        for _ in 0..50 {
            let p = generate(&mut rng, &spec, &sanitizer).unwrap();
            let mut chars: Vec<char> = p.chars().collect();
            chars.sort();
            chars.dedup();
            assert_eq!(chars.len(), 60);
        }
    }

    #[test]
    fn test_no_repeat_uses_whole_pool() {
        let spec = PasswordSpec::new(10, vec![CharClass::Digit]);
        let p = gen(&spec, 4).unwrap();
        let mut chars: Vec<char> = p.chars().collect();
        chars.sort();
        assert_eq!(chars.into_iter().collect::<String>(), DIGITS);
        assert!(!p.contains("123"));
    }

    #[test]
    fn test_no_repeat_counts_include_towards_capacity() {
        let mut spec = PasswordSpec::new(10, vec![CharClass::Digit]);
        spec.include = "12".into();
        let p = gen(&spec, 5).unwrap();
        assert_eq!(p.matches('1').count(), 1);
        assert_eq!(p.matches('2').count(), 1);

        spec.length = 11;
        assert!(matches!(
            gen(&spec, 5),
            Err(Error::PoolExhausted { length: 11, .. })
        ));
    }

    #[test]
    fn test_every_class_covered() {
        let spec = PasswordSpec {
            length: 8,
            classes: vec![
                CharClass::Lower,
                CharClass::Upper,
                CharClass::Digit,
                CharClass::Special,
            ],
            allow_repeat: true,
            ..Default::default()
        };
        let mut rng = seeded(6);
        let sanitizer = PatternSanitizer::default();
        for _ in 0..200 {
            let p = generate(&mut rng, &spec, &sanitizer).unwrap();
            for set in [LOWERCASE, UPPERCASE, DIGITS, SPECIAL] {
                assert!(p.chars().any(|c| set.contains(c)), "{:?} lacks {:?}", p, set);
            }
        }
    }

    #[test]
    fn test_every_class_covered_beside_include() {
        let spec = PasswordSpec {
            length: 4,
            classes: vec![CharClass::Lower, CharClass::Digit, CharClass::Special],
            include: "X".into(),
            allow_repeat: true,
            ..Default::default()
        };
        let mut rng = seeded(42);
        let sanitizer = PatternSanitizer::default();
        for _ in 0..1000 {
            let p = generate(&mut rng, &spec, &sanitizer).unwrap();
            assert_eq!(p.chars().count(), 4);
            assert!(p.contains('X'));
            for set in [LOWERCASE, DIGITS, SPECIAL] {
                assert!(p.chars().any(|c| set.contains(c)), "{:?} lacks {:?}", p, set);
            }
        }
    }

    #[test]
    fn test_include_filling_body_skips_coverage() {
        let spec = PasswordSpec {
            length: 4,
            classes: vec![CharClass::Lower, CharClass::Digit, CharClass::Special],
            include: "XY".into(),
            allow_repeat: true,
            ..Default::default()
        };
        let p = gen(&spec, 43).unwrap();
        assert_eq!(p.chars().count(), 4);
        assert!(p.contains('X') && p.contains('Y'));
    }

    #[test]
    fn test_short_length_skips_coverage() {
        let spec = PasswordSpec {
            length: 2,
            classes: all_classes(),
            allow_repeat: true,
            ..Default::default()
        };
        let p = gen(&spec, 7).unwrap();
        assert_eq!(p.chars().count(), 2);
    }

    #[test]
    fn test_space_never_at_boundaries() {
        let spec = PasswordSpec {
            length: 6,
            classes: vec![CharClass::Lower, CharClass::Space],
            allow_repeat: true,
            ..Default::default()
        };
        let mut rng = seeded(8);
        let sanitizer = PatternSanitizer::default();
        for _ in 0..300 {
            let p = generate(&mut rng, &spec, &sanitizer).unwrap();
            assert_eq!(p.chars().count(), 6);
            assert_eq!(p.trim(), p);
        }
    }

    #[test]
    fn test_result_is_never_weak() {
        let spec = PasswordSpec {
            length: 12,
            classes: vec![CharClass::Digit],
            allow_repeat: true,
            ..Default::default()
        };
        let mut rng = seeded(9);
        let sanitizer = PatternSanitizer::default();
        for _ in 0..300 {
            let p = generate(&mut rng, &spec, &sanitizer).unwrap();
            assert!(!sanitizer.is_weak(&p), "{:?}", p);
        }
    }

    #[test]
    fn test_include_only_secret() {
        let spec = PasswordSpec {
            length: 3,
            classes: vec![CharClass::Lower],
            include: "xyz".into(),
            ..Default::default()
        };
        let p = gen(&spec, 10).unwrap();
        let mut chars: Vec<char> = p.chars().collect();
        chars.sort();
        assert_eq!(chars, vec!['x', 'y', 'z']);
    }

    #[test]
    fn test_invalid_length() {
        let spec = PasswordSpec::new(0, all_classes());
        assert!(matches!(gen(&spec, 0), Err(Error::InvalidLength)));
    }

    #[test]
    fn test_no_classes() {
        let spec = PasswordSpec::new(10, Vec::new());
        assert!(matches!(gen(&spec, 0), Err(Error::NoClassesSpecified)));
    }

    #[test]
    fn test_empty_custom_class() {
        let spec = PasswordSpec::new(10, vec![CharClass::Lower, CharClass::Custom(String::new())]);
        assert!(matches!(gen(&spec, 0), Err(Error::EmptyClass)));
    }

    #[test]
    fn test_include_exclude_conflict() {
        let spec = PasswordSpec {
            length: 10,
            classes: all_classes(),
            include: "ab".into(),
            exclude: "b".into(),
            ..Default::default()
        };
        match gen(&spec, 0) {
            Err(Error::IncludeExcludeConflict(c)) => assert_eq!(c, "b"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_include_exceeds_length() {
        let spec = PasswordSpec {
            length: 2,
            classes: all_classes(),
            include: "abc".into(),
            ..Default::default()
        };
        assert!(matches!(
            gen(&spec, 0),
            Err(Error::IncludeExceedsLength {
                include: 3,
                length: 2
            })
        ));
    }

    #[test]
    fn test_invalid_include_characters() {
        for bad in ["é", "a\n", "\u{7f}"] {
            let spec = PasswordSpec {
                length: 10,
                classes: all_classes(),
                include: bad.into(),
                ..Default::default()
            };
            assert!(
                matches!(gen(&spec, 0), Err(Error::InvalidIncludeCharacter(_))),
                "{:?} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_class_fully_excluded() {
        let spec = PasswordSpec {
            length: 10,
            classes: vec![CharClass::Lower, CharClass::Digit],
            exclude: DIGITS.into(),
            ..Default::default()
        };
        assert!(matches!(gen(&spec, 0), Err(Error::ClassFullyExcluded(_))));
    }

    #[test]
    fn test_pool_too_small_without_repeat() {
        let spec = PasswordSpec::new(27, vec![CharClass::Lower]);
        match gen(&spec, 0) {
            Err(Error::PoolExhausted { length, available }) => {
                assert_eq!(length, 27);
                assert_eq!(available, 26);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rng_failure_is_reported() {
        let spec = PasswordSpec::new(8, vec![CharClass::Lower]);
        let err = generate(&mut Scripted::new(&[]), &spec, &PatternSanitizer::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoEntropy(_)));
    }

    #[test]
    fn test_entropy_method() {
        let spec = PasswordSpec::new(10, vec![CharClass::Digit]);
        let e = spec.entropy().unwrap();
        assert!((e - 10.0 * 10f64.log2()).abs() < 1e-9);
    }
}
