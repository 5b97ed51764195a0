use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SPACE: &str = " ";
pub const SPECIAL: &str = "&$%@#|/\\=\"*~^`'.?!,;:-+_(){}[]<>";

/// A named set of characters a password may draw from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Space,
    Special,
    Custom(String),
}

impl CharClass {
    /// The five predefined classes, in canonical order.
    pub const PREDEFINED: [CharClass; 5] = [
        CharClass::Lower,
        CharClass::Upper,
        CharClass::Digit,
        CharClass::Space,
        CharClass::Special,
    ];

    pub fn chars(&self) -> &str {
        match self {
            CharClass::Lower => LOWERCASE,
            CharClass::Upper => UPPERCASE,
            CharClass::Digit => DIGITS,
            CharClass::Space => SPACE,
            CharClass::Special => SPECIAL,
            CharClass::Custom(s) => s,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharClass::Lower => "lowercase",
            CharClass::Upper => "uppercase",
            CharClass::Digit => "digit",
            CharClass::Space => "space",
            CharClass::Special => "special",
            CharClass::Custom(_) => "custom",
        }
    }

    /// Parse a class name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<CharClass> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lower" | "lowercase" => Some(CharClass::Lower),
            "upper" | "uppercase" => Some(CharClass::Upper),
            "digit" | "digits" => Some(CharClass::Digit),
            "space" => Some(CharClass::Space),
            "special" => Some(CharClass::Special),
            _ => None,
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Drop classes whose character string was already seen, keeping first
/// occurrence order. A custom class spelling out a predefined one is the
/// same class.
pub fn dedup_classes(classes: &[CharClass]) -> Vec<&CharClass> {
    let mut unique: Vec<&CharClass> = Vec::with_capacity(classes.len());
    for class in classes {
        if !unique.iter().any(|u| u.chars() == class.chars()) {
            unique.push(class);
        }
    }
    unique
}

/// Deduplicated, exclusion-filtered set of drawable characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    chars: Vec<char>,
}

impl Pool {
    /// Union of `classes` minus every character in `exclude`.
    pub fn build(classes: &[CharClass], exclude: &str) -> Result<Pool> {
        let classes = dedup_classes(classes);
        check_classes(&classes, exclude)?;

        let mut chars: Vec<char> = Vec::new();
        for class in &classes {
            for c in class.chars().chars() {
                if !exclude.contains(c) && !chars.contains(&c) {
                    chars.push(c);
                }
            }
        }
        Ok(Pool { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }

    /// Owned copy that one generation call may consume.
    pub fn working_copy(&self) -> WorkingPool {
        WorkingPool {
            chars: self.chars.clone(),
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Every class must be non-empty and keep at least one character after
/// exclusion.
fn check_classes(classes: &[&CharClass], exclude: &str) -> Result<()> {
    for class in classes {
        let chars = class.chars();
        if chars.is_empty() {
            return Err(Error::EmptyClass);
        }
        if chars.chars().all(|c| exclude.contains(c)) {
            return Err(Error::ClassFullyExcluded(class.name().into()));
        }
    }
    Ok(())
}

/// Pool characters still available to one generation call.
///
/// Removal is swap-remove, so order is not meaningful.
#[derive(Debug)]
pub struct WorkingPool {
    chars: Vec<char>,
}

impl WorkingPool {
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, index: usize) -> char {
        self.chars[index]
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Remove and return the character at `index`.
    pub fn take(&mut self, index: usize) -> char {
        self.chars.swap_remove(index)
    }

    /// Remove `c` if present.
    pub fn remove(&mut self, c: char) -> bool {
        match self.chars.iter().position(|&p| p == c) {
            Some(i) => {
                self.chars.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Characters of `class` still available, in class order.
    pub fn available_from(&self, class: &CharClass) -> Vec<char> {
        class.chars().chars().filter(|&c| self.contains(c)).collect()
    }

    /// Available characters that are not whitespace.
    pub fn visible(&self) -> Vec<char> {
        self.chars.iter().copied().filter(|c| !c.is_whitespace()).collect()
    }
}

impl Drop for WorkingPool {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.chars);
    }
}
