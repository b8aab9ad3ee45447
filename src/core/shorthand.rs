//! Shorthand codes for device legends
//!
//! Provides two-character aliases like `a1`, `a2` that stand in for long
//! device codes where a drawing legend has no room for the full code.
//! Aliases are handed out in call order for one processing run and are not
//! persisted.
//!
//! The sequence runs `a1..a5, b1..b5, ..., z1..z5` and then starts over at
//! `a1`. After 130 distinct codes aliases repeat; nothing detects the clash.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Highest digit before the letter advances
const MAX_DIGIT: u8 = 5;

/// Number of distinct aliases before the sequence repeats
pub const CAPACITY: usize = 26 * MAX_DIGIT as usize;

/// A letter + digit alias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShorthandCode {
    /// 0 for `a` through 25 for `z`
    letter: u8,
    /// 1 through 5
    digit: u8,
}

impl ShorthandCode {
    pub const FIRST: ShorthandCode = ShorthandCode { letter: 0, digit: 1 };

    /// The alias after this one
    pub fn next(self) -> Self {
        if self.digit == MAX_DIGIT {
            Self {
                letter: (self.letter + 1) % 26,
                digit: 1,
            }
        } else {
            Self {
                letter: self.letter,
                digit: self.digit + 1,
            }
        }
    }

    pub fn letter(&self) -> char {
        (b'a' + self.letter) as char
    }
}

impl fmt::Display for ShorthandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.digit)
    }
}

impl Serialize for ShorthandCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An alias and the long device code it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShorthandPair {
    pub short: ShorthandCode,
    pub long_code: String,
}

/// Run-scoped registry of shorthand aliases
#[derive(Debug, Default)]
pub struct ShorthandResolver {
    /// Pairs in creation order
    pairs: Vec<ShorthandPair>,
    /// Long code -> index into `pairs`
    reverse: HashMap<String, usize>,
}

impl ShorthandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a long code and return its alias.
    ///
    /// A code seen before keeps the alias it was first given. A new code gets
    /// the alias after the most recently created one.
    pub fn store(&mut self, long_code: &str) -> String {
        if let Some(&idx) = self.reverse.get(long_code) {
            return self.pairs[idx].short.to_string();
        }

        let short = self
            .pairs
            .last()
            .map(|p| p.short.next())
            .unwrap_or(ShorthandCode::FIRST);

        self.reverse.insert(long_code.to_string(), self.pairs.len());
        self.pairs.push(ShorthandPair {
            short,
            long_code: long_code.to_string(),
        });
        short.to_string()
    }

    /// Alias for a registered long code, or an empty string
    pub fn retrieve(&self, long_code: &str) -> String {
        self.get(long_code).map(|c| c.to_string()).unwrap_or_default()
    }

    pub fn get(&self, long_code: &str) -> Option<ShorthandCode> {
        self.reverse.get(long_code).map(|&idx| self.pairs[idx].short)
    }

    /// Long code for an alias such as `b3`.
    ///
    /// Once the sequence has wrapped an alias can name several codes; the
    /// most recent registration wins.
    pub fn resolve(&self, short: &str) -> Option<&str> {
        let short = short.trim().to_lowercase();
        self.pairs
            .iter()
            .rev()
            .find(|p| p.short.to_string() == short)
            .map(|p| p.long_code.as_str())
    }

    /// Pairs in creation order
    pub fn iter(&self) -> impl Iterator<Item = &ShorthandPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for ShorthandResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pair in &self.pairs {
            writeln!(f, "{}\t{}", pair.short, pair.long_code)?;
        }
        Ok(())
    }
}
