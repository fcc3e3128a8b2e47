use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple generator of S_n.
/// Generator(i) for i >= 1 swaps positions i-1 and i (0-based);
/// Generator(0) is the identity and acts as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generator(pub usize);

impl Generator {
    /// The identity generator s_0.
    pub const IDENTITY: Generator = Generator(0);

    /// Returns the index of the generator (0 for the identity).
    pub fn index(&self) -> usize {
        self.0
    }

    /// Returns true if this is the identity generator.
    pub fn is_identity(&self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for Generator {
    fn from(index: usize) -> Self {
        Generator(index)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A word is a sequence of generators, read as the product s_{i_1} ... s_{i_d}.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word {
    generators: Vec<Generator>,
}

impl Word {
    /// Creates a new empty word.
    pub fn new() -> Self {
        Word {
            generators: Vec::new(),
        }
    }

    /// Creates a word from a vector of generators.
    pub fn from_generators(generators: Vec<Generator>) -> Self {
        Word { generators }
    }

    /// Appends a generator to the word.
    pub fn push(&mut self, gen: Generator) {
        self.generators.push(gen);
    }

    /// Extends the word with the generators of another word.
    pub fn extend(&mut self, other: &Word) {
        self.generators.extend_from_slice(&other.generators);
    }

    /// Returns the concatenation `self · other` as a new word.
    pub fn concat(&self, other: &Word) -> Word {
        let mut word = self.clone();
        word.extend(other);
        word
    }

    /// Returns an iterator over the generators.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Generator> + ExactSizeIterator {
        self.generators.iter()
    }

    /// Returns the generators as a slice.
    pub fn as_slice(&self) -> &[Generator] {
        &self.generators
    }

    /// Returns the number of letters, identity generators included.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns true if the word has no letters.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Number of non-identity letters.
    ///
    /// This is a property of the word, not of the element it represents:
    /// `[1, 0, 1]` has expression length 2 although it evaluates to the identity.
    pub fn expression_length(&self) -> usize {
        self.generators.iter().filter(|g| !g.is_identity()).count()
    }

    /// Smallest n for which the word lives in S_n: one more than the largest
    /// generator, or 1 for the empty word.
    pub fn min_rank(&self) -> usize {
        self.generators
            .iter()
            .map(|g| g.index() + 1)
            .max()
            .unwrap_or(1)
    }
}

impl Default for Word {
    fn default() -> Self {
        Word::new()
    }
}

impl From<Vec<Generator>> for Word {
    fn from(generators: Vec<Generator>) -> Self {
        Word::from_generators(generators)
    }
}

impl From<Vec<usize>> for Word {
    fn from(indices: Vec<usize>) -> Self {
        Word::from_generators(indices.into_iter().map(Generator).collect())
    }
}

impl FromIterator<Generator> for Word {
    fn from_iter<I: IntoIterator<Item = Generator>>(iter: I) -> Self {
        Word::from_generators(iter.into_iter().collect())
    }
}

/// Comma-joined form, e.g. `1,0,2`. The empty word renders as the empty string.
impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, gen) in self.generators.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", gen)?;
        }
        Ok(())
    }
}

/// An element of S_n in one-line notation.
///
/// `symbols()[p]` is the base symbol sitting at position `p` after the word
/// has acted on the base arrangement `0, 1, ..., n-1`. Symbols are plain
/// indices; the letter form `abcd...` is only a projection used for display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u32>", try_from = "Vec<u32>")]
pub struct Element {
    arrangement: Vec<u32>,
}

impl Element {
    /// The base arrangement of S_n.
    pub fn identity(n: usize) -> Self {
        Element {
            arrangement: (0..n as u32).collect(),
        }
    }

    /// The longest element of S_n: the base arrangement reversed.
    pub fn longest(n: usize) -> Self {
        Element {
            arrangement: (0..n as u32).rev().collect(),
        }
    }

    /// Builds an element from an arrangement, checking that it is a
    /// permutation of `0..len`.
    pub fn from_symbols(arrangement: Vec<u32>) -> Option<Self> {
        let mut seen = vec![false; arrangement.len()];
        for &s in &arrangement {
            let slot = seen.get_mut(s as usize)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Element { arrangement })
    }

    /// Parses the letter form, e.g. `"bacd"`.
    pub fn from_key(key: &str) -> Option<Self> {
        let symbols = key
            .chars()
            .map(|c| match c {
                'a'..='z' => Some(c as u32 - 'a' as u32),
                _ => None,
            })
            .collect::<Option<Vec<u32>>>()?;
        Element::from_symbols(symbols)
    }

    /// The n of the S_n this element belongs to.
    pub fn rank(&self) -> usize {
        self.arrangement.len()
    }

    pub fn symbols(&self) -> &[u32] {
        &self.arrangement
    }

    pub fn is_identity(&self) -> bool {
        self.arrangement
            .iter()
            .enumerate()
            .all(|(p, &s)| p as u32 == s)
    }

    /// Swaps the symbols at positions `i` and `j`.
    pub(crate) fn swap_positions(&mut self, i: usize, j: usize) {
        self.arrangement.swap(i, j);
    }

    /// Exchanges the symbols `a` and `b` wherever they sit.
    pub(crate) fn swap_symbols(&mut self, a: u32, b: u32) {
        for s in self.arrangement.iter_mut() {
            if *s == a {
                *s = b;
            } else if *s == b {
                *s = a;
            }
        }
    }
}

impl TryFrom<Vec<u32>> for Element {
    type Error = String;

    fn try_from(arrangement: Vec<u32>) -> Result<Self, Self::Error> {
        let rank = arrangement.len();
        Element::from_symbols(arrangement)
            .ok_or_else(|| format!("not a permutation of 0..{}", rank))
    }
}

impl From<Element> for Vec<u32> {
    fn from(element: Element) -> Self {
        element.arrangement
    }
}

/// Canonical key: letters for n <= 26 (`bacd`), otherwise `[1,0,2,...]`.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arrangement.len() <= 26 {
            for &s in &self.arrangement {
                let letter = ('a' as u32)
                    .checked_add(s)
                    .and_then(char::from_u32)
                    .filter(char::is_ascii_lowercase);
                match letter {
                    Some(letter) => write!(f, "{}", letter)?,
                    None => write!(f, "?")?,
                }
            }
            Ok(())
        } else {
            f.write_str("[")?;
            for (i, s) in self.arrangement.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", s)?;
            }
            f.write_str("]")
        }
    }
}
