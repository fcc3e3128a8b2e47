use crate::cache::ElementCache;
use crate::demazure::fold;
use crate::error::{CoxeterError, Result};
use crate::evaluate::{evaluate, identify_n};
use crate::store::ElementStore;
use crate::types::{Element, Generator, Word};
use serde::Serialize;

/// Longest word whose masks still fit in a `u64`.
pub const MAX_SUBWORD_LEN: usize = 63;

/// Masks `word`: position j keeps its letter if bit j of `mask` is set and
/// becomes the identity generator otherwise. The length is unchanged.
///
/// # Example
/// ```
/// use demazure_engine::{subword, Word};
///
/// let masked = subword(&Word::from(vec![1, 1, 1]), 3).unwrap();
/// assert_eq!(masked, Word::from(vec![1, 1, 0]));
/// ```
pub fn subword(word: &Word, mask: u64) -> Result<Word> {
    check_len(word)?;
    Ok(word
        .iter()
        .enumerate()
        .map(|(j, gen)| {
            if mask & (1u64 << j) != 0 {
                *gen
            } else {
                Generator::IDENTITY
            }
        })
        .collect())
}

fn check_len(word: &Word) -> Result<()> {
    if word.len() > MAX_SUBWORD_LEN {
        return Err(CoxeterError::WordTooLong { len: word.len() });
    }
    Ok(())
}

/// One subword together with the Demazure product it folds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubwordRow {
    pub mask: u64,
    pub subword: Word,
    /// Reduced word of the Demazure product of `subword`.
    pub product: Word,
    /// Element named by `product`.
    pub element: Element,
}

/// Lazily walks all 2^d subwords of a word, in ascending mask order.
#[derive(Debug)]
pub struct Subwords<'c, S: ElementStore> {
    cache: &'c ElementCache<S>,
    word: Word,
    n: usize,
    next: u64,
    end: u64,
}

impl<S: ElementStore> Subwords<'_, S> {
    /// Number of rows in the whole table, i.e. 2^d.
    pub fn total(&self) -> u64 {
        self.end
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn rank(&self) -> usize {
        self.n
    }

    fn row(&self, mask: u64) -> Result<SubwordRow> {
        let masked = subword(&self.word, mask)?;
        let product = fold(self.cache, &masked, self.n)?;
        Ok(SubwordRow {
            mask,
            subword: masked,
            product: product.word,
            element: product.element,
        })
    }
}

impl<S: ElementStore> Iterator for Subwords<'_, S> {
    type Item = Result<SubwordRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let mask = self.next;
        self.next += 1;
        Some(self.row(mask))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.end - self.next) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Enumerates every subword of `word` with its Demazure product.
///
/// Rows are produced on demand; nothing is deduplicated, so several masks
/// may reach the same element. Every letter is range-checked first, then
/// the cache for `n` is built if needed.
///
/// # Errors
/// `WordTooLong` if the word has 64 letters or more.
pub fn enumerate_subwords<'c, S: ElementStore>(
    cache: &'c mut ElementCache<S>,
    word: &Word,
    n: Option<usize>,
) -> Result<Subwords<'c, S>> {
    check_len(word)?;
    let n = n.unwrap_or_else(|| identify_n(word));
    cache.check_rank(n)?;
    evaluate(word, Some(n))?;
    cache.ensure_built(n)?;
    Ok(Subwords {
        cache: &*cache,
        word: word.clone(),
        n,
        next: 0,
        end: 1u64 << word.len(),
    })
}
