use crate::cache::ElementCache;
use crate::error::Result;
use crate::evaluate::{evaluate, identify_n};
use crate::hecke::{HeckeState, IncrementalUpdate};
use crate::store::ElementStore;
use crate::types::{Element, Word};
use serde::Serialize;

/// Result of a Demazure product: a reduced word and the element it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemazureProduct {
    pub word: Word,
    pub element: Element,
}

/// Computes the Demazure (0-Hecke) product of the letters of `word`.
///
/// The product of an element w and a generator s is w·s if l(w·s) > l(w),
/// and w otherwise; the product of a whole word is the unique associative
/// extension of this rule. The returned word is a reduced word for the
/// product, the empty word standing for the identity.
///
/// Builds the cache for `n` on first use.
///
/// # Arguments
/// * `cache` - Element cache providing Coxeter lengths
/// * `word` - The word to fold
/// * `n` - Ambient size; defaults to `identify_n(word)`
///
/// # Example
/// ```
/// use demazure_engine::{demazure_product, ElementCache, Word};
///
/// let mut cache = ElementCache::in_memory();
/// let product = demazure_product(&mut cache, &Word::from(vec![1, 2, 1, 2]), None).unwrap();
/// assert_eq!(product.word, Word::from(vec![1, 2, 1]));
/// assert_eq!(product.element.to_string(), "cba");
/// ```
pub fn demazure_product<S: ElementStore>(
    cache: &mut ElementCache<S>,
    word: &Word,
    n: Option<usize>,
) -> Result<DemazureProduct> {
    let n = n.unwrap_or_else(|| identify_n(word));
    cache.check_rank(n)?;
    evaluate(word, Some(n))?;
    cache.ensure_built(n)?;
    fold(cache, word, n)
}

/// Folds `word` against a cache that is already built for `n`.
pub(crate) fn fold<S: ElementStore>(
    cache: &ElementCache<S>,
    word: &Word,
    n: usize,
) -> Result<DemazureProduct> {
    let mut state = HeckeState::new(cache, n)?;
    for gen in word.iter() {
        state.update(*gen)?;
    }
    let (word, element) = state.finish();
    Ok(DemazureProduct { word, element })
}
