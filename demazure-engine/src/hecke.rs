use crate::cache::ElementCache;
use crate::error::Result;
use crate::evaluate::append;
use crate::store::ElementStore;
use crate::types::{Element, Generator, Word};
use tracing::trace;

/// Trait for folding generators into a running product one at a time.
pub trait IncrementalUpdate {
    /// Consumes one generator. Returns `true` if it was appended to the
    /// running word.
    fn update(&mut self, gen: Generator) -> Result<bool>;
}

/// Running 0-Hecke (Demazure) product.
///
/// State is the running word, its element and its length. Consuming `s`
/// moves to `w·s` when `l(w·s) > l(w)` and stays at `w` otherwise.
///
/// Identity generators need no special case: `w·s_0 = w`, the length cannot
/// grow, so the letter is always rejected. This covers leading zeros as well,
/// since the state starts at the identity with length 0.
#[derive(Debug, Clone)]
pub struct HeckeState<'c, S: ElementStore> {
    cache: &'c ElementCache<S>,
    word: Word,
    element: Element,
    length: usize,
}

impl<'c, S: ElementStore> HeckeState<'c, S> {
    /// Starts at the identity of S_n. The cache for `n` must already be built.
    pub fn new(cache: &'c ElementCache<S>, n: usize) -> Result<Self> {
        cache.check_rank(n)?;
        let element = Element::identity(n);
        let length = cache.length(&element)?;
        Ok(HeckeState {
            cache,
            word: Word::new(),
            element,
            length,
        })
    }

    /// The accepted letters so far: a reduced word for `element()`.
    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns to the identity.
    pub fn reset(&mut self) {
        self.word = Word::new();
        self.element = Element::identity(self.element.rank());
        self.length = 0;
    }

    /// Consumes the state, returning the running word and element.
    pub fn finish(self) -> (Word, Element) {
        (self.word, self.element)
    }
}

impl<S: ElementStore> IncrementalUpdate for HeckeState<'_, S> {
    fn update(&mut self, gen: Generator) -> Result<bool> {
        let candidate = append(&self.element, gen)?;
        let candidate_length = self.cache.length(&candidate)?;
        if candidate_length <= self.length {
            return Ok(false);
        }
        trace!(generator = gen.index(), length = candidate_length, "accepted");
        self.word.push(gen);
        self.element = candidate;
        self.length = candidate_length;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoxeterError;

    fn built(n: usize) -> ElementCache {
        let mut cache = ElementCache::in_memory();
        cache.build(n).unwrap();
        cache
    }

    #[test]
    fn test_initial_state() {
        let cache = built(3);
        let state = HeckeState::new(&cache, 3).unwrap();
        assert!(state.word().is_empty());
        assert!(state.element().is_identity());
        assert_eq!(state.length(), 0);
    }

    #[test]
    fn test_requires_built_cache() {
        let cache = ElementCache::in_memory();
        assert!(matches!(
            HeckeState::new(&cache, 3),
            Err(CoxeterError::NotAnElement { n: 3, .. })
        ));
    }

    #[test]
    fn test_accepts_only_length_increases() {
        let cache = built(3);
        let mut state = HeckeState::new(&cache, 3).unwrap();
        assert!(state.update(Generator(1)).unwrap());
        assert!(!state.update(Generator(1)).unwrap());
        assert!(state.update(Generator(2)).unwrap());
        assert!(state.update(Generator(1)).unwrap());
        // Longest element: nothing can be appended.
        assert!(!state.update(Generator(2)).unwrap());
        assert_eq!(state.length(), 3);
        assert_eq!(state.element(), &Element::longest(3));
    }

    #[test]
    fn test_identity_generator_rejected() {
        let cache = built(3);
        let mut state = HeckeState::new(&cache, 3).unwrap();
        assert!(!state.update(Generator::IDENTITY).unwrap());
        state.update(Generator(2)).unwrap();
        assert!(!state.update(Generator::IDENTITY).unwrap());
        assert_eq!(state.word(), &Word::from(vec![2]));
    }

    #[test]
    fn test_reset() {
        let cache = built(3);
        let mut state = HeckeState::new(&cache, 3).unwrap();
        state.update(Generator(1)).unwrap();
        state.update(Generator(2)).unwrap();
        state.reset();
        assert!(state.word().is_empty());
        assert!(state.element().is_identity());
        assert_eq!(state.length(), 0);
    }

    #[test]
    fn test_out_of_range_generator() {
        let cache = built(3);
        let mut state = HeckeState::new(&cache, 3).unwrap();
        assert!(matches!(
            state.update(Generator(3)),
            Err(CoxeterError::GeneratorOutOfRange { n: 3, .. })
        ));
    }
}
