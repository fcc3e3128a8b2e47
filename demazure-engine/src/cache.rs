use crate::error::{CoxeterError, Result};
use crate::evaluate::{append, evaluate};
use crate::store::{ElementStore, MemoryStore};
use crate::types::{Element, Generator, Word};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of a cache build. Finding a finished cache is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Built,
    AlreadyBuilt,
}

/// Tunables for the element cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Largest n a cache may be built for.
    pub max_rank: usize,
}

impl CacheConfig {
    /// Largest n accepted by default: one letter per symbol of the canonical key.
    pub const DEFAULT_MAX_RANK: usize = 26;
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_rank: CacheConfig::DEFAULT_MAX_RANK,
        }
    }
}

/// Length-graded catalogue of S_n, one per n, over a pluggable store.
///
/// Building needs `&mut self`; lookups need `&self`. Sharing one cache
/// between threads therefore goes through an outer lock, which serializes
/// builds for the same n.
#[derive(Debug)]
pub struct ElementCache<S: ElementStore = MemoryStore> {
    store: S,
    config: CacheConfig,
}

impl ElementCache<MemoryStore> {
    /// A cache that lives only as long as this value.
    pub fn in_memory() -> Self {
        ElementCache::new(MemoryStore::new())
    }
}

impl<S: ElementStore> ElementCache<S> {
    pub fn new(store: S) -> Self {
        ElementCache::with_config(store, CacheConfig::default())
    }

    pub fn with_config(store: S, config: CacheConfig) -> Self {
        ElementCache { store, config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validates an ambient size against the configured range.
    pub fn check_rank(&self, n: usize) -> Result<()> {
        if n < 1 {
            return Err(CoxeterError::Domain { n });
        }
        if n > self.config.max_rank {
            return Err(CoxeterError::UnsupportedRank {
                n,
                max: self.config.max_rank,
            });
        }
        Ok(())
    }

    /// True once the identity of S_n has been recorded at length 0.
    pub fn is_built(&self, n: usize) -> Result<bool> {
        Ok(self.store.has_layer(n, 0)?)
    }

    /// Enumerates S_n breadth-first over the Cayley graph of the simple
    /// transpositions and records every element with its length and the
    /// first word found for it.
    ///
    /// Layer `k` is expanded only after layer `k` is complete, so an element
    /// is first reached at its Coxeter length; later hits are ignored. After
    /// n(n-1)/2 layers all n! elements are present.
    ///
    /// Returns `AlreadyBuilt` without writing anything if the cache for `n`
    /// exists.
    pub fn build(&mut self, n: usize) -> Result<BuildStatus> {
        self.check_rank(n)?;
        if self.is_built(n)? {
            debug!(n, "element cache already built");
            return Ok(BuildStatus::AlreadyBuilt);
        }

        info!(n, "building element cache");
        let identity = evaluate(&Word::new(), Some(n))?;
        self.store.insert_length(n, &identity, 0)?;
        self.store.insert_witness(n, &identity, &Word::new())?;

        let max_length = n * (n - 1) / 2;
        let mut total = 1usize;
        for length in 0..max_length {
            let mut layer_size = 0usize;
            for old_element in self.store.elements_at(n, length)? {
                let old_word = self.witness(&old_element)?;
                for i in 1..n {
                    let gen = Generator(i);
                    let new_element = append(&old_element, gen)?;
                    if self.store.get_length(n, &new_element)?.is_some() {
                        continue;
                    }
                    let mut new_word = old_word.clone();
                    new_word.push(gen);
                    self.store.insert_length(n, &new_element, length + 1)?;
                    self.store.insert_witness(n, &new_element, &new_word)?;
                    layer_size += 1;
                }
            }
            total += layer_size;
            debug!(n, length = length + 1, layer_size, "layer complete");
        }

        self.store.flush()?;
        info!(n, elements = total, "element cache built");
        Ok(BuildStatus::Built)
    }

    /// Builds the cache for `n` unless it is already there.
    pub fn ensure_built(&mut self, n: usize) -> Result<()> {
        self.build(n).map(|_| ())
    }

    /// Coxeter length of `element`.
    ///
    /// # Errors
    /// `NotAnElement` if the element is not recorded for its n.
    pub fn length(&self, element: &Element) -> Result<usize> {
        let n = element.rank();
        self.store
            .get_length(n, element)?
            .ok_or_else(|| CoxeterError::NotAnElement {
                element: element.clone(),
                n,
            })
    }

    /// A reduced word for `element`.
    pub fn witness(&self, element: &Element) -> Result<Word> {
        let n = element.rank();
        self.store
            .get_witness(n, element)?
            .ok_or_else(|| CoxeterError::NotAnElement {
                element: element.clone(),
                n,
            })
    }

    /// All recorded elements of S_n, shortest first.
    pub fn elements(&self, n: usize) -> Result<Vec<Element>> {
        Ok(self.store.elements(n)?)
    }

    /// Number of elements per length; index is the length.
    pub fn layer_sizes(&self, n: usize) -> Result<Vec<usize>> {
        let mut sizes = Vec::new();
        let mut length = 0;
        while self.store.has_layer(n, length)? {
            sizes.push(self.store.elements_at(n, length)?.len());
            length += 1;
        }
        Ok(sizes)
    }

    /// True if `word` is a minimal-length expression of its element in S_n.
    pub fn is_reduced(&self, word: &Word, n: usize) -> Result<bool> {
        let element = evaluate(word, Some(n))?;
        Ok(word.expression_length() == self.length(&element)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factorial(n: usize) -> usize {
        (1..=n).product()
    }

    #[test]
    fn test_rejects_bad_rank() {
        let mut cache = ElementCache::in_memory();
        assert!(matches!(cache.build(0), Err(CoxeterError::Domain { n: 0 })));
        assert!(matches!(
            cache.build(27),
            Err(CoxeterError::UnsupportedRank { n: 27, max: 26 })
        ));
    }

    #[test]
    fn test_configurable_max_rank() {
        let mut cache =
            ElementCache::with_config(MemoryStore::new(), CacheConfig { max_rank: 3 });
        assert!(cache.build(3).is_ok());
        assert!(matches!(
            cache.build(4),
            Err(CoxeterError::UnsupportedRank { n: 4, max: 3 })
        ));
    }

    #[test]
    fn test_trivial_group() {
        let mut cache = ElementCache::in_memory();
        assert_eq!(cache.build(1).unwrap(), BuildStatus::Built);
        assert_eq!(cache.elements(1).unwrap(), vec![Element::identity(1)]);
        assert_eq!(cache.layer_sizes(1).unwrap(), vec![1]);
    }

    #[test]
    fn test_s3_layers() {
        let mut cache = ElementCache::in_memory();
        cache.build(3).unwrap();
        assert_eq!(cache.layer_sizes(3).unwrap(), vec![1, 2, 2, 1]);
        assert_eq!(cache.length(&Element::longest(3)).unwrap(), 3);
        assert_eq!(
            cache.witness(&Element::from_key("bac").unwrap()).unwrap(),
            Word::from(vec![1])
        );
    }

    #[test]
    fn test_element_count_is_factorial() {
        let mut cache = ElementCache::in_memory();
        for n in 1..=5 {
            cache.build(n).unwrap();
            let sizes = cache.layer_sizes(n).unwrap();
            assert_eq!(sizes.iter().sum::<usize>(), factorial(n));
            assert_eq!(sizes.len(), n * (n - 1) / 2 + 1);
            assert_eq!(*sizes.last().unwrap(), 1);
            assert_eq!(cache.elements(n).unwrap().len(), factorial(n));
        }
    }

    #[test]
    fn test_witnesses_reproduce_elements() {
        let mut cache = ElementCache::in_memory();
        cache.build(4).unwrap();
        for element in cache.elements(4).unwrap() {
            let word = cache.witness(&element).unwrap();
            assert_eq!(evaluate(&word, Some(4)).unwrap(), element);
            assert_eq!(word.len(), cache.length(&element).unwrap());
        }
    }

    #[test]
    fn test_second_build_is_noop() {
        let mut cache = ElementCache::in_memory();
        assert_eq!(cache.build(4).unwrap(), BuildStatus::Built);
        let before = cache.elements(4).unwrap();
        assert_eq!(cache.build(4).unwrap(), BuildStatus::AlreadyBuilt);
        assert_eq!(cache.elements(4).unwrap(), before);
    }

    #[test]
    fn test_unknown_element() {
        let mut cache = ElementCache::in_memory();
        cache.build(3).unwrap();
        let outsider = Element::identity(4);
        assert!(matches!(
            cache.length(&outsider),
            Err(CoxeterError::NotAnElement { n: 4, .. })
        ));
    }

    #[test]
    fn test_is_reduced() {
        let mut cache = ElementCache::in_memory();
        cache.build(3).unwrap();
        assert!(cache.is_reduced(&Word::from(vec![1, 2, 1]), 3).unwrap());
        assert!(cache.is_reduced(&Word::from(vec![1, 0, 2]), 3).unwrap());
        assert!(!cache.is_reduced(&Word::from(vec![1, 1]), 3).unwrap());
        assert!(!cache.is_reduced(&Word::from(vec![1, 2, 1, 2]), 3).unwrap());
    }
}
