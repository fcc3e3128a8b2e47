use crate::cache::ElementCache;
use crate::error::Result;
use crate::store::ElementStore;
use crate::subword::{enumerate_subwords, SubwordRow};
use crate::types::{Element, Word};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// A subword reaching a given element, marked reduced or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRow {
    pub mask: u64,
    pub subword: Word,
    /// Non-identity letters of `subword`.
    pub expression_length: usize,
    /// `expression_length` equals the Coxeter length of the element.
    pub is_reduced: bool,
}

/// Elements reached by at least one non-reduced subword, with all of their rows.
pub type NontrivialReport = BTreeMap<Element, Vec<ClassifiedRow>>;

/// Keeps the rows whose Demazure product is `target` and marks each one
/// reduced when its expression length equals the length of `target`.
///
/// # Errors
/// `NotAnElement` if `target` is not in the cache for its n.
pub fn classify<I, R, S>(
    rows: I,
    target: &Element,
    cache: &ElementCache<S>,
) -> Result<Vec<ClassifiedRow>>
where
    I: IntoIterator<Item = R>,
    R: Borrow<SubwordRow>,
    S: ElementStore,
{
    let length = cache.length(target)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let row: &SubwordRow = row.borrow();
            if &row.element != target {
                return None;
            }
            let expression_length = row.subword.expression_length();
            Some(ClassifiedRow {
                mask: row.mask,
                subword: row.subword.clone(),
                expression_length,
                is_reduced: expression_length == length,
            })
        })
        .collect())
}

/// Classifies every subword of `word` and keeps the elements that some
/// subword reaches non-reducedly.
///
/// The subword table is walked once; rows are grouped by element and each
/// group is classified against its element.
pub fn find_nontrivial<S: ElementStore>(
    cache: &mut ElementCache<S>,
    word: &Word,
    n: Option<usize>,
) -> Result<NontrivialReport> {
    let mut groups: BTreeMap<Element, Vec<SubwordRow>> = BTreeMap::new();
    for row in enumerate_subwords(cache, word, n)? {
        let row = row?;
        groups.entry(row.element.clone()).or_default().push(row);
    }

    let mut report = NontrivialReport::new();
    for (element, rows) in groups {
        let classified = classify(&rows, &element, cache)?;
        if classified.iter().any(|row| !row.is_reduced) {
            report.insert(element, classified);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoxeterError, Result};
    use crate::subword::enumerate_subwords;

    fn key(s: &str) -> Element {
        Element::from_key(s).unwrap()
    }

    #[test]
    fn test_classify_slice() {
        let mut cache = ElementCache::in_memory();
        let rows: Vec<SubwordRow> = enumerate_subwords(&mut cache, &Word::from(vec![1, 1]), None)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let classified = classify(&rows, &key("ba"), &cache).unwrap();
        let summary: Vec<(u64, bool)> = classified.iter().map(|r| (r.mask, r.is_reduced)).collect();
        assert_eq!(summary, vec![(1, true), (2, true), (3, false)]);
        assert_eq!(classified[2].expression_length, 2);
    }

    #[test]
    fn test_classify_unknown_target() {
        let mut cache = ElementCache::in_memory();
        let rows: Vec<SubwordRow> = enumerate_subwords(&mut cache, &Word::from(vec![1]), None)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert!(matches!(
            classify(&rows, &key("cba"), &cache),
            Err(CoxeterError::NotAnElement { n: 3, .. })
        ));
    }

    #[test]
    fn test_expression_length_counts_letters_not_mask_bits() {
        let mut cache = ElementCache::in_memory();
        let rows: Vec<SubwordRow> =
            enumerate_subwords(&mut cache, &Word::from(vec![1, 0]), None)
                .unwrap()
                .collect::<Result<_>>()
                .unwrap();
        let classified = classify(&rows, &key("ba"), &cache).unwrap();
        assert_eq!(classified.len(), 2);
        assert!(classified.iter().all(|r| r.expression_length == 1 && r.is_reduced));
    }

    #[test]
    fn test_reduced_word_has_no_nontrivial_elements() {
        let mut cache = ElementCache::in_memory();
        let report = find_nontrivial(&mut cache, &Word::from(vec![1, 2]), None).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_nontrivial_for_repeated_letter() {
        let mut cache = ElementCache::in_memory();
        let report = find_nontrivial(&mut cache, &Word::from(vec![1, 1]), None).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[&key("ba")].len(), 3);
    }
}
