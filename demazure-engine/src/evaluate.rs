use crate::error::{CoxeterError, Result};
use crate::types::{Element, Generator, Word};

/// Smallest n for which `word` lives in S_n.
///
/// Examples:
/// - `identify_n([1, 0, 1, 2])` returns `3`
/// - `identify_n([])` returns `1`
pub fn identify_n(word: &Word) -> usize {
    word.min_rank()
}

/// Evaluates a word as an element of S_n.
///
/// The generators are applied to the base arrangement from right to left,
/// each one swapping the symbols at *positions* i-1 and i. This is the left
/// action of s_{i_1} ... s_{i_d} on the base arrangement.
///
/// # Arguments
/// * `word` - The word to evaluate
/// * `n` - Ambient size; defaults to `identify_n(word)`
///
/// # Errors
/// `GeneratorOutOfRange` if some generator is not in `[0, n)`.
///
/// # Example
/// ```
/// use demazure_engine::{evaluate, Word};
///
/// let element = evaluate(&Word::from(vec![3, 2, 1]), None).unwrap();
/// assert_eq!(element.to_string(), "bcda");
/// ```
pub fn evaluate(word: &Word, n: Option<usize>) -> Result<Element> {
    let n = n.unwrap_or_else(|| identify_n(word));
    let mut element = Element::identity(n);
    for gen in word.iter().rev() {
        check_generator(*gen, n)?;
        if !gen.is_identity() {
            let i = gen.index();
            element.swap_positions(i - 1, i);
        }
    }
    Ok(element)
}

/// Returns the element of `w · s` given the element of `w`.
///
/// Since s acts first on the base arrangement, appending it to a word
/// exchanges the *symbols* i-1 and i in the evaluated element. The result is
/// identical to `evaluate(word + [s])` without replaying the whole word.
pub fn append(element: &Element, gen: Generator) -> Result<Element> {
    let n = element.rank();
    check_generator(gen, n)?;
    let mut next = element.clone();
    if !gen.is_identity() {
        let i = gen.index() as u32;
        next.swap_symbols(i - 1, i);
    }
    Ok(next)
}

fn check_generator(gen: Generator, n: usize) -> Result<()> {
    if gen.index() >= n {
        return Err(CoxeterError::GeneratorOutOfRange { generator: gen, n });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_swap() {
        let element = evaluate(&Word::from(vec![1]), None).unwrap();
        assert_eq!(element.to_string(), "ba");
    }

    #[test]
    fn test_explicit_rank() {
        let element = evaluate(&Word::from(vec![1]), Some(4)).unwrap();
        assert_eq!(element.to_string(), "bacd");
    }

    #[test]
    fn test_right_to_left_order() {
        let element = evaluate(&Word::from(vec![3, 2, 1]), None).unwrap();
        assert_eq!(element.to_string(), "bcda");
        let element = evaluate(&Word::from(vec![1, 2, 3]), None).unwrap();
        assert_eq!(element.to_string(), "dabc");
    }

    #[test]
    fn test_identity_generator_is_noop() {
        let with_zeros = evaluate(&Word::from(vec![0, 1, 0, 2, 0]), None).unwrap();
        let without = evaluate(&Word::from(vec![1, 2]), None).unwrap();
        assert_eq!(with_zeros, without);
    }

    #[test]
    fn test_empty_word() {
        let element = evaluate(&Word::new(), None).unwrap();
        assert_eq!(element.to_string(), "a");
        let element = evaluate(&Word::new(), Some(3)).unwrap();
        assert!(element.is_identity());
    }

    #[test]
    fn test_out_of_range_generator() {
        let result = evaluate(&Word::from(vec![1, 4]), Some(4));
        assert!(matches!(
            result,
            Err(CoxeterError::GeneratorOutOfRange { generator: Generator(4), n: 4 })
        ));
    }

    #[test]
    fn test_append_matches_full_evaluation() {
        let words: [&[usize]; 4] = [&[], &[1], &[2, 1, 3], &[3, 1, 2, 1, 0]];
        for base in words {
            let word = Word::from(base.to_vec());
            let element = evaluate(&word, Some(4)).unwrap();
            for g in 0..4 {
                let mut extended = word.clone();
                extended.push(Generator(g));
                let expected = evaluate(&extended, Some(4)).unwrap();
                assert_eq!(append(&element, Generator(g)).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_append_out_of_range() {
        let element = Element::identity(3);
        assert!(append(&element, Generator(3)).is_err());
    }
}
