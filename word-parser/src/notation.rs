use crate::ParseError;
use demazure_engine::{Generator, Word};
use lazy_static::lazy_static;
use regex::Regex;

// Separators between letters: commas, whitespace, `*` or `·`.
// Letters are bare indices (`2`) or generator names (`s2`, `s_2`).
// Accepted notations:
// - "1,0,2"
// - "[1, 0, 2]"
// - "1 0 2"
// - "s1 s0 s2"
// - "s_1*s_2"
lazy_static! {
    static ref SEPARATOR_REGEX: Regex =
        Regex::new(r"[\s,*·]+").expect("Invalid separator regex pattern");
    static ref LETTER_REGEX: Regex =
        Regex::new(r"^(?:[sS]_?)?(?P<index>\d+)$").expect("Invalid letter regex pattern");
}

/// Parses a word written in any of the accepted notations.
///
/// The empty string, whitespace and `[]` all give the empty word.
///
/// # Example
/// ```
/// use word_parser::parse_word;
/// use demazure_engine::Word;
///
/// assert_eq!(parse_word("s1 s2 s1").unwrap(), Word::from(vec![1, 2, 1]));
/// assert_eq!(parse_word("[1, 0, 2]").unwrap(), Word::from(vec![1, 0, 2]));
/// ```
pub fn parse_word(text: &str) -> Result<Word, ParseError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);

    SEPARATOR_REGEX
        .split(inner)
        .filter(|token| !token.is_empty())
        .map(parse_letter)
        .collect()
}

fn parse_letter(token: &str) -> Result<Generator, ParseError> {
    let caps = LETTER_REGEX
        .captures(token)
        .ok_or_else(|| ParseError::BadLetter {
            token: token.to_string(),
        })?;
    let index = caps["index"]
        .parse::<usize>()
        .map_err(|_| ParseError::BadLetter {
            token: token.to_string(),
        })?;
    Ok(Generator(index))
}
