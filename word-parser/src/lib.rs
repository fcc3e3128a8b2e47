use demazure_engine::Word;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

pub mod notation;

pub use notation::parse_word;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("'{token}' is not a generator (expected an index like 2, s2 or s_2)")]
    BadLetter { token: String },

    #[error("invalid n '{value}': expected a positive integer")]
    BadRank { value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of a batch file.
///
/// Batch files have the header `word,n`; `n` may be left empty to use the
/// smallest rank the word fits in.
#[derive(Debug, Clone, Deserialize)]
pub struct WordRow {
    pub word: String,
    #[serde(default)]
    pub n: Option<String>,
}

/// A parsed batch row: the word and the optional ambient size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordJob {
    pub word: Word,
    pub n: Option<usize>,
}

/// Parses a batch row into a job.
pub fn parse_row(row: &WordRow) -> Result<WordJob, ParseError> {
    let word = parse_word(&row.word)?;
    let n = match row.n.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            value
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ParseError::BadRank {
                    value: value.to_string(),
                })?,
        ),
    };
    Ok(WordJob { word, n })
}

/// Streams the jobs of a CSV batch source, one per data row.
pub fn read_jobs<R: Read>(reader: R) -> impl Iterator<Item = Result<WordJob, ParseError>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<WordRow>()
        .map(|row| parse_row(&row?))
}
