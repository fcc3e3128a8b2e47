use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use demazure_engine::{
    demazure_product, enumerate_subwords, evaluate, find_nontrivial, identify_n, BuildStatus,
    ClassifiedRow, ElementCache, ElementStore, NontrivialReport, Word,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use word_parser::{parse_word, read_jobs};

#[derive(Parser)]
#[command(name = "demazure")]
#[command(about = "Demazure products and subword analysis in the symmetric group S_n")]
pub struct Cmd {
    /// Element cache journal, reused across runs
    #[arg(long, default_value = "S_n.jsonl", global = true)]
    pub cache: PathBuf,

    /// Keep the element cache in memory only
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand)]
pub enum Action {
    /// Build the element cache of S_n
    Build { n: usize },
    /// Evaluate a word as a permutation
    Evaluate {
        #[arg(value_parser = parse_word_arg)]
        word: Word,
        #[arg(long)]
        n: Option<usize>,
    },
    /// Demazure product of a word
    Product {
        #[arg(value_parser = parse_word_arg)]
        word: Word,
        #[arg(long)]
        n: Option<usize>,
    },
    /// Stream every subword with its Demazure product, one JSON line per mask
    Subwords {
        #[arg(value_parser = parse_word_arg)]
        word: Word,
        #[arg(long)]
        n: Option<usize>,
    },
    /// Elements reached by some non-reduced subword
    Nontrivial {
        #[arg(value_parser = parse_word_arg)]
        word: Word,
        #[arg(long)]
        n: Option<usize>,
    },
    /// Product and non-trivial report for every row of a `word,n` CSV file
    Batch { path: PathBuf },
}

fn parse_word_arg(text: &str) -> std::result::Result<Word, String> {
    parse_word(text).map_err(|e| e.to_string())
}

#[derive(Serialize)]
struct BuildOutput {
    n: usize,
    status: BuildStatus,
    layer_sizes: Vec<usize>,
    elements: usize,
}

#[derive(Serialize)]
struct EvaluateOutput {
    word: String,
    n: usize,
    element: String,
}

#[derive(Serialize)]
struct ProductOutput {
    word: String,
    n: usize,
    product: String,
    element: String,
    length: usize,
}

#[derive(Serialize)]
struct SubwordOutput {
    mask: u64,
    subword: String,
    product: String,
    element: String,
}

#[derive(Serialize)]
struct ClassifiedOutput {
    mask: u64,
    subword: String,
    expression_length: usize,
    is_reduced: bool,
}

#[derive(Serialize)]
struct NontrivialEntry {
    element: String,
    length: usize,
    rows: Vec<ClassifiedOutput>,
}

#[derive(Serialize)]
struct NontrivialOutput {
    word: String,
    n: usize,
    elements: Vec<NontrivialEntry>,
}

#[derive(Serialize)]
struct BatchOutput {
    row: usize,
    product: ProductOutput,
    nontrivial: Vec<NontrivialEntry>,
}

/// Runs one command against `cache`, writing JSON lines to `out`.
pub fn run<S: ElementStore, W: Write>(
    cache: &mut ElementCache<S>,
    action: Action,
    out: &mut W,
) -> Result<()> {
    match action {
        Action::Build { n } => {
            let status = cache.build(n)?;
            let layer_sizes = cache.layer_sizes(n)?;
            let elements = layer_sizes.iter().sum();
            emit(
                out,
                &BuildOutput {
                    n,
                    status,
                    layer_sizes,
                    elements,
                },
            )
        }
        Action::Evaluate { word, n } => {
            let n = n.unwrap_or_else(|| identify_n(&word));
            let element = evaluate(&word, Some(n))?;
            emit(
                out,
                &EvaluateOutput {
                    word: word.to_string(),
                    n,
                    element: element.to_string(),
                },
            )
        }
        Action::Product { word, n } => {
            let product = product_output(cache, &word, n)?;
            emit(out, &product)
        }
        Action::Subwords { word, n } => {
            for row in enumerate_subwords(cache, &word, n)? {
                let row = row?;
                emit(
                    out,
                    &SubwordOutput {
                        mask: row.mask,
                        subword: row.subword.to_string(),
                        product: row.product.to_string(),
                        element: row.element.to_string(),
                    },
                )?;
            }
            Ok(())
        }
        Action::Nontrivial { word, n } => {
            let n = n.unwrap_or_else(|| identify_n(&word));
            let report = find_nontrivial(cache, &word, Some(n))?;
            let elements = nontrivial_entries(cache, report)?;
            emit(
                out,
                &NontrivialOutput {
                    word: word.to_string(),
                    n,
                    elements,
                },
            )
        }
        Action::Batch { path } => {
            let file = File::open(&path)
                .with_context(|| format!("cannot open batch file {}", path.display()))?;
            for (i, job) in read_jobs(BufReader::new(file)).enumerate() {
                let row = i + 1;
                let job = job.with_context(|| format!("batch row {}", row))?;
                tracing::debug!(row, word = %job.word, "processing batch row");
                let product = product_output(cache, &job.word, job.n)?;
                let report = find_nontrivial(cache, &job.word, Some(product.n))?;
                let nontrivial = nontrivial_entries(cache, report)?;
                emit(
                    out,
                    &BatchOutput {
                        row,
                        product,
                        nontrivial,
                    },
                )?;
            }
            Ok(())
        }
    }
}

fn product_output<S: ElementStore>(
    cache: &mut ElementCache<S>,
    word: &Word,
    n: Option<usize>,
) -> Result<ProductOutput> {
    let n = n.unwrap_or_else(|| identify_n(word));
    let product = demazure_product(cache, word, Some(n))?;
    Ok(ProductOutput {
        word: word.to_string(),
        n,
        length: product.word.len(),
        product: product.word.to_string(),
        element: product.element.to_string(),
    })
}

fn nontrivial_entries<S: ElementStore>(
    cache: &ElementCache<S>,
    report: NontrivialReport,
) -> Result<Vec<NontrivialEntry>> {
    report
        .into_iter()
        .map(|(element, rows)| {
            Ok(NontrivialEntry {
                length: cache.length(&element)?,
                element: element.to_string(),
                rows: rows.into_iter().map(classified_output).collect(),
            })
        })
        .collect()
}

fn classified_output(row: ClassifiedRow) -> ClassifiedOutput {
    ClassifiedOutput {
        mask: row.mask,
        subword: row.subword.to_string(),
        expression_length: row.expression_length,
        is_reduced: row.is_reduced,
    }
}

fn emit<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
