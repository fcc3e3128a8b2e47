//! Backing stores for the element cache.
//!
//! A store maps `(n, element)` to a Coxeter length and one witness word.
//! Inserts are insert-if-absent: the first value written for a key wins and
//! later inserts report `false` without touching it.

use crate::error::StoreError;
use crate::types::{Element, Word};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Key-value contract the cache builder and the analyses rely on.
pub trait ElementStore {
    fn get_length(&self, n: usize, element: &Element) -> Result<Option<usize>, StoreError>;

    fn get_witness(&self, n: usize, element: &Element) -> Result<Option<Word>, StoreError>;

    /// Records the length of `element`. Returns `false` if one was already present.
    fn insert_length(
        &mut self,
        n: usize,
        element: &Element,
        length: usize,
    ) -> Result<bool, StoreError>;

    /// Records a witness word for `element`. Returns `false` if one was already present.
    fn insert_witness(
        &mut self,
        n: usize,
        element: &Element,
        word: &Word,
    ) -> Result<bool, StoreError>;

    /// True if at least one element of S_n is recorded at `length`.
    fn has_layer(&self, n: usize, length: usize) -> Result<bool, StoreError>;

    /// Elements of S_n recorded at exactly `length`, in insertion order.
    fn elements_at(&self, n: usize, length: usize) -> Result<Vec<Element>, StoreError>;

    /// All elements of S_n, by length then insertion order.
    fn elements(&self, n: usize) -> Result<Vec<Element>, StoreError>;

    /// Makes pending writes durable.
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct Entry {
    length: Option<usize>,
    witness: Option<Word>,
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<usize, HashMap<Element, Entry>>,
    layers: HashMap<usize, BTreeMap<usize, Vec<Element>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn entry(&self, n: usize, element: &Element) -> Option<&Entry> {
        self.entries.get(&n).and_then(|by_element| by_element.get(element))
    }
}

impl ElementStore for MemoryStore {
    fn get_length(&self, n: usize, element: &Element) -> Result<Option<usize>, StoreError> {
        Ok(self.entry(n, element).and_then(|e| e.length))
    }

    fn get_witness(&self, n: usize, element: &Element) -> Result<Option<Word>, StoreError> {
        Ok(self.entry(n, element).and_then(|e| e.witness.clone()))
    }

    fn insert_length(
        &mut self,
        n: usize,
        element: &Element,
        length: usize,
    ) -> Result<bool, StoreError> {
        let entry = self
            .entries
            .entry(n)
            .or_default()
            .entry(element.clone())
            .or_default();
        if entry.length.is_some() {
            return Ok(false);
        }
        entry.length = Some(length);
        self.layers
            .entry(n)
            .or_default()
            .entry(length)
            .or_default()
            .push(element.clone());
        Ok(true)
    }

    fn insert_witness(
        &mut self,
        n: usize,
        element: &Element,
        word: &Word,
    ) -> Result<bool, StoreError> {
        let entry = self
            .entries
            .entry(n)
            .or_default()
            .entry(element.clone())
            .or_default();
        if entry.witness.is_some() {
            return Ok(false);
        }
        entry.witness = Some(word.clone());
        Ok(true)
    }

    fn has_layer(&self, n: usize, length: usize) -> Result<bool, StoreError> {
        Ok(self
            .layers
            .get(&n)
            .and_then(|layers| layers.get(&length))
            .is_some_and(|layer| !layer.is_empty()))
    }

    fn elements_at(&self, n: usize, length: usize) -> Result<Vec<Element>, StoreError> {
        Ok(self
            .layers
            .get(&n)
            .and_then(|layers| layers.get(&length))
            .cloned()
            .unwrap_or_default())
    }

    fn elements(&self, n: usize) -> Result<Vec<Element>, StoreError> {
        Ok(self
            .layers
            .get(&n)
            .map(|layers| layers.values().flatten().cloned().collect())
            .unwrap_or_default())
    }
}

/// One line of the on-disk journal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CacheRecord<'a> {
    Length {
        n: usize,
        element: Cow<'a, Element>,
        length: usize,
    },
    Witness {
        n: usize,
        element: Cow<'a, Element>,
        word: Cow<'a, Word>,
    },
}

impl CacheRecord<'_> {
    /// The n the record is filed under and the rank of its element.
    fn ranks(&self) -> (usize, usize) {
        match self {
            CacheRecord::Length { n, element, .. } | CacheRecord::Witness { n, element, .. } => {
                (*n, element.rank())
            }
        }
    }
}

/// File-backed store: a JSON-lines journal replayed into memory on open.
///
/// Every accepted insert appends one record, so a cache built by one run is
/// picked up by the next one. Writes are buffered until `flush`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    writer: BufWriter<File>,
}

impl FileStore {
    /// Opens (or creates) the journal at `path` and replays it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut inner = MemoryStore::new();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for (i, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: CacheRecord<'static> = serde_json::from_str(&line)
                    .map_err(|source| StoreError::Decode { line: i + 1, source })?;
                let (n, rank) = record.ranks();
                if n != rank {
                    return Err(StoreError::RankMismatch { line: i + 1, n, rank });
                }
                match record {
                    CacheRecord::Length { n, element, length } => {
                        inner.insert_length(n, &element, length)?;
                    }
                    CacheRecord::Witness { n, element, word } => {
                        inner.insert_witness(n, &element, &word)?;
                    }
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(FileStore {
            path,
            inner,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, record: &CacheRecord<'_>) -> Result<(), StoreError> {
        serde_json::to_writer(&mut self.writer, record).map_err(StoreError::Encode)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl ElementStore for FileStore {
    fn get_length(&self, n: usize, element: &Element) -> Result<Option<usize>, StoreError> {
        self.inner.get_length(n, element)
    }

    fn get_witness(&self, n: usize, element: &Element) -> Result<Option<Word>, StoreError> {
        self.inner.get_witness(n, element)
    }

    fn insert_length(
        &mut self,
        n: usize,
        element: &Element,
        length: usize,
    ) -> Result<bool, StoreError> {
        if self.inner.get_length(n, element)?.is_some() {
            return Ok(false);
        }
        self.append(&CacheRecord::Length {
            n,
            element: Cow::Borrowed(element),
            length,
        })?;
        self.inner.insert_length(n, element, length)
    }

    fn insert_witness(
        &mut self,
        n: usize,
        element: &Element,
        word: &Word,
    ) -> Result<bool, StoreError> {
        if self.inner.get_witness(n, element)?.is_some() {
            return Ok(false);
        }
        self.append(&CacheRecord::Witness {
            n,
            element: Cow::Borrowed(element),
            word: Cow::Borrowed(word),
        })?;
        self.inner.insert_witness(n, element, word)
    }

    fn has_layer(&self, n: usize, length: usize) -> Result<bool, StoreError> {
        self.inner.has_layer(n, length)
    }

    fn elements_at(&self, n: usize, length: usize) -> Result<Vec<Element>, StoreError> {
        self.inner.elements_at(n, length)
    }

    fn elements(&self, n: usize) -> Result<Vec<Element>, StoreError> {
        self.inner.elements(n)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.writer.flush()?;
        Ok(())
    }
}
