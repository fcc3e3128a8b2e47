pub mod cache;
pub mod classify;
pub mod demazure;
pub mod error;
pub mod evaluate;
pub mod hecke;
pub mod store;
pub mod subword;
pub mod types;

pub use cache::{BuildStatus, CacheConfig, ElementCache};
pub use classify::{classify, find_nontrivial, ClassifiedRow, NontrivialReport};
pub use demazure::{demazure_product, DemazureProduct};
pub use error::{CoxeterError, Result, StoreError};
pub use evaluate::{append, evaluate, identify_n};
pub use hecke::{HeckeState, IncrementalUpdate};
pub use store::{ElementStore, FileStore, MemoryStore};
pub use subword::{enumerate_subwords, subword, SubwordRow, Subwords, MAX_SUBWORD_LEN};
pub use types::{Element, Generator, Word};
