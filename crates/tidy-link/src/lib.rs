//! Record linkage between two datasets.
//!
//! [`link`] blocks candidate pairs ([`blocking`]), scores each mapped
//! column with a comparison picked from its name ([`field`]) and keeps the
//! best candidate of every row of A in one of three buckets
//! ([`classifier`]). Batches of A rows run on the rayon pool and can be
//! cancelled between batches.

pub mod blocking;
pub mod classifier;
pub mod error;
pub mod field;
pub mod matcher;
pub mod similarity;

pub use blocking::BlockingIndex;
pub use classifier::{Classified, PairScore, best_candidate, classify, classify_row, score_pair};
pub use error::{LinkError, Result};
pub use field::{FieldKind, MappedField};
pub use matcher::{CancelToken, Linker, ProgressFn, link};
