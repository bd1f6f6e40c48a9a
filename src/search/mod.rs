//! Glossary matching and ranking
//!
//! Exact lookup, fuzzy suggestions and substring search over a corpus
//! snapshot. Nothing in here performs I/O.

pub mod engine;
pub mod fuzzy;
pub mod normalize;
pub mod ranking;


pub use engine::{lookup_definition, search_corpus, Lookup, SearchResult};
pub use normalize::normalize;
