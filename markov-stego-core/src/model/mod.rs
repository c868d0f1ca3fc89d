//! Language model of the codec.
//!
//! This module turns natural-language corpora into the transition table the
//! codec walks:
//! - Word/punctuation tokenization and its inverse (`tokenizer`)
//! - Counting of n-gram windows, in parallel and cached on disk (`ModelBuilder`)
//! - The frozen, canonically ordered table (`NGramModel`)
//! - Folders of named corpora (`CorpusLibrary`)

/// Splits text into word and punctuation tokens, and joins them back.
pub mod tokenizer;

/// Interned token strings, ordered lexicographically.
pub mod vocabulary;

/// Canonically ordered successors of one context, with cumulative counts.
pub mod candidate_list;

/// Counting state of one context, keyed by token strings so partial counts
/// can be merged.
pub mod state;

/// The lookup contract between a model and the codec.
pub mod table;

/// Frozen n-gram model over word tokens.
pub mod ngram_model;

/// Counting stage of the model: import, merge, cache.
pub mod builder;

pub mod library;

pub use builder::ModelBuilder;
pub use candidate_list::{Candidate, CandidateList};
pub use library::CorpusLibrary;
pub use ngram_model::NGramModel;
pub use table::TransitionTable;
pub use tokenizer::{TokenKind, detokenize, tokenize};
pub use vocabulary::{TokenId, Vocabulary};
