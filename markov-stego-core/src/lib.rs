//! Markov-chain text steganography.
//!
//! This crate hides arbitrary bytes in natural-looking text and recovers
//! them exactly:
//! - Word-level n-gram models built from plain-text corpora
//! - A bijective codec spending the payload as a mixed-radix number over
//!   the model's candidate lists
//! - A ready-made pipeline compressing and encrypting a message before
//!   hiding it
//!
//! ```no_run
//! use std::sync::Arc;
//! use markov_stego_core::{Codec, ModelBuilder, stego_decode, stego_encode};
//!
//! let mut builder = ModelBuilder::new(2)?;
//! builder.add_corpus(&std::fs::read_to_string("data/lighthouse.dat")?);
//! let codec = Codec::new(Arc::new(builder.build()));
//!
//! let text = stego_encode(&codec, "meet at dawn", "password")?;
//! assert_eq!(stego_decode(&codec, &text, "password")?, "meet at dawn");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// N-gram models: tokenizer, builder, frozen tables and corpus folders.
pub mod model;

/// Bytes to text and back through a model.
pub mod codec;

/// Compression and encryption around the codec.
pub mod pipeline;

pub mod error;

/// I/O utilities (corpus loading, path helpers).
pub mod io;

pub use codec::{Codec, CodecConfig};
pub use error::{Result, StegoError};
pub use model::{CorpusLibrary, ModelBuilder, NGramModel, TransitionTable};
pub use pipeline::{stego_decode, stego_encode};
