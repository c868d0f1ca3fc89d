//! Error type shared by the model, the codec and the pipeline.

use thiserror::Error;

/// Every failure the crate can report.
///
/// All variants are deterministic functions of their input, except
/// [`StegoError::AuthenticationFailed`] which depends on the password.
/// Nothing is retried internally.
#[derive(Error, Debug)]
pub enum StegoError {
	/// `encode` was called with a zero-length buffer.
	#[error("cannot encode an empty buffer")]
	EmptyInput,

	/// Even the empty context cannot carry information (empty corpus, or a
	/// corpus with a single distinct token).
	#[error("model has too few candidates to carry information")]
	InsufficientModel,

	/// A decoded token is not a candidate of its context.
	#[error("token {token:?} at position {position} was not produced by this model")]
	DecodeMismatch { position: usize, token: String },

	/// The decoded integer does not carry a sentinel-framed payload.
	#[error("decoded value is not a framed payload")]
	InvalidFrame,

	/// A model order of 0 was requested.
	#[error("model order must be >= 1, got {0}")]
	InvalidOrder(usize),

	/// Two builders of different orders were merged.
	#[error("order mismatch: expected {expected}, found {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// A deserialized model breaks an invariant of the model table.
	#[error("corrupt model: {0}")]
	CorruptModel(String),

	/// A corpus name was requested that the library did not load.
	#[error("corpus {0} not found")]
	UnknownCorpus(String),

	/// Key derivation or sealing failed while encrypting.
	#[error("encryption failed")]
	EncryptionFailed,

	/// Wrong password, or the ciphertext was tampered with.
	#[error("decryption failed (wrong password or tampered data)")]
	AuthenticationFailed,

	/// The compressed payload is malformed or not UTF-8.
	#[error("compressed payload is corrupted")]
	Corrupted,

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("model serialization failed: {0}")]
	Serialization(#[from] postcard::Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
