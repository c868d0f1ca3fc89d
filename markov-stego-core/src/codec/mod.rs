//! Bijective mapping between byte buffers and text generated by a model.
//!
//! The payload is framed into one big integer, then spent as a mixed-radix
//! number: at every step the candidate list of the current context is the
//! radix, and the chosen token is the digit. Frequent tokens own wider
//! intervals and therefore cost fewer bits, so the output reads like the
//! corpus. Decoding replays the same walk and folds the digits back.

/// Arbitrary-precision unsigned arithmetic against small radices.
pub mod bignum;

/// Sentinel framing of payloads into integers.
pub mod framing;

/// Context resolution shared by encode and decode.
pub mod backoff;

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use self::backoff::ContextWalker;
use self::bignum::BigNat;
use self::framing::{frame, unframe};
use crate::error::{Result, StegoError};
use crate::model::{TransitionTable, detokenize, tokenize};

/// Tunables of a [`Codec`].
///
/// Both sides of an exchange must use the same configuration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
	/// Consecutive single-candidate steps after which resolution skips
	/// single-candidate contexts.
	pub max_zero_entropy_run: usize,
}

impl Default for CodecConfig {
	fn default() -> Self {
		Self { max_zero_entropy_run: 8 }
	}
}

/// Interval of the observed token in one decoded step.
#[derive(Clone, Copy, Debug)]
struct Digit {
	lo: u64,
	count: u64,
	total: u64,
}

/// Encodes bytes into text and back through a shared model.
///
/// A codec holds no state besides its model and configuration: `encode` and
/// `decode` are pure functions of their input, and a codec can be cloned
/// freely across threads.
#[derive(Clone, Debug)]
pub struct Codec {
	model: Arc<dyn TransitionTable>,
	config: CodecConfig,
}

impl Codec {
	pub fn new(model: Arc<dyn TransitionTable>) -> Self {
		Self::with_config(model, CodecConfig::default())
	}

	pub fn with_config(model: Arc<dyn TransitionTable>, config: CodecConfig) -> Self {
		Self { model, config }
	}

	/// Replaces the model used by the next calls.
	pub fn set_model(&mut self, model: Arc<dyn TransitionTable>) {
		self.model = model;
	}

	pub fn model(&self) -> &Arc<dyn TransitionTable> {
		&self.model
	}

	pub fn config(&self) -> &CodecConfig {
		&self.config
	}

	/// Turns a non-empty payload into text.
	///
	/// # Errors
	/// - [`StegoError::EmptyInput`] for an empty payload
	/// - [`StegoError::InsufficientModel`] if the model has fewer than two
	///   distinct tokens
	pub fn encode(&self, payload: &[u8]) -> Result<String> {
		let mut n = frame(payload)?;
		let table = self.model.as_ref();
		let vocabulary = table.vocabulary();
		let mut walker = ContextWalker::new(table, self.config.max_zero_entropy_run)?;
		let mut tokens = Vec::new();

		while !n.is_zero() {
			let list = walker.candidates()?;
			let chosen = if list.is_deterministic() {
				*list.first()
			} else {
				let (quotient, offset) = n.decrement().div_mod_small(list.total());
				let chosen = *list.select(offset);
				n = quotient.mul_small(chosen.count).add_small(offset - chosen.cumulative);
				chosen
			};
			tokens.push(vocabulary.token(chosen.token));
			walker.advance(chosen.token, list);
		}

		debug!("encoded {} bytes into {} tokens", payload.len(), tokens.len());
		Ok(detokenize(&tokens))
	}

	/// Recovers the payload hidden in `text`.
	///
	/// The whole text is consumed; every token must be a candidate of its
	/// context.
	///
	/// # Errors
	/// - [`StegoError::DecodeMismatch`] at the first token the model could not
	///   have produced
	/// - [`StegoError::InvalidFrame`] if the tokens do not spell a payload
	/// - [`StegoError::InsufficientModel`] as for [`encode`](Self::encode)
	pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
		let tokens = tokenize(text);
		let table = self.model.as_ref();
		let vocabulary = table.vocabulary();
		let mut walker = ContextWalker::new(table, self.config.max_zero_entropy_run)?;
		let mut digits: Vec<Option<Digit>> = Vec::with_capacity(tokens.len());

		for (position, token) in tokens.iter().enumerate() {
			let mismatch = || StegoError::DecodeMismatch { position, token: (*token).to_owned() };
			let list = walker.candidates()?;
			let id = vocabulary.id(token).ok_or_else(mismatch)?;
			let candidate = list.find(id).ok_or_else(mismatch)?;
			digits.push((!list.is_deterministic()).then_some(Digit {
				lo: candidate.cumulative,
				count: candidate.count,
				total: list.total(),
			}));
			walker.advance(id, list);
		}

		let mut n = BigNat::zero();
		for (position, digit) in digits.iter().enumerate().rev() {
			match digit {
				Some(digit) => {
					let (quotient, rest) = n.div_mod_small(digit.count);
					n = quotient.mul_small(digit.total).add_small(digit.lo + rest + 1);
				}
				// encode stops as soon as the integer is spent
				None if n.is_zero() => {
					return Err(StegoError::DecodeMismatch {
						position,
						token: tokens[position].to_owned(),
					});
				}
				None => {}
			}
		}

		let payload = unframe(&n)?;
		debug!("decoded {} tokens into {} bytes", tokens.len(), payload.len());
		Ok(payload)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{ModelBuilder, NGramModel};

	const LIGHTHOUSE: &str = include_str!("../../tests/corpora/lighthouse.dat");

	fn model(order: usize, corpus: &str) -> NGramModel {
		let mut builder = ModelBuilder::new(order).unwrap();
		builder.add_corpus(corpus);
		builder.build()
	}

	fn codec(order: usize, corpus: &str) -> Codec {
		Codec::new(Arc::new(model(order, corpus)))
	}

	#[test]
	fn single_byte_roundtrip() {
		let codec = codec(2, LIGHTHOUSE);
		let text = codec.encode(&[0x41]).unwrap();
		assert!(!text.is_empty());
		assert_eq!(codec.decode(&text).unwrap(), vec![0x41]);
	}

	#[test]
	fn encode_is_deterministic() {
		let codec = codec(2, LIGHTHOUSE);
		let payload = b"the keeper wound the lamp at dusk";
		assert_eq!(codec.encode(payload).unwrap(), codec.encode(payload).unwrap());
		assert_eq!(codec.clone().encode(payload).unwrap(), codec.encode(payload).unwrap());
	}

	#[test]
	fn empty_payload_is_rejected() {
		assert!(matches!(codec(2, LIGHTHOUSE).encode(&[]), Err(StegoError::EmptyInput)));
	}

	#[test]
	fn zero_entropy_cycles_terminate() {
		let codec = codec(2, "a b a b a b");
		for payload in [&[0u8][..], &[0xff, 0x00, 0x13][..], &[7; 40][..]] {
			let text = codec.encode(payload).unwrap();
			assert_eq!(codec.decode(&text).unwrap(), payload);
		}
	}

	#[test]
	fn zero_entropy_limit_is_configurable() {
		let strict = Codec::with_config(
			Arc::new(model(3, "one two three")),
			CodecConfig { max_zero_entropy_run: 0 },
		);
		let text = strict.encode(b"xyz").unwrap();
		assert_eq!(strict.decode(&text).unwrap(), b"xyz");
	}

	#[test]
	fn insufficient_model() {
		let codec = codec(2, "echo echo echo");
		assert!(matches!(codec.encode(b"hi"), Err(StegoError::InsufficientModel)));
		assert!(matches!(codec.decode("echo"), Err(StegoError::InsufficientModel)));
	}

	#[test]
	fn unknown_token_is_a_mismatch() {
		let codec = codec(2, LIGHTHOUSE);
		let text = format!("{} zeppelin", codec.encode(b"ok").unwrap());
		let position = tokenize(&text).len() - 1;
		assert!(matches!(
			codec.decode(&text),
			Err(StegoError::DecodeMismatch { position: p, token }) if p == position && token == "zeppelin"
		));
	}

	#[test]
	fn trailing_zero_entropy_token_is_a_mismatch() {
		let codec = codec(2, "a b a b a b");
		// "b" always follows "a": encode would never emit it last
		assert!(matches!(
			codec.decode("a b"),
			Err(StegoError::DecodeMismatch { position: 1, .. })
		));
	}

	#[test]
	fn unframed_text_is_rejected() {
		let codec = codec(2, "a b a b a b");
		assert!(matches!(codec.decode("a"), Err(StegoError::InvalidFrame)));
		assert!(matches!(codec.decode(""), Err(StegoError::InvalidFrame)));
	}

	#[test]
	fn set_model_switches_vocabulary() {
		let mut codec = codec(1, "red green blue");
		let before = codec.encode(b"hue").unwrap();
		codec.set_model(Arc::new(model(1, "cyan magenta yellow black")));
		let after = codec.encode(b"hue").unwrap();
		assert_ne!(before, after);
		assert_eq!(codec.decode(&after).unwrap(), b"hue");
		assert!(codec.decode(&before).is_err());
	}

	#[test]
	fn config_survives_serialization() {
		let config: CodecConfig = postcard::from_bytes(&postcard::to_stdvec(&CodecConfig::default()).unwrap()).unwrap();
		assert_eq!(config, CodecConfig::default());
		assert_eq!(config.max_zero_entropy_run, 8);
	}
}
