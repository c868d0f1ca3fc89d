use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StegoError;

/// Dense identifier of an interned token.
pub type TokenId = u32;

/// Interned token strings of a model.
///
/// Identifiers are assigned in lexicographic (UTF-8 byte) order of the token
/// strings, so comparing two `TokenId`s compares the tokens themselves. This
/// is what makes every candidate list of a model canonically ordered,
/// whatever the import order of the corpora.
///
/// Only the sorted token list is serialized; the reverse index is rebuilt
/// on deserialization, which rejects a list that is not strictly sorted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
	tokens: Vec<String>,
	index: HashMap<String, TokenId>,
}

impl Vocabulary {
	/// Builds a vocabulary from any collection of tokens (duplicates allowed).
	pub fn new<I: IntoIterator<Item = String>>(tokens: I) -> Self {
		let mut tokens: Vec<String> = tokens.into_iter().collect();
		tokens.sort();
		tokens.dedup();
		Self::from_sorted(tokens)
	}

	fn from_sorted(tokens: Vec<String>) -> Self {
		let index = tokens
			.iter()
			.enumerate()
			.map(|(id, token)| (token.clone(), id as TokenId))
			.collect();
		Self { tokens, index }
	}

	/// Returns the identifier of a token, if it belongs to the vocabulary.
	pub fn id(&self, token: &str) -> Option<TokenId> {
		self.index.get(token).copied()
	}

	/// Returns the literal form of a token.
	///
	/// # Panics
	/// Panics if `id` was not issued by this vocabulary.
	pub fn token(&self, id: TokenId) -> &str {
		&self.tokens[id as usize]
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}
}

impl TryFrom<Vec<String>> for Vocabulary {
	type Error = StegoError;

	/// Accepts `tokens` only if strictly sorted, as serialized.
	///
	/// # Errors
	/// Returns `CorruptModel` on an out-of-order or repeated token.
	fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
		if let Some(position) = tokens.windows(2).position(|w| w[0] >= w[1]) {
			return Err(StegoError::CorruptModel(format!(
				"vocabulary is not sorted at token {}",
				position + 1
			)));
		}
		if u32::try_from(tokens.len()).is_err() {
			return Err(StegoError::CorruptModel("vocabulary is too large".to_owned()));
		}
		Ok(Self::from_sorted(tokens))
	}
}

impl From<Vocabulary> for Vec<String> {
	fn from(vocabulary: Vocabulary) -> Self {
		vocabulary.tokens
	}
}
