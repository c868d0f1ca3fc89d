use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::candidate_list::CandidateList;
use super::table::TransitionTable;
use super::vocabulary::{TokenId, Vocabulary};
use crate::error::{Result, StegoError};

/// Represents an immutable n-gram model over word tokens.
///
/// The `NGramModel` maps every observed context of `0..n` tokens to the
/// canonically ordered list of tokens that followed it in the corpora.
/// Shorter contexts are the backoff tables of the longer ones; the empty
/// context holds the unigram counts.
///
/// Models are produced by `ModelBuilder::build` and never change afterwards,
/// so they can be shared between threads behind an `Arc`.
///
/// # Invariants
/// - `order` is always >= 1
/// - Every context key has at most `order - 1` tokens
/// - Every stored `CandidateList` is non-empty
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramModel {
	/// The order of the model (number of tokens in the n-gram)
	order: usize,

	/// Interned tokens, in lexicographic order
	vocabulary: Vocabulary,

	/// Mapping from a context to its successors
	table: HashMap<Vec<TokenId>, CandidateList>,
}

impl NGramModel {
	pub(crate) fn from_parts(
		order: usize,
		vocabulary: Vocabulary,
		table: HashMap<Vec<TokenId>, CandidateList>,
	) -> Self {
		Self { order, vocabulary, table }
	}

	/// Number of contexts (of every length) with at least one successor.
	pub fn context_count(&self) -> usize {
		self.table.len()
	}

	/// Looks a context up by its token strings.
	///
	/// Returns `None` if a token is unknown or the context was never observed.
	pub fn candidates_for(&self, context: &[&str]) -> Option<&CandidateList> {
		let ids = context
			.iter()
			.map(|token| self.vocabulary.id(token))
			.collect::<Option<Vec<_>>>()?;
		self.table.get(&ids)
	}

	/// Serializes the model with `postcard`.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Restores a model serialized by [`to_bytes`](Self::to_bytes).
	///
	/// # Errors
	/// Returns `Serialization` if the bytes do not decode (this includes an
	/// unsorted vocabulary), and `CorruptModel` if the decoded table breaks
	/// one of the invariants above.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let model: Self = postcard::from_bytes(bytes)?;
		model.validate()?;
		Ok(model)
	}

	/// Checks the invariants a built model holds by construction.
	fn validate(&self) -> Result<()> {
		if self.order == 0 {
			return Err(StegoError::CorruptModel("order 0".to_owned()));
		}
		let vocabulary_len = self.vocabulary.len();
		for (context, list) in &self.table {
			if context.len() >= self.order {
				return Err(StegoError::CorruptModel(format!(
					"context of {} tokens in a model of order {}",
					context.len(),
					self.order
				)));
			}
			if let Some(token) = context.iter().find(|token| **token as usize >= vocabulary_len) {
				return Err(StegoError::CorruptModel(format!("context token {token} is outside the vocabulary")));
			}
			list.check(vocabulary_len)
				.map_err(|reason| StegoError::CorruptModel(format!("context {context:?}: {reason}")))?;
		}
		Ok(())
	}

	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		fs::write(path, self.to_bytes()?)?;
		Ok(())
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		Self::from_bytes(&fs::read(path)?)
	}
}

impl TransitionTable for NGramModel {
	fn order(&self) -> usize {
		self.order
	}

	fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	fn candidates(&self, context: &[TokenId]) -> Option<&CandidateList> {
		self.table.get(context)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::builder::ModelBuilder;

	fn bigram(corpus: &str) -> NGramModel {
		let mut builder = ModelBuilder::new(2).unwrap();
		builder.add_corpus(corpus);
		builder.build()
	}

	#[test]
	fn stores_every_context_length() {
		let model = bigram("the sea and the sky");
		assert_eq!(model.order(), 2);

		let unigram = model.candidates_for(&[]).unwrap();
		assert_eq!(unigram.total(), 5);
		assert_eq!(unigram.len(), 4);

		let after_the = model.candidates_for(&["the"]).unwrap();
		let next: Vec<&str> = after_the.iter().map(|c| model.vocabulary().token(c.token)).collect();
		assert_eq!(next, vec!["sea", "sky"]);

		// "sky" ends the corpus: no successor, no entry
		assert!(model.candidates_for(&["sky"]).is_none());
		// [], [the], [sea], [and]
		assert_eq!(model.context_count(), 4);
	}

	#[test]
	fn unknown_tokens_have_no_context() {
		let model = bigram("the sea");
		assert!(model.candidates_for(&["storm"]).is_none());
	}

	#[test]
	fn empty_corpus_has_no_unigram_table() {
		let model = bigram("   ");
		assert!(model.vocabulary().is_empty());
		assert!(model.candidates(&[]).is_none());
	}

	#[test]
	fn bytes_roundtrip() {
		let model = bigram("La conversación entre el atacante y la policía.");
		let restored = NGramModel::from_bytes(&model.to_bytes().unwrap()).unwrap();
		assert_eq!(restored, model);
	}

	type RawList = (Vec<(TokenId, u64, u64)>, u64);

	/// Serializes a model table by hand, in the same layout as `to_bytes`.
	fn raw_model(order: usize, tokens: &[&str], table: Vec<(Vec<TokenId>, RawList)>) -> Vec<u8> {
		let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
		let table: HashMap<Vec<TokenId>, RawList> = table.into_iter().collect();
		postcard::to_stdvec(&(order, tokens, table)).unwrap()
	}

	#[test]
	fn hand_written_model_loads() {
		let bytes = raw_model(2, &["a", "b"], vec![(vec![], (vec![(0, 1, 0), (1, 1, 1)], 2))]);
		let model = NGramModel::from_bytes(&bytes).unwrap();
		assert_eq!(model.candidates(&[]).map(CandidateList::total), Some(2));
	}

	#[test]
	fn corrupt_models_are_rejected() {
		let unigram = || (vec![], (vec![(0, 1, 0), (1, 1, 1)], 2));
		let cases = [
			// empty successor lists would divide by zero in the codec
			raw_model(2, &["a", "b"], vec![unigram(), (vec![0], (vec![], 0)), (vec![1], (vec![], 0))]),
			raw_model(2, &["a", "b"], vec![(vec![], (vec![(0, 1, 0), (1, 1, 1)], 5))]),
			raw_model(2, &["a", "b"], vec![(vec![], (vec![(0, 1, 0), (1, 1, 0)], 2))]),
			raw_model(2, &["a", "b"], vec![unigram(), (vec![0], (vec![(2, 1, 0)], 1))]),
			raw_model(2, &["a", "b"], vec![unigram(), (vec![7], (vec![(0, 1, 0)], 1))]),
			raw_model(2, &["a", "b"], vec![unigram(), (vec![0, 1], (vec![(0, 1, 0)], 1))]),
			raw_model(0, &["a", "b"], vec![]),
		];
		for bytes in cases {
			assert!(
				matches!(NGramModel::from_bytes(&bytes), Err(StegoError::CorruptModel(_))),
				"{bytes:?}"
			);
		}

		let unsorted = raw_model(2, &["b", "a"], vec![unigram()]);
		assert!(NGramModel::from_bytes(&unsorted).is_err());
	}

	#[test]
	fn save_and_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.bin");
		let model = bigram("one two three two one");
		model.save(&path).unwrap();
		assert_eq!(NGramModel::load(&path).unwrap(), model);
	}
}
