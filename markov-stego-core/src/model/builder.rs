use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::ngram_model::NGramModel;
use super::state::State;
use super::tokenizer::tokenize;
use super::vocabulary::Vocabulary;
use crate::error::{Result, StegoError};
use crate::io::{build_output_path, get_filename, read_corpus};

/// Number of chunks per CPU for parallel import.
const CHUNK_FACTOR: usize = 8;

/// Mutable counting stage of an `NGramModel`.
///
/// A builder slides an n-token window over every imported corpus and counts,
/// for each context of `0..n` tokens, which token followed it. Importing
/// several corpora adds their counts. [`build`](Self::build) freezes the
/// counts into an immutable model.
///
/// Builders are serializable so a counted corpus can be cached on disk, and
/// mergeable so partial counts from several threads (or several corpora
/// files) can be combined.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ModelBuilder {
	order: usize,
	states: HashMap<Vec<String>, State>,
	sources: Vec<String>,
}

impl ModelBuilder {
	/// Creates a new builder of order `n`.
	///
	/// # Errors
	/// Returns an error if `n < 1`.
	pub fn new(order: usize) -> Result<Self> {
		if order < 1 {
			return Err(StegoError::InvalidOrder(order));
		}
		Ok(Self::empty(order))
	}

	fn empty(order: usize) -> Self {
		Self { order, states: HashMap::new(), sources: Vec::new() }
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Names of the corpus files merged into this builder.
	pub fn sources(&self) -> &[String] {
		&self.sources
	}

	/// Returns true if nothing was counted yet.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Tokenizes a corpus and counts all of its n-grams.
	pub fn add_corpus(&mut self, corpus: &str) {
		let tokens = tokenize(corpus);
		self.count_range(&tokens, 0..tokens.len());
		debug!("counted {} tokens (order {})", tokens.len(), self.order);
	}

	/// Same as [`add_corpus`](Self::add_corpus), counting on all CPUs.
	///
	/// The token stream is split into chunks of end positions; each thread
	/// sees the `n - 1` tokens before its chunk, so no window is lost or
	/// counted twice and the result equals the sequential import.
	///
	/// # Notes
	/// - Uses scoped threads and an MPSC channel to collect partial builders.
	/// - Partial builders are merged in arrival order, which is harmless since
	///   merging only adds counts.
	pub fn add_corpus_parallel(&mut self, corpus: &str) -> Result<()> {
		let tokens = tokenize(corpus);
		if tokens.is_empty() {
			return Ok(());
		}

		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = tokens.len().div_ceil(chunks);
		let order = self.order;

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for start in (0..tokens.len()).step_by(chunk_size) {
				let tx = tx.clone();
				let tokens = &tokens;
				scope.spawn(move || {
					let mut partial = ModelBuilder::empty(order);
					partial.count_range(tokens, start..(start + chunk_size).min(tokens.len()));
					// The receiver outlives the scope, so sending cannot fail
					let _ = tx.send(partial);
				});
			}
		});
		drop(tx);

		for partial in rx.iter() {
			self.merge(&partial)?;
		}

		debug!("counted {} tokens on {} chunks (order {})", tokens.len(), chunks, order);
		Ok(())
	}

	/// Counts every k-gram (`1 <= k <= n`) whose last token lies in `ends`.
	fn count_range(&mut self, tokens: &[&str], ends: Range<usize>) {
		for end in ends {
			for k in 1..=self.order.min(end + 1) {
				let context: Vec<String> = tokens[end + 1 - k..end].iter().map(|t| (*t).to_owned()).collect();
				self.states.entry(context).or_default().add_transition(tokens[end]);
			}
		}
	}

	/// Merges another builder into this one.
	///
	/// # Notes
	/// - Both builders must have the same order `n`.
	/// - Occurrence counts for matching contexts and tokens are summed.
	///
	/// # Errors
	/// Returns an error if the orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(StegoError::OrderMismatch { expected: self.order, found: other.order });
		}

		for (context, state) in &other.states {
			if let Some(existing) = self.states.get_mut(context) {
				existing.merge(state);
			} else {
				self.states.insert(context.clone(), state.clone());
			}
		}
		self.sources.extend(other.sources.iter().cloned());

		Ok(())
	}

	/// Freezes the counts into an immutable model.
	///
	/// Tokens are interned in lexicographic order, which fixes the canonical
	/// order of every candidate list independently of import order.
	pub fn build(&self) -> NGramModel {
		let vocabulary = Vocabulary::new(
			self.states
				.values()
				.flat_map(State::tokens)
				.map(str::to_owned)
				.collect::<Vec<_>>(),
		);

		let table = self
			.states
			.iter()
			.filter_map(|(context, state)| {
				let key = context
					.iter()
					.map(|token| vocabulary.id(token))
					.collect::<Option<Vec<_>>>()?;
				Some((key, state.freeze(&vocabulary)?))
			})
			.collect::<HashMap<_, _>>();

		info!(
			"built {}-gram model: {} tokens, {} contexts",
			self.order,
			vocabulary.len(),
			table.len()
		);
		NGramModel::from_parts(self.order, vocabulary, table)
	}

	/// Counts a corpus file, reusing a cached binary if one exists.
	///
	/// - `filepath` is the input text file (`.dat`).
	/// - The counts are cached beside it as `<stem>.<n>gram.bin` with
	///   `postcard`, and loaded from there on the next call.
	/// - The file name (without extension) is recorded in `sources`.
	pub fn from_corpus_file<P: AsRef<Path>>(filepath: P, order: usize) -> Result<Self> {
		let binary_data_path = build_output_path(&filepath, &format!("{order}gram.bin"))?;
		let mut builder: Self;
		if binary_data_path.exists() {
			builder = postcard::from_bytes(&fs::read(&binary_data_path)?)?;
			if builder.order != order {
				return Err(StegoError::OrderMismatch { expected: order, found: builder.order });
			}
			info!("loaded cached counts from {}", binary_data_path.display());
		} else {
			let corpus = read_corpus(&filepath)?;
			builder = Self::new(order)?;
			builder.add_corpus_parallel(&corpus)?;
			fs::write(&binary_data_path, postcard::to_stdvec(&builder)?)?;
			info!("cached counts to {}", binary_data_path.display());
		}
		builder.sources.push(get_filename(&filepath)?);
		Ok(builder)
	}
}
