use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::candidate_list::CandidateList;
use super::vocabulary::Vocabulary;

/// Represents a context being counted by a `ModelBuilder`.
///
/// A `State` stores every token observed right after one context, with the
/// number of times it was observed. Tokens are kept as strings (not ids) so
/// that states counted by independent builders can be merged.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during import
/// - Merge with the state of the same context from another builder
/// - Freeze into a canonically ordered `CandidateList`
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Outgoing transitions indexed by the next token.
	/// Example: { "the" => 42, "," => 3 }
	transitions: HashMap<String, u64>,
}

impl State {
	/// Records an occurrence of a transition toward `next_token`.
	pub fn add_transition(&mut self, next_token: &str) {
		match self.transitions.get_mut(next_token) {
			Some(occurrence) => *occurrence += 1,
			None => {
				self.transitions.insert(next_token.to_owned(), 1);
			}
		}
	}

	/// Number of times `next_token` followed this context.
	pub fn occurrences(&self, next_token: &str) -> u64 {
		self.transitions.get(next_token).copied().unwrap_or(0)
	}

	/// Iterates over the distinct next tokens.
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.transitions.keys().map(String::as_str)
	}

	/// Merges another state into this one; occurrence counts are summed.
	pub fn merge(&mut self, other: &Self) {
		for (next_token, occurrence) in &other.transitions {
			*self.transitions.entry(next_token.clone()).or_insert(0) += *occurrence;
		}
	}

	/// Freezes the transitions against a vocabulary that contains all of them.
	pub fn freeze(&self, vocabulary: &Vocabulary) -> Option<CandidateList> {
		CandidateList::from_counts(self.transitions.iter().filter_map(|(token, occurrence)| {
			let id = vocabulary.id(token);
			debug_assert!(id.is_some(), "token {token:?} missing from vocabulary");
			id.map(|id| (id, *occurrence))
		}))
	}
}
