use serde::{Deserialize, Serialize};

use super::vocabulary::TokenId;

/// One possible next token of a context.
///
/// The candidate owns the half-open interval
/// `[cumulative, cumulative + count)` of its list's total.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
	pub token: TokenId,
	pub count: u64,
	/// Sum of the counts of all candidates ordered before this one.
	pub cumulative: u64,
}

/// Frozen, canonically ordered successors of one context.
///
/// # Invariants
/// - Never empty
/// - Candidates are sorted by `TokenId` (lexicographic token order)
/// - Every count is >= 1 and `total` is the sum of all counts
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CandidateList {
	candidates: Vec<Candidate>,
	total: u64,
}

impl CandidateList {
	/// Freezes `(token, count)` pairs into a list.
	///
	/// Returns `None` if there are no pairs with a positive count.
	pub fn from_counts<I: IntoIterator<Item = (TokenId, u64)>>(counts: I) -> Option<Self> {
		let mut pairs: Vec<(TokenId, u64)> = counts.into_iter().filter(|(_, count)| *count > 0).collect();
		if pairs.is_empty() {
			return None;
		}
		pairs.sort_unstable_by_key(|(token, _)| *token);

		let mut total = 0;
		let candidates = pairs
			.into_iter()
			.map(|(token, count)| {
				let candidate = Candidate { token, count, cumulative: total };
				total += count;
				candidate
			})
			.collect();

		Some(Self { candidates, total })
	}

	/// Sum of all counts: the radix of one coding step.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Number of distinct candidates.
	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	/// Always false, kept for API symmetry with `len`.
	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	/// A single candidate carries no information.
	pub fn is_deterministic(&self) -> bool {
		self.candidates.len() == 1
	}

	pub fn first(&self) -> &Candidate {
		&self.candidates[0]
	}

	pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
		self.candidates.iter()
	}

	/// Returns the candidate whose interval contains `offset`.
	///
	/// # Panics
	/// Panics if `offset` is not lower than [`total`](Self::total).
	pub fn select(&self, offset: u64) -> &Candidate {
		debug_assert!(offset < self.total, "offset {offset} out of total {}", self.total);
		let index = self
			.candidates
			.partition_point(|c| c.cumulative + c.count <= offset);
		&self.candidates[index]
	}

	/// Checks the invariants of a list that did not come from
	/// [`from_counts`](Self::from_counts), such as a deserialized one.
	///
	/// Returns a description of the first broken invariant.
	pub(crate) fn check(&self, vocabulary_len: usize) -> Result<(), String> {
		if self.candidates.is_empty() {
			return Err("empty candidate list".to_owned());
		}
		let mut sum: u64 = 0;
		let mut previous: Option<TokenId> = None;
		for candidate in &self.candidates {
			if candidate.token as usize >= vocabulary_len {
				return Err(format!("token {} is outside the vocabulary", candidate.token));
			}
			if previous.is_some_and(|token| token >= candidate.token) {
				return Err(format!("token {} is out of order", candidate.token));
			}
			if candidate.count == 0 {
				return Err(format!("token {} has a zero count", candidate.token));
			}
			if candidate.cumulative != sum {
				return Err(format!("token {} has cumulative {} instead of {sum}", candidate.token, candidate.cumulative));
			}
			sum = sum
				.checked_add(candidate.count)
				.ok_or_else(|| "counts overflow".to_owned())?;
			previous = Some(candidate.token);
		}
		if self.total != sum {
			return Err(format!("total {} instead of {sum}", self.total));
		}
		Ok(())
	}

	/// Finds the candidate for a given token.
	pub fn find(&self, token: TokenId) -> Option<&Candidate> {
		self.candidates
			.binary_search_by_key(&token, |c| c.token)
			.ok()
			.map(|index| &self.candidates[index])
	}
}
