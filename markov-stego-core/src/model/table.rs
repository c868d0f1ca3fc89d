use std::fmt::Debug;

use super::candidate_list::CandidateList;
use super::vocabulary::{TokenId, Vocabulary};

/// Read-only contract a codec needs from a language model.
///
/// Any model able to answer "what may follow this context" with a
/// canonically ordered [`CandidateList`] can drive a `Codec`. Implementors
/// must be immutable once shared: encode and decode only agree if every
/// lookup returns the same list for the same context.
pub trait TransitionTable: Send + Sync + Debug {
	/// Order `n` of the model; contexts hold at most `n - 1` tokens.
	fn order(&self) -> usize;

	/// Tokens known to the model.
	fn vocabulary(&self) -> &Vocabulary;

	/// Successors of an exact context, or `None` if the context was never
	/// observed. The empty slice is the unigram context.
	fn candidates(&self, context: &[TokenId]) -> Option<&CandidateList>;
}
