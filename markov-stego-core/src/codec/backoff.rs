use crate::error::{Result, StegoError};
use crate::model::{CandidateList, TokenId, TransitionTable};

/// Contexts to try for a lookup, longest first: the context itself, then
/// every suffix obtained by dropping the oldest token, down to the empty
/// context.
pub fn fallback_chain(context: &[TokenId]) -> impl Iterator<Item = &[TokenId]> {
	(0..=context.len()).map(move |skip| &context[skip..])
}

/// Sliding context shared by encode and decode.
///
/// Both directions must resolve exactly the same candidate list at every
/// step, so all of the context handling lives here.
///
/// # Invariants
/// - `context` holds at most `order - 1` tokens
/// - The empty context of `table` has at least two candidates
pub struct ContextWalker<'a> {
	table: &'a dyn TransitionTable,
	context: Vec<TokenId>,
	window: usize,
	zero_entropy_run: usize,
	max_zero_entropy_run: usize,
}

impl<'a> ContextWalker<'a> {
	/// Starts a walk at the empty context.
	///
	/// # Errors
	/// Returns [`StegoError::InsufficientModel`] if the model cannot carry a
	/// single bit.
	pub fn new(table: &'a dyn TransitionTable, max_zero_entropy_run: usize) -> Result<Self> {
		match table.candidates(&[]) {
			Some(unigrams) if unigrams.len() >= 2 => Ok(Self {
				table,
				context: Vec::with_capacity(table.order()),
				window: table.order().saturating_sub(1),
				zero_entropy_run: 0,
				max_zero_entropy_run,
			}),
			_ => Err(StegoError::InsufficientModel),
		}
	}

	/// Resolves the candidate list of the current context.
	///
	/// After `max_zero_entropy_run` consecutive single-candidate steps,
	/// single-candidate lists are skipped so the walk cannot cycle forever
	/// without carrying information.
	pub fn candidates(&self) -> Result<&'a CandidateList> {
		let starving = self.zero_entropy_run >= self.max_zero_entropy_run;
		for suffix in fallback_chain(&self.context) {
			match self.table.candidates(suffix) {
				Some(list) if starving && list.is_deterministic() => continue,
				Some(list) => return Ok(list),
				None => continue,
			}
		}
		Err(StegoError::InsufficientModel)
	}

	/// Appends the token chosen from `list` to the context.
	pub fn advance(&mut self, token: TokenId, list: &CandidateList) {
		if list.is_deterministic() {
			self.zero_entropy_run += 1;
		} else {
			self.zero_entropy_run = 0;
		}

		if self.window == 0 {
			return;
		}
		if self.context.len() == self.window {
			self.context.remove(0);
		}
		self.context.push(token);
	}
}
