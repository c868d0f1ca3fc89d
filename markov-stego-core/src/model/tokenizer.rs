//! Reversible word/punctuation tokenizer.
//!
//! Tokens are either:
//! - a **word**: a maximal run of alphanumeric characters, which may carry
//!   combining marks and inner joiners (`l'église`, `well-known`);
//! - a **punctuation** token: exactly one character that is neither
//!   alphanumeric nor whitespace.
//!
//! Whitespace is never a token. [`detokenize`] places spaces so that
//! re-tokenizing its output always yields the same token sequence: a word
//! gets a space before it unless it follows an opening bracket, and a
//! punctuation token gets one only when it is an opening bracket or a
//! combining mark (which would otherwise fuse with a preceding word).

/// Characters kept inside a word when a word character follows them.
const JOINERS: [char; 3] = ['\'', '’', '-'];

/// Punctuation that attaches to the token after it.
const OPENING: [char; 8] = ['(', '[', '{', '¿', '¡', '«', '“', '‘'];

/// Lexical class of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
	Word,
	Punctuation,
}

impl TokenKind {
	/// Classifies a token produced by [`tokenize`].
	pub fn of(token: &str) -> Self {
		match token.chars().next() {
			Some(c) if c.is_alphanumeric() => TokenKind::Word,
			_ => TokenKind::Punctuation,
		}
	}
}

fn is_combining_mark(c: char) -> bool {
	matches!(
		c as u32,
		0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F
	)
}

fn is_opening(token: &str) -> bool {
	let mut chars = token.chars();
	matches!((chars.next(), chars.next()), (Some(c), None) if OPENING.contains(&c))
}

/// Splits a text into tokens borrowed from it.
///
/// # Notes
/// - Case and accents are preserved verbatim.
/// - UTF-8 safe: iterates over characters, not bytes.
pub fn tokenize(text: &str) -> Vec<&str> {
	let mut tokens = Vec::new();
	let mut chars = text.char_indices().peekable();

	while let Some((start, c)) = chars.next() {
		if c.is_whitespace() {
			continue;
		}
		if !c.is_alphanumeric() {
			tokens.push(&text[start..start + c.len_utf8()]);
			continue;
		}

		let mut end = start + c.len_utf8();
		while let Some(&(i, next)) = chars.peek() {
			if next.is_alphanumeric() || is_combining_mark(next) {
				end = i + next.len_utf8();
				chars.next();
				continue;
			}
			if JOINERS.contains(&next) {
				let after = text[i + next.len_utf8()..].chars().next();
				if after.is_some_and(char::is_alphanumeric) {
					// `end` moves past the joiner with the word character after it
					chars.next();
					continue;
				}
			}
			break;
		}
		tokens.push(&text[start..end]);
	}

	tokens
}

fn needs_space(previous: &str, next: &str) -> bool {
	match TokenKind::of(next) {
		TokenKind::Word => !is_opening(previous),
		TokenKind::Punctuation => next
			.chars()
			.next()
			.is_some_and(|c| OPENING.contains(&c) || is_combining_mark(c)),
	}
}

/// Joins tokens back into text.
///
/// For any token sequence produced by [`tokenize`],
/// `tokenize(&detokenize(&tokens)) == tokens`.
pub fn detokenize<S: AsRef<str>>(tokens: &[S]) -> String {
	let mut text = String::with_capacity(tokens.iter().map(|t| t.as_ref().len() + 1).sum());
	let mut previous: Option<&str> = None;

	for token in tokens {
		let token = token.as_ref();
		if previous.is_some_and(|p| needs_space(p, token)) {
			text.push(' ');
		}
		text.push_str(token);
		previous = Some(token);
	}

	text
}
