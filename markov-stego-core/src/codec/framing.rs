use super::bignum::BigNat;
use crate::error::{Result, StegoError};

const SENTINEL: u8 = 0x01;

/// Turns a payload into an integer of exactly `8 * len + 1` bits: a leading
/// 1 bit followed by every bit of the payload, leading zeros included.
///
/// # Errors
/// Returns [`StegoError::EmptyInput`] for an empty payload.
pub fn frame(payload: &[u8]) -> Result<BigNat> {
	if payload.is_empty() {
		return Err(StegoError::EmptyInput);
	}
	let mut framed = Vec::with_capacity(payload.len() + 1);
	framed.push(SENTINEL);
	framed.extend_from_slice(payload);
	Ok(BigNat::from_bytes_be(&framed))
}

/// Inverse of [`frame`].
///
/// # Errors
/// Returns [`StegoError::InvalidFrame`] unless the integer has `8k + 1` bits
/// with `k >= 1`.
pub fn unframe(n: &BigNat) -> Result<Vec<u8>> {
	let bits = n.bits();
	if bits < 9 || (bits - 1) % 8 != 0 {
		return Err(StegoError::InvalidFrame);
	}
	let mut bytes = n.to_bytes_be();
	debug_assert_eq!(bytes.first(), Some(&SENTINEL));
	bytes.remove(0);
	Ok(bytes)
}
