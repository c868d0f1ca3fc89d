use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

/// Unsigned integer of unbounded size, restricted to the few operations the
/// codec needs: one big operand against one machine-sized radix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigNat(BigUint);

impl BigNat {
	pub fn zero() -> Self {
		Self(BigUint::zero())
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// Number of significant bits; 0 for zero.
	pub fn bits(&self) -> u64 {
		self.0.bits()
	}

	/// Reads a big-endian byte buffer. Leading zero bytes are lost.
	pub fn from_bytes_be(bytes: &[u8]) -> Self {
		Self(BigUint::from_bytes_be(bytes))
	}

	/// Big-endian bytes without leading zeros (`[0]` for zero).
	pub fn to_bytes_be(&self) -> Vec<u8> {
		self.0.to_bytes_be()
	}

	/// Returns `self - 1`.
	///
	/// # Panics
	/// Panics if `self` is zero.
	pub fn decrement(self) -> Self {
		let mut n = self.0;
		n -= 1u32;
		Self(n)
	}

	/// Floored division by a small radix: `(self / radix, self % radix)`,
	/// computed in a single pass.
	///
	/// # Panics
	/// Panics if `radix` is zero.
	pub fn div_mod_small(&self, radix: u64) -> (Self, u64) {
		let (quotient, remainder) = self.0.div_rem(&BigUint::from(radix));
		(Self(quotient), remainder.iter_u64_digits().next().unwrap_or(0))
	}

	pub fn mul_small(self, factor: u64) -> Self {
		Self(self.0 * factor)
	}

	pub fn add_small(self, addend: u64) -> Self {
		Self(self.0 + addend)
	}
}
