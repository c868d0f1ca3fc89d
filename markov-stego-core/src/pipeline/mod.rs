//! End-to-end hiding of a text message: compress, encrypt, then encode.

/// Brotli compression behind a one-byte flag.
pub mod compression;

/// Argon2id + AES-256-GCM-SIV.
pub mod crypto;

use log::debug;

use crate::codec::Codec;
use crate::error::Result;

/// Hides `plaintext` in text generated by `codec`'s model.
///
/// The output differs on every call (fresh salt and nonce) but always
/// decodes back with [`stego_decode`] and the same password and model.
pub fn stego_encode(codec: &Codec, plaintext: &str, password: &str) -> Result<String> {
	let compressed = compression::compress(plaintext)?;
	let sealed = crypto::encrypt(password, &compressed)?;
	debug!("sealed {} plaintext bytes into {} bytes", plaintext.len(), sealed.len());
	codec.encode(&sealed)
}

/// Recovers the message hidden by [`stego_encode`].
///
/// # Errors
/// - `DecodeMismatch` or `InvalidFrame` if `text` was not produced by this model
/// - `AuthenticationFailed` on a wrong password
pub fn stego_decode(codec: &Codec, text: &str, password: &str) -> Result<String> {
	let sealed = codec.decode(text)?;
	let compressed = crypto::decrypt(password, &sealed)?;
	compression::decompress(&compressed)
}
