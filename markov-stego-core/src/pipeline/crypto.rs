//! Password-based authenticated encryption of the compressed payload.
//!
//! The key is derived with Argon2id from the password and a random salt,
//! and the payload is sealed with AES-256-GCM-SIV under a random nonce.
//! Salt and nonce travel in front of the ciphertext:
//!
//! ```text
//! salt (16) | nonce (12) | ciphertext + tag (len + 16)
//! ```

use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes256GcmSiv, KeyInit, Nonce};
use argon2::Argon2;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{Result, StegoError};

/// Argon2 salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM-SIV authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

fn derive_key(password: &str, salt: &[u8]) -> Option<Zeroizing<[u8; 32]>> {
	let mut key = Zeroizing::new([0u8; 32]);
	Argon2::default().hash_password_into(password.as_bytes(), salt, &mut *key).ok()?;
	Some(key)
}

fn cipher(password: &str, salt: &[u8]) -> Option<Aes256GcmSiv> {
	let key = derive_key(password, salt)?;
	Aes256GcmSiv::new_from_slice(&*key).ok()
}

/// Encrypts `plaintext` under `password`. An empty password is accepted.
pub fn encrypt(password: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
	let mut rng = rand::rng();
	let mut salt = [0u8; SALT_LEN];
	rng.fill_bytes(&mut salt);
	let mut nonce = [0u8; NONCE_LEN];
	rng.fill_bytes(&mut nonce);

	let sealed = cipher(password, &salt)
		.ok_or(StegoError::EncryptionFailed)?
		.encrypt(Nonce::from_slice(&nonce), plaintext)
		.map_err(|_| StegoError::EncryptionFailed)?;

	let mut output = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
	output.extend_from_slice(&salt);
	output.extend_from_slice(&nonce);
	output.extend_from_slice(&sealed);
	Ok(output)
}

/// Inverse of [`encrypt`].
///
/// # Errors
/// Returns [`StegoError::AuthenticationFailed`] if the password is wrong or
/// the data was truncated or tampered with.
pub fn decrypt(password: &str, data: &[u8]) -> Result<Vec<u8>> {
	if data.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
		return Err(StegoError::AuthenticationFailed);
	}
	let (salt, rest) = data.split_at(SALT_LEN);
	let (nonce, sealed) = rest.split_at(NONCE_LEN);

	cipher(password, salt)
		.ok_or(StegoError::AuthenticationFailed)?
		.decrypt(Nonce::from_slice(nonce), sealed)
		.map_err(|_| StegoError::AuthenticationFailed)
}
