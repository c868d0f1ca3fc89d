use std::io::{Read, Write};

use crate::error::{Result, StegoError};

/// Flag byte: the text follows as raw UTF-8.
const STORED: u8 = 0x00;
/// Flag byte: the text follows Brotli-compressed.
const BROTLI: u8 = 0x01;

const BROTLI_QUALITY: u32 = 11;
const BROTLI_LG_WINDOW_SIZE: u32 = 22;
const BUFFER_SIZE: usize = 4096;

/// Largest text accepted by [`decompress`].
const MAX_TEXT_LEN: u64 = 1024 * 1024;

/// Compresses a text, prefixed with a one-byte flag.
///
/// Brotli is only used when it is strictly smaller than the raw text, so
/// short messages do not grow by more than the flag byte.
pub fn compress(text: &str) -> Result<Vec<u8>> {
	let raw = text.as_bytes();

	let mut compressed = Vec::new();
	{
		let mut compressor =
			brotli::CompressorWriter::new(&mut compressed, BUFFER_SIZE, BROTLI_QUALITY, BROTLI_LG_WINDOW_SIZE);
		compressor.write_all(raw)?;
		// Flushed on drop
	}

	let (flag, body) = if compressed.len() < raw.len() { (BROTLI, &compressed[..]) } else { (STORED, raw) };
	let mut output = Vec::with_capacity(1 + body.len());
	output.push(flag);
	output.extend_from_slice(body);
	Ok(output)
}

/// Inverse of [`compress`].
///
/// # Errors
/// Returns [`StegoError::Corrupted`] for an unknown flag, an invalid Brotli
/// stream, a text larger than 1 MiB or invalid UTF-8.
pub fn decompress(data: &[u8]) -> Result<String> {
	let (&flag, body) = data.split_first().ok_or(StegoError::Corrupted)?;

	let raw = match flag {
		STORED => body.to_vec(),
		BROTLI => {
			let mut output = Vec::new();
			brotli::Decompressor::new(body, BUFFER_SIZE)
				.take(MAX_TEXT_LEN + 1)
				.read_to_end(&mut output)
				.map_err(|_| StegoError::Corrupted)?;
			if output.len() as u64 > MAX_TEXT_LEN {
				return Err(StegoError::Corrupted);
			}
			output
		}
		_ => return Err(StegoError::Corrupted),
	};

	String::from_utf8(raw).map_err(|_| StegoError::Corrupted)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_text_is_stored() {
		let data = compress("hi").unwrap();
		assert_eq!(data, vec![STORED, b'h', b'i']);
		assert_eq!(decompress(&data).unwrap(), "hi");
	}

	#[test]
	fn repetitive_text_is_compressed() {
		let text = "the lamp turns, the lamp turns, ".repeat(50);
		let data = compress(&text).unwrap();
		assert_eq!(data[0], BROTLI);
		assert!(data.len() < text.len());
		assert_eq!(decompress(&data).unwrap(), text);
	}

	#[test]
	fn empty_text() {
		assert_eq!(decompress(&compress("").unwrap()).unwrap(), "");
	}

	#[test]
	fn unicode_survives() {
		let text = "después del café, l'église ¿sí? Straße ½";
		assert_eq!(decompress(&compress(text).unwrap()).unwrap(), text);
	}

	#[test]
	fn bad_input_is_corrupted() {
		assert!(matches!(decompress(&[]), Err(StegoError::Corrupted)));
		assert!(matches!(decompress(&[0x07, 1, 2]), Err(StegoError::Corrupted)));
		assert!(matches!(decompress(&[STORED, 0xff, 0xfe]), Err(StegoError::Corrupted)));
	}
}
