use std::sync::Arc;

use markov_stego_core::model::tokenize;
use markov_stego_core::{Codec, ModelBuilder, NGramModel, StegoError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LIGHTHOUSE: &str = include_str!("corpora/lighthouse.dat");
const ORLANDO: &str = include_str!("corpora/orlando.dat");
const MARCHE: &str = include_str!("corpora/marche.dat");
const WERKSTATT: &str = include_str!("corpora/werkstatt.dat");

fn model(order: usize, corpus: &str) -> NGramModel {
	let mut builder = ModelBuilder::new(order).unwrap();
	builder.add_corpus(corpus);
	builder.build()
}

fn codec(order: usize, corpus: &str) -> Codec {
	Codec::new(Arc::new(model(order, corpus)))
}

fn random_payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
	let mut payload = vec![0u8; len];
	rng.fill(&mut payload[..]);
	payload
}

#[test]
fn roundtrip_all_orders_and_lengths() {
	let mut rng = StdRng::seed_from_u64(0x5eed);
	for order in 1..=4 {
		let codec = codec(order, LIGHTHOUSE);
		for len in [1, 5, 21, 85, 341] {
			let payload = random_payload(&mut rng, len);
			let text = codec.encode(&payload).unwrap();
			assert_eq!(codec.decode(&text).unwrap(), payload, "order {order}, {len} bytes");
		}
	}
}

#[test]
fn roundtrip_random_lengths() {
	let mut rng = StdRng::seed_from_u64(42);
	let codec = codec(2, LIGHTHOUSE);
	for _ in 0..50 {
		let len = rng.random_range(1..64);
		let payload = random_payload(&mut rng, len);
		assert_eq!(codec.decode(&codec.encode(&payload).unwrap()).unwrap(), payload);
	}
}

#[test]
fn literal_single_byte() {
	let codec = codec(2, LIGHTHOUSE);
	let text = codec.encode(&[0x41]).unwrap();
	assert!(!tokenize(&text).is_empty());
	assert_eq!(codec.decode(&text).unwrap(), vec![0x41]);
}

#[test]
fn leading_zero_bytes_are_kept() {
	let codec = codec(2, LIGHTHOUSE);
	for payload in [vec![0], vec![0, 0, 0], vec![0, 0, 1], vec![0; 32]] {
		let text = codec.encode(&payload).unwrap();
		assert_eq!(codec.decode(&text).unwrap(), payload);
	}
}

#[test]
fn encode_is_deterministic_across_builds() {
	let payload = b"the same bytes, twice";
	let first = codec(3, LIGHTHOUSE).encode(payload).unwrap();
	let second = codec(3, LIGHTHOUSE).encode(payload).unwrap();
	assert_eq!(first, second);
}

#[test]
fn every_corpus_roundtrips() {
	let mut rng = StdRng::seed_from_u64(7);
	for corpus in [LIGHTHOUSE, ORLANDO, MARCHE, WERKSTATT] {
		for order in 1..=3 {
			let codec = codec(order, corpus);
			let payload = random_payload(&mut rng, 48);
			let text = codec.encode(&payload).unwrap();
			assert_eq!(codec.decode(&text).unwrap(), payload);
		}
	}
}

#[test]
fn merged_corpora_roundtrip() {
	let mut builder = ModelBuilder::new(2).unwrap();
	builder.add_corpus(MARCHE);
	builder.add_corpus(WERKSTATT);
	let codec = Codec::new(Arc::new(builder.build()));

	let payload = b"zwei Sprachen, un seul texte";
	assert_eq!(codec.decode(&codec.encode(payload).unwrap()).unwrap(), payload);
}

#[test]
fn other_model_cannot_decode() {
	let payload = [0xa5; 32];
	let text = codec(2, LIGHTHOUSE).encode(&payload).unwrap();
	assert!(matches!(
		codec(2, ORLANDO).decode(&text),
		Err(StegoError::DecodeMismatch { .. })
	));
}

#[test]
fn foreign_text_is_rejected() {
	assert!(matches!(
		codec(2, LIGHTHOUSE).decode("hello there"),
		Err(StegoError::DecodeMismatch { position: 0, token }) if token == "hello"
	));
}

#[test]
fn persisted_model_decodes_identically() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("lighthouse.2gram.model");
	let original = model(2, LIGHTHOUSE);
	original.save(&path).unwrap();

	let payload = b"persisted";
	let text = Codec::new(Arc::new(original)).encode(payload).unwrap();
	let restored = Codec::new(Arc::new(NGramModel::load(&path).unwrap()));
	assert_eq!(restored.encode(payload).unwrap(), text);
	assert_eq!(restored.decode(&text).unwrap(), payload);
}

#[test]
fn codec_is_shared_between_threads() {
	let codec = codec(2, LIGHTHOUSE);
	std::thread::scope(|scope| {
		for seed in 0..4u8 {
			let codec = &codec;
			scope.spawn(move || {
				let payload = vec![seed; 16];
				assert_eq!(codec.decode(&codec.encode(&payload).unwrap()).unwrap(), payload);
			});
		}
	});
}
