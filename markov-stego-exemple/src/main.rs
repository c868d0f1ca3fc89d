use std::env;
use std::sync::Arc;

use markov_stego_core::{Codec, CorpusLibrary, StegoError, stego_decode, stego_encode};
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Corpora folder: first argument, or "./data" (every .dat file is loaded)
    // Counts are cached beside each corpus as .2gram.bin on first run
    let folder = env::args().nth(1).unwrap_or_else(|| "./data".to_owned());
    let library = CorpusLibrary::new(&folder, 2)?;
    println!("Corpora: {}", library.get_model_names().join(", "));

    // One model out of every corpus, counts added together
    let codec = Codec::new(Arc::new(library.build_all()?));

    // Compress, encrypt, then hide the message
    let cover = stego_encode(&codec, "Meet me at the lighthouse at dawn.", "correct horse")?;
    println!("Cover text:\n{cover}\n");

    // Same password, same model: the message comes back
    println!("Decoded: {}", stego_decode(&codec, &cover, "correct horse")?);

    // A wrong password is detected, not silently garbled
    match stego_decode(&codec, &cover, "wrong horse") {
        Err(StegoError::AuthenticationFailed) => println!("Wrong password rejected"),
        other => println!("Should not happen: {other:?}"),
    }

    // Text the model could not have produced is rejected at the first foreign token
    match codec.decode("Colorless green ideas sleep furiously") {
        Err(e) => println!("Foreign text rejected: {e}"),
        Ok(_) => println!("Should not happen"),
    }

    // Lower orders hide more bytes per character of cover text
    let mut rng = rand::rng();
    for order in 1..=3 {
        let codec = Codec::new(Arc::new(CorpusLibrary::new(&folder, order)?.build_all()?));
        let mut chars = 0;
        for _ in 0..10 {
            let mut payload = [0u8; 100];
            rng.fill(&mut payload[..]);
            chars += codec.encode(&payload)?.chars().count();
        }
        println!("Order {order}: {:.1} characters per byte", chars as f64 / 1000.0);
    }

    Ok(())
}
