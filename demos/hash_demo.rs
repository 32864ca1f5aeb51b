//! One-shot and incremental hashing side by side

use sha256_engine::{Sha256, digest, pad};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SHA-256 Demo");
    println!("============\n");

    let message = b"The quick brown fox jumps over the lazy dog";

    let padded = pad(message)?;
    println!(
        "Message: {} bytes -> {} padded block(s)",
        message.len(),
        padded.block_count()
    );

    let one_shot = digest(message)?;
    println!("one-shot:    {one_shot}");

    let mut hasher = Sha256::new();
    for word in message.split_inclusive(|&b| b == b' ') {
        hasher.update(word);
    }
    let incremental = hasher.finalize()?;
    println!("incremental: {incremental}");

    assert_eq!(one_shot, incremental);
    println!("\nDigests match.");

    Ok(())
}
