//! Digest every file given on the command line in parallel

use std::path::PathBuf;

use sha256_engine::source::ChecksumLine;
use sha256_engine::{ReaderConfig, digest_files};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: parallel_digests FILE...");
        return Ok(());
    }

    let config = ReaderConfig::default();
    println!("Hashing {} file(s) on up to {} threads\n", paths.len(), config.workers);

    for file in digest_files(&paths, &config)? {
        match file.result {
            Ok(digest) => println!("{}", ChecksumLine::new(digest, file.path)),
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}
