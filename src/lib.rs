//! Self-contained SHA-256 (FIPS 180-4) engine
//!
//! This library computes SHA-256 digests without external cryptographic
//! dependencies. The hashing core is pure and allocation-light; reading from
//! files and other sources lives in a separate layer that reports failures as
//! recoverable errors.
//!
//! # Quick Start
//!
//! ```rust
//! use sha256_engine::{Sha256, digest};
//!
//! // One-shot
//! let d = digest(b"abc")?;
//! assert_eq!(
//!     d.to_hex(),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//!
//! // Incremental
//! let mut hasher = Sha256::new();
//! hasher.update(b"a");
//! hasher.update(b"bc");
//! assert_eq!(hasher.finalize()?, d);
//! # Ok::<(), sha256_engine::Error>(())
//! ```
//!
//! # Features
//!
//! - **One-shot and streaming APIs** - identical digests either way
//! - **Explicit per-computation state** - safe to hash on many threads at once
//! - **File helpers** - stream files, digest batches in parallel, verify checksum lists
//! - **`serde`** (optional) - digests serialize as lowercase hex strings
//! - **`cli`** - the `sha256` command-line tool (`cargo install sha256-engine --features cli`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod source;

pub use engine::{
    BLOCK_SIZE, DIGEST_SIZE, Digest, Error, Phase, Result, Sha256, digest, digest_hex, pad,
};
pub use source::{ReaderConfig, digest_file, digest_files, digest_reader};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
