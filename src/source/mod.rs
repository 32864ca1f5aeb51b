//! Digesting bytes that live outside memory: readers, files, and lists of files.
//!
//! Every failure here is returned to the caller as an [`Error`]; nothing in
//! this module prints or exits.

mod checklist;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, instrument, trace};

use crate::engine::{Digest, Error, Result, Sha256};

pub use checklist::{ChecksumLine, Outcome, Verification, parse_checklist, verify_checklist};

/// Default read buffer size (8 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Reader configuration options.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Bytes requested from the reader per `read` call.
    pub buffer_size: usize,
    /// Maximum number of files digested concurrently by [`digest_files`].
    pub workers: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            workers: thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
        }
    }
}

impl ReaderConfig {
    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `buffer_size` or `workers` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidConfig("buffer_size must be positive".into()));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be positive".into()));
        }
        Ok(())
    }
}

/// Digest everything `reader` yields until end of input.
///
/// Interrupted reads are retried.
///
/// # Errors
///
/// Returns [`Error::Io`] if the reader fails, or [`Error::InvalidConfig`]
/// for an unusable config.
#[instrument(level = "trace", skip_all, fields(buffer_size = config.buffer_size))]
pub fn digest_reader<R: Read>(mut reader: R, config: &ReaderConfig) -> Result<Digest> {
    config.validate()?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; config.buffer_size];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }

    trace!(bytes = ?hasher.bytes_absorbed(), "reader exhausted");
    hasher.finalize()
}

/// Digest the contents of the file at `path`.
///
/// # Errors
///
/// Returns [`Error::Read`] naming `path` if the file cannot be opened or read.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn digest_file<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Digest> {
    let path = path.as_ref();
    let read_error = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let digest = digest_reader(file, config).map_err(|err| match err {
        Error::Io(source) => read_error(source),
        other => other,
    })?;

    debug!(%digest, "file digested");
    Ok(digest)
}

/// Outcome of digesting one file in a batch.
#[derive(Debug)]
pub struct FileDigest {
    /// File that was read
    pub path: PathBuf,
    /// Its digest, or why it could not be computed
    pub result: Result<Digest>,
}

/// Digest many files concurrently.
///
/// Up to `config.workers` threads each own their hasher; results come back
/// in the same order as `paths`. A failing file only affects its own entry.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for an unusable config.
#[instrument(level = "debug", skip_all, fields(files = paths.len(), workers = config.workers))]
pub fn digest_files<P>(paths: &[P], config: &ReaderConfig) -> Result<Vec<FileDigest>>
where
    P: AsRef<Path> + Sync,
{
    config.validate()?;
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let workers = config.workers.min(paths.len());
    let next = AtomicUsize::new(0);
    let next = &next;

    let mut indexed: Vec<(usize, FileDigest)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = paths.get(idx) else {
                            break;
                        };
                        let path = path.as_ref();
                        let result = digest_file(path, config);
                        done.push((
                            idx,
                            FileDigest {
                                path: path.to_path_buf(),
                                result,
                            },
                        ));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });

    indexed.sort_by_key(|(idx, _)| *idx);
    let failed = indexed.iter().filter(|(_, f)| f.result.is_err()).count();
    debug!(failed, "batch complete");

    Ok(indexed.into_iter().map(|(_, file)| file).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::digest;
    use std::io::Write;

    /// Reader that hands out one byte per call and interrupts every other call.
    struct Stuttering<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Stuttering<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            let Some((first, rest)) = self.data.split_first() else {
                return Ok(0);
            };
            buf[0] = *first;
            self.data = rest;
            Ok(1)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn reader_matches_in_memory_digest() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let config = ReaderConfig {
            buffer_size: 100,
            ..ReaderConfig::default()
        };
        let from_reader = digest_reader(data.as_slice(), &config).unwrap();
        assert_eq!(from_reader, digest(&data).unwrap());
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let data = b"interrupted but complete";
        let reader = Stuttering {
            data,
            interrupt: false,
        };
        let result = digest_reader(reader, &ReaderConfig::default()).unwrap();
        assert_eq!(result, digest(data).unwrap());
    }

    #[test]
    fn reader_failure_is_recoverable() {
        let err = digest_reader(Broken, &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ReaderConfig {
            buffer_size: 0,
            ..ReaderConfig::default()
        };
        assert!(matches!(
            digest_reader(&b"x"[..], &config),
            Err(Error::InvalidConfig(_))
        ));

        let config = ReaderConfig {
            workers: 0,
            ..ReaderConfig::default()
        };
        assert!(matches!(
            digest_files(&["a"], &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn file_digest_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();

        let config = ReaderConfig::default();
        assert_eq!(
            digest_file(file.path(), &config).unwrap().to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let missing = file.path().with_extension("missing");
        match digest_file(&missing, &config) {
            Err(Error::Read { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..12u8 {
            let path = dir.path().join(format!("file-{i}"));
            if i != 5 {
                std::fs::write(&path, vec![i; usize::from(i) * 40]).unwrap();
            }
            paths.push(path);
        }

        let config = ReaderConfig {
            workers: 4,
            ..ReaderConfig::default()
        };
        let results = digest_files(&paths, &config).unwrap();
        assert_eq!(results.len(), paths.len());

        for (i, (entry, path)) in results.iter().zip(&paths).enumerate() {
            assert_eq!(&entry.path, path);
            if i == 5 {
                assert!(matches!(entry.result, Err(Error::Read { .. })));
            } else {
                let expected = digest(&vec![i as u8; i * 40]).unwrap();
                assert_eq!(entry.result.as_ref().unwrap(), &expected);
            }
        }
    }

    #[test]
    fn empty_batch() {
        let paths: [&str; 0] = [];
        assert!(
            digest_files(&paths, &ReaderConfig::default())
                .unwrap()
                .is_empty()
        );
    }
}
