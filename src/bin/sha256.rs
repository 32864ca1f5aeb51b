//! `sha256` command-line tool
//!
//! Prints `<hex>  <path>` lines for each input, or verifies a checksum list.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sha256_engine::source::{ChecksumLine, DEFAULT_BUFFER_SIZE, Outcome, verify_checklist};
use sha256_engine::{ReaderConfig, digest_files, digest_reader};

/// Print or check SHA-256 (FIPS 180-4) checksums.
///
/// With no FILE, or when FILE is -, read standard input.
#[derive(Parser, Debug)]
#[command(name = "sha256", version, about)]
struct Cli {
    /// Files to digest.
    files: Vec<PathBuf>,

    /// Read checksums from FILE and verify them.
    #[arg(short, long, value_name = "FILE", conflicts_with = "files")]
    check: Option<PathBuf>,

    /// Read buffer size in bytes.
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Files digested in parallel [default: available cores].
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Don't print OK for each successfully verified file.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn reader_config(&self) -> ReaderConfig {
        let mut config = ReaderConfig {
            buffer_size: self.buffer_size,
            ..ReaderConfig::default()
        };
        if let Some(jobs) = self.jobs {
            config.workers = jobs;
        }
        config
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.reader_config();
    config.validate()?;

    let all_ok = match &cli.check {
        Some(list) => check(list, &config, cli.quiet)?,
        None => print_digests(&cli.files, &config)?,
    };

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_digests(files: &[PathBuf], config: &ReaderConfig) -> anyhow::Result<bool> {
    let stdin_only = [PathBuf::from("-")];
    let files = if files.is_empty() {
        &stdin_only[..]
    } else {
        files
    };

    let on_disk: Vec<&PathBuf> = files.iter().filter(|path| !is_stdin(path)).collect();
    let mut batch = digest_files(&on_disk, config)?.into_iter();

    let mut out = io::stdout().lock();
    let mut all_ok = true;
    for path in files {
        let result = if is_stdin(path) {
            digest_reader(io::stdin().lock(), config)
        } else {
            match batch.next() {
                Some(file) => file.result,
                None => anyhow::bail!("missing result for {}", path.display()),
            }
        };

        match result {
            Ok(digest) => writeln!(out, "{}", ChecksumLine::new(digest, path))?,
            Err(err) => {
                all_ok = false;
                eprintln!("sha256: {err}");
            }
        }
    }

    Ok(all_ok)
}

fn check(list: &Path, config: &ReaderConfig, quiet: bool) -> anyhow::Result<bool> {
    let mut text = String::new();
    if is_stdin(list) {
        io::stdin()
            .lock()
            .read_to_string(&mut text)
            .context("failed to read checksum list from stdin")?;
    } else {
        text = std::fs::read_to_string(list)
            .with_context(|| format!("failed to read checksum list {}", list.display()))?;
    }

    let results = verify_checklist(&text, config)?;

    let mut out = io::stdout().lock();
    let mut mismatched = 0usize;
    let mut unreadable = 0usize;
    for entry in &results {
        match &entry.outcome {
            Outcome::Ok => {
                if !quiet {
                    writeln!(out, "{}: OK", entry.path.display())?;
                }
            }
            Outcome::Mismatch { .. } => {
                mismatched += 1;
                writeln!(out, "{}: FAILED", entry.path.display())?;
            }
            Outcome::Failed(err) => {
                unreadable += 1;
                eprintln!("sha256: {err}");
                writeln!(out, "{}: FAILED open or read", entry.path.display())?;
            }
        }
    }

    if mismatched > 0 {
        eprintln!("sha256: WARNING: {mismatched} computed checksum(s) did NOT match");
    }
    if unreadable > 0 {
        eprintln!("sha256: WARNING: {unreadable} listed file(s) could not be read");
    }

    Ok(mismatched == 0 && unreadable == 0)
}
