use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::PathBuf,
};

use clap::Parser;

use hmmtag::Error;

/// Filters a word-embedding file down to the rows whose word appears in a
/// vocabulary list, streaming the matching rows to stdout unchanged.
#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    /// path to the embedding file, one `word v1 v2 ...` row per line
    #[arg(short, long)]
    embedding: PathBuf,
    /// path to the vocabulary list, one word per line
    #[arg(short, long)]
    words: PathBuf,
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let argv = Argv::parse();

    let mut words = HashSet::new();
    for line in BufReader::new(File::open(&argv.words)?).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }
    log::info!("vocabulary: {} word(s)", words.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut total = 0usize;
    let mut kept = 0usize;
    for row in BufReader::new(File::open(&argv.embedding)?).lines() {
        let row = row?;
        total += 1;
        if let Some(word) = row.split_whitespace().next() {
            if words.contains(word) {
                writeln!(out, "{}", row)?;
                kept += 1;
            }
        }
    }
    log::info!("kept {}/{} embedding row(s)", kept, total);
    Ok(())
}
