use std::{fs::File, io::BufWriter, path::PathBuf, time::Instant};

use clap::{Parser, Subcommand};

use hmmtag::{
    hmm::decoder::{decode, Decode},
    hmm::trainer::{self, Smoothing},
    submission::write_submission,
    Dataset, Error, HmmModel, Performance, Suboptimality,
};

#[derive(Debug, Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Argv {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a bigram HMM on a labeled corpus and write the model as JSON
    Train {
        /// labeled corpus: word<TAB>tag lines, blank line between sentences
        #[arg(short, long)]
        data: PathBuf,
        /// where to write the trained model
        #[arg(short, long)]
        model: PathBuf,
        /// transition smoothing scheme
        #[arg(short, long, value_enum, default_value_t = Smoothing::AddOne)]
        smoothing: Smoothing,
        /// bigram weight for interpolated smoothing (unigram gets the rest)
        #[arg(short, long, default_value_t = trainer::DEFAULT_LAMBDA)]
        lambda: f64,
    },
    /// Tag a corpus and write the predictions as a submission CSV
    Tag {
        /// read a trained model from a file
        #[arg(short, long)]
        model: PathBuf,
        /// corpus to tag; gold tags, if present, are ignored
        #[arg(short, long)]
        data: PathBuf,
        /// output CSV path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Decode::Viterbi)]
        decoder: Decode,
        /// beam width, only used with --decoder beam
        #[arg(short, long, default_value_t = 3)]
        width: usize,
    },
    /// Report tagging accuracy on a labeled corpus
    Eval {
        /// read a trained model from a file
        #[arg(short, long)]
        model: PathBuf,
        /// labeled corpus to evaluate on
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long, value_enum, default_value_t = Decode::Viterbi)]
        decoder: Decode,
        /// beam width, only used with --decoder beam
        #[arg(short, long, default_value_t = 3)]
        width: usize,
        /// also compare decoder path scores against gold path scores
        #[arg(long)]
        suboptimality: bool,
    },
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let argv = Argv::parse();
    match argv.command {
        Command::Train { data, model, smoothing, lambda } => {
            let ds = Dataset::open(&data)?;
            log::info!(
                "read {} sentence(s), {} token(s) from {}",
                ds.len(),
                ds.total_tokens(),
                data.display()
            );
            let begin = Instant::now();
            let hmm = trainer::train(&ds, smoothing, lambda)?;
            log::info!("training took {:?}", begin.elapsed());
            hmm.save(&model)?;
            log::info!("wrote model to {}", model.display());
        }
        Command::Tag { model, data, output, decoder, width } => {
            let hmm = HmmModel::load(&model)?;
            let ds = Dataset::open(&data)?;
            let begin = Instant::now();
            let mut sequences = Vec::with_capacity(ds.len());
            for sent in &ds.sentences {
                let (path, _) = decode(&hmm, &sent.words, decoder, width);
                sequences.push(resolve_tags(&hmm, &path));
            }
            log::info!(
                "tagged {} sentence(s) with {} in {:?}",
                ds.len(),
                decoder,
                begin.elapsed()
            );
            match output {
                Some(path) => {
                    write_submission(BufWriter::new(File::create(&path)?), &sequences)?;
                    log::info!("wrote predictions to {}", path.display());
                }
                None => write_submission(std::io::stdout().lock(), &sequences)?,
            }
        }
        Command::Eval { model, data, decoder, width, suboptimality } => {
            let hmm = HmmModel::load(&model)?;
            let ds = Dataset::open(&data)?;
            let mut performance = Performance::default();
            let mut sub = Suboptimality::default();
            for sent in ds.sentences.iter().filter(|s| s.is_labeled()) {
                let (path, pred_score) = decode(&hmm, &sent.words, decoder, width);
                performance.accumulate(&sent.tags, &resolve_tags(&hmm, &path));
                if suboptimality {
                    match hmm.tag_ids(&sent.tags) {
                        Some(gold) => sub.accumulate(pred_score, hmm.score(&sent.words, &gold)),
                        None => log::warn!("gold tags outside the model tag set, skipping"),
                    }
                }
            }
            performance.evaluate();
            print!("{}", performance);
            if suboptimality {
                print!("{}", sub);
            }
        }
    }
    Ok(())
}

fn resolve_tags(hmm: &HmmModel, path: &[usize]) -> Vec<String> {
    path.iter()
        .map(|&t| hmm.tags.resolve(t).unwrap_or("N/A").to_string())
        .collect()
}
