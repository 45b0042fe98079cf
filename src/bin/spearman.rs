use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use clap::Parser;

use hmmtag::Error;

/// Spearman rank correlation between a predictions file and the development
/// labels. Both inputs are CSVs with a header, an id column and one value
/// column; rows are joined by id.
#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    /// path to your model's predicted labels file
    #[arg(short, long)]
    predicted: PathBuf,
    /// path to the development labels file
    #[arg(short, long)]
    development: PathBuf,
}

fn read_labels(path: &Path) -> Result<HashMap<String, f64>, Error> {
    let mut labels = HashMap::new();
    for (lineno, line) in BufReader::new(File::open(path)?).lines().enumerate() {
        let line = line?;
        if lineno == 0 || line.trim().is_empty() {
            // header
            continue;
        }
        let parsed = line
            .split_once(',')
            .and_then(|(id, value)| value.trim().parse::<f64>().ok().map(|v| (id, v)));
        match parsed {
            Some((id, value)) => {
                labels.insert(id.to_string(), value);
            }
            None => {
                return Err(Error::InvalidLine {
                    lineno: lineno + 1,
                    line,
                })
            }
        }
    }
    Ok(labels)
}

/// Ranks with ties sharing their average rank, 1-based.
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (a, b) in x.iter().zip(y) {
        cov += (a - mx) * (b - my);
        vx += (a - mx) * (a - mx);
        vy += (b - my) * (b - my);
    }
    cov / (vx * vy).sqrt()
}

fn spearman(x: &[f64], y: &[f64]) -> f64 {
    pearson(&ranks(x), &ranks(y))
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let argv = Argv::parse();
    let predicted = read_labels(&argv.predicted)?;
    let development = read_labels(&argv.development)?;

    let mut pred = Vec::with_capacity(predicted.len());
    let mut dev = Vec::with_capacity(predicted.len());
    let mut ids: Vec<&String> = predicted.keys().collect();
    ids.sort();
    for id in ids {
        match development.get(id) {
            Some(&value) => {
                pred.push(predicted[id]);
                dev.push(value);
            }
            None => return Err(Error::IdMismatch(id.clone())),
        }
    }
    if let Some(id) = development.keys().find(|id| !predicted.contains_key(*id)) {
        return Err(Error::IdMismatch(id.clone()));
    }
    if pred.is_empty() {
        return Err(Error::EmptyDataset);
    }

    log::info!("joined {} row(s) by id", pred.len());
    println!("Correlation: {}", spearman(&pred, &dev));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [10.0, 100.0, 1000.0, 10000.0];
        assert!((spearman(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reversed_is_minus_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [4.0, 3.0, 2.0, 1.0];
        assert!((spearman(&x, &y) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn ties_get_average_ranks() {
        assert_eq!(ranks(&[1.0, 2.0, 2.0, 3.0]), vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn known_value() {
        // scipy.stats.spearmanr([1, 2, 3, 4, 5], [5, 6, 7, 8, 7]) == 0.8207826816681233
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 6.0, 7.0, 8.0, 7.0];
        assert!((spearman(&x, &y) - 0.8207826816681233).abs() < 1e-12);
    }
}
