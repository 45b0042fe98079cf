use std::io::Write;

use crate::error::Error;

/// Writes predicted tag sequences as a submission CSV: an `id,tag` header,
/// then one quoted tag per row with a running id across all sentences.
pub fn write_submission<W: Write, S: AsRef<str>>(
    mut writer: W,
    sequences: &[Vec<S>],
) -> Result<(), Error> {
    writeln!(writer, "id,tag")?;
    let mut idx = 0usize;
    for seq in sequences {
        for tag in seq {
            writeln!(writer, "{},\"{}\"", idx, tag.as_ref())?;
            idx += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_run_across_sentences() {
        let seqs = vec![vec!["DT", "NN"], vec!["VB"]];
        let mut out = Vec::new();
        write_submission(&mut out, &seqs).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id,tag\n0,\"DT\"\n1,\"NN\"\n2,\"VB\"\n");
    }

    #[test]
    fn empty_input_writes_only_header() {
        let seqs: Vec<Vec<&str>> = Vec::new();
        let mut out = Vec::new();
        write_submission(&mut out, &seqs).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id,tag\n");
    }
}
