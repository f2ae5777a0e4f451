use crate::types::*;
use bio::io::fasta;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Type alias for an identifier, optional description and sequence triple
pub type FastaRecord = (String, Option<String>, Vec<u8>);

/// Chromosome name to length
pub type ChromSizes = BTreeMap<String, u64>;

/// Read all records of a FASTA file using rust-bio
pub fn read_fasta_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>, TranslonError> {
    let file = File::open(path)?;
    let reader = fasta::Reader::new(file);
    let mut sequences = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| TranslonError::ParseError(e.to_string()))?;
        let id = record.id().to_string();
        let description = record.desc().map(String::from);
        let seq = record.seq().to_vec();
        sequences.push((id, description, seq));
    }

    Ok(sequences)
}

/// Read a genome FASTA into memory, keyed by record identifier
pub fn read_genome<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Vec<u8>>, TranslonError> {
    let records = read_fasta_sequences(path)?;
    if records.is_empty() {
        return Err(TranslonError::Configuration(
            "genome FASTA contains no sequences".to_string(),
        ));
    }
    Ok(records
        .into_iter()
        .map(|(id, _, mut seq)| {
            seq.make_ascii_uppercase();
            (id, seq)
        })
        .collect())
}

/// Read a two-column chromosome sizes file (`name<TAB>length`).
///
/// Blank lines and `#` comments are ignored. Rows that do not parse are
/// skipped and counted; the count is returned next to the table.
pub fn read_chrom_sizes<P: AsRef<Path>>(path: P) -> Result<(ChromSizes, usize), TranslonError> {
    let reader = BufReader::new(File::open(path)?);
    let mut sizes = ChromSizes::new();
    let mut malformed = 0;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next().map(str::parse::<u64>)) {
            (Some(name), Some(Ok(length))) => {
                sizes.insert(name.to_string(), length);
            }
            _ => {
                log::warn!("Skipping malformed chromosome size line {}: '{}'", line_number + 1, line);
                malformed += 1;
            }
        }
    }

    if sizes.is_empty() {
        return Err(TranslonError::Configuration(
            "chromosome sizes file lists no chromosomes".to_string(),
        ));
    }

    Ok((sizes, malformed))
}

/// Read transcript sequences; each record becomes its own single-exon model.
pub fn read_transcripts<P: AsRef<Path>>(path: P) -> Result<Vec<Transcript>, TranslonError> {
    let records = read_fasta_sequences(path)?;
    if records.is_empty() {
        return Err(TranslonError::Configuration(
            "transcript FASTA contains no sequences".to_string(),
        ));
    }
    Ok(records
        .iter()
        .map(|(id, _, seq)| Transcript::from_sequence(id, seq))
        .collect())
}

/// Spliced transcript lengths, keyed by transcript identifier.
pub fn transcript_sizes(transcripts: &[Transcript]) -> ChromSizes {
    transcripts
        .iter()
        .map(|t| (t.id.clone(), t.spliced_length()))
        .collect()
}
