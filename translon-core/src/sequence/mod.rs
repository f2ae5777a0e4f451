//! Codon sets and transcript sequence assembly.
//!
//! ## Overview
//!
//! Sequences are handled as uppercase ASCII bytes. Codons supplied by the user
//! are normalised the same way (`U` is read as `T`) so that matching is an
//! exact byte comparison.
//!
//! ## Modules
//!
//! - [`io`]: FASTA and chromosome-size readers
//!
//! ## Examples
//!
//! ```rust
//! use translon_core::sequence::CodonSet;
//!
//! let (starts, malformed) = CodonSet::from_strings(&["atg", "CTG"], "start").unwrap();
//! assert_eq!(malformed, 0);
//! assert!(starts.matches_at(b"GGATGC", 2));
//! assert!(!starts.matches_at(b"GGATGC", 0));
//! ```

use std::collections::HashMap;

use bio::alphabets::dna::revcomp;
use bio::bio_types::strand::Strand;

use crate::constants::CODON_LENGTH;
use crate::types::{Exon, TranslonError};

pub mod io;

pub use io::*;

/// A non-empty set of exact three-letter codons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonSet {
    codons: Vec<[u8; CODON_LENGTH]>,
}

impl CodonSet {
    /// Builds a codon set from user-supplied strings.
    ///
    /// Strings that are not exactly three nucleotides long are skipped; the
    /// number of skipped entries is returned next to the set. A set left
    /// empty is a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`TranslonError::Configuration`] when no valid codon remains.
    pub fn from_strings<S: AsRef<str>>(
        codons: &[S],
        role: &str,
    ) -> Result<(Self, usize), TranslonError> {
        let mut parsed = Vec::with_capacity(codons.len());
        let mut malformed = 0;

        for codon in codons {
            match normalize_codon(codon.as_ref()) {
                Some(c) => parsed.push(c),
                None => {
                    log::warn!(
                        "Skipping malformed {} codon '{}': expected three of A, C, G, T/U",
                        role,
                        codon.as_ref()
                    );
                    malformed += 1;
                }
            }
        }

        parsed.sort_unstable();
        parsed.dedup();

        if parsed.is_empty() {
            return Err(TranslonError::Configuration(format!(
                "no valid {role} codon supplied"
            )));
        }

        Ok((Self { codons: parsed }, malformed))
    }

    /// Test whether `codon` is a member of the set
    #[must_use]
    pub fn contains(&self, codon: &[u8]) -> bool {
        codon.len() == CODON_LENGTH && self.codons.iter().any(|c| c.as_slice() == codon)
    }

    /// Test whether a member of the set starts at `pos` in `sequence`
    #[must_use]
    pub fn matches_at(&self, sequence: &[u8], pos: usize) -> bool {
        sequence
            .get(pos..pos + CODON_LENGTH)
            .is_some_and(|codon| self.contains(codon))
    }

    /// Codons in the set, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codons
            .iter()
            .map(|c| std::str::from_utf8(c).unwrap_or_default())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }
}

/// Uppercases a codon and maps `U` to `T`; `None` unless it is three of ACGT.
fn normalize_codon(codon: &str) -> Option<[u8; CODON_LENGTH]> {
    let bytes = codon.trim().as_bytes();
    if bytes.len() != CODON_LENGTH {
        return None;
    }

    let mut normalized = [0u8; CODON_LENGTH];
    for (slot, &b) in normalized.iter_mut().zip(bytes) {
        *slot = match b.to_ascii_uppercase() {
            b'U' => b'T',
            n @ (b'A' | b'C' | b'G' | b'T') => n,
            _ => return None,
        };
    }
    Some(normalized)
}

/// Assembles a spliced transcript sequence from genome sequence.
///
/// Exons must be in transcript order. On the reverse strand each exon slice is
/// reverse-complemented before concatenation, so the result reads 5' to 3'.
///
/// # Errors
///
/// Returns [`TranslonError::Coordinate`] when an exon names an unknown
/// chromosome or extends past its end.
pub fn assemble_transcript(
    genome: &HashMap<String, Vec<u8>>,
    exons: &[Exon],
) -> Result<Vec<u8>, TranslonError> {
    let mut sequence = Vec::with_capacity(exons.iter().map(|e| e.len() as usize).sum());

    for exon in exons {
        let chrom_seq = genome.get(&exon.chrom).ok_or_else(|| {
            TranslonError::Coordinate(format!("chromosome '{}' not in genome", exon.chrom))
        })?;
        let slice = chrom_seq
            .get(exon.start as usize..exon.end as usize)
            .ok_or_else(|| {
                TranslonError::Coordinate(format!(
                    "exon {}:{}-{} exceeds chromosome length {}",
                    exon.chrom,
                    exon.start,
                    exon.end,
                    chrom_seq.len()
                ))
            })?;

        match exon.strand {
            Strand::Reverse => sequence.extend(revcomp(slice)),
            _ => sequence.extend_from_slice(slice),
        }
    }

    sequence.make_ascii_uppercase();
    Ok(sequence)
}
