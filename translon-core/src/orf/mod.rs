//! Candidate ORF enumeration over transcript sequence.
//!
//! Each transcript is scanned once from its 3' end towards its 5' end while
//! remembering, per reading frame, the most recent stop codon seen. A start
//! codon therefore pairs with the first in-frame stop downstream of it without
//! a forward search, and several starts may share one stop.

use rayon::prelude::*;

use crate::config::TranslonConfig;
use crate::constants::{CODON_LENGTH, READING_FRAMES};
use crate::coordinates::transcript_to_genomic;
use crate::sequence::CodonSet;
use crate::types::{CandidateOrf, Transcript, TranslonError};

/// Inclusive length bounds for candidate ORFs, stop codon included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: u64,
    pub max: u64,
}

impl LengthBounds {
    #[must_use]
    pub const fn contains(&self, length: u64) -> bool {
        self.min <= length && length <= self.max
    }
}

impl From<&TranslonConfig> for LengthBounds {
    fn from(config: &TranslonConfig) -> Self {
        Self {
            min: config.min_orf_length,
            max: config.max_orf_length,
        }
    }
}

/// Start and stop codon sets used by the scan
#[derive(Debug, Clone)]
pub struct CodonTable {
    pub starts: CodonSet,
    pub stops: CodonSet,
}

impl CodonTable {
    /// Parse both codon lists of a configuration.
    ///
    /// Returns the table and the number of malformed codon strings skipped.
    pub fn from_config(config: &TranslonConfig) -> Result<(Self, usize), TranslonError> {
        let (starts, bad_starts) = CodonSet::from_strings(&config.start_codons, "start")?;
        let (stops, bad_stops) = CodonSet::from_strings(&config.stop_codons, "stop")?;
        Ok((Self { starts, stops }, bad_starts + bad_stops))
    }
}

/// Per-frame state of the backward scan.
struct ScanContext {
    sequence_length: usize,
    last_stop_positions: [Option<usize>; READING_FRAMES],
}

impl ScanContext {
    const fn new(sequence_length: usize) -> Self {
        Self {
            sequence_length,
            last_stop_positions: [None; READING_FRAMES],
        }
    }

    /// First base of the last complete codon in the frame of `position`.
    const fn last_complete_codon(&self, position: usize) -> usize {
        let codons = (self.sequence_length - position) / CODON_LENGTH;
        position + (codons - 1) * CODON_LENGTH
    }
}

/// Find candidate ORFs on one transcript.
///
/// Every start codon occurrence is paired with the first in-frame stop codon
/// downstream. Candidates outside `bounds` are dropped. A start without an
/// in-frame stop is reported only when `allow_run_off` is set and at least
/// one complete codon follows it, with its last complete codon as stop and
/// `run_off = true`. The result is ordered by
/// start position.
///
/// # Examples
///
/// ```rust
/// use translon_core::orf::{find_orfs, CodonTable, LengthBounds};
/// use translon_core::sequence::CodonSet;
/// use translon_core::types::Transcript;
///
/// let codons = CodonTable {
///     starts: CodonSet::from_strings(&["ATG"], "start")?.0,
///     stops: CodonSet::from_strings(&["TAA", "TAG", "TGA"], "stop")?.0,
/// };
/// let transcript = Transcript::from_sequence("tx1", b"ATGAAATAA");
/// let orfs = find_orfs(&transcript, &codons, LengthBounds { min: 6, max: 30 }, false);
///
/// assert_eq!(orfs.len(), 1);
/// assert_eq!((orfs[0].start, orfs[0].stop, orfs[0].length), (0, 6, 9));
/// # Ok::<(), translon_core::types::TranslonError>(())
/// ```
#[must_use]
pub fn find_orfs(
    transcript: &Transcript,
    codons: &CodonTable,
    bounds: LengthBounds,
    allow_run_off: bool,
) -> Vec<CandidateOrf> {
    let sequence = &transcript.sequence;
    if sequence.len() < CODON_LENGTH {
        return Vec::new();
    }

    let mut context = ScanContext::new(sequence.len());
    let mut orfs = Vec::new();

    for position in (0..=sequence.len() - CODON_LENGTH).rev() {
        let frame = position % READING_FRAMES;

        if codons.stops.matches_at(sequence, position) {
            context.last_stop_positions[frame] = Some(position);
            continue;
        }
        if !codons.starts.matches_at(sequence, position) {
            continue;
        }

        let (stop, run_off) = match context.last_stop_positions[frame] {
            Some(stop) => (stop, false),
            // A run-off ORF needs at least one codon after its start
            None if allow_run_off => match context.last_complete_codon(position) {
                stop if stop > position => (stop, true),
                _ => continue,
            },
            None => continue,
        };
        let length = (stop - position + CODON_LENGTH) as u64;
        if !bounds.contains(length) {
            continue;
        }
        if let Some(orf) = build_candidate(transcript, position as u64, stop as u64, run_off) {
            orfs.push(orf);
        }
    }

    orfs.reverse();
    orfs
}

fn build_candidate(
    transcript: &Transcript,
    start: u64,
    stop: u64,
    run_off: bool,
) -> Option<CandidateOrf> {
    let genomic_start = transcript_to_genomic(&transcript.exons, start)?;
    let genomic_stop = transcript_to_genomic(&transcript.exons, stop + CODON_LENGTH as u64 - 1)?;
    Some(CandidateOrf {
        id: format!("{}_{}_{}", transcript.id, start, stop),
        transcript_id: transcript.id.clone(),
        start,
        stop,
        length: stop - start + CODON_LENGTH as u64,
        run_off,
        exons: transcript.exons.clone(),
        genomic_start,
        genomic_stop,
    })
}

/// Counters from candidate extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub transcripts: usize,
    /// Transcripts whose sequence disagrees with their exon model
    pub inconsistent: usize,
    pub candidates: usize,
    pub run_off: usize,
}

/// Find candidates on every transcript in parallel.
///
/// Output keeps transcript order, and start order within a transcript.
/// Transcripts whose sequence length differs from their spliced exon length
/// cannot be projected and are skipped.
pub fn extract_candidates(
    transcripts: &[Transcript],
    config: &TranslonConfig,
) -> Result<(Vec<CandidateOrf>, ExtractionStats), TranslonError> {
    let (codons, malformed) = CodonTable::from_config(config)?;
    if malformed > 0 {
        log::warn!("Ignored {malformed} malformed codon strings");
    }
    let bounds = LengthBounds::from(config);
    if bounds.min > bounds.max {
        return Err(TranslonError::Configuration(format!(
            "minimum ORF length {} exceeds maximum {}",
            bounds.min, bounds.max
        )));
    }

    let per_transcript: Vec<Option<Vec<CandidateOrf>>> = transcripts
        .par_iter()
        .map(|transcript| {
            if transcript.sequence.len() as u64 != transcript.spliced_length() {
                log::warn!(
                    "Transcript {} has {} bases but its exons span {}, skipping",
                    transcript.id,
                    transcript.sequence.len(),
                    transcript.spliced_length()
                );
                return None;
            }
            Some(find_orfs(transcript, &codons, bounds, config.allow_run_off))
        })
        .collect();

    let mut stats = ExtractionStats {
        transcripts: transcripts.len(),
        ..Default::default()
    };
    let mut candidates = Vec::new();
    for orfs in per_transcript {
        match orfs {
            Some(orfs) => candidates.extend(orfs),
            None => stats.inconsistent += 1,
        }
    }
    stats.candidates = candidates.len();
    stats.run_off = candidates.iter().filter(|orf| orf.run_off).count();

    log::info!(
        "Found {} candidate ORFs on {} transcripts ({} run-off)",
        stats.candidates,
        stats.transcripts - stats.inconsistent,
        stats.run_off
    );
    Ok((candidates, stats))
}
