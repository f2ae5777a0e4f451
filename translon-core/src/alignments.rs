//! Alignment ingestion through htslib.
//!
//! SAM, BAM and CRAM are all accepted; htslib detects the container from the
//! file contents. Secondary and supplementary records are dropped so that each
//! fragment contributes once.

use std::path::Path;
use std::sync::Arc;

use bio::bio_types::strand::Strand;
use rust_htslib::bam::{self, Read};

use crate::constants::COLLAPSED_COUNT_MARKER;
use crate::types::{Alignment, TranslonError};

/// Counters gathered while reading an alignment file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentReadStats {
    /// Records decoded from the file
    pub records: usize,
    /// Unmapped records
    pub unmapped: usize,
    /// Secondary or supplementary records
    pub non_primary: usize,
    /// Mapped records without a positive reference span
    pub malformed: usize,
    /// Records kept as [`Alignment`]s
    pub used: usize,
}

/// Multiplicity encoded in a collapsed read name.
///
/// Collapsed FASTQ tools name reads `<id>_x<count>`; any other name counts
/// once.
///
/// # Examples
///
/// ```rust
/// use translon_core::alignments::collapsed_count;
///
/// assert_eq!(collapsed_count("read12_x40"), 40);
/// assert_eq!(collapsed_count("SRR001.7"), 1);
/// ```
#[must_use]
pub fn collapsed_count(read_name: &str) -> u32 {
    read_name
        .rsplit_once(COLLAPSED_COUNT_MARKER)
        .and_then(|(_, count)| count.parse::<u32>().ok())
        .filter(|&count| count > 0)
        .unwrap_or(1)
}

/// Read primary mapped alignments from a SAM/BAM/CRAM file.
pub fn read_alignments<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<Alignment>, AlignmentReadStats), TranslonError> {
    let path = path.as_ref();
    let mut reader = bam::Reader::from_path(path).map_err(|e| {
        TranslonError::AlignmentError(format!("Failed to open {}: {e}", path.display()))
    })?;

    let header = reader.header().clone();
    let target_names: Vec<Arc<str>> = (0..header.target_count())
        .map(|tid| Arc::from(String::from_utf8_lossy(header.tid2name(tid)).as_ref()))
        .collect();

    let mut stats = AlignmentReadStats::default();
    let mut alignments = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| {
            TranslonError::AlignmentError(format!("Failed to decode {}: {e}", path.display()))
        })?;
        stats.records += 1;

        if record.is_unmapped() || record.tid() < 0 || record.pos() < 0 {
            stats.unmapped += 1;
            continue;
        }
        if record.is_secondary() || record.is_supplementary() {
            stats.non_primary += 1;
            continue;
        }

        let span = record.cigar().end_pos() - record.pos();
        let Some(chrom) = target_names.get(record.tid() as usize) else {
            stats.malformed += 1;
            continue;
        };
        if span <= 0 {
            stats.malformed += 1;
            continue;
        }

        let fragment_length = match record.seq_len() {
            0 => span as usize,
            n => n,
        };
        let read_name = String::from_utf8_lossy(record.qname());
        alignments.push(Alignment {
            chrom: Arc::clone(chrom),
            position: record.pos() as u64,
            strand: if record.is_reverse() {
                Strand::Reverse
            } else {
                Strand::Forward
            },
            length: fragment_length as u32,
            end: record.cigar().end_pos() as u64,
            count: collapsed_count(&read_name),
        });
        stats.used += 1;
    }

    log::info!(
        "Read {} alignment records from {} ({} used, {} unmapped, {} non-primary, {} malformed)",
        stats.records,
        path.display(),
        stats.used,
        stats.unmapped,
        stats.non_primary,
        stats.malformed
    );

    Ok((alignments, stats))
}
