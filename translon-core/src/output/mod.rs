//! Output tables and tracks.
//!
//! This module provides writers for every artifact of a run, plus readers for
//! the tables that can be fed back in as precomputed inputs.
//!
//! ## Supported Formats
//!
//! - **bedGraph / Wiggle**: occupancy tracks, one file per strand
//! - **ORF table**: candidate ORFs with their exon lists (TSV)
//! - **Scored table**: ORF columns plus algorithm, score and sub-metrics (TSV)
//! - **Report / metagene**: windowed occupancy per ORF and its summary (TSV)
//!
//! ## Examples
//!
//! ```rust
//! use translon_core::output::{read_orf_table, write_orf_table};
//! use translon_core::types::Transcript;
//! use translon_core::orf::extract_candidates;
//! use translon_core::config::TranslonConfig;
//! use std::io::Cursor;
//!
//! let transcripts = vec![Transcript::from_sequence("tx1", b"CCATGAAATGA")];
//! let (orfs, _) = extract_candidates(&transcripts, &TranslonConfig::default())?;
//!
//! let mut buffer = Vec::new();
//! write_orf_table(&mut buffer, &orfs)?;
//! let (read_back, malformed) = read_orf_table(Cursor::new(buffer))?;
//! assert_eq!(read_back, orfs);
//! assert_eq!(malformed, 0);
//! # Ok::<(), translon_core::types::TranslonError>(())
//! ```

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use bio::bio_types::strand::Strand;

use crate::config::TrackFormat;
use crate::report::MetagenePoint;
use crate::track::OccupancyTrack;
use crate::{CandidateOrf, ReportRecord, ScoredOrf, TranslonError};

mod formats {
    pub mod bedgraph;
    pub mod orf_table;
    pub mod report_table;
    pub mod scored_table;
    pub mod wiggle;
}

use formats::{
    bedgraph::write_bedgraph_format,
    orf_table::{read_orf_table_format, write_orf_table_format},
    report_table::{write_metagene_format, write_report_format},
    scored_table::{read_scored_table_format, write_scored_table_format},
    wiggle::write_wiggle_format,
};

pub(crate) const fn strand_symbol(strand: Strand) -> char {
    match strand {
        Strand::Forward => '+',
        Strand::Reverse => '-',
        Strand::Unknown => '.',
    }
}

pub(crate) fn parse_strand(symbol: &str) -> Option<Strand> {
    match symbol {
        "+" => Some(Strand::Forward),
        "-" => Some(Strand::Reverse),
        _ => None,
    }
}

/// Writes one strand of an occupancy track in the requested format.
///
/// # Errors
///
/// Returns [`TranslonError`] if writing fails.
pub fn write_track<W: Write>(
    writer: &mut W,
    track: &OccupancyTrack,
    strand: Strand,
    format: TrackFormat,
    name: &str,
) -> Result<(), TranslonError> {
    match format {
        TrackFormat::BedGraph => write_bedgraph_format(writer, track, strand, name),
        TrackFormat::Wiggle => write_wiggle_format(writer, track, strand, name),
    }
}

/// Writes candidate ORFs as a TSV table.
pub fn write_orf_table<W: Write>(writer: &mut W, orfs: &[CandidateOrf]) -> Result<(), TranslonError> {
    write_orf_table_format(writer, orfs)
}

/// Reads a candidate ORF table; returns the ORFs and the number of skipped rows.
pub fn read_orf_table<R: BufRead>(reader: R) -> Result<(Vec<CandidateOrf>, usize), TranslonError> {
    read_orf_table_format(reader)
}

/// Writes scored ORFs as a TSV table.
pub fn write_scored_table<W: Write>(
    writer: &mut W,
    scored: &[ScoredOrf],
) -> Result<(), TranslonError> {
    write_scored_table_format(writer, scored)
}

/// Reads a scored ORF table; returns the ORFs and the number of skipped rows.
pub fn read_scored_table<R: BufRead>(reader: R) -> Result<(Vec<ScoredOrf>, usize), TranslonError> {
    read_scored_table_format(reader)
}

/// Writes report records as a TSV table.
pub fn write_report<W: Write>(writer: &mut W, records: &[ReportRecord]) -> Result<(), TranslonError> {
    write_report_format(writer, records)
}

/// Writes the metagene summary as a TSV table.
pub fn write_metagene<W: Write>(
    writer: &mut W,
    points: &[MetagenePoint],
) -> Result<(), TranslonError> {
    write_metagene_format(writer, points)
}

/// File names of every artifact, derived from one output stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub offsets: PathBuf,
    pub track_forward: PathBuf,
    pub track_reverse: PathBuf,
    pub orfs: PathBuf,
    pub scored: PathBuf,
    pub report: PathBuf,
    pub metagene: PathBuf,
}

impl OutputPaths {
    /// Paths `<stem>.<suffix>` for each artifact.
    ///
    /// ```rust
    /// use translon_core::config::TrackFormat;
    /// use translon_core::output::OutputPaths;
    /// use std::path::Path;
    ///
    /// let paths = OutputPaths::from_stem(Path::new("out/sample"), TrackFormat::Wiggle);
    /// assert_eq!(paths.track_reverse, Path::new("out/sample.rev.wig"));
    /// assert_eq!(paths.scored, Path::new("out/sample.scored.tsv"));
    /// ```
    #[must_use]
    pub fn from_stem(stem: &Path, track_format: TrackFormat) -> Self {
        let with_suffix = |suffix: &str| {
            let mut name = stem.as_os_str().to_os_string();
            name.push(".");
            name.push(suffix);
            PathBuf::from(name)
        };
        let ext = track_format.extension();
        Self {
            offsets: with_suffix("offsets.tsv"),
            track_forward: with_suffix(&format!("fwd.{ext}")),
            track_reverse: with_suffix(&format!("rev.{ext}")),
            orfs: with_suffix("orfs.tsv"),
            scored: with_suffix("scored.tsv"),
            report: with_suffix("report.tsv"),
            metagene: with_suffix("metagene.tsv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::ChromSizes;

    #[test]
    fn test_strand_symbols() {
        for strand in [Strand::Forward, Strand::Reverse] {
            assert_eq!(
                parse_strand(&strand_symbol(strand).to_string()),
                Some(strand)
            );
        }
        assert_eq!(strand_symbol(Strand::Unknown), '.');
        assert_eq!(parse_strand("."), None);
    }

    #[test]
    fn test_write_track_dispatches_on_format() {
        let mut sizes = ChromSizes::new();
        sizes.insert("chr1".to_string(), 10);
        let mut track = OccupancyTrack::new(sizes);
        track.add("chr1", Strand::Forward, 3, 2.0).unwrap();

        for (format, header) in [
            (TrackFormat::BedGraph, "track type=bedGraph"),
            (TrackFormat::Wiggle, "track type=wiggle_0"),
        ] {
            let mut buffer = Vec::new();
            write_track(&mut buffer, &track, Strand::Forward, format, "t").unwrap();
            let text = String::from_utf8(buffer).unwrap();
            assert!(text.starts_with(header), "unexpected header for {format:?}");
        }
    }

    #[test]
    fn test_output_paths_keep_dotted_stems() {
        let paths = OutputPaths::from_stem(Path::new("run.v2"), TrackFormat::BedGraph);
        assert_eq!(paths.offsets, Path::new("run.v2.offsets.tsv"));
        assert_eq!(paths.track_forward, Path::new("run.v2.fwd.bedgraph"));
        assert_eq!(paths.metagene, Path::new("run.v2.metagene.tsv"));
    }
}
