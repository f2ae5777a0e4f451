use std::fmt;
use std::sync::Arc;

use bio::bio_types::strand::Strand;
use thiserror::Error;

/// A mapped ribosome-protected fragment.
///
/// Positions are 0-based on the reference. `length` is the fragment (read)
/// length used to look up P-site offsets, `end` the exclusive reference end,
/// which differs from `position + length` for spliced or clipped reads.
/// `count` is the multiplicity (collapsed reads carry a count above one).
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Reference sequence name
    pub chrom: Arc<str>,
    /// Leftmost aligned reference position (0-based)
    pub position: u64,
    /// Strand the fragment mapped to
    pub strand: Strand,
    /// Fragment length
    pub length: u32,
    /// Exclusive reference end of the aligned blocks
    pub end: u64,
    /// Number of reads this record stands for
    pub count: u32,
}

impl Alignment {
    /// Creates a single-count alignment.
    pub fn new(chrom: &str, position: u64, strand: Strand, length: u32) -> Self {
        Self {
            chrom: Arc::from(chrom),
            position,
            strand,
            length,
            end: position + u64::from(length),
            count: 1,
        }
    }

    /// Sets the multiplicity of the record.
    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Reference position of the fragment's 5' end.
    #[must_use]
    pub fn five_prime(&self) -> u64 {
        match self.strand {
            Strand::Reverse => self.end.saturating_sub(1).max(self.position),
            _ => self.position,
        }
    }
}

/// An annotated translation initiation site used as calibration reference.
///
/// `position` is the first base of the start codon in reading direction, so on
/// the reverse strand it is the highest coordinate of the codon.
#[derive(Debug, Clone, PartialEq)]
pub struct StartSite {
    pub chrom: String,
    pub position: u64,
    pub strand: Strand,
}

/// One exon of a transcript, 0-based half-open.
#[derive(Debug, Clone, PartialEq)]
pub struct Exon {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

impl Exon {
    pub fn new(chrom: &str, start: u64, end: u64, strand: Strand) -> Self {
        Self {
            chrom: chrom.to_string(),
            start,
            end,
            strand,
        }
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A transcript model: exons in transcript order plus its spliced sequence.
///
/// Exons are stored 5' to 3' along the transcript, which means descending
/// genomic order on the reverse strand.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Transcript identifier
    pub id: String,
    /// Strand of the transcript
    pub strand: Strand,
    /// Exons in transcript order
    pub exons: Arc<[Exon]>,
    /// Genomic position of the annotated start codon, if any
    pub cds_start: Option<u64>,
    /// Spliced sequence, uppercase
    pub sequence: Vec<u8>,
}

impl Transcript {
    /// Builds a transcript that is its own coordinate system.
    ///
    /// Used when transcript sequences are supplied directly: the transcript is
    /// a single forward exon on a reference named after the transcript.
    pub fn from_sequence(id: &str, sequence: &[u8]) -> Self {
        let exon = Exon::new(id, 0, sequence.len() as u64, Strand::Forward);
        Self {
            id: id.to_string(),
            strand: Strand::Forward,
            exons: Arc::from(vec![exon]),
            cds_start: None,
            sequence: sequence.to_ascii_uppercase(),
        }
    }

    /// Spliced length of the exon model.
    #[must_use]
    pub fn spliced_length(&self) -> u64 {
        self.exons.iter().map(Exon::len).sum()
    }

    /// Reference name of the transcript's first exon.
    #[must_use]
    pub fn chrom(&self) -> &str {
        self.exons.first().map_or("", |exon| exon.chrom.as_str())
    }
}

/// A candidate open reading frame in transcript-local coordinates.
///
/// `start` is the first base of the start codon and `stop` the first base of
/// the stop codon; `length` includes the stop codon.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOrf {
    /// Unique identifier, `<transcript>_<start>_<stop>`
    pub id: String,
    /// Transcript the ORF was found on
    pub transcript_id: String,
    /// Transcript-relative start codon position
    pub start: u64,
    /// Transcript-relative stop codon position
    pub stop: u64,
    /// ORF length in nucleotides, stop codon included
    pub length: u64,
    /// True when no in-frame stop was found before the transcript end
    pub run_off: bool,
    /// Exons of the parent transcript in transcript order
    pub exons: Arc<[Exon]>,
    /// Genomic position of the start codon's first base
    pub genomic_start: u64,
    /// Genomic position of the stop codon's last base
    pub genomic_stop: u64,
}

impl CandidateOrf {
    /// Strand of the parent transcript.
    #[must_use]
    pub fn strand(&self) -> Strand {
        self.exons.first().map_or(Strand::Unknown, |exon| exon.strand)
    }

    /// Reference name of the parent transcript.
    #[must_use]
    pub fn chrom(&self) -> &str {
        self.exons.first().map_or("", |exon| exon.chrom.as_str())
    }

    /// Spliced length of the parent transcript.
    #[must_use]
    pub fn transcript_length(&self) -> u64 {
        self.exons.iter().map(Exon::len).sum()
    }

    /// Lowest and highest genomic coordinate covered by the ORF.
    #[must_use]
    pub fn genomic_span(&self) -> (u64, u64) {
        (
            self.genomic_start.min(self.genomic_stop),
            self.genomic_start.max(self.genomic_stop),
        )
    }
}

/// Scoring algorithm selector.
///
/// A closed two-way choice so that the scorer's dispatch stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringAlgorithm {
    /// Periodicity ratio only
    #[default]
    Legacy,
    /// Periodicity combined with the Start Rise Up metric
    StartRiseUp,
}

impl ScoringAlgorithm {
    /// Maps the boolean "new algorithm" switch onto the two variants.
    #[must_use]
    pub const fn from_new_flag(use_new: bool) -> Self {
        if use_new {
            Self::StartRiseUp
        } else {
            Self::Legacy
        }
    }

    /// Identifier written into output tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::StartRiseUp => "start_rise_up",
        }
    }
}

impl fmt::Display for ScoringAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScoringAlgorithm {
    type Err = TranslonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "start_rise_up" => Ok(Self::StartRiseUp),
            other => Err(TranslonError::MalformedInput(format!(
                "unknown scoring algorithm '{other}'"
            ))),
        }
    }
}

/// Sub-metrics supporting an ORF score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrfMetrics {
    /// Signal on the first base of each codon in the ORF body
    pub in_frame: f64,
    /// Signal on the second and third base of each codon
    pub off_frame: f64,
    /// Fraction of body signal that is in frame
    pub periodicity: f64,
    /// Normalised downstream-versus-upstream rise at the start codon
    pub start_rise_up: Option<f64>,
}

impl OrfMetrics {
    #[must_use]
    pub fn total_signal(&self) -> f64 {
        self.in_frame + self.off_frame
    }
}

impl fmt::Display for OrfMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in_frame={:.2};off_frame={:.2};periodicity={:.4}",
            self.in_frame, self.off_frame, self.periodicity
        )?;
        if let Some(sru) = self.start_rise_up {
            write!(f, ";sru={sru:.4}")?;
        }
        Ok(())
    }
}

/// A candidate ORF with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredOrf {
    pub orf: CandidateOrf,
    pub algorithm: ScoringAlgorithm,
    pub score: f64,
    pub metrics: OrfMetrics,
}

/// A scored ORF with the occupancy window around its start.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub scored: ScoredOrf,
    /// First transcript-relative position of the window
    pub window_start: u64,
    /// Last transcript-relative position of the window (inclusive)
    pub window_end: u64,
    /// Occupancy per position from `window_start` to `window_end`
    pub values: Vec<f64>,
}

impl ReportRecord {
    /// Position of the start codon relative to the window's first value.
    #[must_use]
    pub fn start_index(&self) -> usize {
        (self.scored.orf.start - self.window_start) as usize
    }
}

/// Error types that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum TranslonError {
    /// Missing or contradictory inputs for the requested run
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A coordinate lies outside declared chromosome or transcript bounds
    #[error("Coordinate error: {0}")]
    Coordinate(String),
    /// A record does not have the expected shape
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Alignment file could not be opened or decoded
    #[error("Alignment error: {0}")]
    AlignmentError(String),
}
