use crate::constants::{
    DEFAULT_MAX_ORF_LENGTH, DEFAULT_MIN_ORF_LENGTH, DEFAULT_OFFSET, DEFAULT_RANGE_PARAM,
    DEFAULT_SRU_RANGE, DEFAULT_START_CODONS, DEFAULT_STOP_CODONS, MAX_CALIBRATION_OFFSET,
    MIN_CALIBRATION_READS,
};
use crate::types::ScoringAlgorithm;

/// Output format for occupancy tracks.
///
/// Both formats are written as one file per strand.
///
/// # Examples
///
/// ```rust
/// use translon_core::config::{TrackFormat, TranslonConfig};
///
/// let config = TranslonConfig {
///     track_format: TrackFormat::Wiggle,
///     ..Default::default()
/// };
/// assert_eq!(config.track_format.extension(), "wig");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackFormat {
    /// bedGraph with reverse-strand values written negative.
    ///
    /// Can be read back as a precomputed track.
    #[default]
    BedGraph,

    /// Wiggle `variableStep` blocks, one per chromosome.
    Wiggle,
}

impl TrackFormat {
    /// File extension used for generated track files.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::BedGraph => "bedgraph",
            Self::Wiggle => "wig",
        }
    }
}

/// How a per-length offset is derived from the calibration profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationMethod {
    /// Most frequent 5'-end to start-codon distance.
    ///
    /// Ties resolve to the smallest distance.
    #[default]
    Mode,

    /// Position of the sharpest rise in the metagene profile of 5' ends
    /// around annotated start codons.
    ChangePoint,
}

/// Ordering of report records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportOrder {
    /// Keep the order in which ORFs were scored
    #[default]
    Input,
    /// Highest score first; ties keep input order
    ScoreDescending,
}

/// Configuration settings for a Translon run.
///
/// Every field has a default matching the command line defaults, so the
/// struct-update syntax is the usual way to override a few of them.
///
/// # Examples
///
/// ```rust
/// use translon_core::config::TranslonConfig;
/// use translon_core::types::ScoringAlgorithm;
///
/// let config = TranslonConfig {
///     algorithm: ScoringAlgorithm::StartRiseUp,
///     min_orf_length: 30,
///     ..Default::default()
/// };
/// assert_eq!(config.sru_range, 15);
/// ```
#[derive(Debug, Clone)]
pub struct TranslonConfig {
    /// Start codons, exact three-letter nucleotide strings.
    ///
    /// **Default**: `ATG`
    pub start_codons: Vec<String>,

    /// Stop codons, exact three-letter nucleotide strings.
    ///
    /// **Default**: `TAA`, `TAG`, `TGA`
    pub stop_codons: Vec<String>,

    /// Minimum ORF length in nucleotides, stop codon included.
    ///
    /// **Default**: 0
    pub min_orf_length: u64,

    /// Maximum ORF length in nucleotides, stop codon included.
    ///
    /// **Default**: 1,000,000
    pub max_orf_length: u64,

    /// Report start codons without an in-frame stop before the transcript end.
    ///
    /// **Default**: `false`
    pub allow_run_off: bool,

    /// Scoring algorithm.
    ///
    /// **Default**: [`ScoringAlgorithm::Legacy`]
    pub algorithm: ScoringAlgorithm,

    /// Half-width of the report window around each ORF start.
    ///
    /// **Default**: 30
    pub range_param: u64,

    /// Width of each of the two Start Rise Up windows.
    ///
    /// **Default**: 15
    pub sru_range: u64,

    /// Offset for fragment lengths missing from the offset table.
    ///
    /// **Default**: 15
    pub default_offset: i64,

    /// Reads required before a fragment length gets a calibrated offset.
    ///
    /// **Default**: 10
    pub min_calibration_reads: u64,

    /// Largest distance between a 5' end and a start codon used in calibration.
    ///
    /// **Default**: 30
    pub max_calibration_offset: u64,

    /// Calibration statistic.
    ///
    /// **Default**: [`CalibrationMethod::Mode`]
    pub calibration_method: CalibrationMethod,

    /// Ordering of report records.
    ///
    /// **Default**: [`ReportOrder::Input`]
    pub report_order: ReportOrder,

    /// Format of written occupancy tracks.
    ///
    /// **Default**: [`TrackFormat::BedGraph`]
    pub track_format: TrackFormat,

    /// Size of the rayon thread pool; `None` keeps rayon's default.
    pub num_threads: Option<usize>,
}

impl Default for TranslonConfig {
    fn default() -> Self {
        Self {
            start_codons: DEFAULT_START_CODONS.iter().map(|c| c.to_string()).collect(),
            stop_codons: DEFAULT_STOP_CODONS.iter().map(|c| c.to_string()).collect(),
            min_orf_length: DEFAULT_MIN_ORF_LENGTH,
            max_orf_length: DEFAULT_MAX_ORF_LENGTH,
            allow_run_off: false,
            algorithm: ScoringAlgorithm::Legacy,
            range_param: DEFAULT_RANGE_PARAM,
            sru_range: DEFAULT_SRU_RANGE,
            default_offset: DEFAULT_OFFSET,
            min_calibration_reads: MIN_CALIBRATION_READS,
            max_calibration_offset: MAX_CALIBRATION_OFFSET,
            calibration_method: CalibrationMethod::Mode,
            report_order: ReportOrder::Input,
            track_format: TrackFormat::BedGraph,
            num_threads: None,
        }
    }
}
