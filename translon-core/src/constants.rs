// =============================================================================
// Sequence
// =============================================================================

/// Length of a codon in base pairs
pub const CODON_LENGTH: usize = 3;

/// Number of reading frames on one strand
pub const READING_FRAMES: usize = 3;

/// Default start codons
pub const DEFAULT_START_CODONS: &[&str] = &["ATG"];

/// Default stop codons
pub const DEFAULT_STOP_CODONS: &[&str] = &["TAA", "TAG", "TGA"];

// =============================================================================
// ORF extraction
// =============================================================================

/// Default minimum ORF length in nucleotides (stop codon included)
pub const DEFAULT_MIN_ORF_LENGTH: u64 = 0;

/// Default maximum ORF length in nucleotides (stop codon included)
pub const DEFAULT_MAX_ORF_LENGTH: u64 = 1_000_000;

// =============================================================================
// Offset calibration
// =============================================================================

/// P-site offset applied to fragment lengths without a calibrated entry
pub const DEFAULT_OFFSET: i64 = 15;

/// Minimum number of supporting reads before a length gets its own offset
pub const MIN_CALIBRATION_READS: u64 = 10;

/// Largest 5'-end to start-codon distance considered during calibration
pub const MAX_CALIBRATION_OFFSET: u64 = 30;

/// Last metagene position (relative to the start codon) scanned for a change point
pub const CHANGE_POINT_LAST_POSITION: i64 = 10;

/// Number of profile bins on each side of a change-point split
pub const CHANGE_POINT_FLANK: i64 = 4;

// =============================================================================
// Scoring
// =============================================================================

/// Default half-width of the report window around the start codon
pub const DEFAULT_RANGE_PARAM: u64 = 30;

/// Default width of each Start Rise Up comparison window
pub const DEFAULT_SRU_RANGE: u64 = 15;

/// Weight of the rescaled Start Rise Up value in the combined score.
///
/// The remaining `1 - START_RISE_UP_WEIGHT` goes to the periodicity ratio.
pub const START_RISE_UP_WEIGHT: f64 = 0.5;

/// Score assigned to ORFs without any signal, the minimum of both algorithms
pub const ZERO_SIGNAL_SCORE: f64 = 0.0;

// =============================================================================
// Input parsing
// =============================================================================

/// Read-name marker preceding the multiplicity of a collapsed read
pub const COLLAPSED_COUNT_MARKER: &str = "_x";
