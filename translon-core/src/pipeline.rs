//! Input combinations and the stages they select.
//!
//! A run always ends in a report, which needs scored ORFs and an occupancy
//! track. Each of those can be supplied precomputed or derived from raw
//! inputs:
//!
//! | artifact | supplied by |
//! | --- | --- |
//! | occupancy track | bedGraph files, or alignments + chromosome sizes + (offset table or annotation) |
//! | candidate ORFs | ORF table, or transcript FASTA, or genome FASTA + annotation |
//! | scored ORFs | scored table, or candidate ORFs + track |
//!
//! [`PipelineInputs::plan`] checks this before any file is opened and names
//! every missing input at once.

use std::path::PathBuf;

use crate::types::TranslonError;

/// Optional input files of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineInputs {
    /// SAM/BAM/CRAM alignments
    pub alignments: Option<PathBuf>,
    /// Two-column chromosome sizes
    pub chrom_sizes: Option<PathBuf>,
    /// Genome FASTA
    pub genome: Option<PathBuf>,
    /// Transcript sequences FASTA; each record is its own coordinate system
    pub transcripts: Option<PathBuf>,
    /// GTF annotation
    pub annotation: Option<PathBuf>,
    /// Precomputed offset table
    pub offsets: Option<PathBuf>,
    /// Precomputed occupancy track (signed bedGraph, one or more files)
    pub tracks: Vec<PathBuf>,
    /// Precomputed candidate ORF table
    pub orfs: Option<PathBuf>,
    /// Precomputed scored ORF table
    pub scored: Option<PathBuf>,
}

/// Where per-length offsets come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetSource {
    Table(PathBuf),
    /// Calibrate against annotated start codons
    Calibrate { annotation: PathBuf },
}

/// Where chromosome bounds for a built track come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundsSource {
    ChromSizes(PathBuf),
    /// Transcript FASTA lengths, for alignments against transcript sequences
    TranscriptLengths(PathBuf),
}

/// How the occupancy track is obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    Precomputed {
        files: Vec<PathBuf>,
        /// Bounds for the loaded track; inferred from the files when absent
        bounds: Option<BoundsSource>,
    },
    Build {
        alignments: PathBuf,
        bounds: BoundsSource,
        offsets: OffsetSource,
    },
}

/// How candidate ORFs are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    Table(PathBuf),
    Transcripts(PathBuf),
    GenomeAnnotation { genome: PathBuf, annotation: PathBuf },
}

/// How scored ORFs are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoredSource {
    Table(PathBuf),
    Score(CandidateSource),
}

/// Coordinate system alignments and start sites are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    Genomic,
    /// References are transcripts, as in a transcript FASTA
    Transcript,
}

/// The stages a set of inputs selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub track: TrackSource,
    pub scored: ScoredSource,
    pub coordinates: CoordinateSystem,
}

impl PipelineInputs {
    /// Coordinate system implied by the inputs.
    ///
    /// Transcript FASTA without a genome means alignments and annotation
    /// refer to transcripts.
    #[must_use]
    pub fn coordinate_system(&self) -> CoordinateSystem {
        if self.transcripts.is_some() && self.genome.is_none() {
            CoordinateSystem::Transcript
        } else {
            CoordinateSystem::Genomic
        }
    }

    fn bounds_source(&self) -> Option<BoundsSource> {
        match (&self.chrom_sizes, &self.transcripts) {
            (Some(sizes), _) => Some(BoundsSource::ChromSizes(sizes.clone())),
            (None, Some(transcripts)) if self.genome.is_none() => {
                Some(BoundsSource::TranscriptLengths(transcripts.clone()))
            }
            _ => None,
        }
    }

    fn track_source(&self, missing: &mut Vec<&'static str>) -> Option<TrackSource> {
        if !self.tracks.is_empty() {
            return Some(TrackSource::Precomputed {
                files: self.tracks.clone(),
                bounds: self.bounds_source(),
            });
        }

        let Some(alignments) = &self.alignments else {
            missing.push("--track, or --alignments to build an occupancy track");
            return None;
        };

        let bounds = self.bounds_source();
        if bounds.is_none() {
            missing.push("--chrom-sizes to bound the occupancy track");
        }

        let offsets = match (&self.offsets, &self.annotation) {
            (Some(table), _) => Some(OffsetSource::Table(table.clone())),
            (None, Some(annotation)) => Some(OffsetSource::Calibrate {
                annotation: annotation.clone(),
            }),
            (None, None) => {
                missing.push("--offsets, or --annotation with start codons for offset calibration");
                None
            }
        };

        Some(TrackSource::Build {
            alignments: alignments.clone(),
            bounds: bounds?,
            offsets: offsets?,
        })
    }

    fn scored_source(&self, missing: &mut Vec<&'static str>) -> Option<ScoredSource> {
        if let Some(table) = &self.scored {
            return Some(ScoredSource::Table(table.clone()));
        }
        if let Some(table) = &self.orfs {
            return Some(ScoredSource::Score(CandidateSource::Table(table.clone())));
        }
        if let Some(transcripts) = &self.transcripts {
            return Some(ScoredSource::Score(CandidateSource::Transcripts(
                transcripts.clone(),
            )));
        }
        match (&self.genome, &self.annotation) {
            (Some(genome), Some(annotation)) => {
                Some(ScoredSource::Score(CandidateSource::GenomeAnnotation {
                    genome: genome.clone(),
                    annotation: annotation.clone(),
                }))
            }
            (Some(_), None) => {
                missing.push("--annotation to assemble transcripts from --genome");
                None
            }
            _ => {
                missing.push("--scored, --orfs, --transcripts, or --genome with --annotation for candidate ORFs");
                None
            }
        }
    }

    /// Decide which stages run.
    ///
    /// # Errors
    ///
    /// Returns [`TranslonError::Configuration`] naming every missing input
    /// when the inputs cannot produce a report.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use translon_core::pipeline::{PipelineInputs, ScoredSource, TrackSource};
    ///
    /// let inputs = PipelineInputs {
    ///     alignments: Some("reads.bam".into()),
    ///     ..Default::default()
    /// };
    /// let err = inputs.plan().unwrap_err().to_string();
    /// assert!(err.contains("--chrom-sizes"));
    /// assert!(err.contains("--offsets"));
    /// assert!(err.contains("--orfs"));
    /// ```
    pub fn plan(&self) -> Result<StagePlan, TranslonError> {
        let mut missing = Vec::new();
        let track = self.track_source(&mut missing);
        let scored = self.scored_source(&mut missing);

        match (track, scored) {
            (Some(track), Some(scored)) if missing.is_empty() => Ok(StagePlan {
                track,
                scored,
                coordinates: self.coordinate_system(),
            }),
            _ => Err(TranslonError::Configuration(format!(
                "missing required inputs: {}",
                missing.join("; ")
            ))),
        }
    }
}
