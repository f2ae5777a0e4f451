use std::fmt;

use crate::alignments::AlignmentReadStats;
use crate::calibration::OffsetTable;
use crate::orf::ExtractionStats;
use crate::report::MetagenePoint;
use crate::scoring::ScoringStats;
use crate::track::{OccupancyTrack, TrackStats};
use crate::types::{CandidateOrf, ReportRecord, ScoredOrf};

/// A pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Calibration,
    TrackBuild,
    TrackLoad,
    Extraction,
    CandidateLoad,
    Scoring,
    ScoredLoad,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Calibration => "calibration",
            Self::TrackBuild => "track build",
            Self::TrackLoad => "track load",
            Self::Extraction => "ORF extraction",
            Self::CandidateLoad => "candidate load",
            Self::Scoring => "scoring",
            Self::ScoredLoad => "scored load",
            Self::Report => "report",
        })
    }
}

/// What ran and what was skipped during a run.
///
/// Every per-record skip is counted here so it can be reported at the end,
/// even when the stage itself succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Stages in the order they ran
    pub stages: Vec<Stage>,
    /// Input rows or strings that did not have the expected shape
    pub malformed_records: usize,
    pub alignments: Option<AlignmentReadStats>,
    pub track: Option<TrackStats>,
    pub extraction: Option<ExtractionStats>,
    pub scoring: Option<ScoringStats>,
    /// Scored ORFs whose start lies outside the track
    pub report_skipped: usize,
}

impl RunSummary {
    pub(crate) fn ran(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Records skipped because of coordinates outside declared bounds.
    #[must_use]
    pub fn coordinate_skips(&self) -> u64 {
        self.track.as_ref().map_or(0, TrackStats::skipped)
            + self.extraction.as_ref().map_or(0, |s| s.inconsistent as u64)
            + self.scoring.as_ref().map_or(0, |s| s.out_of_bounds as u64)
            + self.report_skipped as u64
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<String> = self.stages.iter().map(ToString::to_string).collect();
        write!(
            f,
            "stages run: {}; malformed records skipped: {}; out-of-bounds records skipped: {}",
            if stages.is_empty() {
                "none".to_string()
            } else {
                stages.join(", ")
            },
            self.malformed_records,
            self.coordinate_skips()
        )
    }
}

/// Everything produced by a pipeline run.
///
/// # Examples
///
/// ```rust,no_run
/// use translon_core::engine::TranslonAnalyzer;
/// use translon_core::config::TranslonConfig;
/// use translon_core::pipeline::PipelineInputs;
/// use std::path::Path;
///
/// let inputs = PipelineInputs {
///     tracks: vec!["sample.fwd.bedgraph".into(), "sample.rev.bedgraph".into()],
///     transcripts: Some("transcripts.fa".into()),
///     ..Default::default()
/// };
/// let analyzer = TranslonAnalyzer::new(TranslonConfig::default());
/// let results = analyzer.run(&inputs, Path::new("out/sample"))?;
///
/// for record in results.records.iter().take(5) {
///     println!("{}\t{:.3}", record.scored.orf.id, record.scored.score);
/// }
/// println!("{}", results.summary);
/// # Ok::<(), translon_core::types::TranslonError>(())
/// ```
#[derive(Debug)]
pub struct PipelineResults {
    /// Offsets used to build the track, if it was built here
    pub offsets: Option<OffsetTable>,
    pub track: OccupancyTrack,
    /// Candidates, empty when a scored table was supplied
    pub candidates: Vec<CandidateOrf>,
    pub scored: Vec<ScoredOrf>,
    pub records: Vec<ReportRecord>,
    pub metagene: Vec<MetagenePoint>,
    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let mut summary = RunSummary::default();
        assert_eq!(
            summary.to_string(),
            "stages run: none; malformed records skipped: 0; out-of-bounds records skipped: 0"
        );

        summary.ran(Stage::TrackLoad);
        summary.ran(Stage::Scoring);
        summary.malformed_records = 2;
        summary.scoring = Some(ScoringStats {
            scored: 4,
            out_of_bounds: 3,
            zero_signal: 0,
        });
        summary.report_skipped = 1;
        assert_eq!(
            summary.to_string(),
            "stages run: track load, scoring; malformed records skipped: 2; out-of-bounds records skipped: 4"
        );
    }
}
