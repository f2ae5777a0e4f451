//! ORF scoring against an occupancy track.
//!
//! ## Algorithms
//!
//! - [`ScoringAlgorithm::Legacy`]: periodicity ratio of in-frame to total
//!   signal over the ORF body ([`legacy`]).
//! - [`ScoringAlgorithm::StartRiseUp`]: the periodicity ratio combined with
//!   the rise in occupancy at the start codon ([`start_rise_up`]).
//!
//! Both produce scores in `[0, 1]` and score an ORF without signal as
//! [`ZERO_SIGNAL_SCORE`](crate::constants::ZERO_SIGNAL_SCORE).

pub mod legacy;
pub mod start_rise_up;

use bio::bio_types::strand::Strand;
use rayon::prelude::*;

use crate::constants::CODON_LENGTH;
use crate::track::OccupancyTrack;
use crate::types::{CandidateOrf, Exon, OrfMetrics, ScoredOrf, ScoringAlgorithm, TranslonError};

/// Occupancy along a transcript for positions `from..to`.
///
/// Positions are transcript-relative; positions beyond the spliced end are
/// not returned, so the result may be shorter than `to - from`. Positions
/// outside the track's chromosome bounds read as zero.
#[must_use]
pub fn occupancy_profile(exons: &[Exon], track: &OccupancyTrack, from: u64, to: u64) -> Vec<f64> {
    let mut values = Vec::with_capacity(to.saturating_sub(from) as usize);
    let mut walked = 0;

    for exon in exons {
        let exon_from = walked;
        let exon_to = walked + exon.len();
        walked = exon_to;

        for offset in from.max(exon_from)..to.min(exon_to) {
            let within = offset - exon_from;
            let genomic = match exon.strand {
                Strand::Reverse => exon.end - 1 - within,
                _ => exon.start + within,
            };
            values.push(
                track
                    .value_at(&exon.chrom, exon.strand, genomic)
                    .unwrap_or(0.0),
            );
        }
        if walked >= to {
            break;
        }
    }
    values
}

/// Settings shared by both scoring algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringSettings {
    pub algorithm: ScoringAlgorithm,
    /// Width of each Start Rise Up window
    pub sru_range: u64,
}

/// Score a single ORF.
///
/// The result depends only on the ORF, the track and the settings.
#[must_use]
pub fn score_orf(orf: &CandidateOrf, track: &OccupancyTrack, settings: ScoringSettings) -> ScoredOrf {
    let body = occupancy_profile(
        &orf.exons,
        track,
        orf.start,
        orf.stop + CODON_LENGTH as u64,
    );
    let periodicity = legacy::periodicity(&body);

    let (score, metrics) = match settings.algorithm {
        ScoringAlgorithm::Legacy => (periodicity.periodicity, periodicity),
        ScoringAlgorithm::StartRiseUp => {
            let rise = start_rise_up::start_rise_up(orf, track, settings.sru_range);
            let score = start_rise_up::combined_score(&periodicity, rise);
            (
                score,
                OrfMetrics {
                    start_rise_up: Some(rise),
                    ..periodicity
                },
            )
        }
    };

    ScoredOrf {
        orf: orf.clone(),
        algorithm: settings.algorithm,
        score,
        metrics,
    }
}

/// Whether the genomic span of `orf` lies within the track's chromosome.
fn within_track(orf: &CandidateOrf, track: &OccupancyTrack) -> bool {
    let (_, hi) = orf.genomic_span();
    track.contains(orf.chrom(), hi)
}

/// Counters from a scoring pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringStats {
    pub scored: usize,
    /// ORFs outside the track's chromosome bounds
    pub out_of_bounds: usize,
    /// Scored ORFs without any body signal
    pub zero_signal: usize,
}

/// Score all candidates in parallel, preserving input order.
///
/// Candidates outside the track's declared chromosomes are skipped and
/// counted.
///
/// # Errors
///
/// Returns [`TranslonError::Coordinate`] when candidates were given but none
/// lies within the track.
pub fn score_candidates(
    candidates: &[CandidateOrf],
    track: &OccupancyTrack,
    settings: ScoringSettings,
) -> Result<(Vec<ScoredOrf>, ScoringStats), TranslonError> {
    let results: Vec<Option<ScoredOrf>> = candidates
        .par_iter()
        .map(|orf| within_track(orf, track).then(|| score_orf(orf, track, settings)))
        .collect();

    let mut stats = ScoringStats::default();
    let mut scored = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Some(orf) => {
                if orf.metrics.total_signal() == 0.0 {
                    stats.zero_signal += 1;
                }
                scored.push(orf);
            }
            None => stats.out_of_bounds += 1,
        }
    }
    stats.scored = scored.len();

    if stats.out_of_bounds > 0 {
        log::warn!(
            "Skipped {} candidate ORFs outside the occupancy track bounds",
            stats.out_of_bounds
        );
    }
    if scored.is_empty() && !candidates.is_empty() {
        return Err(TranslonError::Coordinate(format!(
            "none of {} candidate ORFs lies within the occupancy track",
            candidates.len()
        )));
    }
    log::info!(
        "Scored {} ORFs with the {} algorithm ({} without signal)",
        stats.scored,
        settings.algorithm,
        stats.zero_signal
    );
    Ok((scored, stats))
}
