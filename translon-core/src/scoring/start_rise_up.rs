//! Start Rise Up: the jump in occupancy at the start codon.
//!
//! ```text
//! sru = (mean_down - mean_up) / (mean_down + mean_up)
//! down = [start, start + sru_range)
//! up   = [start - sru_range, start)
//! ```
//!
//! Both windows are clipped to the transcript. The value lies in `[-1, 1]`
//! and is `1` when all signal is downstream of the start.

use crate::constants::{START_RISE_UP_WEIGHT, ZERO_SIGNAL_SCORE};
use crate::track::OccupancyTrack;
use crate::types::{CandidateOrf, OrfMetrics};

use super::occupancy_profile;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Start Rise Up of `orf` with windows of `sru_range` bases.
///
/// An ORF without signal in either window has no rise and gets `0.0`.
#[must_use]
pub fn start_rise_up(orf: &CandidateOrf, track: &OccupancyTrack, sru_range: u64) -> f64 {
    let down_end = (orf.start + sru_range).min(orf.transcript_length());
    let up = occupancy_profile(
        &orf.exons,
        track,
        orf.start.saturating_sub(sru_range),
        orf.start,
    );
    let down = occupancy_profile(&orf.exons, track, orf.start, down_end);
    rise(mean(&down), mean(&up))
}

/// Normalised difference of two window means.
#[must_use]
pub fn rise(mean_down: f64, mean_up: f64) -> f64 {
    let total = mean_down + mean_up;
    if total > 0.0 {
        (mean_down - mean_up) / total
    } else {
        0.0
    }
}

/// Combines periodicity and Start Rise Up into one score in `[0, 1]`.
///
/// The rise is rescaled from `[-1, 1]` to `[0, 1]` and weighted by
/// [`START_RISE_UP_WEIGHT`]; periodicity takes the remaining weight. An ORF
/// without body signal scores [`ZERO_SIGNAL_SCORE`].
#[must_use]
pub fn combined_score(periodicity: &OrfMetrics, start_rise_up: f64) -> f64 {
    if periodicity.total_signal() <= 0.0 {
        return ZERO_SIGNAL_SCORE;
    }
    START_RISE_UP_WEIGHT * (start_rise_up + 1.0) / 2.0
        + (1.0 - START_RISE_UP_WEIGHT) * periodicity.periodicity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::{forward_orf, track_with};
    use crate::scoring::{ScoringSettings, score_orf};
    use crate::types::ScoringAlgorithm;

    #[test]
    fn test_signal_only_downstream_is_full_rise() {
        let values: Vec<_> = (50..60).map(|p| (p, 1.0)).collect();
        let track = track_with(200, &values);
        let orf = forward_orf(50, 80, 120);
        let sru = start_rise_up(&orf, &track, 10);
        assert!(sru > 0.0);
        assert_eq!(sru, 1.0);
    }

    #[test]
    fn test_fifteen_base_windows_with_downstream_signal_rise_reproducibly() {
        let values: Vec<_> = (50..65).map(|p| (p, 10.0)).collect();
        let track = track_with(200, &values);
        let orf = forward_orf(50, 80, 120);

        let first = start_rise_up(&orf, &track, 15);
        assert!(first > 0.0);
        assert_eq!(first, start_rise_up(&orf, &track, 15));

        let settings = ScoringSettings {
            algorithm: ScoringAlgorithm::StartRiseUp,
            sru_range: 15,
        };
        let scored = score_orf(&orf, &track, settings);
        assert_eq!(scored.metrics.start_rise_up, Some(first));
        assert_eq!(scored, score_orf(&orf, &track, settings));
    }

    #[test]
    fn test_signal_only_upstream_is_full_drop() {
        let values: Vec<_> = (40..50).map(|p| (p, 3.0)).collect();
        let track = track_with(200, &values);
        let orf = forward_orf(50, 80, 120);
        assert_eq!(start_rise_up(&orf, &track, 10), -1.0);
    }

    #[test]
    fn test_windows_clip_at_transcript_start() {
        // Only two upstream bases exist; their mean is compared, not a mean
        // padded with zeros over ten bases.
        let track = track_with(200, &[(0, 4.0), (1, 4.0), (2, 4.0), (3, 4.0)]);
        let orf = forward_orf(2, 32, 60);
        assert_eq!(start_rise_up(&orf, &track, 10), rise(0.8, 4.0));
    }

    #[test]
    fn test_rise_without_signal_is_zero() {
        assert_eq!(rise(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_combined_score_weighting() {
        let metrics = OrfMetrics {
            in_frame: 6.0,
            off_frame: 2.0,
            periodicity: 0.75,
            start_rise_up: None,
        };
        let expected = START_RISE_UP_WEIGHT * 0.5 + (1.0 - START_RISE_UP_WEIGHT) * 0.75;
        assert_eq!(combined_score(&metrics, 0.0), expected);
        assert_eq!(combined_score(&OrfMetrics::default(), 1.0), ZERO_SIGNAL_SCORE);
    }
}
