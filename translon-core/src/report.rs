//! Occupancy windows around ORF starts, for listing and plotting.

use crate::config::ReportOrder;
use crate::coordinates::transcript_to_genomic;
use crate::scoring::occupancy_profile;
use crate::track::OccupancyTrack;
use crate::types::{CandidateOrf, ReportRecord, ScoredOrf};

/// Whether transcript position `offset` of `orf` maps into the track.
fn in_track(orf: &CandidateOrf, track: &OccupancyTrack, offset: u64) -> bool {
    transcript_to_genomic(&orf.exons, offset)
        .is_some_and(|genomic| track.value_at(orf.chrom(), orf.strand(), genomic).is_some())
}

/// Window `[start - range, start + range]` clipped to the transcript and to
/// the chromosome bounds of the track.
///
/// Returns `None` when not even the start codon maps into the track.
fn clipped_window(orf: &CandidateOrf, track: &OccupancyTrack, range: u64) -> Option<(u64, u64)> {
    let last = orf.transcript_length().checked_sub(1)?;
    let mut lo = orf.start.saturating_sub(range);
    let mut hi = (orf.start + range).min(last);

    while lo < orf.start && !in_track(orf, track, lo) {
        lo += 1;
    }
    while hi > orf.start && !in_track(orf, track, hi) {
        hi -= 1;
    }
    in_track(orf, track, orf.start).then_some((lo, hi))
}

/// Build one report record, or `None` if the ORF start lies outside the track.
#[must_use]
pub fn report_record(
    scored: &ScoredOrf,
    track: &OccupancyTrack,
    range_param: u64,
) -> Option<ReportRecord> {
    let (window_start, window_end) = clipped_window(&scored.orf, track, range_param)?;
    let values = occupancy_profile(&scored.orf.exons, track, window_start, window_end + 1);
    Some(ReportRecord {
        scored: scored.clone(),
        window_start,
        window_end,
        values,
    })
}

/// Build report records for scored ORFs.
///
/// Input order is kept for [`ReportOrder::Input`]; with
/// [`ReportOrder::ScoreDescending`] records are sorted by score, ties in
/// input order. ORFs whose start lies outside the track are dropped and
/// counted.
#[must_use]
pub fn aggregate(
    scored: &[ScoredOrf],
    track: &OccupancyTrack,
    range_param: u64,
    order: ReportOrder,
) -> (Vec<ReportRecord>, usize) {
    let mut records: Vec<ReportRecord> = scored
        .iter()
        .filter_map(|orf| report_record(orf, track, range_param))
        .collect();
    let skipped = scored.len() - records.len();

    if order == ReportOrder::ScoreDescending {
        records.sort_by(|a, b| b.scored.score.total_cmp(&a.scored.score));
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} scored ORFs whose start lies outside the track");
    }
    log::info!("Aggregated {} report records", records.len());
    (records, skipped)
}

/// Summed occupancy at one position relative to the ORF starts
#[derive(Debug, Clone, PartialEq)]
pub struct MetagenePoint {
    /// Position relative to the first base of the start codon
    pub relative: i64,
    /// Sum of occupancy over all records covering this position
    pub total: f64,
    /// Number of records whose window covers this position
    pub orfs: usize,
}

impl MetagenePoint {
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.orfs == 0 {
            0.0
        } else {
            self.total / self.orfs as f64
        }
    }
}

/// Metagene profile of report windows, from `-range_param` to `range_param`.
#[must_use]
pub fn metagene(records: &[ReportRecord], range_param: u64) -> Vec<MetagenePoint> {
    let range = range_param as i64;
    let mut points: Vec<MetagenePoint> = (-range..=range)
        .map(|relative| MetagenePoint {
            relative,
            total: 0.0,
            orfs: 0,
        })
        .collect();

    for record in records {
        let start_index = record.start_index() as i64;
        for (i, &value) in record.values.iter().enumerate() {
            let relative = i as i64 - start_index;
            if let Some(point) = points.get_mut((relative + range) as usize) {
                point.total += value;
                point.orfs += 1;
            }
        }
    }
    points
}
