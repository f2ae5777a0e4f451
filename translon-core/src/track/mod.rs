//! Strand-resolved ribosome occupancy (P-site) tracks.
//!
//! A track holds, per chromosome and strand, a sorted map from position to
//! signal. Positions are bounded by the chromosome sizes the track was built
//! against, and the track is not modified once built.

pub mod io;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bio::bio_types::strand::Strand;
use rayon::prelude::*;

use crate::calibration::OffsetTable;
use crate::sequence::ChromSizes;
use crate::types::{Alignment, TranslonError};

pub use io::read_bedgraph;

/// Signal of one chromosome, split by strand
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrandedSignal {
    pub forward: BTreeMap<u64, f64>,
    pub reverse: BTreeMap<u64, f64>,
}

impl StrandedSignal {
    #[must_use]
    pub fn strand(&self, strand: Strand) -> Option<&BTreeMap<u64, f64>> {
        match strand {
            Strand::Forward => Some(&self.forward),
            Strand::Reverse => Some(&self.reverse),
            Strand::Unknown => None,
        }
    }

    fn strand_mut(&mut self, strand: Strand) -> Option<&mut BTreeMap<u64, f64>> {
        match strand {
            Strand::Forward => Some(&mut self.forward),
            Strand::Reverse => Some(&mut self.reverse),
            Strand::Unknown => None,
        }
    }
}

/// Ribosome occupancy per chromosome, strand and position.
///
/// # Examples
///
/// ```rust
/// use translon_core::track::OccupancyTrack;
/// use translon_core::sequence::ChromSizes;
/// use bio::bio_types::strand::Strand;
///
/// let mut sizes = ChromSizes::new();
/// sizes.insert("chr1".to_string(), 100);
/// let track = OccupancyTrack::new(sizes);
///
/// assert_eq!(track.value_at("chr1", Strand::Forward, 10), Some(0.0));
/// assert_eq!(track.value_at("chr1", Strand::Forward, 100), None);
/// assert_eq!(track.value_at("chr2", Strand::Forward, 10), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccupancyTrack {
    chrom_sizes: ChromSizes,
    signal: BTreeMap<String, StrandedSignal>,
    soft_bounds: bool,
}

impl OccupancyTrack {
    /// An empty track over the given chromosomes.
    #[must_use]
    pub fn new(chrom_sizes: ChromSizes) -> Self {
        Self {
            chrom_sizes,
            signal: BTreeMap::new(),
            soft_bounds: false,
        }
    }

    /// An empty track whose sizes only cover the signal it was loaded with.
    ///
    /// Positions past those sizes, and chromosomes without any signal, read
    /// as zero instead of out of bounds.
    #[must_use]
    pub fn with_soft_bounds(chrom_sizes: ChromSizes) -> Self {
        Self {
            soft_bounds: true,
            ..Self::new(chrom_sizes)
        }
    }

    #[must_use]
    pub const fn has_soft_bounds(&self) -> bool {
        self.soft_bounds
    }

    #[must_use]
    pub fn chrom_sizes(&self) -> &ChromSizes {
        &self.chrom_sizes
    }

    #[must_use]
    pub fn chrom_size(&self, chrom: &str) -> Option<u64> {
        self.chrom_sizes.get(chrom).copied()
    }

    /// Whether `position` can be read on `chrom`.
    #[must_use]
    pub fn contains(&self, chrom: &str, position: u64) -> bool {
        self.soft_bounds || self.chrom_size(chrom).is_some_and(|size| position < size)
    }

    /// Signal at one position.
    ///
    /// `None` when the chromosome is unknown or the position lies outside it;
    /// `Some(0.0)` for an in-bounds position without signal. A track with
    /// soft bounds reads every position of every chromosome.
    #[must_use]
    pub fn value_at(&self, chrom: &str, strand: Strand, position: u64) -> Option<f64> {
        if !self.contains(chrom, position) || strand == Strand::Unknown {
            return None;
        }
        Some(
            self.signal(chrom, strand)
                .and_then(|positions| positions.get(&position).copied())
                .unwrap_or(0.0),
        )
    }

    /// All non-zero positions of one chromosome strand.
    #[must_use]
    pub fn signal(&self, chrom: &str, strand: Strand) -> Option<&BTreeMap<u64, f64>> {
        self.signal.get(chrom).and_then(|s| s.strand(strand))
    }

    /// Chromosomes carrying signal, in name order.
    pub fn chromosomes(&self) -> impl Iterator<Item = (&str, &StrandedSignal)> {
        self.signal.iter().map(|(chrom, signal)| (chrom.as_str(), signal))
    }

    /// Number of positions with signal across both strands.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.signal
            .values()
            .map(|s| s.forward.len() + s.reverse.len())
            .sum()
    }

    /// Sum of all signal.
    #[must_use]
    pub fn total_signal(&self) -> f64 {
        self.signal
            .values()
            .flat_map(|s| s.forward.values().chain(s.reverse.values()))
            .sum()
    }

    /// Add `value` at a position, checking the chromosome bounds.
    pub(crate) fn add(
        &mut self,
        chrom: &str,
        strand: Strand,
        position: u64,
        value: f64,
    ) -> Result<(), TranslonError> {
        let size = self.chrom_size(chrom).ok_or_else(|| {
            TranslonError::Coordinate(format!("chromosome '{chrom}' has no declared size"))
        })?;
        if position >= size {
            return Err(TranslonError::Coordinate(format!(
                "{chrom}:{position} lies outside [0, {size})"
            )));
        }
        let positions = self
            .signal
            .entry(chrom.to_string())
            .or_default()
            .strand_mut(strand)
            .ok_or_else(|| {
                TranslonError::Coordinate(format!("{chrom}:{position} has no strand"))
            })?;
        *positions.entry(position).or_insert(0.0) += value;
        Ok(())
    }
}

/// Counters from a track build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackStats {
    /// Alignment records placed on the track
    pub used: u64,
    /// Reads (counting multiplicity) placed on the track
    pub reads: u64,
    /// Records whose P-site fell outside the chromosome
    pub out_of_bounds: u64,
    /// Records on chromosomes missing from the sizes table
    pub unknown_chrom: u64,
    /// Records without a strand
    pub unstranded: u64,
}

impl TrackStats {
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.out_of_bounds + self.unknown_chrom + self.unstranded
    }

    fn merge(mut self, other: Self) -> Self {
        self.used += other.used;
        self.reads += other.reads;
        self.out_of_bounds += other.out_of_bounds;
        self.unknown_chrom += other.unknown_chrom;
        self.unstranded += other.unstranded;
        self
    }
}

/// Per-worker integer accumulator.
#[derive(Default)]
struct PartialTrack {
    counts: HashMap<(Arc<str>, bool), HashMap<u64, u64>>,
    stats: TrackStats,
}

impl PartialTrack {
    fn merge(mut self, other: Self) -> Self {
        for (key, positions) in other.counts {
            let target = self.counts.entry(key).or_default();
            for (position, count) in positions {
                *target.entry(position).or_default() += count;
            }
        }
        self.stats = self.stats.merge(other.stats);
        self
    }
}

/// P-site of an alignment, or `None` when it falls before position 0.
///
/// Upper bounds are checked by the caller.
#[must_use]
pub fn p_site(alignment: &Alignment, offsets: &OffsetTable) -> Option<u64> {
    let five_prime = i64::try_from(alignment.five_prime()).ok()?;
    let offset = offsets.offset_for(alignment.length);
    let site = match alignment.strand {
        Strand::Reverse => five_prime - offset,
        _ => five_prime + offset,
    };
    u64::try_from(site).ok()
}

/// Build an occupancy track from offset-corrected alignments.
///
/// Each alignment contributes its `count` at its P-site. Alignments whose
/// P-site falls outside `[0, chromsize)`, on an unknown chromosome, or that
/// carry no strand are skipped and counted in the returned [`TrackStats`].
///
/// Accumulation runs on the rayon pool over integer counts, so the result
/// does not depend on alignment order or thread count.
///
/// # Errors
///
/// Returns [`TranslonError::Coordinate`] when no alignment could be placed.
pub fn build_track(
    alignments: &[Alignment],
    offsets: &OffsetTable,
    chrom_sizes: &ChromSizes,
) -> Result<(OccupancyTrack, TrackStats), TranslonError> {
    let partial = alignments
        .par_iter()
        .fold(PartialTrack::default, |mut acc, alignment| {
            let Some(&size) = chrom_sizes.get(&*alignment.chrom) else {
                acc.stats.unknown_chrom += 1;
                return acc;
            };
            let reverse = match alignment.strand {
                Strand::Forward => false,
                Strand::Reverse => true,
                Strand::Unknown => {
                    acc.stats.unstranded += 1;
                    return acc;
                }
            };
            match p_site(alignment, offsets) {
                Some(site) if site < size => {
                    *acc.counts
                        .entry((Arc::clone(&alignment.chrom), reverse))
                        .or_default()
                        .entry(site)
                        .or_default() += u64::from(alignment.count);
                    acc.stats.used += 1;
                    acc.stats.reads += u64::from(alignment.count);
                }
                _ => acc.stats.out_of_bounds += 1,
            }
            acc
        })
        .reduce(PartialTrack::default, PartialTrack::merge);

    let stats = partial.stats;
    if stats.skipped() > 0 {
        log::warn!(
            "Skipped {} alignments while building the track ({} out of bounds, {} unknown chromosome, {} unstranded)",
            stats.skipped(),
            stats.out_of_bounds,
            stats.unknown_chrom,
            stats.unstranded
        );
    }
    if stats.used == 0 {
        return Err(TranslonError::Coordinate(format!(
            "none of {} alignments produced a P-site within chromosome bounds",
            alignments.len()
        )));
    }

    let mut signal: BTreeMap<String, StrandedSignal> = BTreeMap::new();
    for ((chrom, reverse), positions) in partial.counts {
        let entry = signal.entry(chrom.to_string()).or_default();
        let target = if reverse {
            &mut entry.reverse
        } else {
            &mut entry.forward
        };
        target.extend(positions.into_iter().map(|(p, count)| (p, count as f64)));
    }

    let track = OccupancyTrack {
        chrom_sizes: chrom_sizes.clone(),
        signal,
        soft_bounds: false,
    };
    log::info!(
        "Built occupancy track from {} alignments ({} reads) at {} positions",
        stats.used,
        stats.reads,
        track.position_count()
    );
    Ok((track, stats))
}
