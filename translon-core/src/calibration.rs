//! Per-read-length P-site offset calibration.
//!
//! Each fragment length is calibrated independently against annotated start
//! codons on the same chromosome and strand. Two statistics are available:
//!
//! - [`CalibrationMethod::Mode`]: the most frequent distance between the 5'
//!   end and the nearest downstream start codon.
//! - [`CalibrationMethod::ChangePoint`]: the position where the metagene
//!   profile of 5' ends around start codons rises most sharply.
//!
//! Lengths without enough supporting reads get no entry and use the table's
//! default offset.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use bio::bio_types::strand::Strand;

use crate::config::{CalibrationMethod, TranslonConfig};
use crate::constants::{CHANGE_POINT_FLANK, CHANGE_POINT_LAST_POSITION};
use crate::types::{Alignment, StartSite, TranslonError};

/// Fragment length to P-site offset, with an explicit fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    offsets: BTreeMap<u32, i64>,
    default_offset: i64,
}

impl OffsetTable {
    /// An empty table: every length uses `default_offset`.
    #[must_use]
    pub const fn new(default_offset: i64) -> Self {
        Self {
            offsets: BTreeMap::new(),
            default_offset,
        }
    }

    /// A table with explicit per-length entries.
    #[must_use]
    pub fn with_offsets(offsets: BTreeMap<u32, i64>, default_offset: i64) -> Self {
        Self {
            offsets,
            default_offset,
        }
    }

    /// Offset for `length`, falling back to the default.
    #[must_use]
    pub fn offset_for(&self, length: u32) -> i64 {
        self.offsets
            .get(&length)
            .copied()
            .unwrap_or(self.default_offset)
    }

    /// Calibrated offset for `length`, if it has its own entry.
    #[must_use]
    pub fn get(&self, length: u32) -> Option<i64> {
        self.offsets.get(&length).copied()
    }

    #[must_use]
    pub const fn default_offset(&self) -> i64 {
        self.default_offset
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.offsets.iter().map(|(&length, &offset)| (length, offset))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Read a `length<TAB>offset` table.
    ///
    /// Rows that do not parse are skipped and counted.
    pub fn read_tsv<P: AsRef<Path>>(
        path: P,
        default_offset: i64,
    ) -> Result<(Self, usize), TranslonError> {
        let reader = BufReader::new(File::open(path)?);
        let mut offsets = BTreeMap::new();
        let mut malformed = 0;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("length") {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (
                fields.next().map(str::parse::<u32>),
                fields.next().map(str::parse::<i64>),
            ) {
                (Some(Ok(length)), Some(Ok(offset))) => {
                    offsets.insert(length, offset);
                }
                _ => {
                    log::warn!("Skipping malformed offset row '{line}'");
                    malformed += 1;
                }
            }
        }

        Ok((Self::with_offsets(offsets, default_offset), malformed))
    }

    /// Write the table as `length<TAB>offset` rows with a header line.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<(), TranslonError> {
        writeln!(writer, "length\toffset")?;
        for (length, offset) in self.iter() {
            writeln!(writer, "{length}\t{offset}")?;
        }
        Ok(())
    }
}

/// Parameters of a calibration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSettings {
    pub method: CalibrationMethod,
    pub min_reads: u64,
    pub max_offset: u64,
    pub default_offset: i64,
}

impl From<&TranslonConfig> for CalibrationSettings {
    fn from(config: &TranslonConfig) -> Self {
        Self {
            method: config.calibration_method,
            min_reads: config.min_calibration_reads,
            max_offset: config.max_calibration_offset,
            default_offset: config.default_offset,
        }
    }
}

/// Start sites per chromosome, split by strand and sorted.
struct StartSiteIndex<'a> {
    sites: HashMap<&'a str, [Vec<u64>; 2]>,
}

impl<'a> StartSiteIndex<'a> {
    fn new(start_sites: &'a [StartSite]) -> Self {
        let mut sites: HashMap<&'a str, [Vec<u64>; 2]> = HashMap::new();
        for site in start_sites {
            if let Some(slot) = strand_slot(site.strand) {
                sites.entry(site.chrom.as_str()).or_default()[slot].push(site.position);
            }
        }
        for positions in sites.values_mut().flat_map(|pair| pair.iter_mut()) {
            positions.sort_unstable();
            positions.dedup();
        }
        Self { sites }
    }

    fn positions(&self, chrom: &str, strand: Strand) -> &[u64] {
        match (self.sites.get(chrom), strand_slot(strand)) {
            (Some(pair), Some(slot)) => &pair[slot],
            _ => &[],
        }
    }

    /// Distance from `five_prime` to the nearest start site downstream of it,
    /// in reading direction.
    fn nearest_downstream(&self, chrom: &str, strand: Strand, five_prime: u64) -> Option<u64> {
        let positions = self.positions(chrom, strand);
        match strand {
            Strand::Reverse => {
                let idx = positions.partition_point(|&p| p <= five_prime);
                idx.checked_sub(1).map(|i| five_prime - positions[i])
            }
            _ => {
                let idx = positions.partition_point(|&p| p < five_prime);
                positions.get(idx).map(|&p| p - five_prime)
            }
        }
    }

    /// Positions of the 5' end relative to every start site within
    /// `[-upstream, downstream]`; negative values lie upstream of the site.
    fn relative_positions(
        &self,
        chrom: &str,
        strand: Strand,
        five_prime: u64,
        upstream: u64,
        downstream: u64,
    ) -> Vec<i64> {
        let positions = self.positions(chrom, strand);
        let five = five_prime as i64;
        // A 5' end `upstream` bases before the site means the site lies at
        // `five + upstream` in reading direction.
        let (lo, hi) = match strand {
            Strand::Reverse => (
                five_prime.saturating_sub(upstream),
                five_prime + downstream,
            ),
            _ => (five_prime.saturating_sub(downstream), five_prime + upstream),
        };
        let first = positions.partition_point(|&p| p < lo);
        positions[first..]
            .iter()
            .take_while(|&&p| p <= hi)
            .map(|&p| match strand {
                Strand::Reverse => p as i64 - five,
                _ => five - p as i64,
            })
            .collect()
    }
}

const fn strand_slot(strand: Strand) -> Option<usize> {
    match strand {
        Strand::Forward => Some(0),
        Strand::Reverse => Some(1),
        Strand::Unknown => None,
    }
}

/// Calibrate P-site offsets per fragment length.
///
/// # Errors
///
/// Returns [`TranslonError::Configuration`] when no start sites are given:
/// calibration has no reference and never guesses.
///
/// # Examples
///
/// ```rust
/// use translon_core::calibration::{calibrate, CalibrationSettings};
/// use translon_core::config::CalibrationMethod;
/// use translon_core::types::{Alignment, StartSite};
/// use bio::bio_types::strand::Strand;
///
/// let sites = vec![StartSite { chrom: "chr1".into(), position: 112, strand: Strand::Forward }];
/// let reads = vec![Alignment::new("chr1", 100, Strand::Forward, 29).with_count(20)];
/// let settings = CalibrationSettings {
///     method: CalibrationMethod::Mode,
///     min_reads: 10,
///     max_offset: 30,
///     default_offset: 15,
/// };
/// let table = calibrate(&reads, &sites, &settings)?;
/// assert_eq!(table.offset_for(29), 12);
/// assert_eq!(table.offset_for(31), 15);
/// # Ok::<(), translon_core::types::TranslonError>(())
/// ```
pub fn calibrate(
    alignments: &[Alignment],
    start_sites: &[StartSite],
    settings: &CalibrationSettings,
) -> Result<OffsetTable, TranslonError> {
    if start_sites.is_empty() {
        return Err(TranslonError::Configuration(
            "offset calibration needs annotated start codons, none were found".to_string(),
        ));
    }

    let index = StartSiteIndex::new(start_sites);
    let offsets = match settings.method {
        CalibrationMethod::Mode => mode_offsets(alignments, &index, settings),
        CalibrationMethod::ChangePoint => change_point_offsets(alignments, &index, settings),
    };

    for (length, offset) in &offsets {
        log::debug!("Calibrated offset for length {length}: {offset}");
    }
    if offsets.is_empty() {
        log::warn!(
            "No fragment length reached {} supporting reads, all lengths use offset {}",
            settings.min_reads,
            settings.default_offset
        );
    } else {
        log::info!(
            "Calibrated offsets for {} fragment lengths ({:?})",
            offsets.len(),
            settings.method
        );
    }

    Ok(OffsetTable::with_offsets(offsets, settings.default_offset))
}

fn mode_offsets(
    alignments: &[Alignment],
    index: &StartSiteIndex<'_>,
    settings: &CalibrationSettings,
) -> BTreeMap<u32, i64> {
    let mut histograms: BTreeMap<u32, BTreeMap<u64, u64>> = BTreeMap::new();

    for alignment in alignments {
        let Some(distance) =
            index.nearest_downstream(&alignment.chrom, alignment.strand, alignment.five_prime())
        else {
            continue;
        };
        if distance > settings.max_offset {
            continue;
        }
        *histograms
            .entry(alignment.length)
            .or_default()
            .entry(distance)
            .or_default() += u64::from(alignment.count);
    }

    histograms
        .into_iter()
        .filter_map(|(length, histogram)| {
            let support: u64 = histogram.values().sum();
            if support < settings.min_reads {
                log::debug!("Length {length} has {support} supporting reads, using default");
                return None;
            }
            // Ascending iteration with a strict comparison keeps the smallest
            // distance on ties.
            let mut best: Option<(u64, u64)> = None;
            for (&distance, &count) in &histogram {
                if best.is_none_or(|(_, best_count)| count > best_count) {
                    best = Some((distance, count));
                }
            }
            best.map(|(distance, _)| (length, distance as i64))
        })
        .collect()
}

fn change_point_offsets(
    alignments: &[Alignment],
    index: &StartSiteIndex<'_>,
    settings: &CalibrationSettings,
) -> BTreeMap<u32, i64> {
    let first_position = -(settings.max_offset as i64);
    let last_position = CHANGE_POINT_LAST_POSITION;
    let mut profiles: BTreeMap<u32, BTreeMap<i64, u64>> = BTreeMap::new();

    for alignment in alignments {
        let relative = index.relative_positions(
            &alignment.chrom,
            alignment.strand,
            alignment.five_prime(),
            settings.max_offset + CHANGE_POINT_FLANK as u64,
            (last_position + CHANGE_POINT_FLANK) as u64,
        );
        for position in relative {
            *profiles
                .entry(alignment.length)
                .or_default()
                .entry(position)
                .or_default() += u64::from(alignment.count);
        }
    }

    profiles
        .into_iter()
        .filter_map(|(length, profile)| {
            let support: u64 = profile
                .range(first_position..=last_position)
                .map(|(_, &count)| count)
                .sum();
            if support < settings.min_reads {
                log::debug!("Length {length} has {support} supporting reads, using default");
                return None;
            }
            let split = sharpest_rise(&profile, first_position, last_position)?;
            let offset = -(split + 1);
            (offset >= 0).then_some((length, offset))
        })
        .collect()
}

/// Split position with the largest absolute change between the mean of the
/// bins ending at it and the mean of the bins following it.
fn sharpest_rise(profile: &BTreeMap<i64, u64>, first: i64, last: i64) -> Option<i64> {
    let bin = |position: i64| profile.get(&position).copied().unwrap_or(0) as f64;
    let flank = CHANGE_POINT_FLANK as f64;

    let mut best: Option<(i64, f64)> = None;
    for split in first..=last {
        let left: f64 = (split - CHANGE_POINT_FLANK + 1..=split).map(bin).sum::<f64>() / flank;
        let right: f64 =
            (split + 1..=split + CHANGE_POINT_FLANK).map(bin).sum::<f64>() / flank;
        let shift = (right - left).abs();
        if shift > best.map_or(0.0, |(_, s)| s) {
            best = Some((split, shift));
        }
    }
    best.map(|(split, _)| split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn settings(method: CalibrationMethod) -> CalibrationSettings {
        CalibrationSettings {
            method,
            min_reads: 10,
            max_offset: 30,
            default_offset: 13,
        }
    }

    fn forward_site(position: u64) -> StartSite {
        StartSite {
            chrom: "chr1".to_string(),
            position,
            strand: Strand::Forward,
        }
    }

    #[test]
    fn test_calibrate_without_start_sites_is_configuration_error() {
        let reads = vec![Alignment::new("chr1", 100, Strand::Forward, 29)];
        let result = calibrate(&reads, &[], &settings(CalibrationMethod::Mode));
        assert!(matches!(result, Err(TranslonError::Configuration(_))));
    }

    #[test]
    fn test_mode_picks_most_frequent_distance() {
        let sites = vec![forward_site(1000), forward_site(2000)];
        let reads = vec![
            Alignment::new("chr1", 988, Strand::Forward, 29).with_count(8),
            Alignment::new("chr1", 1988, Strand::Forward, 29).with_count(4),
            Alignment::new("chr1", 987, Strand::Forward, 29).with_count(5),
            // Too far from any site
            Alignment::new("chr1", 1500, Strand::Forward, 29).with_count(100),
        ];
        let table = calibrate(&reads, &sites, &settings(CalibrationMethod::Mode)).unwrap();
        assert_eq!(table.get(29), Some(12));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_mode_ties_resolve_to_smallest_distance() {
        let sites = vec![forward_site(1000)];
        let reads = vec![
            Alignment::new("chr1", 987, Strand::Forward, 30).with_count(6),
            Alignment::new("chr1", 988, Strand::Forward, 30).with_count(6),
        ];
        let table = calibrate(&reads, &sites, &settings(CalibrationMethod::Mode)).unwrap();
        assert_eq!(table.get(30), Some(12));
    }

    #[test]
    fn test_mode_uses_same_strand_only_and_reverse_direction() {
        let sites = vec![StartSite {
            chrom: "chr1".to_string(),
            position: 500,
            strand: Strand::Reverse,
        }];
        // Reverse read covering [500, 529): 5' end at 528, 28 bases above the site.
        let reverse = Alignment::new("chr1", 500, Strand::Reverse, 29).with_count(10);
        // Forward read that would match the site position if strand were ignored.
        let forward = Alignment::new("chr1", 488, Strand::Forward, 28).with_count(10);
        let table = calibrate(
            &[reverse, forward],
            &sites,
            &settings(CalibrationMethod::Mode),
        )
        .unwrap();
        assert_eq!(table.get(29), Some(28));
        assert_eq!(table.get(28), None);
        assert_eq!(table.offset_for(28), 13);
    }

    #[test]
    fn test_lengths_below_evidence_threshold_fall_back() {
        let sites = vec![forward_site(1000)];
        let reads = vec![Alignment::new("chr1", 988, Strand::Forward, 29).with_count(9)];
        let table = calibrate(&reads, &sites, &settings(CalibrationMethod::Mode)).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.offset_for(29), 13);
    }

    #[test]
    fn test_calibration_is_idempotent() {
        let sites: Vec<_> = (0..20).map(|i| forward_site(1000 + i * 300)).collect();
        let reads: Vec<_> = (0..200u64)
            .map(|i| {
                let site = 1000 + (i % 20) * 300;
                let length = 27 + (i % 5) as u32;
                Alignment::new("chr1", site - 10 - (i % 4), Strand::Forward, length)
            })
            .collect();
        let first = calibrate(&reads, &sites, &settings(CalibrationMethod::Mode)).unwrap();
        let second = calibrate(&reads, &sites, &settings(CalibrationMethod::Mode)).unwrap();
        assert_eq!(first, second);
        for (length, offset) in first.iter() {
            assert_eq!(second.offset_for(length), offset);
        }
    }

    #[test]
    fn test_change_point_finds_rise() {
        let sites: Vec<_> = (0..10).map(|i| forward_site(10_000 + i * 1000)).collect();
        let mut reads = Vec::new();
        for site in sites.iter().map(|s| s.position) {
            // Sparse 5'UTR background, dense coverage from 12 nt upstream onwards.
            reads.push(Alignment::new("chr1", site - 25, Strand::Forward, 29));
            for five_prime in (site - 12)..(site + 10) {
                reads.push(Alignment::new("chr1", five_prime, Strand::Forward, 29).with_count(5));
            }
        }
        let table =
            calibrate(&reads, &sites, &settings(CalibrationMethod::ChangePoint)).unwrap();
        assert_eq!(table.get(29), Some(12));
    }

    #[test]
    fn test_offset_table_tsv_round_trip() {
        let mut offsets = BTreeMap::new();
        offsets.insert(28, 12);
        offsets.insert(29, 12);
        offsets.insert(30, 13);
        let table = OffsetTable::with_offsets(offsets, 15);

        let mut buffer = Vec::new();
        table.write_tsv(&mut Cursor::new(&mut buffer)).unwrap();
        assert_eq!(
            String::from_utf8(buffer.clone()).unwrap(),
            "length\toffset\n28\t12\n29\t12\n30\t13\n"
        );

        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), [buffer.as_slice(), b"bad row\n"].concat()).unwrap();
        let (read_back, malformed) = OffsetTable::read_tsv(file.path(), 15).unwrap();
        assert_eq!(read_back, table);
        assert_eq!(malformed, 1);
    }
}
