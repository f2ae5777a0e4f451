use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bio::bio_types::strand::Strand;

use super::OccupancyTrack;
use crate::sequence::ChromSizes;
use crate::types::TranslonError;

struct BedGraphRow {
    chrom: String,
    start: u64,
    end: u64,
    value: f64,
}

fn parse_row(line: &str) -> Option<BedGraphRow> {
    let mut fields = line.split_whitespace();
    let chrom = fields.next()?.to_string();
    let start = fields.next()?.parse().ok()?;
    let end = fields.next()?.parse().ok()?;
    let value: f64 = fields.next()?.parse().ok()?;
    (end > start && value.is_finite()).then_some(BedGraphRow {
        chrom,
        start,
        end,
        value,
    })
}

/// Load a precomputed track from one or more signed bedGraph files.
///
/// Positive values belong to the forward strand and negative values to the
/// reverse strand, so a forward/reverse file pair and a single combined file
/// load the same way. Without `chrom_sizes`, each chromosome is sized by the
/// largest interval end seen for it.
///
/// Returns the track together with the number of skipped rows.
///
/// # Errors
///
/// Returns [`TranslonError::Coordinate`] when no row could be placed.
pub fn read_bedgraph<P: AsRef<Path>>(
    paths: &[P],
    chrom_sizes: Option<&ChromSizes>,
) -> Result<(OccupancyTrack, usize), TranslonError> {
    let mut rows = Vec::new();
    let mut malformed = 0;

    for path in paths {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with("track")
                || line.starts_with("browser")
            {
                continue;
            }
            match parse_row(line) {
                Some(row) => rows.push(row),
                None => {
                    log::warn!(
                        "Skipping malformed bedGraph line {} of {}: '{line}'",
                        line_number + 1,
                        path.display()
                    );
                    malformed += 1;
                }
            }
        }
    }

    let mut track = match chrom_sizes {
        Some(sizes) => OccupancyTrack::new(sizes.clone()),
        None => {
            let mut inferred = ChromSizes::new();
            for row in &rows {
                let size = inferred.entry(row.chrom.clone()).or_insert(0);
                *size = (*size).max(row.end);
            }
            OccupancyTrack::with_soft_bounds(inferred)
        }
    };
    let mut placed = 0usize;
    for row in rows {
        if row.value == 0.0 {
            continue;
        }
        let strand = if row.value < 0.0 {
            Strand::Reverse
        } else {
            Strand::Forward
        };
        let in_bounds = track
            .chrom_size(&row.chrom)
            .is_some_and(|size| row.end <= size);
        if !in_bounds {
            log::debug!(
                "bedGraph interval {}:{}-{} lies outside the declared chromosome sizes",
                row.chrom,
                row.start,
                row.end
            );
            malformed += 1;
            continue;
        }
        for position in row.start..row.end {
            track.add(&row.chrom, strand, position, row.value.abs())?;
        }
        placed += 1;
    }

    if placed == 0 {
        return Err(TranslonError::Coordinate(
            "precomputed track contains no usable signal".to_string(),
        ));
    }
    if malformed > 0 {
        log::warn!("Skipped {malformed} bedGraph rows");
    }
    log::info!(
        "Loaded occupancy track with {} positions from {} file(s)",
        track.position_count(),
        paths.len()
    );

    Ok((track, malformed))
}
