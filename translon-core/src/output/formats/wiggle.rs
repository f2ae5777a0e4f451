use std::io::Write;

use bio::bio_types::strand::Strand;

use crate::{TranslonError, track::OccupancyTrack};

/// Write one strand of a track as Wiggle `variableStep` blocks.
///
/// Wiggle positions are 1-based. Reverse-strand values are written negative.
pub fn write_wiggle_format<W: Write>(
    writer: &mut W,
    track: &OccupancyTrack,
    strand: Strand,
    name: &str,
) -> Result<(), TranslonError> {
    let sign = if strand == Strand::Reverse { -1.0 } else { 1.0 };
    writeln!(writer, "track type=wiggle_0 name=\"{name}\"")?;

    for (chrom, signal) in track.chromosomes() {
        let Some(positions) = signal.strand(strand).filter(|p| !p.is_empty()) else {
            continue;
        };
        writeln!(writer, "variableStep chrom={chrom} span=1")?;
        for (&position, &value) in positions {
            writeln!(writer, "{}\t{}", position + 1, sign * value)?;
        }
    }
    Ok(())
}
