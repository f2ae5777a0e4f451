use std::io::Write;

use bio::bio_types::strand::Strand;

use crate::{TranslonError, track::OccupancyTrack};

/// Write one strand of a track as bedGraph.
///
/// Adjacent positions with equal signal are merged into one interval.
/// Reverse-strand values are written negative so that both strand files can
/// be loaded back together.
pub fn write_bedgraph_format<W: Write>(
    writer: &mut W,
    track: &OccupancyTrack,
    strand: Strand,
    name: &str,
) -> Result<(), TranslonError> {
    let sign = if strand == Strand::Reverse { -1.0 } else { 1.0 };
    writeln!(writer, "track type=bedGraph name=\"{name}\"")?;

    for (chrom, signal) in track.chromosomes() {
        let Some(positions) = signal.strand(strand) else {
            continue;
        };
        let mut run: Option<(u64, u64, f64)> = None;
        for (&position, &value) in positions {
            run = match run {
                Some((start, end, current)) if end == position && current == value => {
                    Some((start, end + 1, current))
                }
                Some((start, end, current)) => {
                    writeln!(writer, "{chrom}\t{start}\t{end}\t{}", sign * current)?;
                    Some((position, position + 1, value))
                }
                None => Some((position, position + 1, value)),
            };
        }
        if let Some((start, end, current)) = run {
            writeln!(writer, "{chrom}\t{start}\t{end}\t{}", sign * current)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::ChromSizes;
    use crate::track::read_bedgraph;
    use std::fs;
    use tempfile::NamedTempFile;

    fn track() -> OccupancyTrack {
        let mut sizes = ChromSizes::new();
        sizes.insert("chr1".to_string(), 100);
        let mut track = OccupancyTrack::new(sizes);
        for position in [10, 11, 12] {
            track.add("chr1", Strand::Forward, position, 2.0).unwrap();
        }
        track.add("chr1", Strand::Forward, 13, 1.0).unwrap();
        track.add("chr1", Strand::Reverse, 40, 3.0).unwrap();
        track
    }

    #[test]
    fn test_forward_runs_are_merged() {
        let mut buffer = Vec::new();
        write_bedgraph_format(&mut buffer, &track(), Strand::Forward, "demo fwd").unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "track type=bedGraph name=\"demo fwd\"\nchr1\t10\t13\t2\nchr1\t13\t14\t1\n"
        );
    }

    #[test]
    fn test_reverse_values_are_negative_and_reload() {
        let mut buffer = Vec::new();
        write_bedgraph_format(&mut buffer, &track(), Strand::Reverse, "demo rev").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("chr1\t40\t41\t-3\n"));

        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), text).unwrap();
        let (reloaded, _) = read_bedgraph(&[file.path()], None).unwrap();
        assert_eq!(reloaded.value_at("chr1", Strand::Reverse, 40), Some(3.0));
    }
}
