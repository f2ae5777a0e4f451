use std::io::Write;

use crate::report::MetagenePoint;
use crate::{ReportRecord, TranslonError};

/// Write report records, one row per ORF with its window values comma
/// separated.
pub fn write_report_format<W: Write>(
    writer: &mut W,
    records: &[ReportRecord],
) -> Result<(), TranslonError> {
    writeln!(
        writer,
        "orf_id\ttranscript_id\talgorithm\tscore\twindow_start\twindow_end\tstart_index\tvalues"
    )?;
    for record in records {
        let values = record
            .values
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.6}\t{}\t{}\t{}\t{}",
            record.scored.orf.id,
            record.scored.orf.transcript_id,
            record.scored.algorithm,
            record.scored.score,
            record.window_start,
            record.window_end,
            record.start_index(),
            values
        )?;
    }
    Ok(())
}

/// Write the metagene summary used as plot input.
pub fn write_metagene_format<W: Write>(
    writer: &mut W,
    points: &[MetagenePoint],
) -> Result<(), TranslonError> {
    writeln!(writer, "relative_position\ttotal\torfs\tmean")?;
    for point in points {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.6}",
            point.relative,
            point.total,
            point.orfs,
            point.mean()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::forward_orf;
    use crate::{OrfMetrics, ScoredOrf, ScoringAlgorithm};

    #[test]
    fn test_report_row() {
        let record = ReportRecord {
            scored: ScoredOrf {
                orf: forward_orf(2, 11, 40),
                algorithm: ScoringAlgorithm::Legacy,
                score: 0.5,
                metrics: OrfMetrics::default(),
            },
            window_start: 0,
            window_end: 4,
            values: vec![0.0, 1.0, 3.0, 0.5, 0.0],
        };
        let mut buffer = Vec::new();
        write_report_format(&mut buffer, &[record]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "tx_2_11\ttx\tlegacy\t0.500000\t0\t4\t2\t0,1,3,0.5,0"
        );
    }

    #[test]
    fn test_metagene_rows() {
        let points = vec![
            MetagenePoint {
                relative: -1,
                total: 0.0,
                orfs: 0,
            },
            MetagenePoint {
                relative: 0,
                total: 6.0,
                orfs: 4,
            },
        ];
        let mut buffer = Vec::new();
        write_metagene_format(&mut buffer, &points).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "relative_position\ttotal\torfs\tmean\n-1\t0\t0\t0.000000\n0\t6\t4\t1.500000\n"
        );
    }
}
