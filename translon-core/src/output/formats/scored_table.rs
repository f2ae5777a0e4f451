use std::io::{BufRead, Write};

use super::orf_table::{ORF_COLUMNS, ORF_FIELD_COUNT, parse_orf_fields, write_orf_fields};
use crate::{OrfMetrics, ScoredOrf, ScoringAlgorithm, TranslonError};

const MISSING: &str = "NA";

/// Write scored ORFs: the ORF columns followed by algorithm, score and
/// sub-metrics.
pub fn write_scored_table_format<W: Write>(
    writer: &mut W,
    scored: &[ScoredOrf],
) -> Result<(), TranslonError> {
    writeln!(
        writer,
        "{ORF_COLUMNS}\talgorithm\tscore\tin_frame\toff_frame\tperiodicity\tstart_rise_up\ttotal_signal"
    )?;
    for orf in scored {
        write_orf_fields(writer, &orf.orf)?;
        let sru = orf
            .metrics
            .start_rise_up
            .map_or_else(|| MISSING.to_string(), |v| format!("{v:.6}"));
        writeln!(
            writer,
            "\t{}\t{:.6}\t{}\t{}\t{:.6}\t{}\t{}",
            orf.algorithm,
            orf.score,
            orf.metrics.in_frame,
            orf.metrics.off_frame,
            orf.metrics.periodicity,
            sru,
            orf.metrics.total_signal()
        )?;
    }
    Ok(())
}

fn parse_scored_row(fields: &[&str]) -> Option<ScoredOrf> {
    let orf = parse_orf_fields(fields)?;
    let [algorithm, score, in_frame, off_frame, periodicity, sru, ..] =
        fields.get(ORF_FIELD_COUNT..)?
    else {
        return None;
    };
    let start_rise_up = match *sru {
        MISSING => None,
        value => Some(value.parse().ok()?),
    };
    let score: f64 = score.parse().ok()?;
    Some(ScoredOrf {
        orf,
        algorithm: algorithm.parse::<ScoringAlgorithm>().ok()?,
        score: score.is_finite().then_some(score)?,
        metrics: OrfMetrics {
            in_frame: in_frame.parse().ok()?,
            off_frame: off_frame.parse().ok()?,
            periodicity: periodicity.parse().ok()?,
            start_rise_up,
        },
    })
}

/// Read a scored ORF table written by [`write_scored_table_format`].
///
/// Rows that do not parse are skipped and counted.
pub fn read_scored_table_format<R: BufRead>(
    reader: R,
) -> Result<(Vec<ScoredOrf>, usize), TranslonError> {
    let mut scored = Vec::new();
    let mut malformed = 0;

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with("orf_id") || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        match parse_scored_row(&fields) {
            Some(orf) => scored.push(orf),
            None => {
                log::warn!("Skipping malformed scored ORF row '{line}'");
                malformed += 1;
            }
        }
    }
    Ok((scored, malformed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CandidateOrf, Exon};
    use bio::bio_types::strand::Strand;
    use std::io::Cursor;
    use std::sync::Arc;

    fn scored_orfs() -> Vec<ScoredOrf> {
        let orf = CandidateOrf {
            id: "tx1_3_30".to_string(),
            transcript_id: "tx1".to_string(),
            start: 3,
            stop: 30,
            length: 30,
            run_off: false,
            exons: Arc::from(vec![Exon::new("tx1", 0, 60, Strand::Forward)]),
            genomic_start: 3,
            genomic_stop: 32,
        };
        vec![
            ScoredOrf {
                orf: orf.clone(),
                algorithm: ScoringAlgorithm::Legacy,
                score: 0.75,
                metrics: OrfMetrics {
                    in_frame: 6.0,
                    off_frame: 2.0,
                    periodicity: 0.75,
                    start_rise_up: None,
                },
            },
            ScoredOrf {
                orf,
                algorithm: ScoringAlgorithm::StartRiseUp,
                score: 0.8125,
                metrics: OrfMetrics {
                    in_frame: 6.0,
                    off_frame: 2.0,
                    periodicity: 0.75,
                    start_rise_up: Some(0.75),
                },
            },
        ]
    }

    #[test]
    fn test_scored_table_snapshot() {
        let mut buffer = Vec::new();
        write_scored_table_format(&mut buffer, &scored_orfs()).unwrap();
        insta::assert_snapshot!(String::from_utf8(buffer).unwrap(), @r"
        orf_id	transcript_id	chrom	strand	start	stop	length	run_off	genomic_start	genomic_stop	exons	algorithm	score	in_frame	off_frame	periodicity	start_rise_up	total_signal
        tx1_3_30	tx1	tx1	+	3	30	30	0	3	32	tx1:0-60:+	legacy	0.750000	6	2	0.750000	NA	8
        tx1_3_30	tx1	tx1	+	3	30	30	0	3	32	tx1:0-60:+	start_rise_up	0.812500	6	2	0.750000	0.750000	8
        ");
    }

    #[test]
    fn test_scored_table_reads_back() {
        let mut buffer = Vec::new();
        write_scored_table_format(&mut buffer, &scored_orfs()).unwrap();
        buffer.extend_from_slice(b"too\tshort\n");

        let (read_back, malformed) = read_scored_table_format(Cursor::new(buffer)).unwrap();
        assert_eq!(malformed, 1);
        assert_eq!(read_back, scored_orfs());
    }
}
