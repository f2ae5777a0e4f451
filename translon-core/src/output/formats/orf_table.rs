use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::output::{parse_strand, strand_symbol};
use crate::{CandidateOrf, Exon, TranslonError};

pub(crate) const ORF_COLUMNS: &str = "orf_id\ttranscript_id\tchrom\tstrand\tstart\tstop\tlength\trun_off\tgenomic_start\tgenomic_stop\texons";

/// Number of tab-separated fields written by [`write_orf_fields`]
pub(crate) const ORF_FIELD_COUNT: usize = 11;

/// Exons as `chrom:start-end:strand`, comma separated, transcript order.
fn format_exons(exons: &[Exon]) -> String {
    exons
        .iter()
        .map(|e| format!("{}:{}-{}:{}", e.chrom, e.start, e.end, strand_symbol(e.strand)))
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_exon(text: &str) -> Option<Exon> {
    let (rest, strand) = text.rsplit_once(':')?;
    let (chrom, span) = rest.rsplit_once(':')?;
    let (start, end) = span.split_once('-')?;
    let exon = Exon::new(chrom, start.parse().ok()?, end.parse().ok()?, parse_strand(strand)?);
    (!exon.is_empty()).then_some(exon)
}

pub(crate) fn write_orf_fields<W: Write>(
    writer: &mut W,
    orf: &CandidateOrf,
) -> Result<(), TranslonError> {
    write!(
        writer,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        orf.id,
        orf.transcript_id,
        orf.chrom(),
        strand_symbol(orf.strand()),
        orf.start,
        orf.stop,
        orf.length,
        u8::from(orf.run_off),
        orf.genomic_start,
        orf.genomic_stop,
        format_exons(&orf.exons)
    )?;
    Ok(())
}

/// Parse the leading ORF fields of a table row.
pub(crate) fn parse_orf_fields(fields: &[&str]) -> Option<CandidateOrf> {
    let [id, transcript_id, _chrom, _strand, start, stop, length, run_off, genomic_start, genomic_stop, exons] =
        fields.get(..ORF_FIELD_COUNT)?
    else {
        return None;
    };
    let exons: Vec<Exon> = exons.split(',').map(parse_exon).collect::<Option<_>>()?;
    let start: u64 = start.parse().ok()?;
    let stop: u64 = stop.parse().ok()?;
    let length: u64 = length.parse().ok()?;
    if exons.is_empty() || stop < start || length != stop - start + 3 {
        return None;
    }
    Some(CandidateOrf {
        id: (*id).to_string(),
        transcript_id: (*transcript_id).to_string(),
        start,
        stop,
        length,
        run_off: *run_off == "1",
        exons: Arc::from(exons),
        genomic_start: genomic_start.parse().ok()?,
        genomic_stop: genomic_stop.parse().ok()?,
    })
}

/// Write candidate ORFs as a tab-separated table with a header line.
pub fn write_orf_table_format<W: Write>(
    writer: &mut W,
    orfs: &[CandidateOrf],
) -> Result<(), TranslonError> {
    writeln!(writer, "{ORF_COLUMNS}")?;
    for orf in orfs {
        write_orf_fields(writer, orf)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Read a candidate ORF table.
///
/// Rows that do not parse are skipped; their number is returned next to the
/// ORFs.
pub fn read_orf_table_format<R: BufRead>(
    reader: R,
) -> Result<(Vec<CandidateOrf>, usize), TranslonError> {
    let mut orfs = Vec::new();
    let mut malformed = 0;

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with("orf_id") || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        match parse_orf_fields(&fields) {
            Some(orf) => orfs.push(orf),
            None => {
                log::warn!("Skipping malformed ORF row '{line}'");
                malformed += 1;
            }
        }
    }
    Ok((orfs, malformed))
}
