//! Transcript models from GTF annotation.
//!
//! `exon` features are grouped by their `transcript_id` attribute into
//! [`Transcript`] models with exons in transcript order. `CDS` and
//! `start_codon` features supply the annotated start codon used to calibrate
//! P-site offsets.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use bio::bio_types::strand::Strand;
use bio::io::gff;

use crate::coordinates::{genomic_to_transcript, sort_transcript_order};
use crate::types::{Exon, StartSite, Transcript, TranslonError};

#[derive(Debug, Default)]
struct TranscriptParts {
    exons: Vec<Exon>,
    cds_bounds: Option<(u64, u64)>,
    start_codon: Option<(u64, u64)>,
}

/// Read transcript models from a GTF file.
///
/// Returns the transcripts sorted by identifier together with the number of
/// records that were skipped (missing `transcript_id`, unknown strand, or an
/// empty interval). Sequences are left empty.
pub fn read_gtf<P: AsRef<Path>>(path: P) -> Result<(Vec<Transcript>, usize), TranslonError> {
    let path = path.as_ref();
    let mut reader = gff::Reader::from_file(path, gff::GffType::GTF2).map_err(|e| {
        TranslonError::ParseError(format!("Failed to open {}: {e}", path.display()))
    })?;
    let mut parts: BTreeMap<String, TranscriptParts> = BTreeMap::new();
    let mut malformed = 0;

    for result in reader.records() {
        let record = result.map_err(|e| TranslonError::ParseError(e.to_string()))?;
        let feature = record.feature_type();
        if !matches!(feature, "exon" | "CDS" | "start_codon") {
            continue;
        }

        let Some(transcript_id) = record.attributes().get("transcript_id") else {
            malformed += 1;
            continue;
        };
        let strand = match record.strand() {
            Some(strand @ (Strand::Forward | Strand::Reverse)) => strand,
            _ => {
                malformed += 1;
                continue;
            }
        };

        // GTF is 1-based inclusive
        let start = record.start().saturating_sub(1);
        let end = *record.end();
        if end <= start {
            malformed += 1;
            continue;
        }

        let entry = parts.entry(transcript_id.clone()).or_default();
        match feature {
            "exon" => entry
                .exons
                .push(Exon::new(record.seqname(), start, end, strand)),
            "CDS" => {
                entry.cds_bounds = Some(match entry.cds_bounds {
                    Some((lo, hi)) => (lo.min(start), hi.max(end)),
                    None => (start, end),
                });
            }
            _ => entry.start_codon = Some((start, end)),
        }
    }

    let mut transcripts = Vec::with_capacity(parts.len());
    for (id, mut part) in parts {
        if part.exons.is_empty() {
            log::debug!("Transcript {id} has coding features but no exons, skipping");
            malformed += 1;
            continue;
        }
        sort_transcript_order(&mut part.exons);
        let strand = part.exons[0].strand;

        let cds_start = part
            .start_codon
            .or(part.cds_bounds)
            .map(|(lo, hi)| match strand {
                Strand::Reverse => hi - 1,
                _ => lo,
            });

        transcripts.push(Transcript {
            id,
            strand,
            exons: Arc::from(part.exons),
            cds_start,
            sequence: Vec::new(),
        });
    }

    if malformed > 0 {
        log::warn!("Skipped {malformed} malformed annotation records");
    }

    Ok((transcripts, malformed))
}

/// Annotated start codons in genomic coordinates.
pub fn genomic_start_sites(transcripts: &[Transcript]) -> Vec<StartSite> {
    transcripts
        .iter()
        .filter_map(|t| {
            t.cds_start.map(|position| StartSite {
                chrom: t.chrom().to_string(),
                position,
                strand: t.strand,
            })
        })
        .collect()
}

/// Annotated start codons in transcript coordinates.
///
/// Used when alignments are against transcript sequences: each site is placed
/// on the reference named after its transcript, forward strand.
pub fn transcript_start_sites(transcripts: &[Transcript]) -> Vec<StartSite> {
    transcripts
        .iter()
        .filter_map(|t| {
            let genomic = t.cds_start?;
            let position = genomic_to_transcript(&t.exons, t.chrom(), genomic)?;
            Some(StartSite {
                chrom: t.id.clone(),
                position,
                strand: Strand::Forward,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    const GTF: &str = "\
chr1\ttest\texon\t101\t110\t.\t+\t.\tgene_id \"g1\"; transcript_id \"tx1\";
chr1\ttest\texon\t201\t220\t.\t+\t.\tgene_id \"g1\"; transcript_id \"tx1\";
chr1\ttest\tCDS\t105\t110\t.\t+\t0\tgene_id \"g1\"; transcript_id \"tx1\";
chr1\ttest\tCDS\t201\t210\t.\t+\t2\tgene_id \"g1\"; transcript_id \"tx1\";
chr1\ttest\texon\t301\t310\t.\t-\t.\tgene_id \"g2\"; transcript_id \"tx2\";
chr1\ttest\texon\t401\t410\t.\t-\t.\tgene_id \"g2\"; transcript_id \"tx2\";
chr1\ttest\tCDS\t303\t408\t.\t-\t0\tgene_id \"g2\"; transcript_id \"tx2\";
chr1\ttest\texon\t501\t510\t.\t.\t.\tgene_id \"g3\"; transcript_id \"tx3\";
";

    fn gtf_file() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), GTF).unwrap();
        file
    }

    #[test]
    fn test_read_gtf_groups_exons_in_transcript_order() {
        let file = gtf_file();
        let (transcripts, malformed) = read_gtf(file.path()).unwrap();

        assert_eq!(malformed, 1);
        assert_eq!(transcripts.len(), 2);

        let tx1 = &transcripts[0];
        assert_eq!(tx1.id, "tx1");
        assert_eq!(tx1.exons[0].start, 100);
        assert_eq!(tx1.exons[1].end, 220);
        assert_eq!(tx1.cds_start, Some(104));

        let tx2 = &transcripts[1];
        assert_eq!(tx2.strand, Strand::Reverse);
        assert_eq!(tx2.exons[0].start, 400);
        assert_eq!(tx2.cds_start, Some(407));
    }

    #[test]
    fn test_missing_gtf_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_gtf(dir.path().join("absent.gtf")).unwrap_err();
        assert!(matches!(err, TranslonError::ParseError(_)));
        assert!(err.to_string().contains("absent.gtf"));
    }

    #[test]
    fn test_start_sites_in_both_coordinate_systems() {
        let file = gtf_file();
        let (transcripts, _) = read_gtf(file.path()).unwrap();

        let genomic = genomic_start_sites(&transcripts);
        assert_eq!(genomic.len(), 2);
        assert_eq!(genomic[0].position, 104);
        assert_eq!(genomic[1].strand, Strand::Reverse);

        let local = transcript_start_sites(&transcripts);
        assert_eq!(local[0].chrom, "tx1");
        assert_eq!(local[0].position, 4);
        // 407 is the third base from the top of exon [400, 410)
        assert_eq!(local[1].position, 2);
    }
}
