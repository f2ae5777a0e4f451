//! Projection between transcript-local and genomic coordinates.
//!
//! Both directions walk an exon list given in transcript order. The functions
//! keep no state between calls, so they can be used from any number of
//! scoring threads at once.

use bio::bio_types::strand::Strand;

use crate::types::Exon;

/// Maps a transcript-relative offset to a genomic position.
///
/// Returns `None` when the offset lies past the spliced end of the exons.
///
/// # Examples
///
/// ```rust
/// use translon_core::coordinates::transcript_to_genomic;
/// use translon_core::types::Exon;
/// use bio::bio_types::strand::Strand;
///
/// let exons = vec![
///     Exon::new("chr1", 100, 110, Strand::Forward),
///     Exon::new("chr1", 200, 210, Strand::Forward),
/// ];
/// assert_eq!(transcript_to_genomic(&exons, 9), Some(109));
/// assert_eq!(transcript_to_genomic(&exons, 10), Some(200));
/// assert_eq!(transcript_to_genomic(&exons, 20), None);
/// ```
#[must_use]
pub fn transcript_to_genomic(exons: &[Exon], offset: u64) -> Option<u64> {
    let mut remaining = offset;
    for exon in exons {
        let len = exon.len();
        if remaining < len {
            return Some(match exon.strand {
                Strand::Reverse => exon.end - 1 - remaining,
                _ => exon.start + remaining,
            });
        }
        remaining -= len;
    }
    None
}

/// Maps a genomic position to its transcript-relative offset.
///
/// Returns `None` when the position falls in an intron, outside the
/// transcript, or on another chromosome.
#[must_use]
pub fn genomic_to_transcript(exons: &[Exon], chrom: &str, position: u64) -> Option<u64> {
    let mut walked = 0;
    for exon in exons {
        if exon.chrom == chrom && (exon.start..exon.end).contains(&position) {
            let within = match exon.strand {
                Strand::Reverse => exon.end - 1 - position,
                _ => position - exon.start,
            };
            return Some(walked + within);
        }
        walked += exon.len();
    }
    None
}

/// Orders exons 5' to 3' along the transcript.
///
/// Ascending genomic order on the forward strand, descending on the reverse.
pub fn sort_transcript_order(exons: &mut [Exon]) {
    exons.sort_by_key(|exon| exon.start);
    if exons.first().is_some_and(|exon| exon.strand == Strand::Reverse) {
        exons.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reverse_exons() -> Vec<Exon> {
        // Transcript order: [200,210) first, then [100,110).
        vec![
            Exon::new("chr1", 200, 210, Strand::Reverse),
            Exon::new("chr1", 100, 110, Strand::Reverse),
        ]
    }

    #[test]
    fn test_forward_projection_crosses_intron() {
        let exons = vec![
            Exon::new("chr1", 100, 110, Strand::Forward),
            Exon::new("chr1", 200, 210, Strand::Forward),
        ];
        assert_eq!(transcript_to_genomic(&exons, 0), Some(100));
        assert_eq!(transcript_to_genomic(&exons, 12), Some(202));
        assert_eq!(genomic_to_transcript(&exons, "chr1", 202), Some(12));
        assert_eq!(genomic_to_transcript(&exons, "chr1", 150), None);
        assert_eq!(genomic_to_transcript(&exons, "chr2", 100), None);
    }

    #[test]
    fn test_reverse_projection_walks_downwards() {
        let exons = reverse_exons();
        assert_eq!(transcript_to_genomic(&exons, 0), Some(209));
        assert_eq!(transcript_to_genomic(&exons, 9), Some(200));
        assert_eq!(transcript_to_genomic(&exons, 10), Some(109));
        assert_eq!(transcript_to_genomic(&exons, 19), Some(100));
        assert_eq!(transcript_to_genomic(&exons, 20), None);
    }

    #[test]
    fn test_projection_round_trips_every_position() {
        let exons = reverse_exons();
        for offset in 0..20 {
            let genomic = transcript_to_genomic(&exons, offset).unwrap();
            assert_eq!(genomic_to_transcript(&exons, "chr1", genomic), Some(offset));
        }
    }

    #[test]
    fn test_sort_transcript_order() {
        let mut exons = vec![
            Exon::new("chr1", 100, 110, Strand::Reverse),
            Exon::new("chr1", 200, 210, Strand::Reverse),
        ];
        sort_transcript_order(&mut exons);
        assert_eq!(exons[0].start, 200);

        let mut exons = vec![
            Exon::new("chr1", 200, 210, Strand::Forward),
            Exon::new("chr1", 100, 110, Strand::Forward),
        ];
        sort_transcript_order(&mut exons);
        assert_eq!(exons[0].start, 100);
    }
}
