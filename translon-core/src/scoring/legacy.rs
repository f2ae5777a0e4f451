//! Periodicity scoring.
//!
//! Ribosomes advance one codon at a time, so P-site signal of a translated
//! ORF concentrates on the first base of each codon.

use crate::constants::{CODON_LENGTH, ZERO_SIGNAL_SCORE};
use crate::types::OrfMetrics;

/// Splits a body profile into in-frame and off-frame signal.
///
/// `body[0]` must be the first base of the start codon. The returned metrics
/// carry no Start Rise Up value.
#[must_use]
pub fn periodicity(body: &[f64]) -> OrfMetrics {
    let (in_frame, off_frame) = body
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(in_frame, off_frame), (i, &value)| {
            if i % CODON_LENGTH == 0 {
                (in_frame + value, off_frame)
            } else {
                (in_frame, off_frame + value)
            }
        });

    let total = in_frame + off_frame;
    let periodicity = if total > 0.0 {
        in_frame / total
    } else {
        ZERO_SIGNAL_SCORE
    };

    OrfMetrics {
        in_frame,
        off_frame,
        periodicity,
        start_rise_up: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_in_frame() {
        let metrics = periodicity(&[4.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(metrics.in_frame, 6.0);
        assert_eq!(metrics.off_frame, 0.0);
        assert_eq!(metrics.periodicity, 1.0);
    }

    #[test]
    fn test_uniform_signal_is_one_third() {
        let metrics = periodicity(&[1.0; 9]);
        assert!((metrics.periodicity - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_zero_bodies() {
        assert_eq!(periodicity(&[]).periodicity, ZERO_SIGNAL_SCORE);
        let metrics = periodicity(&[0.0; 12]);
        assert_eq!(metrics.periodicity, ZERO_SIGNAL_SCORE);
        assert!(!metrics.periodicity.is_nan());
    }
}
