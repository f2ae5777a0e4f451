use criterion::Criterion;
use std::time::Duration;

/// In-memory extraction runs in milliseconds; sample it densely.
pub fn extraction_criterion() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(2))
        .sample_size(50)
        .noise_threshold(0.03)
}

/// Full runs read and write files, so iterations are slow and noisy.
pub fn pipeline_criterion() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(60))
        .warm_up_time(Duration::from_secs(5))
        .sample_size(10)
        .significance_level(0.01)
        .noise_threshold(0.05)
}
