use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bio::bio_types::strand::Strand;

use crate::alignments::read_alignments;
use crate::annotation::{genomic_start_sites, read_gtf, transcript_start_sites};
use crate::calibration::{CalibrationSettings, OffsetTable, calibrate};
use crate::config::TranslonConfig;
use crate::orf::{CodonTable, extract_candidates};
use crate::output::{
    OutputPaths, read_orf_table, read_scored_table, write_metagene, write_orf_table, write_report,
    write_scored_table, write_track,
};
use crate::pipeline::{
    BoundsSource, CandidateSource, CoordinateSystem, OffsetSource, PipelineInputs, ScoredSource,
    TrackSource,
};
use crate::report::{MetagenePoint, aggregate, metagene};
use crate::results::{PipelineResults, RunSummary, Stage};
use crate::scoring::{ScoringSettings, score_candidates};
use crate::sequence::{
    ChromSizes, assemble_transcript, read_chrom_sizes, read_genome, read_transcripts,
    transcript_sizes,
};
use crate::track::{OccupancyTrack, build_track, read_bedgraph};
use crate::types::{Alignment, CandidateOrf, ReportRecord, ScoredOrf, StartSite, Transcript, TranslonError};

/// Marker trait for the track state of a [`Translon`] instance.
///
/// Scoring and reporting read the occupancy track, so they are only
/// available once a track exists. The state moves from [`Untracked`] to
/// [`Tracked`] by building or loading one.
pub trait TrackState {}

/// Marker type for an instance without an occupancy track.
#[derive(Debug, Clone, Default)]
pub struct Untracked;

/// Marker type for an instance holding a frozen occupancy track.
#[derive(Debug, Clone, Default)]
pub struct Tracked;

impl TrackState for Untracked {}
impl TrackState for Tracked {}

/// Pipeline engine.
///
/// # Type Parameters
///
/// * `S` - The track state, either [`Untracked`] or [`Tracked`]
///
/// # Examples
///
/// ```rust
/// use translon_core::engine::UntrackedTranslon;
/// use translon_core::calibration::OffsetTable;
/// use translon_core::sequence::ChromSizes;
/// use translon_core::types::{Alignment, Transcript};
/// use bio::bio_types::strand::Strand;
///
/// let mut sizes = ChromSizes::new();
/// sizes.insert("tx1".to_string(), 29);
/// let reads: Vec<_> = (0..4)
///     .map(|codon| Alignment::new("tx1", 3 * codon, Strand::Forward, 29).with_count(5))
///     .collect();
///
/// let translon = UntrackedTranslon::new();
/// let mut tracked = translon.build_track(&reads, &OffsetTable::new(12), &sizes)?;
///
/// let sequence = b"GGGGGGGGGGGGATGAAAGGGCCCTAAGG";
/// let candidates = tracked.extract_candidates(&[Transcript::from_sequence("tx1", sequence)])?;
/// let scored = tracked.score(&candidates)?;
/// assert_eq!(scored[0].score, 1.0);
/// # Ok::<(), translon_core::types::TranslonError>(())
/// ```
#[derive(Debug, Default)]
pub struct Translon<S: TrackState> {
    /// Configuration of the run
    pub config: TranslonConfig,
    offsets: Option<OffsetTable>,
    /// Empty until the instance is tracked
    track: OccupancyTrack,
    summary: RunSummary,
    _state: PhantomData<S>,
}

/// Type alias for an instance that still needs an occupancy track.
pub type UntrackedTranslon = Translon<Untracked>;

/// Type alias for an instance that can score and report.
pub type TrackedTranslon = Translon<Tracked>;

impl<S: TrackState> Translon<S> {
    /// Summary of the stages run so far.
    #[must_use]
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Counts input records skipped for their shape.
    pub fn record_malformed(&mut self, count: usize) {
        self.summary.malformed_records += count;
    }

    /// Enumerate candidate ORFs on transcripts.
    ///
    /// Extraction does not read the track, so it is available in both states.
    pub fn extract_candidates(
        &mut self,
        transcripts: &[Transcript],
    ) -> Result<Vec<CandidateOrf>, TranslonError> {
        let (candidates, stats) = extract_candidates(transcripts, &self.config)?;
        self.summary.extraction = Some(stats);
        self.summary.ran(Stage::Extraction);
        Ok(candidates)
    }

    fn into_state<T: TrackState>(self, track: OccupancyTrack) -> Translon<T> {
        Translon {
            config: self.config,
            offsets: self.offsets,
            track,
            summary: self.summary,
            _state: PhantomData,
        }
    }
}

impl UntrackedTranslon {
    /// Creates an instance with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance with a custom configuration.
    ///
    /// Sizes the global rayon pool when `num_threads` is set.
    ///
    /// # Errors
    ///
    /// Returns [`TranslonError::Configuration`] if the codon lists contain no
    /// valid codon, the length bounds are inverted, or the thread pool cannot
    /// be configured.
    pub fn with_config(config: TranslonConfig) -> Result<Self, TranslonError> {
        let (_, malformed) = CodonTable::from_config(&config)?;
        if config.min_orf_length > config.max_orf_length {
            return Err(TranslonError::Configuration(format!(
                "minimum ORF length {} exceeds maximum {}",
                config.min_orf_length, config.max_orf_length
            )));
        }

        if let Some(num_threads) = config.num_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    TranslonError::Configuration(format!("Failed to configure thread pool: {e}"))
                })?;
        }

        let mut translon = Self {
            config,
            ..Default::default()
        };
        translon.record_malformed(malformed);
        Ok(translon)
    }

    /// Calibrate per-length offsets and keep them for [`Self::build_track`].
    pub fn calibrate(
        &mut self,
        alignments: &[Alignment],
        start_sites: &[StartSite],
    ) -> Result<&OffsetTable, TranslonError> {
        let table = calibrate(
            alignments,
            start_sites,
            &CalibrationSettings::from(&self.config),
        )?;
        self.summary.ran(Stage::Calibration);
        Ok(self.offsets.insert(table))
    }

    /// Build the occupancy track and move to the tracked state.
    pub fn build_track(
        mut self,
        alignments: &[Alignment],
        offsets: &OffsetTable,
        chrom_sizes: &ChromSizes,
    ) -> Result<TrackedTranslon, TranslonError> {
        let (track, stats) = build_track(alignments, offsets, chrom_sizes)?;
        self.summary.track = Some(stats);
        self.summary.ran(Stage::TrackBuild);
        Ok(self.into_state(track))
    }

    /// Use a precomputed track.
    #[must_use]
    pub fn with_track(mut self, track: OccupancyTrack) -> TrackedTranslon {
        self.summary.ran(Stage::TrackLoad);
        self.into_state(track)
    }

    /// Offsets from the last calibration, if any.
    #[must_use]
    pub fn offsets(&self) -> Option<&OffsetTable> {
        self.offsets.as_ref()
    }
}

impl TrackedTranslon {
    /// Creates a tracked instance directly from a configuration and a track.
    pub const fn new(config: TranslonConfig, track: OccupancyTrack) -> Self {
        Self {
            config,
            offsets: None,
            track,
            summary: RunSummary {
                stages: Vec::new(),
                malformed_records: 0,
                alignments: None,
                track: None,
                extraction: None,
                scoring: None,
                report_skipped: 0,
            },
            _state: PhantomData,
        }
    }

    #[must_use]
    pub const fn track(&self) -> &OccupancyTrack {
        &self.track
    }

    /// Score candidates with the configured algorithm, preserving order.
    pub fn score(&mut self, candidates: &[CandidateOrf]) -> Result<Vec<ScoredOrf>, TranslonError> {
        let settings = ScoringSettings {
            algorithm: self.config.algorithm,
            sru_range: self.config.sru_range,
        };
        let (scored, stats) = score_candidates(candidates, self.track(), settings)?;
        self.summary.scoring = Some(stats);
        self.summary.ran(Stage::Scoring);
        Ok(scored)
    }

    /// Report windows and their metagene summary.
    pub fn report(&mut self, scored: &[ScoredOrf]) -> (Vec<ReportRecord>, Vec<MetagenePoint>) {
        let (records, skipped) = aggregate(
            scored,
            self.track(),
            self.config.range_param,
            self.config.report_order,
        );
        let points = metagene(&records, self.config.range_param);
        self.summary.report_skipped += skipped;
        self.summary.ran(Stage::Report);
        (records, points)
    }

    /// Write both strands of the track.
    pub fn write_track(&self, paths: &OutputPaths, name: &str) -> Result<(), TranslonError> {
        for (strand, path, suffix) in [
            (Strand::Forward, &paths.track_forward, "fwd"),
            (Strand::Reverse, &paths.track_reverse, "rev"),
        ] {
            let mut writer = create_output(path)?;
            write_track(
                &mut writer,
                self.track(),
                strand,
                self.config.track_format,
                &format!("{name} {suffix}"),
            )?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Consume the instance into the run's results.
    #[must_use]
    pub fn into_results(
        self,
        candidates: Vec<CandidateOrf>,
        scored: Vec<ScoredOrf>,
        records: Vec<ReportRecord>,
        metagene: Vec<MetagenePoint>,
    ) -> PipelineResults {
        PipelineResults {
            offsets: self.offsets,
            track: self.track,
            candidates,
            scored,
            records,
            metagene,
            summary: self.summary,
        }
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>, TranslonError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Runs a whole pipeline from input files to output files.
///
/// Unlike the type-state [`Translon`], the analyzer decides the stages from
/// the supplied inputs and handles all file reading and writing.
///
/// # Examples
///
/// ```rust,no_run
/// use translon_core::engine::TranslonAnalyzer;
/// use translon_core::config::TranslonConfig;
/// use translon_core::pipeline::PipelineInputs;
/// use std::path::{Path, PathBuf};
///
/// let inputs = PipelineInputs {
///     alignments: Some("reads.bam".into()),
///     chrom_sizes: Some("genome.sizes".into()),
///     genome: Some("genome.fa".into()),
///     annotation: Some("genes.gtf".into()),
///     ..Default::default()
/// };
/// let results = TranslonAnalyzer::new(TranslonConfig::default())
///     .run(&inputs, Path::new("out/sample"))?;
/// println!("{} ORFs reported", results.records.len());
/// # Ok::<(), translon_core::types::TranslonError>(())
/// ```
#[derive(Debug)]
pub struct TranslonAnalyzer {
    /// Configuration of every run
    pub config: TranslonConfig,
}

impl TranslonAnalyzer {
    pub const fn new(config: TranslonConfig) -> Self {
        Self { config }
    }

    /// Run every stage the inputs call for and write the outputs under
    /// `stem`.
    ///
    /// # Errors
    ///
    /// Fails before reading any input when the inputs cannot produce a
    /// report, and on any fatal error of a stage.
    pub fn run(
        &self,
        inputs: &PipelineInputs,
        stem: &Path,
    ) -> Result<PipelineResults, TranslonError> {
        let plan = inputs.plan()?;
        let paths = OutputPaths::from_stem(stem, self.config.track_format);
        let name = stem
            .file_name()
            .map_or_else(|| "translon".to_string(), |n| n.to_string_lossy().into_owned());

        let untracked = UntrackedTranslon::with_config(self.config.clone())?;
        let mut tracked = match &plan.track {
            TrackSource::Precomputed { files, bounds } => {
                load_track(untracked, files, bounds.as_ref())?
            }
            TrackSource::Build {
                alignments,
                bounds,
                offsets,
            } => {
                let tracked = build_from_alignments(
                    untracked,
                    alignments,
                    bounds,
                    offsets,
                    plan.coordinates,
                    &paths,
                )?;
                tracked.write_track(&paths, &name)?;
                tracked
            }
        };

        let (candidates, scored) = match &plan.scored {
            ScoredSource::Table(path) => {
                let (scored, malformed) =
                    read_scored_table(BufReader::new(File::open(path)?))?;
                tracked.record_malformed(malformed);
                if scored.is_empty() {
                    return Err(TranslonError::Configuration(format!(
                        "scored ORF table {} has no usable rows",
                        path.display()
                    )));
                }
                tracked.summary.ran(Stage::ScoredLoad);
                (Vec::new(), scored)
            }
            ScoredSource::Score(source) => {
                let candidates = load_candidates(&mut tracked, source, &paths)?;
                let scored = tracked.score(&candidates)?;
                let mut writer = create_output(&paths.scored)?;
                write_scored_table(&mut writer, &scored)?;
                writer.flush()?;
                (candidates, scored)
            }
        };

        let (records, points) = tracked.report(&scored);
        let mut writer = create_output(&paths.report)?;
        write_report(&mut writer, &records)?;
        writer.flush()?;
        let mut writer = create_output(&paths.metagene)?;
        write_metagene(&mut writer, &points)?;
        writer.flush()?;

        log::info!("Run complete: {}", tracked.summary());
        Ok(tracked.into_results(candidates, scored, records, points))
    }
}

fn read_bounds(
    untracked: &mut UntrackedTranslon,
    bounds: &BoundsSource,
) -> Result<ChromSizes, TranslonError> {
    match bounds {
        BoundsSource::ChromSizes(path) => {
            let (sizes, malformed) = read_chrom_sizes(path)?;
            untracked.record_malformed(malformed);
            Ok(sizes)
        }
        BoundsSource::TranscriptLengths(path) => Ok(transcript_sizes(&read_transcripts(path)?)),
    }
}

fn load_track(
    mut untracked: UntrackedTranslon,
    files: &[PathBuf],
    bounds: Option<&BoundsSource>,
) -> Result<TrackedTranslon, TranslonError> {
    let sizes = match bounds {
        Some(bounds) => Some(read_bounds(&mut untracked, bounds)?),
        None => {
            log::warn!("No chromosome sizes given; positions past the track signal read as zero");
            None
        }
    };
    let (track, malformed) = read_bedgraph(files, sizes.as_ref())?;
    untracked.record_malformed(malformed);
    Ok(untracked.with_track(track))
}

fn build_from_alignments(
    mut untracked: UntrackedTranslon,
    alignments: &Path,
    bounds: &BoundsSource,
    offsets: &OffsetSource,
    coordinates: CoordinateSystem,
    paths: &OutputPaths,
) -> Result<TrackedTranslon, TranslonError> {
    let chrom_sizes = read_bounds(&mut untracked, bounds)?;

    // Start sites and offset tables are read before the alignments so that a
    // bad reference fails fast.
    let offsets = match offsets {
        OffsetSource::Table(path) => {
            let (table, malformed) = OffsetTable::read_tsv(path, untracked.config.default_offset)?;
            untracked.record_malformed(malformed);
            PendingOffsets::Table(table)
        }
        OffsetSource::Calibrate { annotation } => {
            let (transcripts, malformed) = read_gtf(annotation)?;
            untracked.record_malformed(malformed);
            let sites = match coordinates {
                CoordinateSystem::Genomic => genomic_start_sites(&transcripts),
                CoordinateSystem::Transcript => transcript_start_sites(&transcripts),
            };
            if sites.is_empty() {
                return Err(TranslonError::Configuration(
                    "annotation contains no start codons to calibrate offsets against".to_string(),
                ));
            }
            PendingOffsets::Calibrate(sites)
        }
    };

    let (reads, stats) = read_alignments(alignments)?;
    untracked.record_malformed(stats.malformed);
    untracked.summary.alignments = Some(stats);

    let table = match offsets {
        PendingOffsets::Table(table) => table,
        PendingOffsets::Calibrate(sites) => {
            let table = untracked.calibrate(&reads, &sites)?.clone();
            let mut writer = create_output(&paths.offsets)?;
            table.write_tsv(&mut writer)?;
            writer.flush()?;
            table
        }
    };

    untracked.build_track(&reads, &table, &chrom_sizes)
}

/// Offsets known before the alignments are read
enum PendingOffsets {
    Table(OffsetTable),
    Calibrate(Vec<StartSite>),
}

fn load_candidates(
    tracked: &mut TrackedTranslon,
    source: &CandidateSource,
    paths: &OutputPaths,
) -> Result<Vec<CandidateOrf>, TranslonError> {
    let transcripts = match source {
        CandidateSource::Table(path) => {
            let (orfs, malformed) = read_orf_table(BufReader::new(File::open(path)?))?;
            tracked.record_malformed(malformed);
            if orfs.is_empty() {
                return Err(TranslonError::Configuration(format!(
                    "candidate ORF table {} has no usable rows",
                    path.display()
                )));
            }
            tracked.summary.ran(Stage::CandidateLoad);
            return Ok(orfs);
        }
        CandidateSource::Transcripts(path) => read_transcripts(path)?,
        CandidateSource::GenomeAnnotation { genome, annotation } => {
            let genome = read_genome(genome)?;
            let (mut transcripts, malformed) = read_gtf(annotation)?;
            tracked.record_malformed(malformed);
            transcripts.retain_mut(|transcript| {
                match assemble_transcript(&genome, &transcript.exons) {
                    Ok(sequence) => {
                        transcript.sequence = sequence;
                        true
                    }
                    Err(e) => {
                        log::warn!("Skipping transcript {}: {e}", transcript.id);
                        false
                    }
                }
            });
            transcripts
        }
    };

    let candidates = tracked.extract_candidates(&transcripts)?;
    if candidates.is_empty() {
        return Err(TranslonError::Coordinate(format!(
            "no candidate ORFs found on {} transcripts",
            transcripts.len()
        )));
    }
    let mut writer = create_output(&paths.orfs)?;
    write_orf_table(&mut writer, &candidates)?;
    writer.flush()?;
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReportOrder, TrackFormat};
    use crate::types::ScoringAlgorithm;
    use tempfile::TempDir;

    const SEQUENCE: &[u8] = b"CCCCCCCCCCCCCCCATGAAACCCGGGTTTAAACCCGGGTAACCCCCCCCCCCC";

    fn sizes() -> ChromSizes {
        let mut sizes = ChromSizes::new();
        sizes.insert("tx1".to_string(), SEQUENCE.len() as u64);
        sizes
    }

    /// Reads whose P-site (offset 12) lands on every codon of the ORF at 15.
    fn phased_reads() -> Vec<Alignment> {
        (0..8)
            .map(|codon| Alignment::new("tx1", 3 + 3 * codon, Strand::Forward, 29).with_count(3))
            .collect()
    }

    #[test]
    fn test_type_state_flow() {
        let mut untracked = UntrackedTranslon::new();
        let sites = vec![StartSite {
            chrom: "tx1".to_string(),
            position: 15,
            strand: Strand::Forward,
        }];
        let offsets = untracked.calibrate(&phased_reads(), &sites).unwrap().clone();
        // Five reads reach the site, at distances 12, 9, 6, 3 and 0 with
        // equal counts; the smallest distance wins the tie.
        assert_eq!(offsets.get(29), Some(0));
        assert_eq!(untracked.offsets(), Some(&offsets));

        let mut tracked = untracked
            .build_track(&phased_reads(), &OffsetTable::new(12), &sizes())
            .unwrap();
        let candidates = tracked
            .extract_candidates(&[Transcript::from_sequence("tx1", SEQUENCE)])
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start, 15);

        let scored = tracked.score(&candidates).unwrap();
        assert_eq!(scored[0].score, 1.0);

        let (records, points) = tracked.report(&scored);
        assert_eq!(records[0].window_start, 0);
        assert_eq!(points.len(), 61);
        assert_eq!(
            tracked.summary().stages,
            vec![
                Stage::Calibration,
                Stage::TrackBuild,
                Stage::Extraction,
                Stage::Scoring,
                Stage::Report
            ]
        );
    }

    #[test]
    fn test_tracked_constructor_scores_directly() {
        let mut track = OccupancyTrack::new(sizes());
        for position in [15, 18, 21] {
            track.add("tx1", Strand::Forward, position, 2.0).unwrap();
        }
        let mut tracked = TrackedTranslon::new(TranslonConfig::default(), track);
        let candidates = tracked
            .extract_candidates(&[Transcript::from_sequence("tx1", SEQUENCE)])
            .unwrap();
        let scored = tracked.score(&candidates).unwrap();
        assert_eq!(scored[0].metrics.in_frame, 6.0);
        assert_eq!(tracked.track().total_signal(), 6.0);
    }

    #[test]
    fn test_with_config_rejects_bad_codons_and_bounds() {
        let config = TranslonConfig {
            start_codons: vec!["AT".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            UntrackedTranslon::with_config(config),
            Err(TranslonError::Configuration(_))
        ));

        let config = TranslonConfig {
            min_orf_length: 10,
            max_orf_length: 9,
            ..Default::default()
        };
        assert!(UntrackedTranslon::with_config(config).is_err());
    }

    #[test]
    fn test_analyzer_runs_from_precomputed_track_and_transcripts() {
        let dir = TempDir::new().unwrap();
        let transcripts = dir.path().join("tx.fa");
        fs::write(
            &transcripts,
            format!(">tx1\n{}\n", String::from_utf8_lossy(SEQUENCE)),
        )
        .unwrap();
        let track = dir.path().join("track.bedgraph");
        fs::write(&track, "tx1\t15\t16\t4\ntx1\t18\t19\t2\ntx1\t19\t20\t1\n").unwrap();

        let config = TranslonConfig {
            algorithm: ScoringAlgorithm::StartRiseUp,
            report_order: ReportOrder::ScoreDescending,
            ..Default::default()
        };
        let inputs = PipelineInputs {
            tracks: vec![track],
            transcripts: Some(transcripts),
            ..Default::default()
        };
        let stem = dir.path().join("out").join("sample");
        let results = TranslonAnalyzer::new(config).run(&inputs, &stem).unwrap();

        assert_eq!(results.scored.len(), 1);
        let metrics = &results.scored[0].metrics;
        assert_eq!(metrics.in_frame, 6.0);
        assert_eq!(metrics.off_frame, 1.0);
        assert_eq!(metrics.start_rise_up, Some(1.0));

        let paths = OutputPaths::from_stem(&stem, TrackFormat::BedGraph);
        assert!(paths.orfs.exists());
        assert!(paths.scored.exists());
        assert!(paths.report.exists());
        assert!(paths.metagene.exists());
        assert!(!paths.offsets.exists());
    }

    #[test]
    fn test_analyzer_fails_without_candidates() {
        let dir = TempDir::new().unwrap();
        let transcripts = dir.path().join("tx.fa");
        fs::write(&transcripts, ">tx1\nCCCCCCGGGTAACCCCCCGGGTTTCCCC\n").unwrap();
        let track = dir.path().join("track.bedgraph");
        fs::write(&track, "tx1\t3\t4\t2\n").unwrap();

        let inputs = PipelineInputs {
            tracks: vec![track],
            transcripts: Some(transcripts),
            ..Default::default()
        };
        let stem = dir.path().join("sample");
        let err = TranslonAnalyzer::new(TranslonConfig::default())
            .run(&inputs, &stem)
            .unwrap_err();
        assert!(matches!(err, TranslonError::Coordinate(_)));
        assert!(!OutputPaths::from_stem(&stem, TrackFormat::BedGraph).report.exists());
    }

    #[test]
    fn test_analyzer_fails_on_empty_scored_table() {
        let dir = TempDir::new().unwrap();
        let scored = dir.path().join("scored.tsv");
        fs::write(&scored, "").unwrap();
        let track = dir.path().join("track.bedgraph");
        fs::write(&track, "tx1\t3\t4\t2\n").unwrap();

        let inputs = PipelineInputs {
            tracks: vec![track],
            scored: Some(scored),
            ..Default::default()
        };
        let err = TranslonAnalyzer::new(TranslonConfig::default())
            .run(&inputs, &dir.path().join("sample"))
            .unwrap_err();
        assert!(matches!(err, TranslonError::Configuration(_)));
    }

    #[test]
    fn test_analyzer_fails_before_reading_inputs() {
        let inputs = PipelineInputs {
            alignments: Some("missing.bam".into()),
            ..Default::default()
        };
        let err = TranslonAnalyzer::new(TranslonConfig::default())
            .run(&inputs, Path::new("unused"))
            .unwrap_err();
        assert!(matches!(err, TranslonError::Configuration(_)));
    }
}
