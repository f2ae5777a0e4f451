//! # Translon CLI - translated ORF detection
//!
//! A command-line interface for the Translon ribosome profiling pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Transcriptome alignments with a known offset table
//! translon -a reads.bam -t transcripts.fa --offsets offsets.tsv -o out/sample
//!
//! # Genome alignments, offsets calibrated on the annotation
//! translon -a reads.bam -g genome.fa --annotation genes.gtf -c genome.sizes -o out/sample
//!
//! # Rescore precomputed candidates against a precomputed track
//! translon --track out/sample.fwd.bedgraph --track out/sample.rev.bedgraph \
//!     --orfs out/sample.orfs.tsv --new-scoring -o out/rescored
//! ```
//!
//! ## Outputs
//!
//! Every file is named `<stem>.<artifact>`:
//!
//! - `offsets.tsv`: calibrated offsets (only when calibrating)
//! - `fwd.bedgraph` / `rev.bedgraph`: the occupancy track (only when built)
//! - `orfs.tsv`: candidate ORFs (only when extracted)
//! - `scored.tsv`: scored ORFs (only when scored)
//! - `report.tsv` and `metagene.tsv`: always
//!
//! Missing inputs are reported all at once and the process exits non-zero.

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::LevelFilter;
use translon_core::config::{CalibrationMethod, ReportOrder, TrackFormat, TranslonConfig};
use translon_core::pipeline::PipelineInputs;
use translon_core::{ScoringAlgorithm, TranslonAnalyzer};

fn cli() -> Command {
    Command::new("translon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Detect translated ORFs from ribosome profiling alignments")
        .arg(
            Arg::new("alignments")
                .short('a')
                .long("alignments")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("SAM, BAM or CRAM alignments of ribosome footprints"),
        )
        .arg(
            Arg::new("chrom-sizes")
                .short('c')
                .long("chrom-sizes")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Two-column chromosome sizes bounding the track"),
        )
        .arg(
            Arg::new("genome")
                .short('g')
                .long("genome")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Genome FASTA, used with --annotation to assemble transcripts"),
        )
        .arg(
            Arg::new("transcripts")
                .short('t')
                .long("transcripts")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Transcript FASTA; without --genome, alignments refer to transcripts"),
        )
        .arg(
            Arg::new("annotation")
                .long("annotation")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("GTF annotation with exons and start codons"),
        )
        .arg(
            Arg::new("offsets")
                .long("offsets")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Precomputed offset table (length<TAB>offset)"),
        )
        .arg(
            Arg::new("track")
                .long("track")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Append)
                .help("Precomputed signed bedGraph track; repeat for one file per strand"),
        )
        .arg(
            Arg::new("orfs")
                .long("orfs")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Precomputed candidate ORF table"),
        )
        .arg(
            Arg::new("scored")
                .long("scored")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Precomputed scored ORF table; only the report is built"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("STEM")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Output path stem; files are written as <STEM>.<artifact>"),
        )
        .arg(
            Arg::new("starts")
                .long("starts")
                .value_name("CODONS")
                .value_delimiter(',')
                .default_value("ATG")
                .help("Comma-separated start codons"),
        )
        .arg(
            Arg::new("stops")
                .long("stops")
                .value_name("CODONS")
                .value_delimiter(',')
                .default_value("TAA,TAG,TGA")
                .help("Comma-separated stop codons"),
        )
        .arg(
            Arg::new("min-length")
                .long("min-length")
                .value_name("NT")
                .value_parser(value_parser!(u64))
                .default_value("0")
                .help("Minimum ORF length, stop codon included"),
        )
        .arg(
            Arg::new("max-length")
                .long("max-length")
                .value_name("NT")
                .value_parser(value_parser!(u64))
                .default_value("1000000")
                .help("Maximum ORF length, stop codon included"),
        )
        .arg(
            Arg::new("allow-run-off")
                .long("allow-run-off")
                .action(ArgAction::SetTrue)
                .help("Also report ORFs without an in-frame stop codon"),
        )
        .arg(
            Arg::new("new-scoring")
                .short('n')
                .long("new-scoring")
                .action(ArgAction::SetTrue)
                .help("Combine periodicity with the Start Rise Up metric"),
        )
        .arg(
            Arg::new("range")
                .short('r')
                .long("range")
                .value_name("NT")
                .value_parser(value_parser!(u64))
                .default_value("30")
                .help("Half-width of the report window around each ORF start"),
        )
        .arg(
            Arg::new("sru-range")
                .long("sru-range")
                .value_name("NT")
                .value_parser(value_parser!(u64))
                .default_value("15")
                .help("Width of each Start Rise Up window"),
        )
        .arg(
            Arg::new("default-offset")
                .long("default-offset")
                .value_name("NT")
                .value_parser(value_parser!(i64))
                .default_value("15")
                .allow_negative_numbers(true)
                .help("Offset for fragment lengths without a calibrated one"),
        )
        .arg(
            Arg::new("min-calibration-reads")
                .long("min-calibration-reads")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .default_value("10")
                .help("Reads a fragment length needs before it is calibrated"),
        )
        .arg(
            Arg::new("calibration-method")
                .long("calibration-method")
                .value_name("METHOD")
                .value_parser(["mode", "change-point"])
                .default_value("mode")
                .help("Statistic used to pick each offset"),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .value_name("ORDER")
                .value_parser(["input", "score"])
                .default_value("input")
                .help("Order of report records"),
        )
        .arg(
            Arg::new("track-format")
                .short('f')
                .long("track-format")
                .value_name("FORMAT")
                .value_parser(["bedgraph", "wig"])
                .default_value("bedgraph")
                .help("Format of written occupancy tracks"),
        )
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Worker threads (default: all cores)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors and skip the final summary"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase logging verbosity (-v info, -vv debug, -vvv trace)"),
        )
}

fn init_verbose(matches: &ArgMatches) {
    let filter_level = if matches.get_flag("quiet") {
        LevelFilter::Error
    } else {
        match matches.get_count("verbose") {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn path_arg(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.get_one::<PathBuf>(id).cloned()
}

fn codons_arg(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn inputs_from(matches: &ArgMatches) -> PipelineInputs {
    PipelineInputs {
        alignments: path_arg(matches, "alignments"),
        chrom_sizes: path_arg(matches, "chrom-sizes"),
        genome: path_arg(matches, "genome"),
        transcripts: path_arg(matches, "transcripts"),
        annotation: path_arg(matches, "annotation"),
        offsets: path_arg(matches, "offsets"),
        tracks: matches
            .get_many::<PathBuf>("track")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        orfs: path_arg(matches, "orfs"),
        scored: path_arg(matches, "scored"),
    }
}

fn config_from(matches: &ArgMatches) -> TranslonConfig {
    let defaults = TranslonConfig::default();
    TranslonConfig {
        start_codons: codons_arg(matches, "starts"),
        stop_codons: codons_arg(matches, "stops"),
        min_orf_length: matches
            .get_one::<u64>("min-length")
            .copied()
            .unwrap_or(defaults.min_orf_length),
        max_orf_length: matches
            .get_one::<u64>("max-length")
            .copied()
            .unwrap_or(defaults.max_orf_length),
        allow_run_off: matches.get_flag("allow-run-off"),
        algorithm: ScoringAlgorithm::from_new_flag(matches.get_flag("new-scoring")),
        range_param: matches
            .get_one::<u64>("range")
            .copied()
            .unwrap_or(defaults.range_param),
        sru_range: matches
            .get_one::<u64>("sru-range")
            .copied()
            .unwrap_or(defaults.sru_range),
        default_offset: matches
            .get_one::<i64>("default-offset")
            .copied()
            .unwrap_or(defaults.default_offset),
        min_calibration_reads: matches
            .get_one::<u64>("min-calibration-reads")
            .copied()
            .unwrap_or(defaults.min_calibration_reads),
        calibration_method: match matches.get_one::<String>("calibration-method").map(String::as_str) {
            Some("change-point") => CalibrationMethod::ChangePoint,
            _ => CalibrationMethod::Mode,
        },
        report_order: match matches.get_one::<String>("sort").map(String::as_str) {
            Some("score") => ReportOrder::ScoreDescending,
            _ => ReportOrder::Input,
        },
        track_format: match matches.get_one::<String>("track-format").map(String::as_str) {
            Some("wig") => TrackFormat::Wiggle,
            _ => TrackFormat::BedGraph,
        },
        num_threads: matches.get_one::<usize>("threads").copied(),
        ..defaults
    }
}

fn runner() -> Result<(), Box<dyn Error>> {
    let matches = cli().get_matches();
    init_verbose(&matches);
    log::info!("Running {}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let Some(stem) = matches.get_one::<PathBuf>("output") else {
        return Err("--output is required".into());
    };
    let inputs = inputs_from(&matches);
    let config = config_from(&matches);
    log::debug!("Inputs: {inputs:#?}");
    log::debug!("Configuration: {config:#?}");

    let analyzer = TranslonAnalyzer::new(config);
    let results = analyzer.run(&inputs, stem)?;

    if !matches.get_flag("quiet") {
        eprintln!(
            "Analysis complete! Scored {} ORFs, reported {}.",
            results.scored.len(),
            results.records.len()
        );
        eprintln!("{}", results.summary);
    }
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        log::error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn test_flags_map_onto_config() {
        let matches = cli().get_matches_from([
            "translon",
            "-o",
            "out/x",
            "--new-scoring",
            "--starts",
            "ATG,CTG",
            "--sort",
            "score",
            "--default-offset",
            "-3",
            "--track-format",
            "wig",
        ]);
        let config = config_from(&matches);
        assert_eq!(config.algorithm, ScoringAlgorithm::StartRiseUp);
        assert_eq!(config.start_codons, vec!["ATG", "CTG"]);
        assert_eq!(config.report_order, ReportOrder::ScoreDescending);
        assert_eq!(config.default_offset, -3);
        assert_eq!(config.track_format, TrackFormat::Wiggle);
        assert_eq!(config.range_param, 30);
        assert_eq!(config.num_threads, None);
    }

    #[test]
    fn test_repeated_tracks_are_collected() {
        let matches = cli().get_matches_from([
            "translon",
            "-o",
            "x",
            "--track",
            "a.bedgraph",
            "--track",
            "b.bedgraph",
        ]);
        let inputs = inputs_from(&matches);
        assert_eq!(inputs.tracks.len(), 2);
        assert_eq!(inputs.alignments, None);
    }
}
