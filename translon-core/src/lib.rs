//! # Translon - translated ORF detection from ribosome profiling
//!
//! A Rust library that turns ribosome footprint alignments into per-nucleotide
//! occupancy tracks and ranks candidate open reading frames by how strongly
//! the footprints support their translation.
//!
//! ## Overview
//!
//! A run moves through five stages:
//!
//! 1. **Offset calibration**: learn the P-site offset of every fragment
//!    length from reads piling up at annotated start codons
//! 2. **Track building**: project every alignment to its P-site and sum the
//!    counts per strand and position
//! 3. **ORF extraction**: enumerate start-to-stop reading frames on transcript
//!    sequences
//! 4. **Scoring**: score every candidate by its three-nucleotide periodicity,
//!    optionally combined with the rise of occupancy at its start codon
//! 5. **Reporting**: cut an occupancy window around every ORF start and
//!    summarise the windows into a metagene profile
//!
//! Every stage except reporting can be skipped by supplying its product as a
//! precomputed file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use translon_core::{TranslonAnalyzer, config::TranslonConfig};
//! use translon_core::pipeline::PipelineInputs;
//! use std::path::Path;
//!
//! let inputs = PipelineInputs {
//!     alignments: Some("reads.bam".into()),
//!     transcripts: Some("transcripts.fa".into()),
//!     offsets: Some("offsets.tsv".into()),
//!     ..Default::default()
//! };
//! let results = TranslonAnalyzer::new(TranslonConfig::default())
//!     .run(&inputs, Path::new("out/sample"))?;
//!
//! println!("Scored {} ORFs", results.scored.len());
//! # Ok::<(), translon_core::types::TranslonError>(())
//! ```
//!
//! ## Architecture
//!
//! The engine uses a type-state pattern so that scoring and reporting can only
//! be called once an occupancy track exists:
//!
//! ```rust
//! use translon_core::engine::UntrackedTranslon;
//! use translon_core::calibration::OffsetTable;
//! use translon_core::sequence::ChromSizes;
//! use translon_core::types::Alignment;
//! use bio::bio_types::strand::Strand;
//!
//! let mut sizes = ChromSizes::new();
//! sizes.insert("chr1".to_string(), 1_000);
//! let reads = vec![Alignment::new("chr1", 100, Strand::Forward, 29)];
//!
//! let untracked = UntrackedTranslon::new();
//! // The type changes to TrackedTranslon
//! let tracked = untracked.build_track(&reads, &OffsetTable::new(12), &sizes)?;
//! assert_eq!(tracked.track().value_at("chr1", Strand::Forward, 112), Some(1.0));
//! # Ok::<(), translon_core::types::TranslonError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Run configuration
//! - [`engine`]: Type-state engine and the file-driven analyzer
//! - [`pipeline`]: Input combinations and the stages they select
//! - [`types`]: Core data types and the error type
//! - [`alignments`]: SAM/BAM/CRAM reading
//! - [`annotation`]: GTF reading and start sites
//! - [`calibration`]: P-site offset tables and their calibration
//! - [`track`]: Occupancy tracks, building and bedGraph loading
//! - [`sequence`]: Codons, FASTA and chromosome sizes
//! - [`coordinates`]: Transcript to genome projection
//! - [`orf`]: Candidate ORF extraction
//! - [`scoring`]: Legacy and Start Rise Up scoring
//! - [`report`]: Report windows and metagene profile
//! - [`output`]: Writers and readers for every artifact
//! - [`results`]: Run summary and collected results
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, TranslonError>`](types::TranslonError).
//! Per-record problems (malformed rows, out-of-bounds reads) are skipped,
//! logged and counted in [`results::RunSummary`]; only problems that leave a
//! stage without usable data are fatal.

pub mod alignments;
pub mod annotation;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod engine;
pub mod orf;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod scoring;
pub mod sequence;
pub mod track;
pub mod types;

pub use engine::TranslonAnalyzer;
pub use types::*;
