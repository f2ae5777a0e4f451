#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A transcript with one ORF: ATG at 15, TAA at 39.
pub const SEQUENCE: &str = "CCCCCCCCCCCCCCCATGAAACCCGGGTTTAAACCCGGGTAACCCCCCCCCCCC";

/// Scratch directory holding the input files of one run
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Forward 29-nt reads on `reference` at 0-based positions 3, 6, ..., 24.
    ///
    /// The first read is collapsed twelve times, so calibration against a
    /// start codon at 15 settles on offset 12.
    pub fn sam(&self, reference: &str) -> PathBuf {
        let mut body = format!("@HD\tVN:1.6\tSO:unsorted\n@SQ\tSN:{reference}\tLN:{}\n", SEQUENCE.len());
        let read = "A".repeat(29);
        for (i, position) in (4..=25).step_by(3).enumerate() {
            let name = if i == 0 { "r0_x12".to_string() } else { format!("r{i}") };
            body.push_str(&format!(
                "{name}\t0\t{reference}\t{position}\t60\t29M\t*\t0\t0\t{read}\t*\n"
            ));
        }
        self.write("reads.sam", &body)
    }

    pub fn fasta(&self, name: &str, reference: &str) -> PathBuf {
        self.write(name, &format!(">{reference}\n{SEQUENCE}\n"))
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }
}

/// The translon binary
pub fn translon() -> Command {
    Command::cargo_bin("translon").unwrap()
}

/// Runs translon with the given arguments and an output stem, asserting success
pub fn run_translon(args: &[&str], stem: &Path) {
    translon()
        .args(args)
        .arg("-o")
        .arg(stem)
        .assert()
        .success();
}

/// Data rows of a TSV file, header dropped
pub fn data_rows(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .skip(1)
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}
