mod common;

use crate::common::{Fixture, SEQUENCE, data_rows, run_translon, translon};

#[test]
fn transcriptome_run_with_offset_table() {
    let fixture = Fixture::new();
    let sam = fixture.sam("tx1");
    let transcripts = fixture.fasta("tx.fa", "tx1");
    let offsets = fixture.write("offsets.tsv", "length\toffset\n29\t12\n");
    let stem = fixture.path("out/sample");

    run_translon(
        &[
            "-a",
            sam.to_str().unwrap(),
            "-t",
            transcripts.to_str().unwrap(),
            "--offsets",
            offsets.to_str().unwrap(),
        ],
        &stem,
    );

    let track = fixture.read("out/sample.fwd.bedgraph");
    assert!(track.starts_with("track type=bedGraph"));
    assert!(track.contains("tx1\t15\t16\t12\n"));
    assert!(track.contains("tx1\t36\t37\t1\n"));

    let orfs = data_rows(&fixture.read("out/sample.orfs.tsv"));
    assert_eq!(orfs.len(), 1);
    assert_eq!(orfs[0][0], "tx1_15_39");

    let scored = data_rows(&fixture.read("out/sample.scored.tsv"));
    assert_eq!(scored[0][11], "legacy");
    assert_eq!(scored[0][12], "1.000000");

    let report = data_rows(&fixture.read("out/sample.report.tsv"));
    assert_eq!(report.len(), 1);
    let metagene = data_rows(&fixture.read("out/sample.metagene.tsv"));
    assert_eq!(metagene.len(), 61);

    // Offsets were supplied, not calibrated.
    assert!(!fixture.path("out/sample.offsets.tsv").exists());
}

#[test]
fn genomic_run_calibrates_offsets_from_annotation() {
    let fixture = Fixture::new();
    let sam = fixture.sam("chr1");
    let genome = fixture.fasta("genome.fa", "chr1");
    let sizes = fixture.write("genome.sizes", &format!("chr1\t{}\n", SEQUENCE.len()));
    let gtf = fixture.write(
        "genes.gtf",
        &format!(
            "chr1\ttest\texon\t1\t{}\t.\t+\t.\tgene_id \"g1\"; transcript_id \"tx1\";\n\
             chr1\ttest\tstart_codon\t16\t18\t.\t+\t0\tgene_id \"g1\"; transcript_id \"tx1\";\n",
            SEQUENCE.len()
        ),
    );
    let stem = fixture.path("sample");

    run_translon(
        &[
            "-a",
            sam.to_str().unwrap(),
            "-g",
            genome.to_str().unwrap(),
            "--annotation",
            gtf.to_str().unwrap(),
            "-c",
            sizes.to_str().unwrap(),
            "--new-scoring",
        ],
        &stem,
    );

    assert_eq!(fixture.read("sample.offsets.tsv"), "length\toffset\n29\t12\n");

    let scored = data_rows(&fixture.read("sample.scored.tsv"));
    assert_eq!(scored.len(), 1);
    assert_eq!(scored[0][8], "15");
    assert_eq!(scored[0][11], "start_rise_up");
    // Every P-site is in frame and downstream of the start.
    assert_eq!(scored[0][12], "1.000000");
    assert_eq!(scored[0][16], "1.000000");
}

#[test]
fn precomputed_artifacts_skip_their_stages() {
    let fixture = Fixture::new();
    let sam = fixture.sam("tx1");
    let transcripts = fixture.fasta("tx.fa", "tx1");
    let offsets = fixture.write("offsets.tsv", "length\toffset\n29\t12\n");
    let first = fixture.path("first");

    run_translon(
        &[
            "-a",
            sam.to_str().unwrap(),
            "-t",
            transcripts.to_str().unwrap(),
            "--offsets",
            offsets.to_str().unwrap(),
        ],
        &first,
    );

    // Rescore the extracted ORFs on the written track.
    let second = fixture.path("second");
    run_translon(
        &[
            "--track",
            fixture.path("first.fwd.bedgraph").to_str().unwrap(),
            "--track",
            fixture.path("first.rev.bedgraph").to_str().unwrap(),
            "-c",
            fixture
                .write("tx.sizes", &format!("tx1\t{}\n", SEQUENCE.len()))
                .to_str()
                .unwrap(),
            "--orfs",
            fixture.path("first.orfs.tsv").to_str().unwrap(),
            "--new-scoring",
        ],
        &second,
    );
    assert!(!fixture.path("second.fwd.bedgraph").exists());
    assert!(!fixture.path("second.orfs.tsv").exists());
    let scored = data_rows(&fixture.read("second.scored.tsv"));
    assert_eq!(scored[0][11], "start_rise_up");

    // A scored table leaves only the report to build.
    let third = fixture.path("third");
    run_translon(
        &[
            "--track",
            fixture.path("first.fwd.bedgraph").to_str().unwrap(),
            "--scored",
            fixture.path("second.scored.tsv").to_str().unwrap(),
            "--sort",
            "score",
        ],
        &third,
    );
    assert!(!fixture.path("third.scored.tsv").exists());
    assert_eq!(data_rows(&fixture.read("third.report.tsv")).len(), 1);
}

#[test]
fn missing_inputs_are_named_and_fail() {
    let fixture = Fixture::new();
    let output = translon()
        .args(["-a", "reads.bam", "-o"])
        .arg(fixture.path("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--chrom-sizes"), "stderr: {stderr}");
    assert!(stderr.contains("--offsets"), "stderr: {stderr}");
    assert!(stderr.contains("--transcripts"), "stderr: {stderr}");
    assert!(!fixture.path("out.report.tsv").exists());
}

#[test]
fn output_stem_is_required() {
    translon().args(["--track", "t.bedgraph"]).assert().failure();
}
