use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use irsweep_core::Hypothesis;

const TRUTH: &str = "order=msb align=0 scheme=rice:5 pred=left sign=plus seed=row16 reset=none scan=row";

fn tmp_path(name: &str, ext: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let pid = std::process::id();
    p.push(format!("irsweep_{}_{}_{}_{}.{}", name, pid, nanos, "tmp", ext));
    p
}

fn run_ok(cmd: &mut Command) -> String {
    let out = cmd.output().expect("spawn command");
    assert!(
        out.status.success(),
        "command failed: status={:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn synth(stream: &PathBuf, truth: &PathBuf, hypothesis: &str) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_irsweep-cli"));
    cmd.args([
        "synth",
        "--out",
        stream.to_str().unwrap(),
        "--width",
        "24",
        "--height",
        "12",
        "--hypothesis",
        hypothesis,
        "--seed",
        "7",
        "--truth",
        truth.to_str().unwrap(),
    ]);
    run_ok(&mut cmd);
}

#[test]
fn synth_then_decode_reproduces_the_truth_frame() {
    let stream = tmp_path("decode", "raw");
    let truth = tmp_path("decode_truth", "pgm");
    let decoded = tmp_path("decode_out", "pgm");
    let label = "order=lsb align=3 scheme=expgolomb pred=med sign=minus seed=frame16 reset=tile:8x4:seed scan=serp";
    synth(&stream, &truth, label);

    let mut dec = Command::new(env!("CARGO_BIN_EXE_irsweep-cli"));
    dec.args([
        "decode",
        "--in",
        stream.to_str().unwrap(),
        "--width",
        "24",
        "--height",
        "12",
        "--hypothesis",
        label,
        "--out",
        decoded.to_str().unwrap(),
    ]);
    run_ok(&mut dec);

    let a = fs::read(&truth).unwrap();
    let b = fs::read(&decoded).unwrap();
    assert!(a.starts_with(b"P5\n24 12\n65535\n"));
    assert_eq!(a, b, "decoded frame differs from the encoded one");

    let _ = fs::remove_file(&stream);
    let _ = fs::remove_file(&truth);
    let _ = fs::remove_file(&decoded);
}

#[test]
fn sweep_ranks_the_true_hypothesis_and_writes_reports() {
    let dir = tempfile::tempdir().unwrap();
    let stream = dir.path().join("frame0.raw");
    let truth = dir.path().join("frame0.truth.pgm");
    synth(&stream, &truth, TRUTH);

    let csv = dir.path().join("report.csv");
    let jsonl = dir.path().join("report.jsonl");
    let best = dir.path().join("best");

    let mut sweep = Command::new(env!("CARGO_BIN_EXE_irsweep-cli"));
    sweep.args([
        "sweep",
        stream.to_str().unwrap(),
        "--width",
        "24",
        "--height",
        "12",
        "--orders",
        "msb",
        "--aligns",
        "0",
        "--schemes",
        "rice:4-5",
        "--predictors",
        "left,med",
        "--signs",
        "plus,minus",
        "--seeding",
        "row16",
        "--scans",
        "row",
        "--resets",
        "none",
        "--workers",
        "2",
        "--top",
        "8",
        "--report",
        csv.to_str().unwrap(),
        "--jsonl",
        jsonl.to_str().unwrap(),
        "--best-dir",
        best.to_str().unwrap(),
    ]);
    let stdout = run_ok(&mut sweep);

    let id = TRUTH.parse::<Hypothesis>().unwrap().id_hex();
    assert!(stdout.contains(&id), "stdout:\n{stdout}");

    let report = fs::read_to_string(&csv).unwrap();
    let mut lines = report.lines();
    assert!(lines.next().unwrap().starts_with("file,rank,id,score,outcome"));
    assert_eq!(lines.clone().count(), 8);
    let row = report.lines().find(|l| l.contains(&id)).unwrap();
    assert!(row.contains(",complete,"), "{row}");

    let records = fs::read_to_string(&jsonl).unwrap();
    assert_eq!(records.lines().count(), 8);
    assert!(records.lines().all(|l| l.starts_with('{') && l.ends_with('}')));

    assert!(best.join("frame0.best.pgm").exists());
}

#[test]
fn bad_hypothesis_label_is_rejected() {
    let stream = tmp_path("bad", "raw");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_irsweep-cli"));
    cmd.args([
        "synth",
        "--out",
        stream.to_str().unwrap(),
        "--width",
        "4",
        "--height",
        "4",
        "--hypothesis",
        "scheme=huffman",
    ]);
    let out = cmd.output().expect("spawn command");
    assert!(!out.status.success());
    assert!(!stream.exists());
}

#[test]
fn report_quotes_file_names_containing_commas() {
    let dir = tempfile::tempdir().unwrap();
    let stream = dir.path().join("frame,1.raw");
    let truth = dir.path().join("frame1.truth.pgm");
    synth(&stream, &truth, TRUTH);

    let csv = dir.path().join("report.csv");
    let mut sweep = Command::new(env!("CARGO_BIN_EXE_irsweep-cli"));
    sweep.args([
        "sweep",
        stream.to_str().unwrap(),
        "--width",
        "24",
        "--height",
        "12",
        "--schemes",
        "rice:5",
        "--predictors",
        "left",
        "--signs",
        "plus",
        "--seeding",
        "row16",
        "--aligns",
        "0",
        "--orders",
        "msb",
        "--scans",
        "row",
        "--resets",
        "none",
        "--top",
        "1",
        "--report",
        csv.to_str().unwrap(),
    ]);
    run_ok(&mut sweep);

    let report = fs::read_to_string(&csv).unwrap();
    let row = report.lines().nth(1).unwrap();
    let quoted = format!("\"{}\",1,", stream.to_str().unwrap());
    assert!(row.starts_with(&quoted), "{row}");
    assert_eq!(report.lines().count(), 2);
}
