// End-to-end checks of the tapevm binary
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

fn program(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

fn tapevm(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tapevm"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start tapevm");

    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

fn run_file(subcommand: &str, source: &str, extra: &[&str], stdin: &[u8]) -> Output {
    let file = program(source);
    let path = file.path().to_str().unwrap();
    let mut args = vec![subcommand, path];
    args.extend_from_slice(extra);
    tapevm(&args, stdin)
}

#[test]
fn test_run_outputs_bytes() {
    let output = run_file("run", "++++[>++++<-]>.", &[], b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![16]);
    assert!(output.stderr.is_empty());
}

#[test]
fn test_run_reads_stdin() {
    let output = run_file("run", ",.,.", &[], b"A");
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![b'A', 0]);
}

#[test]
fn test_run_optimized() {
    let source = "+".repeat(300) + ".";
    let output = run_file("run", &source, &["-O"], b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![44]);
}

#[test]
fn test_unmatched_open_exits_1() {
    let output = run_file("run", "comment [", &[], b"");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unmatched '[' at position 0"), "{}", stderr);
}

#[test]
fn test_unmatched_close_exits_1() {
    let output = run_file("run", "+]", &[], b"");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unmatched ']' at position 1"), "{}", stderr);
}

#[test]
fn test_missing_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.b");
    let output = tapevm(&["run", missing.to_str().unwrap()], b"");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not open file"), "{}", stderr);
}

#[test]
fn test_format() {
    let output = run_file("format", "++ [>+ [-] <-] .", &[], b"");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "++\n[>+\n  [-\n  ]<-\n].\n"
    );
}

#[test]
fn test_format_optimized_keeps_source() {
    let source = "+".repeat(256) + ".";
    let output = run_file("format", &source, &["-O"], b"");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), source + "\n");
}

#[test]
fn test_debug_quit_exits_0() {
    let output = run_file("debug", "+.+", &[], b"s\nq\n");
    assert_eq!(output.status.code(), Some(0));
    // The `.` ran, but quitting drops the unflushed output
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Executed '+' at position 0"), "{}", stderr);
    assert!(stderr.contains("Executed '.' at position 1"), "{}", stderr);
    assert!(!stderr.contains("at position 2"), "{}", stderr);
}

#[test]
fn test_debug_continue_runs_to_end() {
    let output = run_file("debug", "++.", &[], b"c\n");
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![2]);
}

#[test]
fn test_benchmark_reports_on_stderr() {
    let output = run_file("benchmark", "+[-]+.", &[], b"");
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![1]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Execution time:"), "{}", stderr);
    assert!(stderr.contains("Instructions executed: 6"), "{}", stderr);
    assert!(stderr.contains("Tape cells: 1"), "{}", stderr);
    assert!(stderr.contains("Output bytes: 1"), "{}", stderr);
}

#[test]
fn test_tape_limit_zero_rejected() {
    let output = run_file("run", "+", &["--tape-limit", "0"], b"");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least 1"), "{}", stderr);
}

#[test]
fn test_tape_limit_exceeded() {
    let output = run_file("run", ">>", &["--tape-limit", "2"], b"");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of memory"), "{}", stderr);
}
