use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

/// Runs the evaluation binary cargo built for this test run.
pub fn run_eval(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qa-rank-eval"))
        .args(args)
        .output()
        .expect("Failed to execute the evaluation binary")
}

/// Writes one JSON group per line into a fresh run file.
pub fn write_run_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}
