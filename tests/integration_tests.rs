use assert_cmd::Command;
use mdtail::repair::repair;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

fn mdtail() -> Command {
    let mut cmd = Command::cargo_bin("mdtail").unwrap();
    cmd.arg("--no-config").env_remove("MDTAIL_NO_COLOR");
    cmd
}

fn temp_markdown(content: &str) -> NamedTempFile {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(&temp_file, content).unwrap();
    temp_file
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("mdtail").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Streaming Markdown renderer"))
        .stdout(predicate::str::contains("--repair-only"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("mdtail").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mdtail"));
}

#[test]
fn repair_only_closes_the_tail_of_stdin() {
    mdtail()
        .arg("-R")
        .write_stdin("This is **bold text")
        .assert()
        .success()
        .stdout("This is **bold text**\n");
}

#[test]
fn repair_only_matches_library_output() {
    let input = "| Header1 | Header2 |\n|---------|---------|\n| Row1Col1";
    let temp_file = temp_markdown(input);

    mdtail()
        .arg("--repair-only")
        .arg(temp_file.path())
        .assert()
        .success()
        .stdout(format!("{}\n", repair(input)));
}

#[test]
fn skipped_repairs_leave_markers_open() {
    mdtail()
        .args(["-R", "--skip", "emphasis"])
        .write_stdin("Some _italic and **bold text")
        .assert()
        .success()
        .stdout("Some _italic and **bold text\n");
}

#[test]
fn invalid_skip_name_is_rejected() {
    mdtail()
        .args(["-R", "--skip", "everything"])
        .write_stdin("text")
        .assert()
        .failure();
}

#[test]
fn renders_an_unfinished_document_from_a_file() {
    let temp_file = temp_markdown("# Hello\n\nSome **bold");

    mdtail()
        .args(["-A", "-d", "0"])
        .arg(temp_file.path())
        .assert()
        .success()
        .stdout("# Hello\n\nSome bold\n");
}

#[test]
fn renders_stdin_and_drops_bom() {
    mdtail()
        .args(["-A", "-"])
        .write_stdin("\u{feff}# Heading\n\nBody `code")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Heading"))
        .stdout(predicate::str::contains("Body code"))
        .stdout(predicate::str::contains("\u{feff}").not());
}

#[test]
fn unfinished_fence_is_drawn_closed() {
    let temp_file = temp_markdown("```rust\nfn main() {");

    mdtail()
        .args(["-A", "-d", "0", "-k", "1"])
        .arg(temp_file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("╭─ rust"))
        .stdout(predicate::str::contains("│ fn main() {"))
        .stdout(predicate::str::contains("```").not());
}

#[test]
fn cols_controls_wrapping() {
    let temp_file = temp_markdown("aaaa bbbb cccc dddd eeee ffff");

    mdtail()
        .args(["-A", "-d", "0", "-c", "20"])
        .arg(temp_file.path())
        .assert()
        .success()
        .stdout("aaaa bbbb cccc dddd\neeee ffff\n");
}

#[test]
fn raw_mode_passes_markdown_through() {
    mdtail()
        .arg("--no-render")
        .write_stdin("Some **bold")
        .assert()
        .success()
        .stdout("Some **bold\n");
}

#[test]
fn no_stream_mode_prints_once() {
    let temp_file = temp_markdown("- one\n- two *three");

    mdtail()
        .args(["-A", "-S", "-d", "0"])
        .arg(temp_file.path())
        .assert()
        .success()
        .stdout("• one\n• two three\n");
}

#[test]
fn empty_stdin_is_an_error() {
    mdtail()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No content to display"));
}

#[test]
fn whitespace_only_file_is_an_error() {
    let temp_file = temp_markdown("\u{feff}  \n\n");

    mdtail()
        .arg(temp_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No content to display"));
}

#[test]
fn missing_file_is_reported() {
    mdtail()
        .arg("definitely-missing.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn follow_requires_a_file() {
    mdtail().arg("--follow").assert().failure();
}

#[test]
fn follow_reports_missing_file() {
    mdtail()
        .args(["--follow", "definitely-missing.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn config_file_disables_repairs() {
    let config_file = NamedTempFile::new().unwrap();
    fs::write(&config_file, "repairs:\n  emphasis: false\n").unwrap();

    let mut cmd = Command::cargo_bin("mdtail").unwrap();
    cmd.arg("-F")
        .arg(config_file.path())
        .arg("-R")
        .write_stdin("Some **bold")
        .assert()
        .success()
        .stdout("Some **bold\n");
}

#[test]
fn invalid_config_file_is_an_error() {
    let config_file = NamedTempFile::new().unwrap();
    fs::write(&config_file, "repairs: [not, a, map").unwrap();

    let mut cmd = Command::cargo_bin("mdtail").unwrap();
    cmd.arg("--config-file")
        .arg(config_file.path())
        .arg("-R")
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse YAML config file"));
}
