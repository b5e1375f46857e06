use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cvsift(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cvsift").unwrap();
    cmd.current_dir(dir);
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write a minimal DOCX whose document.xml carries one paragraph per line.
fn write_docx(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let body: String = lines
        .iter()
        .map(|l| format!("<w:p><w:r><w:t>{l}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\"?><w:document xmlns:w=\"x\"><w:body>{body}</w:body></w:document>"
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn resume_lines() -> Vec<&'static str> {
    vec![
        "Jane Doe",
        "jane.doe@example.com",
        "987-654-3210",
        "Education",
        "B.Tech in Computer Science, 2019",
        "Sales Executive, 2019-2021",
    ]
}

#[test]
fn binary_runs() {
    let mut cmd = Command::cargo_bin("cvsift").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cvsift"));
}

#[test]
fn labels_lists_builtin_catalog() {
    let tmp = TempDir::new().unwrap();
    cvsift(tmp.path())
        .arg("labels")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pharma"))
        .stdout(predicate::str::contains("Ecommerce"));
}

#[test]
fn labels_normalizes_extra_labels() {
    let tmp = TempDir::new().unwrap();
    cvsift(tmp.path())
        .args(["labels", "--label", "gaming"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gaming"));
}

#[test]
fn process_requires_files() {
    let tmp = TempDir::new().unwrap();
    cvsift(tmp.path())
        .arg("process")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one file"));
}

#[test]
fn process_docx_writes_csv() {
    let tmp = TempDir::new().unwrap();
    write_docx(tmp.path(), "jane_doe.docx", &resume_lines());

    cvsift(tmp.path())
        .args([
            "process",
            "jane_doe.docx",
            "--name-from",
            "content",
            "-o",
            "out.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("out.csv"));

    let csv = fs::read_to_string(tmp.path().join("out.csv")).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Filename,Name,Email,Phone Number,Education"));
    let row = lines.next().unwrap();
    assert!(row.contains("Jane Doe"));
    assert!(row.contains("jane.doe@example.com"));
    assert!(row.contains("987-654-3210"));
}

#[test]
fn process_reports_sales_tag() {
    let tmp = TempDir::new().unwrap();
    write_docx(tmp.path(), "cv.docx", &resume_lines());

    cvsift(tmp.path())
        .args(["process", "cv.docx", "-o", "out.csv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Sales"));
}

#[test]
fn unsupported_file_is_reported_not_fatal() {
    let tmp = TempDir::new().unwrap();
    write_docx(tmp.path(), "good.docx", &resume_lines());
    fs::write(tmp.path().join("notes.txt"), "plain text resume").unwrap();

    cvsift(tmp.path())
        .args(["process", "good.docx", "notes.txt", "-o", "out.csv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("notes.txt"));

    let csv = fs::read_to_string(tmp.path().join("out.csv")).unwrap();
    // Header plus exactly one record; the .txt upload yields no row.
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn batch_of_only_unsupported_files_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "text").unwrap();

    cvsift(tmp.path())
        .args(["process", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no data extracted"));
}

#[test]
fn default_output_name_is_timestamped() {
    let tmp = TempDir::new().unwrap();
    write_docx(tmp.path(), "cv.docx", &resume_lines());

    cvsift(tmp.path())
        .args(["process", "cv.docx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resume_data_"));
}
