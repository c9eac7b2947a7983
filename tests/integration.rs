use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_hdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- stdin mode --

#[test]
fn stdin_mode_lists_symbols_by_category() {
    let input = std::fs::read_to_string(fixture_path("sample_header.h")).unwrap();

    cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("test:"))
        .stdout(predicate::str::contains("TestStruct"))
        .stdout(predicate::str::contains("TestEnum"))
        .stdout(predicate::str::contains("other:"))
        .stdout(predicate::str::contains(
            "4 symbols in 2 categories (1 structs, 1 enums, 2 functions)",
        ));
}

#[test]
fn stdin_mode_clean_fixture_has_no_diagnostics() {
    let input = std::fs::read_to_string(fixture_path("sample_header.h")).unwrap();

    cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn stdin_mode_unterminated_comment_fails() {
    cmd()
        .write_stdin("/** @struct Broken\nstruct Broken { int a; };\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated block comment"));
}

#[test]
fn stdin_mode_warns_on_dangling_related() {
    let input = "/**\n * @function lonely\n * @related nothing_here\n */\nint lonely(void);\n";

    cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing_here"));
}

// -- file mode --

#[test]
fn file_mode_scans_a_header() {
    cmd()
        .arg(fixture_path("sample_header.h"))
        .assert()
        .success()
        .stdout(predicate::str::contains("test_function"));
}

#[test]
fn file_mode_merges_multiple_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("a.h"),
        "/** @function alpha */\nint alpha(void);\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.h"),
        "/**\n * @function beta\n * @related alpha\n */\nint beta(void);\n",
    )
    .unwrap();

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn file_mode_skips_non_headers_in_directories() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("real.h"),
        "/** @function real */\nint real(void);\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "/** @function fake */\n").unwrap();

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("real"))
        .stdout(predicate::str::contains("1 symbols"));
}

#[test]
fn file_mode_duplicate_across_files_warns() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("a.h"),
        "/** @struct Same */\nstruct Same { int a; };\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.h"),
        "/** @struct Same */\nstruct Same { int b; };\n",
    )
    .unwrap();

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate symbol 'Same'"))
        .stdout(predicate::str::contains("1 symbols"));
}

#[test]
fn file_mode_error_in_one_file_still_reports_the_rest() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.h"), "/** @function gone\n").unwrap();
    std::fs::write(
        dir.path().join("good.h"),
        "/** @function kept */\nint kept(void);\n",
    )
    .unwrap();

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated block comment"))
        .stdout(predicate::str::contains("kept"));
}

// -- flags --

#[test]
fn quiet_suppresses_the_listing() {
    let input = std::fs::read_to_string(fixture_path("sample_header.h")).unwrap();

    let assert = cmd().arg("--quiet").write_stdin(input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!stdout.contains("TestStruct"));
    assert!(stdout.contains("4 symbols"));
}

#[test]
fn category_flag_filters_the_listing() {
    let input = std::fs::read_to_string(fixture_path("sample_header.h")).unwrap();

    let assert = cmd()
        .args(["--category", "other"])
        .write_stdin(input)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("another_function"));
    assert!(!stdout.contains("TestStruct"));
}

#[test]
fn missing_glob_warns_but_succeeds() {
    let mut file = NamedTempFile::with_suffix(".h").unwrap();
    file.write_all(b"/** @function only */\nint only(void);\n")
        .unwrap();

    cmd()
        .arg("no/such/dir/*.h")
        .arg(file.path().to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("no files matched"));
}
