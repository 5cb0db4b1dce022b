//! CLI smoke tests against the built binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn fieldgen() -> Command {
    Command::cargo_bin("fieldgen").unwrap()
}

#[test]
fn help_lists_subcommands() {
    fieldgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("constants"))
        .stdout(predicate::str::contains("accessors"))
        .stdout(predicate::str::contains("as-map"));
}

#[test]
fn accessors_write_an_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("model.rs");
    std::fs::write(
        &src,
        "pub struct User { pub id: i64, pub name: Option<String> }",
    )
    .unwrap();
    let out = dir.path().join("gen.rs");

    fieldgen()
        .arg("accessors")
        .arg("--src")
        .arg(&src)
        .args(["--type", "User"])
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("// Code generated by fieldgen."));
    assert!(text.contains("impl User"));
    assert!(text.contains("pub fn set_name(&mut self, value: String)"));
}

#[test]
fn constants_print_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("model.rs");
    std::fs::write(
        &src,
        r#"pub struct User { #[tags(json = "id")] pub id: i64 }"#,
    )
    .unwrap();

    fieldgen()
        .arg("constants")
        .arg("--src")
        .arg(&src)
        .args(["--type", "User", "--tag", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USER_JSON_ID"));
}

#[test]
fn unknown_type_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("model.rs");
    std::fs::write(&src, "pub struct Other { pub x: i64 }").unwrap();

    fieldgen()
        .arg("accessors")
        .arg("--src")
        .arg(&src)
        .args(["--type", "User"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn malformed_rewrite_rule_fails() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("model.rs");
    std::fs::write(&src, "pub struct User { pub id: i64 }").unwrap();

    fieldgen()
        .arg("as-map")
        .arg("--src")
        .arg(&src)
        .args(["--type", "User", "--rewrite", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rewrite rule"));
}
