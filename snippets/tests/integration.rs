use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn extract_cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_extract-snippets")))
}

fn inject_cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_inject-snippets")))
}

fn lister_cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_list-snippet-targets")))
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// -- extract-snippets --

#[test]
fn extract_uses_project_layout_defaults() {
    let root = TempDir::new().unwrap();
    write(
        &root.path().join("test/docs-snippets/basic.cpp"),
        "TEST(Docs, Basic) {\n    // [snippet:basic]\n    allure::step(\"open\");\n    // [/snippet:basic]\n}\n",
    );

    extract_cmd()
        .args(["--root", root.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 1 snippets:"))
        .stdout(predicate::str::contains("  - basic (1 lines)"));

    let json = fs::read_to_string(root.path().join("docs/generated/snippets.json")).unwrap();
    assert!(json.contains("\"basic\": \"allure::step(\\\"open\\\");\""), "got: {json}");
}

#[test]
fn extract_scans_nested_directories() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("src");
    write(&source.join("a.cpp"), "// [snippet:a]\na();\n// [/snippet:a]\n");
    write(&source.join("deep/b.cpp"), "// [snippet:b]\nb();\n// [/snippet:b]\n");
    write(&source.join("deep/ignored.h"), "// [snippet:c]\nc();\n// [/snippet:c]\n");
    let output = root.path().join("out/snippets.json");

    extract_cmd()
        .args(["-s", source.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"a\""));
    assert!(json.contains("\"b\""));
    assert!(!json.contains("\"c\""));
}

#[test]
fn extract_errors_fail_but_still_write() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("src");
    write(&source.join("one.cpp"), "// [snippet:dup]\nfirst();\n// [/snippet:dup]\n");
    write(&source.join("two.cpp"), "// [snippet:dup]\nsecond();\n// [/snippet:dup]\n// [snippet:open]\n");
    let output = root.path().join("snippets.json");

    extract_cmd()
        .args(["-s", source.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Duplicate snippet name 'dup'"))
        .stderr(predicate::str::contains("two.cpp:4: Unclosed snippet 'open'"));

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("first();"));
    assert!(!json.contains("second();"));
}

#[test]
fn extract_reports_marker_errors_when_store_cannot_be_written() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("src");
    write(&source.join("a.cpp"), "// [/snippet:stray]\n");
    // A directory in place of the output file makes the save fail.
    let output = root.path().join("snippets.json");
    fs::create_dir(&output).unwrap();

    extract_cmd()
        .args(["-s", source.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.cpp:1"))
        .stderr(predicate::str::contains("stray"))
        .stderr(predicate::str::contains("snippets.json"));
}

// -- inject-snippets --

#[test]
fn extract_then_inject_round_trip() {
    let root = TempDir::new().unwrap();
    write(
        &root.path().join("test/docs-snippets/a.cpp"),
        "// [snippet:a]\n  foo();\n// [/snippet:a]\n",
    );
    write(
        &root.path().join("docs/src/content/docs-templates/guide/intro.md"),
        "# Intro\n\n<!-- snippet:a:cpp -->\n",
    );
    write(
        &root.path().join("docs/src/content/docs-templates/index.mdx"),
        "No placeholders here.\n",
    );

    extract_cmd()
        .args(["--root", root.path().to_str().unwrap()])
        .assert()
        .success();

    inject_cmd()
        .args(["--root", root.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("intro.md: injected 1 snippet(s)"))
        .stdout(predicate::str::contains("Processed 2 file(s)"));

    let docs = root.path().join("docs/src/content/docs");
    let intro = fs::read_to_string(docs.join("guide/intro.md")).unwrap();
    assert!(intro.contains("```cpp\nfoo();\n```"), "got: {intro}");
    assert_eq!(
        fs::read_to_string(docs.join("index.mdx")).unwrap(),
        "No placeholders here.\n"
    );
}

#[test]
fn inject_missing_snippet_keeps_placeholder() {
    let root = TempDir::new().unwrap();
    let store = root.path().join("snippets.json");
    fs::write(&store, r#"{"known": "known();"}"#).unwrap();
    let templates = root.path().join("templates");
    let template = "<!-- snippet:unknown:cpp -->\n<!-- snippet:known:cpp:title=demo.cpp -->\n";
    write(&templates.join("page.md"), template);
    let output = root.path().join("out");

    inject_cmd()
        .args(["--snippets", store.to_str().unwrap()])
        .args(["-t", templates.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Snippet 'unknown' not found"));

    let page = fs::read_to_string(output.join("page.md")).unwrap();
    assert_eq!(
        page,
        "<!-- snippet:unknown:cpp -->\n```cpp title=\"demo.cpp\"\nknown();\n```\n"
    );
}

#[test]
fn inject_file_error_does_not_stop_other_templates() {
    let root = TempDir::new().unwrap();
    let store = root.path().join("snippets.json");
    fs::write(&store, r#"{"a": "a();"}"#).unwrap();
    let templates = root.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("bad.md"), [0xff, 0xfe, b'\n']).unwrap();
    write(&templates.join("good.md"), "<!-- snippet:a:cpp -->\n");
    let output = root.path().join("out");

    inject_cmd()
        .args(["--snippets", store.to_str().unwrap()])
        .args(["-t", templates.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("good.md: injected 1 snippet(s)"))
        .stderr(predicate::str::contains("bad.md: Error processing file"));

    assert_eq!(
        fs::read_to_string(output.join("good.md")).unwrap(),
        "```cpp\na();\n```\n"
    );
}

#[test]
fn inject_without_store_fails() {
    let root = TempDir::new().unwrap();

    inject_cmd()
        .args(["--root", root.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Snippets file not found"))
        .stderr(predicate::str::contains("run extract-snippets first"));
}

#[test]
fn inject_with_invalid_store_fails() {
    let root = TempDir::new().unwrap();
    let store = root.path().join("snippets.json");
    fs::write(&store, "[1, 2").unwrap();

    inject_cmd()
        .args(["--root", root.path().to_str().unwrap()])
        .args(["--snippets", store.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON"));
}

// -- list-snippet-targets --

#[test]
fn lister_without_build_tree_fails() {
    // Either cmake is missing or it rejects the directory; both are failures.
    let dir = TempDir::new().unwrap();

    lister_cmd()
        .args(["--build-dir", dir.path().join("no-build").to_str().unwrap()])
        .args(["--timeout", "30"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to list targets via CMake"));
}
