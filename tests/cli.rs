//! Runs the `docsite` binary against the fixture site.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dst_path = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&entry.path(), &dst_path)?;
        } else {
            fs::copy(entry.path(), &dst_path)?;
        }
    }
    Ok(())
}

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn docsite(args: &[&str], source: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docsite"))
        .args(args)
        .arg("--source")
        .arg(source)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_reports_valid_site() {
    let site = fixture_site();
    let out = docsite(&["check"], site.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    assert!(text.contains("Unlisted: drafts/notes"));
    assert!(text.contains("restore-legacy.md"));
    assert!(text.contains("==> Site is valid"));
}

#[test]
fn check_fails_on_duplicate_document() {
    let site = fixture_site();
    let sidebars = site.path().join("sidebars.toml");
    let content = fs::read_to_string(&sidebars).unwrap();
    fs::write(
        &sidebars,
        content.replace(
            "  { type = \"link\", label = \"Fast Track\"",
            "  \"planning/snapshots\",\n  { type = \"link\", label = \"Fast Track\"",
        ),
    )
    .unwrap();

    let out = docsite(&["check"], site.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("planning/snapshots"));
}

#[test]
fn nav_prints_current_sidebars() {
    let site = fixture_site();
    let out = docsite(&["nav"], site.path());
    assert!(out.status.success());

    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "docs");
    assert_eq!(lines[1], "001 Introduction \u{2192} /introduction/");
    assert!(lines.contains(&"002 Planning \u{2192} /category/planning/"));
    assert!(lines.contains(&"api"));
    assert!(lines.contains(&"upgradeGuides"));
}

#[test]
fn nav_prints_versioned_sidebars() {
    let site = fixture_site();
    let out = docsite(&["nav", "--snapshot", "1.0.0"], site.path());
    assert!(out.status.success());
    assert!(stdout(&out).contains("/1.0.0/introduction/"));

    let missing = docsite(&["nav", "--snapshot", "9.9.9"], site.path());
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("9.9.9"));
}

#[test]
fn build_writes_output_directory() {
    let site = fixture_site();
    let out_dir = TempDir::new().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_docsite"))
        .arg("build")
        .arg("--source")
        .arg(site.path())
        .arg("--output")
        .arg(out_dir.path())
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    assert!(text.contains("Home \u{2192} index.html"));
    assert!(text.contains("version 1.0.0"));
    assert!(out_dir.path().join("introduction/index.html").exists());
    assert!(out_dir.path().join("build-manifest.json").exists());
}

#[test]
fn gen_config_prints_loadable_toml() {
    let site = TempDir::new().unwrap();
    let out = docsite(&["gen-config"], site.path());
    assert!(out.status.success());

    let text = stdout(&out);
    let parsed: toml::Table = toml::from_str(&text).unwrap();
    assert!(parsed.contains_key("theme"));
}
