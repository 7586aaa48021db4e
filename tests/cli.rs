//! Command-line tests against the built `texnaming` binary.
//!
//! Run with: `cargo test --test cli`

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn texnaming(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_texnaming"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn write_png(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(4, 4).save(&path).unwrap();
    path
}

/// A temp dir holding the stock rule table as `Config.json`.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let out = texnaming(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    fs::write(tmp.path().join("Config.json"), &out.stdout).unwrap();
    tmp
}

#[test]
fn gen_config_prints_a_loadable_table() {
    let tmp = TempDir::new().unwrap();
    let out = texnaming(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let doc: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["suffix_index"][1], "texture_type");
}

#[test]
fn normalize_prints_canonical_json() {
    let tmp = workspace();
    let out = texnaming(tmp.path(), &["normalize"]);
    assert!(out.status.success());
    let normalized: Value = serde_json::from_slice(&out.stdout).unwrap();
    let original: Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("Config.json")).unwrap())
            .unwrap();
    assert_eq!(normalized, original);
}

#[test]
fn apply_writes_sidecars_and_reports() {
    let tmp = workspace();
    let image = write_png(tmp.path(), "art/T_Rock_cc_nml.png");

    let out = texnaming(tmp.path(), &["apply", "art"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("001 T_Rock_cc_nml"), "{text}");
    assert!(text.contains("Applied 1, rejected 0 (0 deleted), failed 0, skipped 0 of 1 textures"));
    assert!(image.with_extension("png.texture.json").exists());
}

#[test]
fn apply_delete_removes_bad_names() {
    let tmp = workspace();
    let bad = write_png(tmp.path(), "art/T_Rock_nml.png");

    let out = texnaming(tmp.path(), &["apply", "--delete", "art"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("    Deleted"));
    assert!(!bad.exists());
}

#[test]
fn check_exits_non_zero_on_rejection() {
    let tmp = workspace();
    write_png(tmp.path(), "art/T_Rock_cc_col.png");
    let bad = write_png(tmp.path(), "art/T_Rock_col_cc.png");

    let out = texnaming(tmp.path(), &["check", "art"]);
    assert_eq!(out.status.code(), Some(1));
    let text = stdout(&out);
    assert!(text.contains("Rejected: row 0: suffix 'col' is not allowed"), "{text}");
    assert!(text.contains("Valid 1, rejected 1, skipped 0 of 2 textures"));
    // check never writes or deletes
    assert!(bad.exists());
    assert!(!tmp.path().join("art/T_Rock_cc_col.png.texture.json").exists());
}

#[test]
fn check_passes_when_every_name_is_valid() {
    let tmp = workspace();
    write_png(tmp.path(), "art/T_Rock_cc_col.png");
    let out = texnaming(tmp.path(), &["check", "art"]);
    assert!(out.status.success());
}

#[test]
fn broken_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Config.json"), r#"{"texture_typ": []}"#).unwrap();
    let out = texnaming(tmp.path(), &["normalize"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("texture_typ"));
}

#[test]
fn config_flag_selects_toml() {
    let tmp = workspace();
    let out = texnaming(tmp.path(), &["normalize"]);
    let json_doc: Value = serde_json::from_slice(&out.stdout).unwrap();

    // A .toml rule table normalizes to TOML
    let config = texnaming::config::Config::from_value(&json_doc).unwrap();
    config.save(&tmp.path().join("rules.toml")).unwrap();

    let out = texnaming(tmp.path(), &["--config", "rules.toml", "normalize"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("suffix_index"), "{text}");
    assert!(serde_json::from_str::<Value>(&text).is_err());
}
