//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)]

mod common;

use std::fs;

use common::Workspace;
use predicates::prelude::*;

#[test]
fn test_project_config_applies_format() {
    let ws = Workspace::new();
    ws.write(
        ".profile-photo.toml",
        r"
[output]
format = 'json'
",
    );
    let photo = ws.photo("me.png", 64, 64);

    ws.command()
        .arg("submit")
        .arg(photo)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_cli_overrides_project_config() {
    let ws = Workspace::new();
    ws.write(
        ".profile-photo.toml",
        r"
[output]
format = 'json'
",
    );
    let photo = ws.photo("me.png", 64, 64);

    ws.command()
        .args(["submit", "--format", "text"])
        .arg(photo)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("Photo:"));
}

#[test]
fn test_project_config_found_in_parent() {
    let ws = Workspace::new();
    ws.write(
        ".profile-photo.toml",
        r"
[output]
format = 'json'
",
    );
    let nested = ws.path().join("photos/2024");
    fs::create_dir_all(&nested).unwrap();
    let photo = ws.photo("me.png", 64, 64);

    ws.command()
        .current_dir(&nested)
        .arg("submit")
        .arg(photo)
        .assert()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_project_config_overrides_xdg() {
    let ws = Workspace::new();
    let xdg_dir = ws.path().join("xdg/profile-photo");
    fs::create_dir_all(&xdg_dir).unwrap();
    fs::write(
        xdg_dir.join("config.toml"),
        r"
[policy]
forbidden_keywords = 'smile'

[output]
format = 'json'
",
    )
    .unwrap();
    let photo = ws.photo("me.png", 64, 64);

    // XDG alone: "smile" is forbidden, and the mock analysis is tagged with it
    ws.command()
        .arg("submit")
        .arg(&photo)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"invalid_keywords\":[\"smile\"]"));

    // Project config clears the keyword list but keeps XDG's format
    ws.write(
        ".profile-photo.toml",
        r"
[policy]
forbidden_keywords = ''
",
    );
    ws.command()
        .arg("submit")
        .arg(&photo)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_invalid_config_is_skipped_with_warning() {
    let ws = Workspace::new();
    ws.write(".profile-photo.toml", "[output\nformat = 'json'\n");
    let photo = ws.photo("me.png", 64, 64);

    ws.command()
        .args(["-v", "submit"])
        .arg(photo)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("Photo:"))
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_config_environment_selects_production() {
    let ws = Workspace::new();
    ws.write(
        ".profile-photo.toml",
        r"
[general]
environment = 'production'
",
    );
    let photo = ws.photo("me.png", 64, 64);

    ws.command()
        .arg("submit")
        .arg(photo)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("site URL is required"));
}
