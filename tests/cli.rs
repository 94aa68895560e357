use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn dash() -> Command {
    let mut cmd = Command::cargo_bin("exposure-dash").unwrap();
    cmd.env_remove("EXPOSURE_API_URL");
    cmd
}

fn json_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn help_lists_options() {
    dash()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("grid"));
}

#[test]
fn invalid_base_url_fails_before_starting_ui() {
    dash()
        .args(["--base-url", "ftp://example.org/api"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn base_url_from_environment_is_validated() {
    dash()
        .env("EXPOSURE_API_URL", "not a url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn unknown_mode_is_rejected() {
    dash()
        .args(["--mode", "plasma"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown analysis mode"));
}

#[test]
fn zero_timeout_is_rejected() {
    dash()
        .args(["--timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value '0'"))
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn grid_prints_ordered_prefixes_and_ignored_keys() {
    let file = json_file(
        r#"{
            "compound": {"Name": "VX"},
            "aeglGraphGrid": {
                "AEGL2_8hr_vaporFlux": "{}",
                "AEGL1_10min_liquidFlux": "{}",
                "AEGL1_8hr_vaporAbsorption": "{}",
                "AEGL1_8hr_liquidFlux": "{}",
                "random_key": "{}",
                "noUnderscoreKey": "{}"
            }
        }"#,
    );

    dash()
        .arg("grid")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "AEGL1_8hr: vaporAbsorption, liquidFlux\nAEGL1_10min: liquidFlux\nAEGL2_8hr: vaporFlux\n",
        ))
        .stdout(predicate::str::contains("ignored random_key: unknown figure 'key'"))
        .stdout(predicate::str::contains("ignored noUnderscoreKey: no '_' separator"));
}

#[test]
fn grid_accepts_bare_grid_object() {
    let file = json_file(r#"{"AEGL3_30min_vaporFlux": "{}"}"#);

    dash()
        .arg("grid")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("AEGL3_30min: vaporFlux"));
}

#[test]
fn grid_rejects_invalid_json() {
    let file = json_file("{not json");

    dash()
        .arg("grid")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn grid_reports_missing_file() {
    dash()
        .args(["grid", "/nonexistent/response.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open file"));
}
