//! Integration tests for the civicverify CLI
//!
//! Each test gets its own directory holding a config file, the record
//! store, the hash registry and the request files, so runs never touch
//! the user's data dir.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Helper function to create a civicverify command bound to a workspace
fn civicverify(ws: &Workspace) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("civicverify"));
    cmd.env("HOME", ws.dir.path())
        .env("CIVICVERIFY_CONFIG", &ws.config)
        .env_remove("RUST_LOG")
        .current_dir(ws.dir.path());
    cmd
}

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("civicverify.toml");
        let store = dir.path().join("data/verifications.jsonl");
        fs::write(
            &config,
            format!("[service]\nlog_level = \"warn\"\nstore_path = {:?}\n", store.display().to_string()),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn store(&self) -> PathBuf {
        self.path().join("data/verifications.jsonl")
    }

    /// Write a PNG photo and return its path as a reference
    fn photo(&self, name: &str) -> String {
        let img = image::RgbImage::from_fn(320, 240, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x * y) % 256) as u8])
        });
        let path = self.path().join(name);
        img.save(&path).unwrap();
        path.display().to_string()
    }

    fn request(&self, name: &str, body: &Value) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(body).unwrap()).unwrap();
        path
    }
}

fn verify_body(issue_id: u64, photo: &str) -> Value {
    json!({
        "issue_id": issue_id,
        "image_urls": [photo],
        "category": "Road Infrastructure",
        "location": {"latitude": 13.0827, "longitude": 80.2707},
        "description": "Large pothole on the main road causing traffic issues"
    })
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// INFORMATIONAL COMMANDS
// =============================================================================

#[test]
fn test_no_command_prints_version_hint() {
    let ws = Workspace::new();
    civicverify(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("civicverify v"))
        .stdout(predicate::str::contains("--help"));
}

#[test]
fn test_categories_lists_known_categories() {
    let ws = Workspace::new();
    civicverify(&ws)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Road Infrastructure"))
        .stdout(predicate::str::contains("supported categories"));
}

#[test]
fn test_config_json_reports_source_and_store() {
    let ws = Workspace::new();
    let output = civicverify(&ws).args(["config", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["source"], ws.config.display().to_string());
    assert_eq!(json["store_path"], ws.store().display().to_string());
    assert_eq!(json["config"]["service"]["port"], 8001);
}

#[test]
fn test_explicit_config_flag_wins() {
    let ws = Workspace::new();
    let other = ws.path().join("other.toml");
    fs::write(&other, "[service]\nport = 9300\n").unwrap();

    let output = civicverify(&ws)
        .args(["--json", "--config"])
        .arg(&other)
        .arg("config")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["config"]["service"]["port"], 9300);
}

#[test]
fn test_invalid_config_fails() {
    let ws = Workspace::new();
    fs::write(&ws.config, "[thresholds]\nauto_approve = 2.0\n").unwrap();

    civicverify(&ws)
        .arg("categories")
        .assert()
        .failure()
        .stderr(predicate::str::contains("thresholds.auto_approve"));
}

// =============================================================================
// VERIFICATION WORKFLOW
// =============================================================================

#[test]
fn test_verify_then_status_and_stats() {
    let ws = Workspace::new();
    let photo = ws.photo("pothole.png");
    let request = ws.request("verify.json", &verify_body(101, &photo));

    let output = civicverify(&ws).arg("--json").arg("verify").arg(&request).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let outcome = stdout_json(&output);
    assert_eq!(outcome["issue_id"], 101);
    assert_eq!(outcome["checks"].as_array().unwrap().len(), 6);
    assert!(ws.store().exists());

    let output = civicverify(&ws).args(["--json", "status", "101"]).output().unwrap();
    assert!(output.status.success());
    let status = stdout_json(&output);
    assert_eq!(status["issue_id"], 101);
    assert_eq!(status["verification_type"], "INITIAL");
    assert_eq!(status["status"], outcome["status"]);
    assert_eq!(status["verification_count"], 1);

    let output = civicverify(&ws).args(["--json", "stats"]).output().unwrap();
    assert!(output.status.success());
    let stats = stdout_json(&output);
    assert_eq!(stats["total_verifications"], 1);
    assert_eq!(stats["by_type"]["INITIAL"], 1);

    let output = civicverify(&ws).args(["--json", "timeline", "101"]).output().unwrap();
    assert!(output.status.success());
    let timeline = stdout_json(&output);
    assert_eq!(timeline["events"].as_array().unwrap().len(), 1);
    assert_eq!(timeline["events"][0]["event_type"], "AI_VERIFICATION_COMPLETED");
    assert!(ws.store().with_file_name("timeline.jsonl").exists());
}

#[test]
fn test_verify_reads_stdin() {
    let ws = Workspace::new();
    let photo = ws.photo("drain.png");

    civicverify(&ws)
        .args(["verify", "-"])
        .write_stdin(serde_json::to_string(&verify_body(7, &photo)).unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Issue #7"))
        .stdout(predicate::str::contains("duplicate_detection"));
}

#[test]
fn test_reused_photo_is_rejected_under_strict() {
    let ws = Workspace::new();
    let photo = ws.photo("shared.png");
    let first = ws.request("first.json", &verify_body(1, &photo));
    let second = ws.request("second.json", &verify_body(2, &photo));

    civicverify(&ws).arg("verify").arg(&first).assert().success();

    civicverify(&ws)
        .args(["verify", "--strict"])
        .arg(&second)
        .assert()
        .failure()
        .stdout(predicate::str::contains("REJECTED"))
        .stdout(predicate::str::contains("Previously used in issue #1"))
        .stderr(predicate::str::contains("Issue #2 was rejected"));

    assert!(ws.path().join("data/image-hashes.jsonl").exists());
}

#[test]
fn test_cross_check_is_recorded() {
    let ws = Workspace::new();
    let before = ws.photo("before.png");
    let after = ws.photo("after.png");
    let request = ws.request(
        "cross.json",
        &json!({
            "issue_id": 55,
            "citizen_images": [before],
            "government_images": [after],
            "location": {"latitude": 13.0827, "longitude": 80.2707},
            "issue_category": "Road Infrastructure"
        }),
    );

    let output = civicverify(&ws).arg("--json").arg("cross-check").arg(&request).output().unwrap();
    assert!(output.status.success());
    let outcome = stdout_json(&output);
    // identical photos: same place, no visible work
    assert_eq!(outcome["work_completed"], false);
    assert_eq!(outcome["status"], "NEEDS_REVIEW");

    civicverify(&ws)
        .args(["status", "55"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CROSS_VERIFICATION"));
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[test]
fn test_malformed_request_fails() {
    let ws = Workspace::new();
    let path = ws.path().join("broken.json");
    fs::write(&path, "{\"issue_id\": 3,").unwrap();

    civicverify(&ws)
        .arg("verify")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed request"));
}

#[test]
fn test_missing_field_fails() {
    let ws = Workspace::new();
    let photo = ws.photo("p.png");
    let mut body = verify_body(4, &photo);
    body.as_object_mut().unwrap().remove("category");
    let request = ws.request("nocat.json", &body);

    civicverify(&ws)
        .arg("verify")
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field: category"));
    assert!(!ws.store().exists());
}

#[test]
fn test_missing_request_file_fails() {
    let ws = Workspace::new();
    civicverify(&ws)
        .args(["verify", "nowhere.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read request"));
}

#[test]
fn test_timeline_of_unknown_issue_is_empty() {
    let ws = Workspace::new();
    civicverify(&ws)
        .args(["timeline", "999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No timeline events for issue #999"));
}

#[test]
fn test_status_of_unknown_issue_fails() {
    let ws = Workspace::new();
    civicverify(&ws)
        .args(["status", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No verification found for issue 999"));
}
