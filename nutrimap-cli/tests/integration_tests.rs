//! Integration tests for the nutrimap CLI
//!
//! Runs the binary end to end. Nutrition and recipe commands compute locally
//! from a snapshot written to a temp directory, so no daemon is needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

const SNAPSHOT: &str = r#"{
  "09003": {
    "ingredientName": "Apples, raw, with skin",
    "portionDescription": "1 medium",
    "portionWeight": 182.0,
    "nutrients": {
      "Energ Kcal": 52.0,
      "Carbohydrt (g)": 13.81,
      "Fiber TD (g)": 2.4,
      "Sugar Tot (g)": 10.39,
      "Potassium (mg)": 107.0
    }
  },
  "19335": {
    "ingredientName": "Sugars, granulated",
    "portionDescription": "1 tsp",
    "portionWeight": 4.2,
    "nutrients": {
      "Energ Kcal": 387.0,
      "Carbohydrt (g)": 99.98,
      "Sugar Tot (g)": 99.8,
      "Added Sugars (g)": 99.8
    }
  }
}"#;

/// Get the path to the nutrimap binary (built by cargo)
fn nutrimap_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nutrimap"));
    cmd.env_remove("RUST_LOG").env_remove("NUTRIMAP_DAEMON_URL");
    cmd
}

/// Run nutrimap with the given args in the specified directory
fn run_nutrimap(dir: &Path, args: &[&str]) -> Output {
    nutrimap_binary()
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute nutrimap command")
}

/// Get stdout as string
fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write the sample snapshot and return its path
fn write_snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("nutrition_data.json");
    fs::write(&path, SNAPSHOT).expect("Failed to write snapshot");
    path
}

fn parse_json(output: &Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({}): {}", e, stdout(output))
    })
}

// ============================================================================
// Nutrition
// ============================================================================

#[test]
fn test_nutrition_per_serving_json() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &["nutrition", "09003", "--data", data.to_str().unwrap(), "--format", "json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let facts = parse_json(&output);
    assert_eq!(facts["ingredientName"], "Apples, raw, with skin");
    assert_eq!(facts["servingSize"], "1 medium");
    assert_eq!(facts["calories"], 94.64);
    assert_eq!(facts["sugars"], 18.91);
    assert!(facts["addedSugars"].is_null());
}

#[test]
fn test_nutrition_per_100g_json() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &[
            "nutrition",
            "09003",
            "-m",
            "100g",
            "--data",
            data.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let facts = parse_json(&output);
    assert_eq!(facts["servingSize"], "100g");
    assert_eq!(facts["calories"], 52.0);
    assert_eq!(facts["fiber"], 2.4);
}

#[test]
fn test_nutrition_table_output() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &["nutrition", "19335", "--data", data.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Sugars, granulated"));
    assert!(out.contains("calories"));
    assert!(out.contains("addedSugars"));
}

#[test]
fn test_nutrition_unknown_ingredient_fails() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &["nutrition", "99999", "--data", data.to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Ingredient not found in nutrition_data"));
}

#[test]
fn test_nutrition_bad_measurement_fails() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &["nutrition", "09003", "-m", "cup", "--data", data.to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("measurement must be"));
}

#[test]
fn test_missing_snapshot_fails() {
    let temp = TempDir::new().unwrap();

    let output = run_nutrimap(
        temp.path(),
        &["nutrition", "09003", "--data", "does-not-exist.json"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does-not-exist.json"));
}

// ============================================================================
// Recipe
// ============================================================================

#[test]
fn test_recipe_aggregates_items() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &[
            "recipe",
            "09003:200",
            "19335:25",
            "unknown:50",
            "--data",
            data.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let facts = parse_json(&output);
    assert_eq!(facts["servingSize"], "Entire Recipe");
    assert_eq!(facts["calories"], 200.75);
    assert_eq!(facts["addedSugars"], 24.95);
    assert_eq!(facts["addedSugarsDailyValue"], 49.9);
    assert!(facts.get("ingredientName").is_none());
}

#[test]
fn test_recipe_from_file() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());
    let items = temp.path().join("items.json");
    fs::write(&items, r#"[{"ingredientId": "09003"}]"#).unwrap();

    let output = run_nutrimap(
        temp.path(),
        &[
            "recipe",
            "--file",
            items.to_str().unwrap(),
            "--data",
            data.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    // amountInGrams defaults to 100
    let facts = parse_json(&output);
    assert_eq!(facts["calories"], 52.0);
    assert!(facts["addedSugars"].is_null());
}

#[test]
fn test_recipe_warns_about_unknown_items_in_table_mode() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &["recipe", "09003", "nope", "--data", data.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("unknown ingredient 'nope' skipped"));
    assert!(stdout(&output).contains("Entire Recipe"));
}

#[test]
fn test_recipe_without_items_fails() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(temp.path(), &["recipe", "--data", data.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No ingredients provided"));
}

#[test]
fn test_recipe_negative_amount_fails() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());

    let output = run_nutrimap(
        temp.path(),
        &["recipe", "09003:-5", "--data", data.to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("non-negative"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_file_supplies_snapshot_and_format() {
    let temp = TempDir::new().unwrap();
    let data = write_snapshot(temp.path());
    fs::write(
        temp.path().join(".nutrimaprc.toml"),
        format!(
            "[output]\nformat = \"json\"\n\n[data]\nnutrient_table = {:?}\n",
            data.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = run_nutrimap(temp.path(), &["nutrition", "09003", "-m", "100g"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(parse_json(&output)["calories"], 52.0);
}

// ============================================================================
// Daemon-backed commands
// ============================================================================

#[test]
fn test_status_without_daemon_fails_with_hint() {
    let temp = TempDir::new().unwrap();

    let output = run_nutrimap(temp.path(), &["status", "--daemon", "http://127.0.0.1:9"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nutrimap serve"));
}

// ============================================================================
// Global flags
// ============================================================================

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    let output = run_nutrimap(temp.path(), &["--help"]);

    assert!(output.status.success());
    let out = stdout(&output);
    for command in ["map", "nutrition", "recipe", "correct", "status", "serve"] {
        assert!(out.contains(command), "help should list {}", command);
    }
}

#[test]
fn test_serve_help_lists_daemon_flags() {
    let temp = TempDir::new().unwrap();
    let output = run_nutrimap(temp.path(), &["serve", "--help"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("--pinecone-index"));
    assert!(out.contains("--nutrition-data"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    let output = run_nutrimap(temp.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_command_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = run_nutrimap(temp.path(), &[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}
