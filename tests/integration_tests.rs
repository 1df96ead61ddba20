//! Integration tests for fieldview
//!
//! These tests drive the CLI against the fixtures in `demos/`.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a fieldview Command with a clean environment
fn fieldview() -> Command {
    let mut cmd = cargo_bin_cmd!("fieldview");
    cmd.env_remove("FIELDVIEW_PREVIEW_SIZE")
        .env_remove("FIELDVIEW_ID_STRATEGY")
        .env_remove("RUST_LOG");
    cmd
}

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

/// Helper to create a temporary project directory
fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_fieldview_help() {
        fieldview().arg("--help").assert().success();
    }

    #[test]
    fn test_fieldview_version() {
        fieldview().arg("--version").assert().success();
    }

    #[test]
    fn test_unknown_size_is_rejected() {
        fieldview()
            .args(["--size", "huge", "check"])
            .arg(demo("books.toml"))
            .assert()
            .failure();
    }
}

// =============================================================================
// Schema Check Tests
// =============================================================================

mod check {
    use super::*;

    #[test]
    fn test_check_demo_schema() {
        fieldview()
            .arg("check")
            .arg(demo("books.toml"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Books"))
            .stdout(predicate::str::contains("9 properties (11 including nested)"))
            .stdout(predicate::str::contains("[preview: redacted]"));
    }

    #[test]
    fn test_check_rejects_array_without_of() {
        let dir = create_temp_project();
        let schema = dir.path().join("broken.toml");
        fs::write(
            &schema,
            "name = \"Broken\"\npath = \"broken\"\n[properties.tags]\ndata_type = \"array\"\n",
        )
        .unwrap();

        fieldview()
            .arg("check")
            .arg(&schema)
            .assert()
            .failure()
            .stderr(predicate::str::contains("array property tags"));
    }

    #[test]
    fn test_check_rejects_unknown_preview() {
        let dir = create_temp_project();
        let schema = dir.path().join("unknown.toml");
        fs::write(
            &schema,
            "name = \"Books\"\npath = \"books\"\n[properties.rating]\ndata_type = \"number\"\npreview = \"stars\"\n",
        )
        .unwrap();

        fieldview()
            .arg("check")
            .arg(&schema)
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown custom preview 'stars'"));
    }

    #[test]
    fn test_check_missing_file() {
        fieldview()
            .arg("check")
            .arg(demo("nope.toml"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read collection file"));
    }
}

// =============================================================================
// Preview Tests
// =============================================================================

mod preview {
    use super::*;

    #[test]
    fn test_preview_demo_entity() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("preview")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .assert()
            .success()
            .stdout(predicate::str::contains("The Hobbit"))
            .stdout(predicate::str::contains("[Published]"))
            .stdout(predicate::str::contains("1937-09-21"))
            .stdout(predicate::str::contains("authors/tolkien"))
            .stdout(predicate::str::contains("12.5"))
            .stdout(predicate::str::contains("<redacted>"))
            .stdout(predicate::str::contains("reprint planned").not());
    }

    #[test]
    fn test_preview_resolves_references() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("preview")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .arg("--refs")
            .arg(demo("authors.json"))
            .assert()
            .success()
            .stdout(predicate::str::contains("J. R. R. Tolkien"));
    }

    #[test]
    fn test_preview_single_property_json() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("preview")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "tags", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"variant\": \"list\""))
            .stdout(predicate::str::contains("\"fantasy\""))
            .stdout(predicate::str::contains("The Hobbit").not());
    }

    #[test]
    fn test_preview_reports_type_mismatch() {
        let dir = create_temp_project();
        let entity = dir.path().join("bad.json");
        fs::write(&entity, r#"{ "title": "Odd", "price": "cheap" }"#).unwrap();

        fieldview()
            .current_dir(dir.path())
            .arg("preview")
            .arg(demo("books.toml"))
            .arg(&entity)
            .assert()
            .success()
            .stdout(predicate::str::contains("Unexpected value: \"cheap\""))
            .stdout(predicate::str::contains("1 value(s) did not match"));
    }

    #[test]
    fn test_preview_size_from_cli_and_config() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".fieldview")).unwrap();
        fs::write(
            dir.path().join(".fieldview/fieldview.toml"),
            "[preview]\ndefault_size = \"small\"\n",
        )
        .unwrap();

        fieldview()
            .current_dir(dir.path())
            .arg("preview")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .assert()
            .success()
            .stdout(predicate::str::contains("(small)"));

        fieldview()
            .current_dir(dir.path())
            .args(["--size", "tiny", "preview"])
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .assert()
            .success()
            .stdout(predicate::str::contains("(tiny)"));
    }

    #[test]
    fn test_preview_unknown_property() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("preview")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "isbn"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("has no property 'isbn'"));
    }

    #[test]
    fn test_preview_entity_must_be_object() {
        let dir = create_temp_project();
        let entity = dir.path().join("list.json");
        fs::write(&entity, "[1, 2, 3]").unwrap();

        fieldview()
            .current_dir(dir.path())
            .arg("preview")
            .arg(demo("books.toml"))
            .arg(&entity)
            .assert()
            .failure()
            .stderr(predicate::str::contains("must contain a JSON object"));
    }
}

// =============================================================================
// Array Field Tests
// =============================================================================

mod array {
    use super::*;

    #[test]
    fn test_array_ops_replay() {
        let dir = create_temp_project();

        // [fantasy, classic] -> append -> swap 0/2 -> remove 1 => [null, fantasy]
        fieldview()
            .current_dir(dir.path())
            .arg("array")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "tags", "--ops", "append,move:0:2,remove:1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("array_card_tags"))
            .stdout(predicate::str::contains("append -> id 3"))
            .stdout(predicate::str::contains("swap #0 <-> #2"))
            .stdout(predicate::str::contains("remove #1 (id 2)"))
            .stdout(predicate::str::contains("id=3"))
            .stdout(predicate::str::contains("[\n  null,\n  \"fantasy\"\n]"));
    }

    #[test]
    fn test_array_resync_assigns_fresh_ids() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("array")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "tags", "--ops", "resync"])
            .assert()
            .success()
            .stdout(predicate::str::contains("resync -> 2 fresh ids"))
            .stdout(predicate::str::contains("id=3"))
            .stdout(predicate::str::contains("id=4"));
    }

    #[test]
    fn test_array_reference_entries_render_previews() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("array")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "authors"])
            .assert()
            .success()
            .stdout(predicate::str::contains("authors/tolkien"));
    }

    #[test]
    fn test_array_out_of_bounds() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("array")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "tags", "--ops", "remove:5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Operation 'remove:5' failed"))
            .stderr(predicate::str::contains("out of bounds"));
    }

    #[test]
    fn test_array_rejects_non_array_property() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("array")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "title"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not an array"));
    }

    #[test]
    fn test_array_invalid_op() {
        fieldview()
            .arg("array")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "tags", "--ops", "shuffle"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid operation 'shuffle'"));
    }

    #[test]
    fn test_array_uuid_strategy_from_env() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .env("FIELDVIEW_ID_STRATEGY", "uuid")
            .arg("array")
            .arg(demo("books.toml"))
            .arg(demo("book.json"))
            .args(["--property", "tags", "--ops", "append"])
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"append -> id \d{20,}").unwrap());
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_init_creates_file() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created fieldview.toml"));

        assert!(dir.path().join(".fieldview/fieldview.toml").exists());

        fieldview()
            .current_dir(dir.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_config_show_defaults() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("No fieldview.toml found"))
            .stdout(predicate::str::contains("default_size = \"regular\""))
            .stdout(predicate::str::contains("id_strategy = \"sequence\""));
    }

    #[test]
    fn test_config_show_applies_cli_size() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .env("FIELDVIEW_PREVIEW_SIZE", "small")
            .args(["--size", "tiny", "config"])
            .assert()
            .success()
            .stdout(predicate::str::contains("default_size = \"regular\""))
            .stdout(predicate::str::contains("preview size = \"tiny\""));
    }

    #[test]
    fn test_config_validate_warnings() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".fieldview")).unwrap();
        fs::write(
            dir.path().join(".fieldview/fieldview.toml"),
            "[array]\ndrag_hysteresis_px = -1.0\n",
        )
        .unwrap();

        fieldview()
            .current_dir(dir.path())
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration warnings"))
            .stdout(predicate::str::contains("drag_hysteresis_px"));
    }

    #[test]
    fn test_config_validate_valid() {
        let dir = create_temp_project();

        fieldview()
            .current_dir(dir.path())
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Using defaults (valid)"));
    }
}
