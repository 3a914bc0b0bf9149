//! End-to-end tests for the `datagrid` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn datagrid_cmd() -> Command {
    let mut cmd = Command::cargo_bin("datagrid").unwrap();
    cmd.env_remove("DATAGRID_CONFIG").env_remove("RUST_LOG");
    cmd
}

const DATA: &str = r#"[
    {"id": 1, "name": "Ada", "status": "Active", "age": 36},
    {"id": 2, "name": "Brian", "status": "Inactive", "age": 41},
    {"id": 3, "name": "Cleo <admin>", "status": "Active", "age": null}
]"#;

const CONFIG: &str = r#"{
    "container_id": "people",
    "columns": [
        {"key": "id", "label": "ID", "sortable": true},
        {"key": "name", "label": "Name", "sortable": true, "searchable": true},
        {"key": "status", "label": "Status", "filter_options": ["Active", "Inactive"]},
        {"key": "age", "label": "Age", "sortable": true}
    ],
    "page_sizes": [2, 10],
    "default_page_size": 2
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

mod basic_usage {
    use super::*;

    #[test]
    fn test_help() {
        datagrid_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("render"))
            .stdout(predicate::str::contains("check"));
    }

    #[test]
    fn test_version() {
        datagrid_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("datagrid"));
    }

    #[test]
    fn test_no_subcommand_fails() {
        datagrid_cmd().assert().failure();
    }
}

mod render {
    use super::*;

    #[test]
    fn test_inferred_columns() {
        let dir = TempDir::new().unwrap();
        let data = write(&dir, "data.json", DATA);

        datagrid_cmd()
            .arg("render")
            .arg("--data")
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
            .stdout(predicate::str::contains(r#"class="data-table""#))
            .stdout(predicate::str::contains(r#"data-column="status""#))
            .stdout(predicate::str::contains("Cleo &lt;admin&gt;"))
            .stdout(predicate::str::contains("Total 3 records"));
    }

    #[test]
    fn test_config_filter_and_sort() {
        let dir = TempDir::new().unwrap();
        let data = write(&dir, "data.json", DATA);
        let config = write(&dir, "table.json", CONFIG);

        datagrid_cmd()
            .args(["render", "--data"])
            .arg(&data)
            .arg("--config")
            .arg(&config)
            .args(["--filter", "status=Active", "--sort", "age:desc"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Total 2 records"))
            .stdout(predicate::str::contains("data-filter-key=\"status\""))
            .stdout(predicate::str::contains("Ada"))
            .stdout(predicate::str::contains("Brian").not());
    }

    #[test]
    fn test_config_from_env() {
        let dir = TempDir::new().unwrap();
        let data = write(&dir, "data.json", DATA);
        let config = write(&dir, "table.json", CONFIG);

        datagrid_cmd()
            .env("DATAGRID_CONFIG", &config)
            .args(["render", "--page", "9", "--data"])
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::contains("page-btn active\" data-page=\"2\""));
    }

    #[test]
    fn test_search() {
        let dir = TempDir::new().unwrap();
        let data = write(&dir, "data.json", DATA);

        datagrid_cmd()
            .args(["render", "-s", "bri", "--data"])
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::contains("Total 1 records"))
            .stdout(predicate::str::contains("value=\"bri\""));
    }

    #[test]
    fn test_output_file() {
        let dir = TempDir::new().unwrap();
        let data = write(&dir, "data.json", DATA);
        let out = dir.path().join("page.html");

        datagrid_cmd()
            .args(["render", "--title", "People", "--data"])
            .arg(&data)
            .arg("-o")
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("<title>People</title>"));
        assert!(html.contains("data-table-toolbar"));
        assert!(!html.contains("data-table-pagination"));
    }

    #[test]
    fn test_missing_data_file() {
        datagrid_cmd()
            .args(["render", "--data", "/nonexistent/data.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read"));
    }

    #[test]
    fn test_malformed_data() {
        let dir = TempDir::new().unwrap();
        let data = write(&dir, "data.json", "{not json");

        datagrid_cmd()
            .args(["render", "--data"])
            .arg(&data)
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to parse"));
    }
}

mod check {
    use super::*;

    #[test]
    fn test_valid_config() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "table.json", CONFIG);

        datagrid_cmd()
            .args(["check", "--config"])
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains("ok (4 columns)"));
    }

    #[test]
    fn test_duplicate_columns() {
        let dir = TempDir::new().unwrap();
        let config = write(
            &dir,
            "table.json",
            r#"{"columns": [{"key": "a", "label": "A"}, {"key": "a", "label": "B"}]}"#,
        );

        datagrid_cmd()
            .args(["check", "-c"])
            .arg(&config)
            .assert()
            .failure()
            .stderr(predicate::str::contains("duplicate column key: a"));
    }
}
