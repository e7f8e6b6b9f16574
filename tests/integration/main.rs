//! Integration tests for pylayer

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Temp workspace with a config whose order store lives inside it
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let orders = dir.path().join("orders");
            let config = format!(
                "[cache]\ndir = {:?}\n",
                orders.display().to_string()
            );
            fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn orders(&self) -> PathBuf {
            self.path().join("orders")
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.path().join(name);
            fs::write(&path, content).unwrap();
            path
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("pylayer");
            cmd.env("PYLAYER_CONFIG", self.path().join("config.toml"));
            cmd
        }
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("pylayer")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("stable dependency layers"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("pylayer")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pylayer"));
    }

    #[test]
    fn plan_first_run_keeps_file_order() {
        let ws = Workspace::new();
        let file = ws.write("web.txt", "python_version==3.12\n# deps\nx==1\n\ny\n");

        ws.cmd()
            .args(["plan", "--format", "plain"])
            .arg(&file)
            .assert()
            .success()
            .stdout("x==1\ny\n");
    }

    #[test]
    fn plan_merges_with_recorded_order() {
        let ws = Workspace::new();
        fs::create_dir_all(ws.orders()).unwrap();
        fs::write(ws.orders().join("python-3.12.txt"), "a\nb\nc\n").unwrap();
        let file = ws.write("web.txt", "python_version==3.12\nc\nd\na\n");

        ws.cmd()
            .args(["plan", "--format", "plain"])
            .arg(&file)
            .assert()
            .success()
            .stdout("a\nc\nd\n");

        // plan never writes
        let recorded = fs::read_to_string(ws.orders().join("python-3.12.txt")).unwrap();
        assert_eq!(recorded, "a\nb\nc\n");
    }

    #[test]
    fn plan_json_reports_dropped() {
        let ws = Workspace::new();
        fs::create_dir_all(ws.orders()).unwrap();
        fs::write(ws.orders().join("python-3.11.txt"), "a\nb\n").unwrap();
        let file = ws.write("api.txt", "python_version==3.11\nb\n");

        ws.cmd()
            .args(["plan", "--format", "json"])
            .arg(&file)
            .assert()
            .success()
            .stdout(
                predicate::str::contains("\"image\": \"api:py3.11\"")
                    .and(predicate::str::contains("\"dropped\": [\n    \"a\"\n  ]")),
            );
    }

    #[test]
    fn dry_run_prints_dockerfile_without_recording() {
        let ws = Workspace::new();
        let file = ws.write("web.txt", "python_version==3.12\nflask==3.0.2\n");

        ws.cmd()
            .args(["build", "--dry-run"])
            .arg(&file)
            .assert()
            .success()
            .stdout(
                predicate::str::contains("FROM python:3.12")
                    .and(predicate::str::contains("RUN pip install --no-cache-dir flask==3.0.2")),
            );

        assert!(!ws.orders().join("python-3.12.txt").exists());
    }

    #[test]
    fn build_missing_file() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["build", "does-not-exist.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Requirements file not found"));
    }

    #[test]
    fn missing_version_line_is_fatal() {
        let ws = Workspace::new();
        let file = ws.write("bad.txt", "flask\n");

        ws.cmd()
            .arg("build")
            .arg(&file)
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("python_version")
                    .and(predicate::str::contains("Hint:")),
            );

        assert!(!ws.orders().exists());
    }

    #[test]
    fn cache_list_empty() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No recorded orders"));
    }

    #[test]
    fn cache_show_and_clear() {
        let ws = Workspace::new();
        fs::create_dir_all(ws.orders()).unwrap();
        fs::write(ws.orders().join("python-3.10.txt"), "numpy\npandas\n").unwrap();

        ws.cmd()
            .args(["cache", "show", "3.10"])
            .assert()
            .success()
            .stdout("numpy\npandas\n");

        ws.cmd()
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("3.10\n");

        ws.cmd()
            .args(["cache", "clear", "3.10", "--yes"])
            .assert()
            .success();

        assert!(!ws.orders().join("python-3.10.txt").exists());
    }

    #[test]
    fn cache_show_missing_version() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["cache", "show", "2.7"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No stored order for python 2.7"));
    }

    #[test]
    fn config_path_honors_env() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[builder]"));
    }

    #[test]
    fn completions_bash() {
        cargo_bin_cmd!("pylayer")
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pylayer"));
    }
}
