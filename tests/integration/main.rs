//! Integration tests for zigbox

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn zigbox() -> Command {
        cargo_bin_cmd!("zigbox")
    }

    /// Serve a single HTTP response with `body` on a loopback port
    fn serve_index(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{}/download/index.json", addr)
    }

    /// Write a config pointing the index at `url`
    fn config_for(temp: &TempDir, url: &str) -> PathBuf {
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            format!(
                "[index]\nurl = \"{}\"\nbuilds_prefix = \"https://example.test/builds/\"\ntimeout_secs = 5\n",
                url
            ),
        )
        .unwrap();
        path
    }

    const INDEX: &str = r#"{"master": {"version": "0.14.0-dev.1+abc", "x86_64-linux": {"tarball": "https://example.test/builds/zig-x86_64-linux-0.14.0-dev.1+abc.tar.xz", "shasum": "deadbeef", "size": "1024"}}}"#;

    #[test]
    fn help_displays() {
        zigbox()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Zig nightly toolchain containers"));
    }

    #[test]
    fn version_displays() {
        zigbox()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("zigbox"));
    }

    #[test]
    fn config_path() {
        zigbox()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        zigbox()
            .env("ZIGBOX_CONFIG", temp.path().join("config.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]").and(predicate::str::contains("[image]")));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        zigbox()
            .env("ZIGBOX_CONFIG", &path)
            .args(["config", "init"])
            .assert()
            .success();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("base_image = \"debian:bookworm-slim\""));
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[index\n").unwrap();

        zigbox()
            .env("ZIGBOX_CONFIG", &path)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn config_init_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[image]\nrun_as_user = true\n").unwrap();

        zigbox()
            .env("ZIGBOX_CONFIG", &path)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[image]\nrun_as_user = true\n"
        );
    }

    #[test]
    fn zero_timeout_is_rejected_at_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[index]\ntimeout_secs = 0\n").unwrap();

        zigbox()
            .env("ZIGBOX_CONFIG", &path)
            .arg("resolve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("index.timeout_secs"));
    }

    #[test]
    fn unsupported_platform_fails_before_fetch() {
        let temp = TempDir::new().unwrap();
        // Nothing listens here; the platform check must fail first
        let config = config_for(&temp, "http://127.0.0.1:9/index.json");

        zigbox()
            .env("ZIGBOX_CONFIG", &config)
            .args(["dockerfile", "--platform", "linux/arm64"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported platform: linux/arm64"));
    }

    #[test]
    fn dockerfile_from_served_index() {
        let temp = TempDir::new().unwrap();
        let url = serve_index(INDEX);
        let config = config_for(&temp, &url);

        zigbox()
            .env("ZIGBOX_CONFIG", &config)
            .arg("dockerfile")
            .assert()
            .success()
            .stdout(
                predicate::str::starts_with("FROM debian:bookworm-slim\n")
                    .and(predicate::str::contains(
                        "\"https://example.test/builds/zig-x86_64-linux-0.14.0-dev.1+abc.tar.xz\"",
                    ))
                    .and(predicate::str::contains(
                        "RUN [\"mv\",\"zig-x86_64-linux-0.14.0-dev.1+abc\",\"zig-master\"]",
                    )),
            );
    }

    #[test]
    fn resolve_json_from_served_index() {
        let temp = TempDir::new().unwrap();
        let url = serve_index(INDEX);
        let config = config_for(&temp, &url);

        zigbox()
            .env("ZIGBOX_CONFIG", &config)
            .args(["resolve", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "\"archive_name\": \"zig-x86_64-linux-0.14.0-dev.1+abc\"",
            ));
    }

    #[test]
    fn foreign_tarball_host_is_malformed() {
        let temp = TempDir::new().unwrap();
        let url = serve_index(
            r#"{"master": {"x86_64-linux": {"tarball": "https://mirror.test/zig-x86_64-linux.tar.xz"}}}"#,
        );
        let config = config_for(&temp, &url);

        zigbox()
            .env("ZIGBOX_CONFIG", &config)
            .arg("resolve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Malformed download index"));
    }

    #[test]
    fn completions_generate() {
        zigbox()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("zigbox"));
    }

    #[test]
    fn run_requires_command() {
        zigbox().arg("run").assert().failure();
    }
}
