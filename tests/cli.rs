use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

/// Helper to get a temporary home directory
fn temp_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp home
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".posture-watch").join("config.json")
}

const BINARY_NAME: &str = "posture-watch";

/// Command isolated from the caller's config and environment.
fn cmd(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.env("HOME", home.path())
        .env_remove("POSTURE_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Serves `status` and `body` to every connection and returns the base URL.
fn serve(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}", addr)
}

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let home = temp_home();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Usage"))
        .stdout(contains("list"))
        .stdout(contains("export"));
}

#[test]
/// Listing fails cleanly when nothing is listening.
fn list_against_unreachable_server_fails() {
    let home = temp_home();
    cmd(&home)
        .args(["--api-url", "http://127.0.0.1:1", "list"])
        .assert()
        .failure()
        .stderr(contains("[ERROR] Failed to load machine data."));
}

#[test]
/// JSON listing prints the records returned by the server.
fn list_json_prints_records() {
    let home = temp_home();
    let url = serve(
        "200 OK",
        r#"[{"machine_id":"win-01","os":"Windows","disk_encryption":{"encrypted":false}},
            {"machine_id":"lin-01","os":"Linux"}]"#,
    );
    cmd(&home)
        .args(["--api-url", &url, "list", "--json", "--os", "Linux"])
        .assert()
        .success()
        .stdout(contains("lin-01"))
        .stdout(contains("win-01").not());
}

#[test]
/// Table listing starts with the fleet summary.
fn list_table_shows_stats() {
    let home = temp_home();
    let url = serve("200 OK", r#"[{"machine_id":"win-01","os":"Windows"}]"#);
    cmd(&home)
        .args(["--api-url", &url, "list"])
        .assert()
        .success()
        .stdout(contains("Total: 1  Healthy: 0  With issues: 1"))
        .stdout(contains("Machine ID"));
}

#[test]
/// Unknown machines surface the HTTP status.
fn show_missing_machine_fails() {
    let home = temp_home();
    let url = serve("404 Not Found", r#"{"detail":"Machine not found"}"#);
    cmd(&home)
        .args(["--api-url", &url, "show", "ghost"])
        .assert()
        .failure()
        .stderr(contains("HTTP 404: Not Found"));
}

#[test]
/// Setting the URL writes the config file, and reset removes it.
fn config_set_url_and_reset() {
    let home = temp_home();
    let config_path = config_file_path(&home);
    assert!(!config_path.exists());

    cmd(&home)
        .args(["config", "set-url", "https://compliance.example.com/"])
        .assert()
        .success()
        .stdout(contains("[SUCCESS] API URL saved."));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("https://compliance.example.com"));

    cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("https://compliance.example.com"));

    cmd(&home)
        .args(["config", "reset"])
        .assert()
        .success();
    assert!(!config_path.exists());
}

#[test]
/// Non-http URLs are rejected and nothing is written.
fn config_set_url_rejects_invalid_url() {
    let home = temp_home();
    cmd(&home)
        .args(["config", "set-url", "ftp://nope"])
        .assert()
        .failure()
        .stderr(contains("[ERROR] Invalid API URL."))
        .stdout(contains("Invalid API URL.").not());
    assert!(!config_file_path(&home).exists());
}
