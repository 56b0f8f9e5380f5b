#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash-exp:generateContent";

/// Scratch directory holding a small PDF and the run log.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lecture.pdf"), b"%PDF-1.4\n%%EOF\n").unwrap();
        Self { dir }
    }

    pub fn pdf(&self) -> PathBuf {
        self.dir.path().join("lecture.pdf")
    }

    pub fn log_file(&self) -> PathBuf {
        self.dir.path().join("run.log")
    }

    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(self.log_file()).unwrap_or_default()
    }
}

pub fn active_file() -> serde_json::Value {
    json!({
        "name": "files/abc123",
        "displayName": "lecture.pdf",
        "mimeType": "application/pdf",
        "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc123",
        "state": "ACTIVE"
    })
}

pub async fn mount_upload(server: &MockServer) {
    mount_upload_with(server, active_file()).await;
}

/// Mounts both legs of a resumable upload; the finalize leg answers with `file`.
pub async fn mount_upload_with(server: &MockServer, file: serde_json::Value) {
    let upload_url = format!("{}/upload-session", server.uri());
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-goog-upload-url", upload_url))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload-session"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-goog-upload-status", "final")
                .set_body_json(json!({ "file": file })),
        )
        .mount(server)
        .await;
}

pub async fn mount_generate(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })))
        .mount(server)
        .await;
}

/// Runs the binary against `server` with the given extra arguments.
pub async fn run_cli(server: &MockServer, workspace: &Workspace, pdf: &Path, extra: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_upload-pdf"))
        .current_dir(workspace.dir.path())
        .env_remove("RUST_LOG")
        .env_remove("GEMINI_API_KEY")
        .env_remove("GENAI_BASE_URL")
        .env_remove("UPLOAD_PDF_LOG_FILE")
        .arg("--pdf-path")
        .arg(pdf)
        .args(["--api-key", "test-key", "--base-url", &server.uri()])
        .arg("--log-file")
        .arg(workspace.log_file())
        .args(extra)
        .output()
        .await
        .unwrap()
}

pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}
