mod support;

use serde_json::Value;
use support::{mount_generate, mount_upload, requests_to, run_cli, Workspace, GENERATE_PATH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn prints_generated_text_on_success() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    mount_generate(&server, "The answer.").await;
    let workspace = Workspace::new();

    let output = run_cli(
        &server,
        &workspace,
        &workspace.pdf(),
        &["--prompt", "Summarize the key points"],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "The answer.\n");

    let generate = requests_to(&server, GENERATE_PATH).await;
    assert_eq!(generate.len(), 1);
    let body: Value = serde_json::from_slice(&generate[0].body).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], "Summarize the key points");
    assert_eq!(
        parts[1]["fileData"]["fileUri"],
        "https://generativelanguage.googleapis.com/v1beta/files/abc123"
    );
    assert_eq!(parts[1]["fileData"]["mimeType"], "application/pdf");

    let log = workspace.log_contents();
    assert!(log.contains("Uploading PDF file"));
    assert!(log.contains("Upload successful. File name: files/abc123"));
    assert!(log.contains("DEBUG"));
}

#[tokio::test]
async fn quiz_overrides_prompt() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    mount_generate(&server, "1. Question").await;
    let workspace = Workspace::new();

    let output = run_cli(
        &server,
        &workspace,
        &workspace.pdf(),
        &["--prompt", "ignored", "--quiz", "--num-questions", "3"],
    )
    .await;

    assert!(output.status.success());
    let generate = requests_to(&server, GENERATE_PATH).await;
    let body: Value = serde_json::from_slice(&generate[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.starts_with("Generate 3 multiple-choice quiz questions"));
    assert!(prompt.ends_with("indicate the correct answer."));
}

#[tokio::test]
async fn missing_prompt_exits_before_network() {
    let server = MockServer::start().await;
    let workspace = Workspace::new();

    let output = run_cli(&server, &workspace, &workspace.pdf(), &[]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(workspace.log_contents().contains("--prompt is required"));
}

#[tokio::test]
async fn missing_file_exits_before_network() {
    let server = MockServer::start().await;
    let workspace = Workspace::new();
    let missing = workspace.dir.path().join("nope.pdf");

    let output = run_cli(&server, &workspace, &missing, &["--prompt", "hi"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[tokio::test]
async fn upload_rejection_skips_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;
    let workspace = Workspace::new();

    let output = run_cli(&server, &workspace, &workspace.pdf(), &["--prompt", "hi"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(requests_to(&server, GENERATE_PATH).await.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed"));
    assert!(stderr.contains("Gemini API error during upload"));
}

#[tokio::test]
async fn generation_error_exits_nonzero() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path(support::GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;
    let workspace = Workspace::new();

    let output = run_cli(&server, &workspace, &workspace.pdf(), &["--prompt", "hi"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(workspace
        .log_contents()
        .contains("Gemini API error during generation"));
}

#[tokio::test]
async fn zero_questions_is_a_usage_error() {
    let server = MockServer::start().await;
    let workspace = Workspace::new();

    let output = run_cli(
        &server,
        &workspace,
        &workspace.pdf(),
        &["--quiz", "--num-questions", "0"],
    )
    .await;

    assert_eq!(output.status.code(), Some(2));
    assert!(server.received_requests().await.unwrap().is_empty());
}
