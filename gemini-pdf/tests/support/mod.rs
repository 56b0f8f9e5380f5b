#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use gemini_pdf::Client;

pub fn build_gemini_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(base_url)
        .build()
        .unwrap()
}

/// Matches the raw `x-goog-upload-command` value. The header carries a comma
/// ("upload, finalize"), so it is compared as one string.
pub fn upload_command(expected: &'static str) -> impl Fn(&Request) -> bool + Send + Sync {
    move |req: &Request| {
        req.headers
            .get("x-goog-upload-command")
            .and_then(|value| value.to_str().ok())
            == Some(expected)
    }
}

/// Mounts the two legs of a resumable upload: the `start` request on
/// `/upload/v1beta/files` and the `upload, finalize` request on
/// `/upload-session`, which answers with `file_body`.
pub async fn mount_resumable_upload(server: &MockServer, file_body: serde_json::Value) {
    let upload_url = format!("{}/upload-session", server.uri());

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .and(upload_command("start"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-goog-upload-url", upload_url))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/upload-session"))
        .and(upload_command("upload, finalize"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-goog-upload-status", "final")
                .set_body_json(serde_json::json!({ "file": file_body })),
        )
        .mount(server)
        .await;
}
