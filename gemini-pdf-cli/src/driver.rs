//! Upload-then-generate workflow.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gemini_pdf::files::WaitForFileConfig;
use gemini_pdf::types::content::{Content, Part, Role};
use gemini_pdf::types::enums::FileState;
use gemini_pdf::types::files::{File, UploadFileConfig};
use gemini_pdf::{file_part, Client};
use tracing::{debug, error, info};

#[cfg(test)]
use mockall::automock;

use crate::error::{CliError, Stage};
use crate::prompt::PromptSource;

const PDF_MIME_TYPE: &str = "application/pdf";

/// The two remote calls a run needs.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PdfService: Send + Sync {
    /// Uploads the PDF and returns its ACTIVE file handle.
    async fn upload_pdf(&self, path: &Path) -> gemini_pdf::Result<File>;

    /// Generates text from `prompt` plus a reference to `file`.
    async fn generate(&self, model: &str, prompt: &str, file: &File) -> gemini_pdf::Result<String>;
}

/// [`PdfService`] backed by the Gemini API.
pub struct GeminiPdfService {
    client: Client,
    wait: WaitForFileConfig,
}

impl GeminiPdfService {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            wait: WaitForFileConfig::default(),
        }
    }

    #[must_use]
    pub fn with_wait_config(mut self, wait: WaitForFileConfig) -> Self {
        self.wait = wait;
        self
    }
}

#[async_trait]
impl PdfService for GeminiPdfService {
    async fn upload_pdf(&self, path: &Path) -> gemini_pdf::Result<File> {
        let files = self.client.files();
        let config = UploadFileConfig {
            mime_type: Some(PDF_MIME_TYPE.to_string()),
            ..UploadFileConfig::default()
        };
        let file = files.upload_from_path_with_config(path, config).await?;
        match (file.state, file.name.as_deref()) {
            (Some(FileState::Processing), Some(name)) => {
                debug!(file = name, "waiting for file processing");
                files.wait_for_active(name, self.wait.clone()).await
            }
            (Some(FileState::Failed), _) => Err(gemini_pdf::Error::file_processing_failed(&file)),
            _ => Ok(file),
        }
    }

    async fn generate(&self, model: &str, prompt: &str, file: &File) -> gemini_pdf::Result<String> {
        let content = Content::from_parts(vec![Part::text(prompt), file_part(file)?], Role::User);
        let response = self
            .client
            .models()
            .generate_content(model, vec![content])
            .await?;
        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = ?usage.prompt_token_count,
                total_tokens = ?usage.total_token_count,
                "generation usage"
            );
        }
        response.text().ok_or_else(|| {
            let block_reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason);
            gemini_pdf::Error::Parse {
                message: format!(
                    "response contained no text (finish reason: {:?}, block reason: {:?})",
                    response.finish_reason(),
                    block_reason
                ),
            }
        })
    }
}

/// Inputs of a single run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub pdf_path: PathBuf,
    pub prompt: PromptSource,
    pub model: String,
}

pub struct Driver<S> {
    service: S,
}

impl<S: PdfService> Driver<S> {
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// Uploads the PDF, then asks the model about it. Returns the response text.
    pub async fn run(&self, request: &RunRequest) -> Result<String, CliError> {
        let file = self.upload(&request.pdf_path).await?;
        let prompt = request.prompt.render();
        self.generate(&request.model, &prompt, &file).await
    }

    async fn upload(&self, path: &Path) -> Result<File, CliError> {
        let is_file = tokio::fs::metadata(path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !is_file {
            let err = CliError::FileNotFound {
                path: path.to_path_buf(),
            };
            error!("{err}");
            return Err(err);
        }

        info!("Uploading PDF file: {}", path.display());
        match self.service.upload_pdf(path).await {
            Ok(file) => {
                info!("Upload successful. File name: {}", file.label());
                debug!(uri = ?file.uri, mime_type = ?file.mime_type, "uploaded file");
                Ok(file)
            }
            Err(err) => Err(report(Stage::Upload, err)),
        }
    }

    async fn generate(&self, model: &str, prompt: &str, file: &File) -> Result<String, CliError> {
        info!("Generating content with model '{model}' and prompt: {prompt:?}");
        match self.service.generate(model, prompt, file).await {
            Ok(text) => {
                info!("Content generation successful.");
                Ok(text)
            }
            Err(err) => Err(report(Stage::Generation, err)),
        }
    }
}

fn report(stage: Stage, err: gemini_pdf::Error) -> CliError {
    if err.is_api_error() {
        error!(error = %err, "Gemini API error during {stage}");
    } else {
        error!(error.debug = ?err, "Unexpected error during {stage}");
    }
    CliError::from_client(stage, err)
}
