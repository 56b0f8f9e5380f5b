//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use gemini_pdf::Client;

use crate::driver::RunRequest;
use crate::error::CliError;
use crate::logging::{LogConfig, DEFAULT_LOG_FILE};
use crate::prompt::PromptSource;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Upload a PDF to Gemini and generate a response or a quiz from it
#[derive(Parser, Debug, Clone)]
#[command(name = "upload-pdf", version)]
#[command(about = "Upload a PDF to the Gemini Files API and generate a response or quiz", long_about = None)]
pub struct Args {
    /// Path to your PDF file
    #[arg(long)]
    pub pdf_path: PathBuf,

    /// Your Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// The prompt to pair with your uploaded PDF
    #[arg(long)]
    pub prompt: Option<String>,

    /// Generate a quiz based on the PDF (overrides --prompt)
    #[arg(long)]
    pub quiz: bool,

    /// Number of quiz questions to generate
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub num_questions: u32,

    /// Model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// File receiving the debug-level run log
    #[arg(long, env = "UPLOAD_PDF_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Override the Gemini API base URL
    #[arg(long, env = "GENAI_BASE_URL")]
    pub base_url: Option<String>,
}

impl Args {
    /// Resolves the prompt for this run; fails before any network traffic.
    pub fn prompt_source(&self) -> Result<PromptSource, CliError> {
        PromptSource::resolve(self.prompt.as_deref(), self.quiz, self.num_questions)
    }

    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }

    #[must_use]
    pub fn run_request(&self, prompt: PromptSource) -> RunRequest {
        RunRequest {
            pdf_path: self.pdf_path.clone(),
            prompt,
            model: self.model.clone(),
        }
    }

    /// Builds the Gemini client from the key, timeout and base URL flags.
    pub fn build_client(&self) -> Result<Client, CliError> {
        let mut builder = Client::builder().api_key(self.api_key.as_str());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(base_url) = self.base_url.as_deref().filter(|url| !url.trim().is_empty()) {
            builder = builder.base_url(base_url);
        }
        builder.build().map_err(|source| CliError::Client { source })
    }
}
