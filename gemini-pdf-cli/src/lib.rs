//! Upload a PDF to the Gemini Files API and generate a response or a quiz from it.

pub mod cli;
pub mod driver;
pub mod error;
pub mod logging;
pub mod prompt;

pub use cli::Args;
pub use driver::{Driver, GeminiPdfService, PdfService, RunRequest};
pub use error::{CliError, Stage};
pub use prompt::PromptSource;
