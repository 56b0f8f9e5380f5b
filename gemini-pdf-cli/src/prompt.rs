//! Prompt selection: a literal prompt or the quiz template.

use tracing::{error, warn};

use crate::error::CliError;

/// Prompt chosen for the generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    Literal(String),
    Quiz { num_questions: u32 },
}

impl PromptSource {
    /// Picks the prompt for a run. `--quiz` wins over `--prompt`; with neither
    /// (or an empty prompt) the run is a usage error.
    pub fn resolve(prompt: Option<&str>, quiz: bool, num_questions: u32) -> Result<Self, CliError> {
        let prompt = prompt.filter(|text| !text.is_empty());
        match (quiz, prompt) {
            (true, Some(_)) => {
                warn!("--prompt is ignored because --quiz is set.");
                Ok(Self::Quiz { num_questions })
            }
            (true, None) => Ok(Self::Quiz { num_questions }),
            (false, Some(text)) => Ok(Self::Literal(text.to_string())),
            (false, None) => {
                error!("--prompt is required when --quiz is not set.");
                Err(CliError::Usage)
            }
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Quiz { num_questions } => quiz_prompt(*num_questions),
        }
    }
}

#[must_use]
pub fn quiz_prompt(num_questions: u32) -> String {
    format!(
        "Generate {num_questions} multiple-choice quiz questions based on the content of this PDF. \
         Each question should have four options and indicate the correct answer."
    )
}
