use serde::{Deserialize, Serialize};

/// Prompt 被拦截的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockedReason {
    BlockedReasonUnspecified,
    Safety,
    Other,
    Blocklist,
    ProhibitedContent,
    ImageSafety,
    #[serde(other)]
    Unknown,
}

/// 生成结束的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    FinishReasonUnspecified,
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Other,
    Blocklist,
    ProhibitedContent,
    MalformedFunctionCall,
    #[serde(other)]
    Unknown,
}

/// 文件状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    #[serde(alias = "STATE_UNSPECIFIED")]
    StateUnspecified,
    #[serde(alias = "STATE_PROCESSING")]
    Processing,
    #[serde(alias = "STATE_ACTIVE")]
    Active,
    #[serde(alias = "STATE_FAILED")]
    Failed,
}

/// 文件来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileSource {
    SourceUnspecified,
    Uploaded,
    Generated,
}
