use serde::{Deserialize, Serialize};

/// 对话内容。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// 角色：user/model。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// 消息内容片段。
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// 创建用户文本消息。
    pub fn user(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)], Role::User)
    }

    /// 创建模型文本消息。
    pub fn model(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)], Role::Model)
    }

    /// 从 parts 构建内容。
    #[must_use]
    pub const fn from_parts(parts: Vec<Part>, role: Role) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// 提取第一段文本。
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| part.text_value())
    }

    /// 拼接所有非思考文本片段；没有文本时返回 `None`。
    #[must_use]
    pub fn joined_text(&self) -> Option<String> {
        let mut texts = self
            .parts
            .iter()
            .filter(|part| !part.is_thought())
            .filter_map(Part::text_value)
            .peekable();
        texts.peek()?;
        Some(texts.collect())
    }
}

/// 内容角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// 内容部分。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// 具体内容变体。
    #[serde(flatten)]
    pub kind: PartKind,
    /// 是否为思考内容。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// 创建文本 Part。
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: PartKind::Text { text: text.into() },
            thought: None,
        }
    }

    /// 创建文件 URI Part。
    pub fn file_data(file_uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            kind: PartKind::FileData {
                file_data: FileData {
                    file_uri: file_uri.into(),
                    mime_type: mime_type.into(),
                },
            },
            thought: None,
        }
    }

    /// 设置是否为思考内容。
    #[must_use]
    pub const fn with_thought(mut self, thought: bool) -> Self {
        self.thought = Some(thought);
        self
    }

    /// 获取文本内容（仅当为 Text Part）。
    #[must_use]
    pub const fn text_value(&self) -> Option<&str> {
        match &self.kind {
            PartKind::Text { text } => Some(text.as_str()),
            PartKind::FileData { .. } => None,
        }
    }

    #[must_use]
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// 内容部分的具体变体。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum PartKind {
    Text {
        text: String,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

/// URI 文件数据。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}
