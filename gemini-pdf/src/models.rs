//! Models API surface.

use std::sync::Arc;

use gemini_pdf_types::content::Content;
use gemini_pdf_types::converters;
use gemini_pdf_types::models::{GenerateContentConfig, GenerateContentRequest};
use gemini_pdf_types::response::GenerateContentResponse;
use serde_json::Value;

use crate::client::ClientInner;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct Models {
    pub(crate) inner: Arc<ClientInner>,
}

impl Models {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// 生成内容（默认配置）。
    pub async fn generate_content(
        &self,
        model: impl Into<String>,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse> {
        self.generate_content_with_config(model, contents, GenerateContentConfig::default())
            .await
    }

    /// 生成内容（自定义配置）。
    pub async fn generate_content_with_config(
        &self,
        model: impl Into<String>,
        contents: Vec<Content>,
        config: GenerateContentConfig,
    ) -> Result<GenerateContentResponse> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "model must not be empty".into(),
            });
        }
        if contents.is_empty() {
            return Err(Error::InvalidConfig {
                message: "contents must not be empty".into(),
            });
        }

        let request = GenerateContentRequest::new(contents, config);
        let url = build_model_method_url(&self.inner, &model, "generateContent");
        let body = converters::generate_content_request_to_mldev(&request)?;

        let request = self.inner.http.post(url).json(&body);
        let response = self.inner.send(request).await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        let value = response.json::<Value>().await?;
        Ok(converters::generate_content_response_from_mldev(value)?)
    }
}

fn transform_model_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn build_model_method_url(inner: &ClientInner, model: &str, method: &str) -> String {
    let model = transform_model_name(model);
    let base = &inner.api_client.base_url;
    let version = &inner.api_client.api_version;
    format!("{base}{version}/{model}:{method}")
}
