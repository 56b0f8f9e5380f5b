//! Client configuration and transport layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Proxy};

use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_API_VERSION: &str = "v1beta";

/// Gemini 客户端。
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub http: HttpClient,
    pub config: ClientConfig,
    pub api_client: ApiClient,
}

/// 客户端配置。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API 密钥。
    pub api_key: String,
    /// HTTP 配置。
    pub http_options: HttpOptions,
}

/// HTTP 配置。
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// 请求超时（秒）。
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub headers: HashMap<String, String>,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
}

impl Client {
    /// 使用 API Key 创建客户端。
    ///
    /// # Errors
    /// 当 API Key 无效或构建 HTTP 客户端失败时返回错误。
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// 从环境变量创建客户端。
    ///
    /// # Errors
    /// 当环境变量缺失或构建客户端失败时返回错误。
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| Error::InvalidConfig {
                message: "GEMINI_API_KEY or GOOGLE_API_KEY not found".into(),
            })?;
        let mut builder = Self::builder().api_key(api_key);
        if let Ok(base_url) =
            std::env::var("GENAI_BASE_URL").or_else(|_| std::env::var("GEMINI_BASE_URL"))
        {
            if !base_url.trim().is_empty() {
                builder = builder.base_url(base_url);
            }
        }
        if let Ok(api_version) = std::env::var("GENAI_API_VERSION") {
            if !api_version.trim().is_empty() {
                builder = builder.api_version(api_version);
            }
        }
        builder.build()
    }

    /// 创建 Builder。
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// 访问 Models API。
    #[must_use]
    pub fn models(&self) -> crate::models::Models {
        crate::models::Models::new(self.inner.clone())
    }

    /// 访问 Files API。
    #[must_use]
    pub fn files(&self) -> crate::files::Files {
        crate::files::Files::new(self.inner.clone())
    }

    /// 当前使用的基础 URL（已规范化，以 `/` 结尾）。
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.api_client.base_url
    }
}

/// 客户端 Builder。
#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    http_options: HttpOptions,
}

impl ClientBuilder {
    /// 设置 API Key。
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// 设置请求超时（秒）。
    #[must_use]
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.http_options.timeout = Some(secs);
        self
    }

    /// 设置代理。
    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.http_options.proxy = Some(url.into());
        self
    }

    /// 增加默认 HTTP 头。
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_options.headers.insert(key.into(), value.into());
        self
    }

    /// 设置自定义基础 URL。
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http_options.base_url = Some(base_url.into());
        self
    }

    /// 设置 API 版本。
    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.http_options.api_version = Some(api_version.into());
        self
    }

    /// 构建客户端。
    ///
    /// # Errors
    /// 当 API Key 缺失、参数无效或构建 HTTP 客户端失败时返回错误。
    pub fn build(self) -> Result<Client> {
        let Self {
            api_key,
            http_options,
        } = self;

        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::InvalidConfig {
                message: "API key required for Gemini API".into(),
            })?;
        let headers = Self::build_headers(&http_options, &api_key)?;
        let http = Self::build_http_client(&http_options, headers)?;

        let config = ClientConfig {
            api_key,
            http_options,
        };
        let api_client = ApiClient::new(&config);

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                config,
                api_client,
            }),
        })
    }

    fn build_headers(http_options: &HttpOptions, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (key, value) in &http_options.headers {
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| Error::InvalidConfig {
                    message: format!("Invalid header name: {key}"),
                })?;
            let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
                message: format!("Invalid header value for {key}"),
            })?;
            headers.insert(name, value);
        }

        let header_name = HeaderName::from_static("x-goog-api-key");
        if !headers.contains_key(&header_name) {
            let mut header_value =
                HeaderValue::from_str(api_key).map_err(|_| Error::InvalidConfig {
                    message: "Invalid API key value".into(),
                })?;
            header_value.set_sensitive(true);
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    fn build_http_client(http_options: &HttpOptions, headers: HeaderMap) -> Result<HttpClient> {
        let mut http_builder = HttpClient::builder();
        if let Some(timeout) = http_options.timeout {
            http_builder = http_builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(proxy_url) = &http_options.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| Error::InvalidConfig {
                message: format!("Invalid proxy: {e}"),
            })?;
            http_builder = http_builder.proxy(proxy);
        }

        Ok(http_builder.default_headers(headers).build()?)
    }
}

impl ClientInner {
    /// 发送请求。
    ///
    /// # Errors
    /// 当请求构建或网络请求失败时返回错误。
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = request.build()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.http.execute(request).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(status = response.status().as_u16(), "received response");
        Ok(response)
    }
}

pub(crate) struct ApiClient {
    pub base_url: String,
    pub api_version: String,
}

impl ApiClient {
    /// 创建 API 客户端配置。
    pub fn new(config: &ClientConfig) -> Self {
        let base_url = config
            .http_options
            .base_url
            .as_deref()
            .map_or_else(|| DEFAULT_BASE_URL.to_string(), normalize_base_url);

        let api_version = config
            .http_options
            .api_version
            .clone()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Self {
            base_url,
            api_version,
        }
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let mut value = base_url.trim().to_string();
    if !value.ends_with('/') {
        value.push('/');
    }
    value
}
