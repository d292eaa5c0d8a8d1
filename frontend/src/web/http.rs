//! HTTP 请求封装模块
//!
//! `Transport` 是网络访问的抽象层，`FetchTransport` 使用 `web_sys::fetch`
//! 实现。API 客户端只依赖 trait，测试中可以替换为内存实现。

use banana_market_shared::protocol::HttpMethod;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("request build failed: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("network error: {0}")]
    NetworkError(String),
    /// 响应解析失败
    #[error("response parse failed: {0}")]
    ResponseParseFailed(String),
}

/// multipart 表单的一个字段
#[derive(Debug, Clone)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: web_sys::File },
}

/// 请求体
#[derive(Debug, Clone)]
pub enum HttpBody {
    Json(String),
    Multipart(Vec<FormPart>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 添加请求头
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 设置请求体
    pub fn body(mut self, body: HttpBody) -> Self {
        self.body = Some(body);
        self
    }

    /// 查找请求头（大小写不敏感）
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体，空响应体按 `null` 处理
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| HttpError::ResponseParseFailed(e.to_string()))
    }
}

/// HTTP 传输层 (Trait)
///
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下 JS 类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// 基于 `window.fetch` 的传输实现
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    fn build_body(body: &HttpBody) -> Result<JsValue, HttpError> {
        match body {
            HttpBody::Json(text) => Ok(JsValue::from_str(text)),
            HttpBody::Multipart(parts) => {
                let form = FormData::new().map_err(|e| {
                    HttpError::RequestBuildFailed(format!("创建 FormData 失败: {:?}", e))
                })?;
                for part in parts {
                    let appended = match part {
                        FormPart::Text { name, value } => form.append_with_str(name, value),
                        FormPart::File { name, file } => form.append_with_blob(name, file),
                    };
                    appended.map_err(|e| {
                        HttpError::RequestBuildFailed(format!("追加表单字段失败: {:?}", e))
                    })?;
                }
                Ok(form.into())
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &request.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());

        if let Some(body) = &request.body {
            // multipart 的 Content-Type (含 boundary) 由浏览器生成
            if matches!(body, HttpBody::Json(_)) {
                headers
                    .set("Content-Type", "application/json")
                    .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;
            }
            opts.set_body(&Self::build_body(body)?);
        }
        opts.set_headers(&headers.into());

        let fetch_request = Request::new_with_str_and_init(&request.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e))
        })?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let body = text
            .as_string()
            .ok_or_else(|| HttpError::ResponseParseFailed("无法转换为字符串".to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
