use banana_market_shared::HEADER_AUTHORIZATION;
use banana_market_shared::protocol::{ApiRequest, Payload};
use leptos::prelude::*;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::session::{SessionContext, use_session};
use crate::web::{FetchTransport, FormPart, HttpBody, HttpRequest, Transport};

/// 商城 REST API 客户端
#[derive(Clone, Debug)]
pub struct StoreApi<T = FetchTransport> {
    base_url: String,
    token: Option<String>,
    transport: T,
}

impl StoreApi<FetchTransport> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, FetchTransport)
    }
}

impl<T: Transport> StoreApi<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            transport,
        }
    }

    /// 附带 Bearer token，仅用于需要认证的请求
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求并解析响应
    pub async fn send<R: ApiRequest>(&self, request: &R) -> AppResult<R::Response> {
        self.send_with_file(request, None).await
    }

    /// 发送请求，multipart 请求可额外附带一个 `image` 文件
    pub async fn send_with_file<R: ApiRequest>(
        &self,
        request: &R,
        image: Option<web_sys::File>,
    ) -> AppResult<R::Response> {
        let method = request.method();
        let mut http = HttpRequest::new(self.url(&request.path()), method);

        if R::AUTHENTICATED {
            // 没有 token 时直接放弃，不发起请求
            let token = self.token.as_deref().ok_or(AppError::Unauthenticated)?;
            http = http.header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        match request.payload() {
            Payload::Empty => {}
            Payload::Json(value) => http = http.body(HttpBody::Json(value.to_string())),
            Payload::Form(fields) => {
                let mut parts: Vec<FormPart> = fields
                    .into_iter()
                    .map(|(name, value)| FormPart::Text {
                        name: name.to_string(),
                        value,
                    })
                    .collect();
                if let Some(file) = image {
                    parts.push(FormPart::File {
                        name: "image".to_string(),
                        file,
                    });
                }
                http = http.body(HttpBody::Multipart(parts));
            }
        }

        let url = http.url.clone();
        let response = self.transport.send(http).await.map_err(|e| {
            log::error!("[Api] {} {} failed: {}", method.as_str(), url, e);
            AppError::from(e)
        })?;

        if !response.ok() {
            log::warn!("[Api] {} {} -> {}", method.as_str(), url, response.status);
            return Err(AppError::status(response.status, response.body));
        }

        response.json::<R::Response>().map_err(AppError::from)
    }
}

/// 组件内使用的 API 工厂
///
/// 组件创建时捕获配置和会话，事件处理时再读取最新的 token。
#[derive(Clone)]
pub struct ApiHandle {
    base_url: String,
    session: SessionContext,
}

impl ApiHandle {
    pub fn client(&self) -> StoreApi {
        StoreApi::new(self.base_url.clone()).with_token(self.session.token_untracked())
    }
}

pub fn use_api() -> ApiHandle {
    let config = use_context::<AppConfig>().expect("AppConfig should be provided");
    ApiHandle {
        base_url: config.api_url,
        session: use_session(),
    }
}
