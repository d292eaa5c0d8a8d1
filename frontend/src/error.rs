//! 应用错误类型
//!
//! 所有错误都不是致命的：界面层把它们转换为一条提示消息，状态保持不变。

use thiserror::Error;

use crate::web::HttpError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// 请求未能到达服务端
    #[error("network error: {0}")]
    Network(String),
    /// 服务端返回非 2xx 状态码
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    /// 响应体无法解析
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// 需要 token 的操作在未登录时被调用
    #[error("not logged in")]
    Unauthenticated,
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl AppError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RequestBuildFailed(msg) | HttpError::NetworkError(msg) => {
                AppError::Network(msg)
            }
            HttpError::ResponseParseFailed(msg) => AppError::Decode(msg),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
