//! 原生 Web API 封装模块
//!
//! 浏览器能力（存储、HTTP、History）都通过 trait 注入，
//! 状态逻辑可以在原生目标上测试。

pub mod http;
pub mod route;
pub mod router;
pub mod storage;

pub use http::{
    FetchTransport, FormPart, HttpBody, HttpError, HttpRequest, HttpResponse, Transport,
};
pub use storage::{KeyValueStore, LocalStorage, MemoryStorage, SharedStorage};
