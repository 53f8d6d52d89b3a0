//! 唯一的 HTTP 出口
//!
//! 所有请求都相对于固定的 API 根地址发出，并从本地存储读取 Bearer 令牌附加到请求上。
//! 不做重试、缓存或响应转换。

pub mod request;
pub mod transport;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

pub use request::{ApiRequest, FilePart, Method, MultipartForm, RawResponse, RequestBody};
pub use transport::{ReqwestTransport, Transport};

use crate::config::AppConfig;
use crate::errors::{ConsoleError, Result};
use crate::models::ErrorBody;
use crate::session::LocalStorage;

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn LocalStorage>,
    token_key: String,
    fallback_message: String,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn LocalStorage>,
        config: &AppConfig,
    ) -> Self {
        Self {
            transport,
            storage,
            token_key: config.session.token_key.clone(),
            fallback_message: config.api.fallback_error_message.clone(),
        }
    }

    /// 服务端未提供 message 时使用的提示
    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    fn bearer(&self) -> Option<String> {
        match self.storage.get_item(&self.token_key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read bearer token from storage: {}", e);
                None
            }
        }
    }

    /// 发送请求；非 2xx 响应转换为 `Server` 错误
    pub async fn send(&self, method: Method, path: &str, body: RequestBody) -> Result<RawResponse> {
        let request = ApiRequest {
            request_id: uuid::Uuid::new_v4().to_string(),
            method,
            path: path.to_string(),
            bearer: self.bearer(),
            body,
        };
        let request_id = request.request_id.clone();
        debug!("[{}] {} {}", request_id, method, path);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("[{}] {} {} failed: {}", request_id, method, path, e);
                return Err(ConsoleError::transport(self.fallback_message.clone()));
            }
        };

        if response.is_success() {
            return Ok(response);
        }

        let message = ErrorBody::message_from(&response.body)
            .unwrap_or_else(|| self.fallback_message.clone());
        warn!(
            "[{}] {} {} returned {}: {}",
            request_id, method, path, response.status, message
        );
        Err(ConsoleError::server(message))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::Get, path, RequestBody::Empty)
            .await?
            .json()
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::Post, path, RequestBody::Json(serde_json::to_value(body)?))
            .await?
            .json()
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::Put, path, RequestBody::Json(serde_json::to_value(body)?))
            .await?
            .json()
    }

    /// 发送请求并忽略响应体
    pub async fn execute(&self, method: Method, path: &str, body: RequestBody) -> Result<()> {
        self.send(method, path, body).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::Delete, path, RequestBody::Empty).await
    }

    /// 下载二进制内容
    pub async fn get_bytes(&self, path: &str) -> Result<RawResponse> {
        self.send(Method::Get, path, RequestBody::Empty).await
    }
}
