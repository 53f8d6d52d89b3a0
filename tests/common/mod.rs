#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_classroom_console::client::{ApiClient, ApiRequest, Method, RawResponse, Transport};
use rust_classroom_console::config::AppConfig;
use rust_classroom_console::errors::{ConsoleError, Result};
use rust_classroom_console::models::auth::SessionUser;
use rust_classroom_console::session::{LocalStorage, MemoryStorage, SessionStore};

#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Bytes(u16, Option<String>, Vec<u8>),
    Fail(String),
    Delayed(Duration, Box<Reply>),
}

/// 记录所有请求、按 (方法, 路径) 返回预设响应的传输层
///
/// 同一路由的响应按顺序消费，队列用完后重复最后送出的那个。
/// 未配置的路由返回 404。
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Method, String), Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[derive(Default)]
struct Route {
    queue: VecDeque<Reply>,
    last: Option<Reply>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .queue
            .push_back(reply);
        self
    }

    pub fn json(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.on(method, path, Reply::Json(status, body))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let route = replies.get_mut(&(method, path.to_string()))?;
        if let Some(reply) = route.queue.pop_front() {
            route.last = Some(reply.clone());
            return Some(reply);
        }
        route.last.clone()
    }
}

fn respond(reply: Reply) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<RawResponse>> + Send>> {
    Box::pin(async move {
        match reply {
            Reply::Json(status, body) => Ok(RawResponse {
                status,
                content_type: Some("application/json".to_string()),
                body: serde_json::to_vec(&body).unwrap(),
            }),
            Reply::Bytes(status, content_type, body) => Ok(RawResponse {
                status,
                content_type,
                body,
            }),
            Reply::Fail(message) => Err(ConsoleError::transport(message)),
            Reply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                respond(*inner).await
            }
        }
    })
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let reply = self
            .next_reply(request.method, &request.path)
            .unwrap_or_else(|| Reply::Json(404, json!({ "message": "Not found" })));
        self.requests.lock().unwrap().push(request);
        respond(reply).await
    }
}

pub struct TestContext {
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
    pub session: Arc<SessionStore>,
    pub client: ApiClient,
    pub config: AppConfig,
}

pub fn context() -> TestContext {
    let config = AppConfig::default();
    let transport = MockTransport::new();
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionStore::hydrate(storage.clone(), &config.session));
    let client = ApiClient::new(transport.clone(), storage.clone(), &config);
    TestContext {
        transport,
        storage,
        session,
        client,
        config,
    }
}

pub fn user(role: &str) -> SessionUser {
    SessionUser {
        id: 42,
        display_name: "Nguyễn Thị Hoa".to_string(),
        email: "hoa@example.edu.vn".to_string(),
        avatar: None,
        role: role.to_string(),
    }
}

impl TestContext {
    pub fn login(&self, role: &str) {
        self.session.set(user(role), "test-token").unwrap();
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).unwrap()
    }
}

pub fn class_json(id: i64, code: &str, name: &str) -> Value {
    json!({
        "id": id,
        "class_code": code,
        "name": name,
        "major": "Công nghệ thông tin",
        "cohort": "K66",
        "homeroom_teacher": null
    })
}
