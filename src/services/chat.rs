use tracing::debug;

use crate::client::ApiClient;
use crate::errors::{Result, ValidationError};
use crate::models::chat::{ChatRequest, ChatResponse};

pub const CHAT_ENDPOINT: &str = "/chat";

/// 聊天助手，一问一答，不保存历史
pub struct ChatService {
    client: ApiClient,
}

impl ChatService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn ask(&self, question: &str) -> Result<String> {
        let message = question.trim();
        if message.is_empty() {
            return Err(ValidationError::field("message", "is required").into());
        }
        debug!("Chat question of {} chars", message.chars().count());

        let response: ChatResponse = self
            .client
            .post_json(
                CHAT_ENDPOINT,
                &ChatRequest {
                    message: message.to_string(),
                },
            )
            .await?;
        Ok(response.reply)
    }
}
