use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 会话消息
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    pub fn user<T: Into<String>>(content: T) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn system<T: Into<String>>(content: T) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn assistant<T: Into<String>>(content: T) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    System,
    Assistant,
}

/// 会话历史
///
/// 流程执行期间由引擎独占持有，按值传入每个步骤执行器，
/// 并被执行器返回的下一份历史整体替换。
pub type ConversationHistory = Vec<Message>;
