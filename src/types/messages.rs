//! Chat turn types
//!
//! Defines the conversation turns exchanged with the completion endpoint.
//! The serialized form matches the OpenAI-compatible `messages` array.

use serde::{Deserialize, Serialize};

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction turn prepended to steer the whole conversation
    System,
    /// Turn submitted by the person chatting
    User,
    /// Turn produced by the model
    Assistant,
}

impl Role {
    /// Display label used by the terminal UI
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in a conversation
///
/// `image` carries data-URL-encoded image bytes attached to a user turn and
/// is omitted from the wire format when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatTurn {
    /// Create a system instruction turn
    pub fn system(content: impl Into<String>) -> Self {
        ChatTurn {
            role: Role::System,
            content: content.into(),
            image: None,
        }
    }

    /// Create a user turn, optionally carrying an encoded image
    pub fn user(content: impl Into<String>, image: Option<String>) -> Self {
        ChatTurn {
            role: Role::User,
            content: content.into(),
            image,
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatTurn {
            role: Role::Assistant,
            content: content.into(),
            image: None,
        }
    }
}
