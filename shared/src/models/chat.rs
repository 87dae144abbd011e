//! Assistant chat transcript and store context types

use serde::{Deserialize, Serialize};

/// Role of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One role-tagged message of the Vi transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Per-product summary handed to the assistant.
///
/// Out-of-stock products are kept in context (so Vi can answer about them)
/// but flagged; the system prompt forbids recommending them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContext {
    pub name: String,
    pub category: String,
    pub price: f64,
    /// Size labels with positive stock, across all variants
    pub sizes: Vec<String>,
    /// Color names of all variants
    pub colors: Vec<String>,
    pub in_stock: bool,
}

/// Snapshot of store data sent along with every assistant call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreContext {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frete_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagamento_info: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductContext>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
        let role: ChatRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, ChatRole::User);
    }

    #[test]
    fn test_message_constructors() {
        let m = ChatMessage::user("Tem vestido M?");
        assert_eq!(m.role, ChatRole::User);
        assert_eq!(m.content, "Tem vestido M?");

        let m = ChatMessage::assistant("Temos sim!");
        assert_eq!(m.role, ChatRole::Assistant);
    }
}
