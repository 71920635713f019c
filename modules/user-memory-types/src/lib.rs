//! Shared types for the user memory service and its RPC clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// User namespace used when a caller does not name one.
pub const DEFAULT_USER_ID: &str = "default";

pub fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

// =====================================================
// Domain Types
// =====================================================

/// Row id assigned by the store on insert.
pub type FactId = i64;

/// One immutable statement remembered about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub user_id: String,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactStats {
    pub total_facts: i64,
    pub total_users: i64,
}

// =====================================================
// RPC Request Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreFactRequest {
    pub fact: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListFactsRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

// =====================================================
// RPC Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> RpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredFact {
    pub id: FactId,
}

// =====================================================
// Tool Types
// =====================================================

/// JSON schema for a single tool parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: HashMap::new(),
            required: Vec::new(),
        }
    }
}

/// Tool description handed to the invoking agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
}

/// Outcome of a tool invocation. `is_error` is only set when the call
/// itself was malformed; operation output always arrives as `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub total_facts: i64,
    pub total_users: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_request_defaults_user_id() {
        let req: StoreFactRequest =
            serde_json::from_str(r#"{"fact":"The user has a cat called Wendy"}"#).unwrap();
        assert_eq!(req.user_id, DEFAULT_USER_ID);
        assert_eq!(req.fact, "The user has a cat called Wendy");
    }

    #[test]
    fn list_request_accepts_empty_body() {
        let req: ListFactsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.user_id, "default");
    }

    #[test]
    fn rpc_error_omits_data() {
        let resp: RpcResponse<Fact> = RpcResponse::err("boom");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn default_input_schema_is_an_empty_object() {
        let json = serde_json::to_value(ToolInputSchema::default()).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"], serde_json::json!({}));
        assert_eq!(json["required"], serde_json::json!([]));
    }

    #[test]
    fn tool_call_without_arguments_is_null() {
        let req: ToolCallRequest = serde_json::from_str(r#"{"name":"get_user_info"}"#).unwrap();
        assert!(req.arguments.is_null());
    }
}
