//! Named tools the agent invokes: `store_user_info` and `get_user_info`.

use crate::db::Db;
use crate::operations;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use user_memory_types::{
    PropertySchema, ToolDefinition, ToolInputSchema, ToolResult, default_user_id,
};

/// Trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition advertised to callers
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool with the given parameters
    async fn execute(&self, params: Value) -> ToolResult;

    fn name(&self) -> String {
        self.definition().name
    }
}

pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: HashMap::new(),
        }
    }

    /// Registry with both memory tools bound to `db`.
    pub fn with_memory_tools(db: Arc<Db>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StoreUserInfoTool::new(Arc::clone(&db))));
        registry.register(Arc::new(GetUserInfoTool::new(db)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of every registered tool, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Run the named tool. `None` when no such tool is registered.
    pub async fn call(&self, name: &str, params: Value) -> Option<ToolResult> {
        let tool = self.get(name)?;
        log::debug!("Calling tool '{}'", name);
        Some(tool.execute(params).await)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A missing argument object means "all defaults".
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ToolResult> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| ToolResult::error(format!("Invalid parameters: {}", e)))
}

fn user_id_property() -> PropertySchema {
    PropertySchema {
        schema_type: "string".to_string(),
        description: "User identifier (defaults to \"default\")".to_string(),
        default: Some(json!(user_memory_types::DEFAULT_USER_ID)),
    }
}

/// SQLite calls block, so they run off the async workers.
async fn run_blocking<F>(db: &Arc<Db>, f: F) -> ToolResult
where
    F: FnOnce(&Db) -> String + Send + 'static,
{
    let db = Arc::clone(db);
    match tokio::task::spawn_blocking(move || f(&db)).await {
        Ok(text) => ToolResult::success(text),
        Err(e) => {
            log::error!("Tool worker failed: {}", e);
            ToolResult::error(format!("Tool execution failed: {}", e))
        }
    }
}

// =====================================================
// store_user_info
// =====================================================

pub struct StoreUserInfoTool {
    db: Arc<Db>,
    definition: ToolDefinition,
}

#[derive(Debug, Deserialize)]
struct StoreParams {
    fact: String,
    #[serde(default = "default_user_id")]
    user_id: String,
}

impl StoreUserInfoTool {
    pub fn new(db: Arc<Db>) -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "fact".to_string(),
            PropertySchema {
                schema_type: "string".to_string(),
                description: "A SHORT, condensed fact about the user (1-2 sentences max)".to_string(),
                default: None,
            },
        );
        properties.insert("user_id".to_string(), user_id_property());

        Self {
            db,
            definition: ToolDefinition {
                name: "store_user_info".to_string(),
                description: "Store a single piece of information about the user. Only store SHORT, \
                    condensed facts, not long explanations or conversations: key highlights such as \
                    \"The user lives in Singapore\" or \"The user prefers Python over JavaScript\". \
                    Maximum 1-2 sentences."
                    .to_string(),
                input_schema: ToolInputSchema {
                    properties,
                    required: vec!["fact".to_string()],
                    ..Default::default()
                },
            },
        }
    }
}

#[async_trait]
impl Tool for StoreUserInfoTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: StoreParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        run_blocking(&self.db, move |db| {
            operations::store_user_info(db, &params.fact, &params.user_id)
        })
        .await
    }
}

// =====================================================
// get_user_info
// =====================================================

pub struct GetUserInfoTool {
    db: Arc<Db>,
    definition: ToolDefinition,
}

#[derive(Debug, Deserialize)]
struct GetParams {
    #[serde(default = "default_user_id")]
    user_id: String,
}

impl GetUserInfoTool {
    pub fn new(db: Arc<Db>) -> Self {
        let mut properties = HashMap::new();
        properties.insert("user_id".to_string(), user_id_property());

        Self {
            db,
            definition: ToolDefinition {
                name: "get_user_info".to_string(),
                description: "Retrieve all stored information about the user. Use this to recall \
                    everything you know about the user; returns all stored facts in a simple, \
                    readable format."
                    .to_string(),
                input_schema: ToolInputSchema {
                    properties,
                    ..Default::default()
                },
            },
        }
    }
}

#[async_trait]
impl Tool for GetUserInfoTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: GetParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        run_blocking(&self.db, move |db| operations::get_user_info(db, &params.user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::NO_INFO_MESSAGE;

    fn test_registry() -> (tempfile::TempDir, ToolRegistry) {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("user_memory.db");
        let db = Arc::new(Db::open(path.to_str().unwrap(), 2).expect("open db"));
        (dir, ToolRegistry::with_memory_tools(db))
    }

    #[test]
    fn definitions_are_sorted_and_complete() {
        let (_dir, registry) = test_registry();
        let defs = registry.definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["get_user_info", "store_user_info"]);

        let store = &defs[1];
        assert_eq!(store.input_schema.required, ["fact"]);
        assert!(store.input_schema.properties.contains_key("user_id"));
        assert!(defs[0].input_schema.required.is_empty());
        assert!(defs.iter().all(|d| d.input_schema.schema_type == "object"));
    }

    #[tokio::test]
    async fn store_and_get_through_registry() {
        let (_dir, registry) = test_registry();

        let stored = registry
            .call("store_user_info", json!({"fact": "The user lives in Singapore"}))
            .await
            .expect("tool exists");
        assert!(!stored.is_error);
        assert_eq!(stored.content, "Stored: The user lives in Singapore");

        let info = registry
            .call("get_user_info", Value::Null)
            .await
            .expect("tool exists");
        assert!(!info.is_error);
        assert!(info.content.contains("1. The user lives in Singapore"));
    }

    #[tokio::test]
    async fn user_id_is_respected() {
        let (_dir, registry) = test_registry();
        registry
            .call("store_user_info", json!({"fact": "fact A", "user_id": "alice"}))
            .await
            .unwrap();
        registry
            .call("store_user_info", json!({"fact": "fact B", "user_id": "bob"}))
            .await
            .unwrap();

        let alice = registry
            .call("get_user_info", json!({"user_id": "alice"}))
            .await
            .unwrap();
        assert!(alice.content.contains("fact A"));
        assert!(!alice.content.contains("fact B"));

        let default = registry.call("get_user_info", json!({})).await.unwrap();
        assert_eq!(default.content, NO_INFO_MESSAGE);
    }

    #[tokio::test]
    async fn missing_fact_is_a_parameter_error() {
        let (_dir, registry) = test_registry();
        let result = registry
            .call("store_user_info", json!({"user_id": "alice"}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.content.starts_with("Invalid parameters"));
    }

    #[tokio::test]
    async fn unknown_tool_is_none() {
        let (_dir, registry) = test_registry();
        assert!(registry.call("delete_user_info", json!({})).await.is_none());
    }
}
