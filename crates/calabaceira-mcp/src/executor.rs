//! Tool execution engine.
//!
//! This module maps a tool call onto the sales repository:
//! - Validating arguments against the tool's input schema
//! - Dispatching to the matching repository operation
//! - Turning rows and errors into tool results

use crate::catalog::SalesTool;
use crate::protocol::{ToolContent, ToolDefinition};
use calabaceira_core::OrderFailureMode;
use calabaceira_store::{NewCustomer, SalesRepository, StoreError};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The result content.
    pub content: Vec<ToolContent>,
    /// The payload as JSON, for clients that read structured output.
    pub structured_content: Option<Value>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Create a successful result carrying a JSON payload.
    ///
    /// The text content is the serialized payload. Arrays are wrapped as
    /// `{"result": [...]}` in the structured content, which must be an
    /// object.
    pub fn success_json(value: Value) -> Self {
        let text = value.to_string();
        let structured = match value {
            Value::Object(_) => value,
            other => json!({ "result": other }),
        };
        Self {
            success: true,
            content: vec![ToolContent::Text { text }],
            structured_content: Some(structured),
            error: None,
        }
    }

    /// Create a successful result carrying plain text.
    pub fn success_text(text: impl Into<String>) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Text { text: text.into() }],
            structured_content: None,
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            success: false,
            content: vec![ToolContent::Text { text: msg.clone() }],
            structured_content: None,
            error: Some(msg),
        }
    }

    fn from_serialize<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(value) => Self::success_json(value),
            Err(e) => Self::error(format!("Failed to serialize result: {}", e)),
        }
    }
}

/// The tool executor runs tools against the sales repository.
#[derive(Clone)]
pub struct ToolExecutor {
    repository: Arc<dyn SalesRepository>,
    order_failure_mode: OrderFailureMode,
}

impl ToolExecutor {
    /// Create a new tool executor.
    pub fn new(repository: Arc<dyn SalesRepository>) -> Self {
        Self {
            repository,
            order_failure_mode: OrderFailureMode::default(),
        }
    }

    /// Set how `place_order` reports failures.
    pub fn with_order_failure_mode(mut self, mode: OrderFailureMode) -> Self {
        self.order_failure_mode = mode;
        self
    }

    pub fn order_failure_mode(&self) -> OrderFailureMode {
        self.order_failure_mode
    }

    /// Execute a tool call.
    pub async fn execute(&self, tool: &ToolDefinition, arguments: Value) -> ExecutionResult {
        tracing::info!(tool = %tool.name, "Executing tool");

        // 1. Validate arguments against the input schema
        if let Err(e) = self.validate_arguments(tool, &arguments) {
            tracing::warn!(tool = %tool.name, error = %e, "Rejected tool arguments");
            return ExecutionResult::error(e);
        }

        // 2. Dispatch by tool name
        match SalesTool::from_name(&tool.name) {
            Some(SalesTool::GetCustomers) => self.execute_get_customers().await,
            Some(SalesTool::InsertCustomer) => self.execute_insert_customer(&arguments).await,
            Some(SalesTool::GetProducts) => self.execute_get_products().await,
            Some(SalesTool::PlaceOrder) => self.execute_place_order(&arguments).await,
            None => ExecutionResult::error(format!("Unknown tool: {}", tool.name)),
        }
    }

    /// Validate arguments against the tool's input schema.
    fn validate_arguments(&self, tool: &ToolDefinition, arguments: &Value) -> Result<(), String> {
        let schema = &tool.input_schema;

        if !arguments.is_null() && !arguments.is_object() {
            return Err("Arguments must be an object".to_string());
        }

        // Check required fields
        if let Some(required) = schema["required"].as_array() {
            for field in required.iter().filter_map(Value::as_str) {
                if arguments.get(field).is_none_or(Value::is_null) {
                    return Err(format!("Missing required field: {}", field));
                }
            }
        }

        // Check types
        if let Some(props) = schema["properties"].as_object() {
            for (field, prop_schema) in props {
                if let Some(value) = arguments.get(field)
                    && let Some(expected_type) = prop_schema["type"].as_str()
                    && !check_type(value, expected_type)
                {
                    return Err(format!(
                        "Invalid type for '{}': expected {}, got {}",
                        field, expected_type, value
                    ));
                }
            }
        }

        Ok(())
    }

    async fn execute_get_customers(&self) -> ExecutionResult {
        match self.repository.list_customers().await {
            Ok(customers) => ExecutionResult::from_serialize(&customers),
            Err(e) => ExecutionResult::error(failure_message(
                "Failed to retrieve customers due to database error",
                "Failed to retrieve customers",
                &e,
            )),
        }
    }

    async fn execute_insert_customer(&self, arguments: &Value) -> ExecutionResult {
        let customer = match NewCustomer::from_value(&arguments["customer_data"]) {
            Ok(c) => c,
            Err(e) => return ExecutionResult::error(format!("Invalid customer data: {}", e)),
        };

        match self.repository.insert_customer(&customer).await {
            Ok(stored) => ExecutionResult::from_serialize(&stored),
            Err(e) => ExecutionResult::error(failure_message(
                "Failed to insert customer into database due to database error",
                "Failed to insert customer into database",
                &e,
            )),
        }
    }

    async fn execute_get_products(&self) -> ExecutionResult {
        match self.repository.list_products().await {
            Ok(products) => ExecutionResult::from_serialize(&products),
            Err(e) => ExecutionResult::error(failure_message(
                "Failed to retrieve products due to database error",
                "Failed to retrieve products",
                &e,
            )),
        }
    }

    async fn execute_place_order(&self, arguments: &Value) -> ExecutionResult {
        let customer_id = match id_argument(arguments, "customer_id") {
            Ok(id) => id,
            Err(e) => return ExecutionResult::error(e),
        };
        let product_id = match id_argument(arguments, "product_id") {
            Ok(id) => id,
            Err(e) => return ExecutionResult::error(e),
        };

        match self.repository.place_order(customer_id, product_id).await {
            Ok(summary) => ExecutionResult::from_serialize(&summary),
            Err(e) => {
                let message = failure_message(
                    "Failed to place order due to database error",
                    "Failed to place order",
                    &e,
                );
                match self.order_failure_mode {
                    OrderFailureMode::Legacy => ExecutionResult::success_text(message),
                    OrderFailureMode::Structured => ExecutionResult::error(message),
                }
            }
        }
    }
}

fn check_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn id_argument(arguments: &Value, field: &str) -> Result<i64, String> {
    arguments[field]
        .as_i64()
        .ok_or_else(|| format!("Invalid value for '{}': out of range", field))
}

/// Storage errors get the "due to database error" prefix, everything
/// else the plain one.
fn failure_message(database_prefix: &str, other_prefix: &str, error: &StoreError) -> String {
    if error.is_database() {
        format!("{}: {}", database_prefix, error)
    } else {
        format!("{}: {}", other_prefix, error)
    }
}
