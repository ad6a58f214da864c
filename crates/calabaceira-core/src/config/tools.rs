//! Tool behaviour configuration.

use serde::{Deserialize, Serialize};

/// How `place_order` reports a failed order to the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderFailureMode {
    /// Failure text is returned as a successful tool result. Existing
    /// clients depend on this.
    #[default]
    Legacy,
    /// Failure is returned as an error result, like the other tools.
    Structured,
}

/// Settings that change how the tools behave.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    #[serde(default)]
    pub order_failure_mode: OrderFailureMode,

    /// Check that the customer and product exist before inserting an order.
    #[serde(default)]
    pub strict_references: bool,
}
