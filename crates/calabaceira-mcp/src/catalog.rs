//! The fixed set of sales tools and their definitions.
//!
//! | Tool | Arguments | Returns |
//! |------|-----------|---------|
//! | `get_customers` | none | list of customers |
//! | `insert_customer_into_db` | `customer_data` | the stored customer |
//! | `get_products` | none | products by category, then name |
//! | `place_order` | `customer_id`, `product_id` | the order with customer and product details |

use crate::protocol::{ToolAnnotations, ToolDefinition};
use calabaceira_store::NewCustomer;
use serde_json::{Map, Value, json};

/// One of the tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesTool {
    GetCustomers,
    InsertCustomer,
    GetProducts,
    PlaceOrder,
}

impl SalesTool {
    pub const ALL: [SalesTool; 4] = [
        SalesTool::GetCustomers,
        SalesTool::InsertCustomer,
        SalesTool::GetProducts,
        SalesTool::PlaceOrder,
    ];

    /// Name the tool is registered under.
    pub fn name(self) -> &'static str {
        match self {
            SalesTool::GetCustomers => "get_customers",
            SalesTool::InsertCustomer => "insert_customer_into_db",
            SalesTool::GetProducts => "get_products",
            SalesTool::PlaceOrder => "place_order",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn definition(self) -> ToolDefinition {
        match self {
            SalesTool::GetCustomers => ToolDefinition {
                name: self.name().to_string(),
                description: Some("Returns list of registered customers".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
                annotations: Some(read_only("List customers")),
            },
            SalesTool::InsertCustomer => {
                let mut properties = Map::new();
                for field in NewCustomer::REQUIRED_FIELDS {
                    properties.insert(
                        field.to_string(),
                        json!({
                            "type": "string",
                            "description": format!("Customer's {}", field.replace('_', " "))
                        }),
                    );
                }
                ToolDefinition {
                    name: self.name().to_string(),
                    description: Some(
                        "Add new customer to database. Returns the newly created customer \
                         data including customer_id"
                            .to_string(),
                    ),
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "customer_data": {
                                "type": "object",
                                "properties": Value::Object(properties),
                                "required": NewCustomer::REQUIRED_FIELDS
                            }
                        },
                        "required": ["customer_data"]
                    }),
                    annotations: Some(ToolAnnotations {
                        title: Some("Insert customer".to_string()),
                        read_only_hint: Some(false),
                        destructive_hint: Some(false),
                        idempotent_hint: Some(false),
                        open_world_hint: Some(false),
                    }),
                }
            }
            SalesTool::GetProducts => ToolDefinition {
                name: self.name().to_string(),
                description: Some(
                    "Get all available products from the database, ordered by category \
                     and product name"
                        .to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
                annotations: Some(read_only("List products")),
            },
            SalesTool::PlaceOrder => ToolDefinition {
                name: self.name().to_string(),
                description: Some(
                    "Create new order in the database for specific customer".to_string(),
                ),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "customer_id": {
                            "type": "integer",
                            "description": "Customer's ID in table customers (primary key)"
                        },
                        "product_id": {
                            "type": "integer",
                            "description": "Product's ID in table products (primary key)"
                        }
                    },
                    "required": ["customer_id", "product_id"]
                }),
                annotations: Some(ToolAnnotations {
                    title: Some("Place order".to_string()),
                    read_only_hint: Some(false),
                    destructive_hint: Some(false),
                    idempotent_hint: Some(false),
                    open_world_hint: Some(false),
                }),
            },
        }
    }
}

fn read_only(title: &str) -> ToolAnnotations {
    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: Some(true),
        open_world_hint: Some(false),
        ..Default::default()
    }
}
