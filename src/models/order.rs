use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::schema::{order_items, orders};

use super::product::Product;

/// Lifecycle label for an order. Stored as text; nothing in the data layer
/// enforces the PENDING → PAID → SHIPPED → DELIVERED progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            other => Err(StoreError::InvalidInput(format!(
                "Unknown order status '{}'",
                other
            ))),
        }
    }
}

/// Order history row. The id is a random v4 uuid so order numbers leak
/// nothing about volume. `user_id` is nulled if the user is deleted so
/// history outlives the account.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub shipping_address_street: String,
    pub shipping_address_city: String,
    pub shipping_address_state: String,
    pub shipping_address_country: String,
    pub shipping_zip_code: String,
    pub total_cost_usd: BigDecimal,
    pub shipping_cost_usd: BigDecimal,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub shipping_address_street: String,
    pub shipping_address_city: String,
    pub shipping_address_state: String,
    pub shipping_address_country: String,
    pub shipping_zip_code: String,
    pub total_cost_usd: BigDecimal,
    pub shipping_cost_usd: BigDecimal,
    pub transaction_id: String,
    pub status: String,
}

/// Immutable snapshot of one purchased line. `unit_price_usd` is frozen at
/// purchase time so later catalog price changes never rewrite history, and
/// the referenced product cannot be deleted while the line exists.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(Order))]
#[diesel(belongs_to(Product))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price_usd: BigDecimal,
}

impl OrderItem {
    pub fn total_price(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.unit_price_usd
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price_usd: BigDecimal,
}
