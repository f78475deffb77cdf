use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{product_categories, products};

use super::category::Category;

/// Core entity of the store. The primary key is an externally assigned
/// catalog SKU (e.g. "OLJCESPC7Z"), not a generated id.
///
/// Prices are stored as integer USD units plus a nanos fraction so no
/// floating-point rounding ever reaches the database. The schema enforces
/// `0 <= price_usd_nanos < 1_000_000_000`.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub picture_url: String,
    pub price_usd_units: i32,
    pub price_usd_nanos: i32,
}

impl Product {
    /// Price as a single float, for display only.
    pub fn price_usd(&self) -> f64 {
        f64::from(self.price_usd_units) + f64::from(self.price_usd_nanos) / 1e9
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub picture_url: String,
    pub price_usd_units: i32,
    pub price_usd_nanos: i32,
}

/// Many-to-many link between products and categories.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = product_categories)]
#[diesel(belongs_to(Product))]
#[diesel(belongs_to(Category))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductCategory {
    pub id: Uuid,
    pub product_id: String,
    pub category_id: Uuid,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_categories)]
pub struct NewProductCategory {
    pub id: Uuid,
    pub product_id: String,
    pub category_id: Uuid,
}
