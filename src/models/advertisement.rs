use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::advertisements;

use super::category::Category;

/// Contextual advertisement shown for products in its target category.
/// Removed together with the category it targets.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = advertisements)]
#[diesel(belongs_to(Category, foreign_key = target_category_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Advertisement {
    pub id: Uuid,
    pub redirect_url: String,
    pub text: String,
    pub target_category_id: Uuid,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = advertisements)]
pub struct NewAdvertisement {
    pub id: Uuid,
    pub redirect_url: String,
    pub text: String,
    pub target_category_id: Uuid,
}
