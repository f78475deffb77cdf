use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::StoreError;
use crate::models::advertisement::{Advertisement, NewAdvertisement};
use crate::models::category::{Category, NewCategory};
use crate::models::product::{NewProduct, NewProductCategory, Product};
use crate::schema::{advertisements, categories, product_categories, products};

/// Products, their category grouping and the ads targeting those categories.
pub struct CatalogRepository {
    pool: DbPool,
}

impl CatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::insert_into(categories::table)
            .values(&NewCategory {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .returning(Category::as_returning())
            .get_result(&mut conn)?)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(categories::table
            .select(Category::as_select())
            .order(categories::name.asc())
            .load(&mut conn)?)
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::insert_into(products::table)
            .values(&product)
            .returning(Product::as_returning())
            .get_result(&mut conn)?)
    }

    pub fn find_product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(products::table
            .find(id)
            .select(Product::as_select())
            .first(&mut conn)
            .optional()?)
    }

    /// Fails with a constraint violation while any order item still
    /// references the product; cart lines are cascaded away instead.
    pub fn delete_product(&self, id: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub fn assign_category(&self, product_id: &str, category_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(product_categories::table)
            .values(&NewProductCategory {
                id: Uuid::new_v4(),
                product_id: product_id.to_string(),
                category_id,
            })
            .execute(&mut conn)?;
        Ok(())
    }

    pub fn products_in_category(&self, category_id: Uuid) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(product_categories::table
            .inner_join(products::table)
            .filter(product_categories::category_id.eq(category_id))
            .select(Product::as_select())
            .order(products::name.asc())
            .load(&mut conn)?)
    }

    pub fn categories_of(&self, product_id: &str) -> Result<Vec<Category>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(product_categories::table
            .inner_join(categories::table)
            .filter(product_categories::product_id.eq(product_id))
            .select(Category::as_select())
            .order(categories::name.asc())
            .load(&mut conn)?)
    }

    pub fn create_advertisement(
        &self,
        redirect_url: &str,
        text: &str,
        target_category_id: Uuid,
    ) -> Result<Advertisement, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::insert_into(advertisements::table)
            .values(&NewAdvertisement {
                id: Uuid::new_v4(),
                redirect_url: redirect_url.to_string(),
                text: text.to_string(),
                target_category_id,
            })
            .returning(Advertisement::as_returning())
            .get_result(&mut conn)?)
    }

    pub fn ads_for_category(&self, category_id: Uuid) -> Result<Vec<Advertisement>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(advertisements::table
            .filter(advertisements::target_category_id.eq(category_id))
            .select(Advertisement::as_select())
            .load(&mut conn)?)
    }
}
