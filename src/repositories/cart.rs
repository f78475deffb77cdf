use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::StoreError;
use crate::models::cart::{Cart, CartItem, NewCart, NewCartItem};
use crate::schema::{cart_items, carts};

/// Identity a cart hangs off: an authenticated user or an anonymous session.
#[derive(Debug, Clone, Copy)]
pub enum CartOwner<'a> {
    User(Uuid),
    Session(&'a str),
}

pub struct CartRepository {
    pool: DbPool,
}

impl CartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn find(&self, owner: CartOwner<'_>) -> Result<Option<Cart>, StoreError> {
        let mut conn = self.pool.get()?;
        Self::find_in(&mut conn, owner)
    }

    fn find_in(conn: &mut PgConnection, owner: CartOwner<'_>) -> Result<Option<Cart>, StoreError> {
        let cart = match owner {
            CartOwner::User(user_id) => carts::table
                .filter(carts::user_id.eq(user_id))
                .select(Cart::as_select())
                .first(conn)
                .optional()?,
            CartOwner::Session(key) => carts::table
                .filter(carts::user_id.is_null())
                .filter(carts::session_key.eq(key))
                .select(Cart::as_select())
                .first(conn)
                .optional()?,
        };
        Ok(cart)
    }

    /// Return the owner's cart, creating it if none exists yet. The partial
    /// unique indexes guarantee at most one cart per owner.
    pub fn get_or_create(&self, owner: CartOwner<'_>) -> Result<Cart, StoreError> {
        if let CartOwner::Session(key) = owner {
            if key.is_empty() {
                return Err(StoreError::InvalidInput(
                    "Session key must not be empty".to_string(),
                ));
            }
        }

        let mut conn = self.pool.get()?;
        if let Some(cart) = Self::find_in(&mut conn, owner)? {
            return Ok(cart);
        }

        let new_cart = NewCart {
            id: Uuid::new_v4(),
            user_id: match owner {
                CartOwner::User(user_id) => Some(user_id),
                CartOwner::Session(_) => None,
            },
            session_key: match owner {
                CartOwner::User(_) => None,
                CartOwner::Session(key) => Some(key.to_string()),
            },
        };
        match diesel::insert_into(carts::table)
            .values(&new_cart)
            .returning(Cart::as_returning())
            .get_result(&mut conn)
        {
            Ok(cart) => Ok(cart),
            // A concurrent insert won the unique index race; its row wins.
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Self::find_in(&mut conn, owner)?.ok_or(StoreError::NotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Add `quantity` of a product to the cart, merging into an existing
    /// line for the same product.
    pub fn add_item(
        &self,
        cart_id: Uuid,
        product_id: &str,
        quantity: i32,
    ) -> Result<CartItem, StoreError> {
        if quantity <= 0 {
            return Err(StoreError::InvalidInput(
                "Quantity must be positive".to_string(),
            ));
        }

        let mut conn = self.pool.get()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let existing = cart_items::table
                .filter(cart_items::cart_id.eq(cart_id))
                .filter(cart_items::product_id.eq(product_id))
                .select(CartItem::as_select())
                .first(conn)
                .optional()?;

            let item = match existing {
                Some(item) => diesel::update(cart_items::table.find(item.id))
                    .set(cart_items::quantity.eq(item.quantity + quantity))
                    .returning(CartItem::as_returning())
                    .get_result(conn)?,
                None => diesel::insert_into(cart_items::table)
                    .values(&NewCartItem {
                        id: Uuid::new_v4(),
                        cart_id,
                        product_id: product_id.to_string(),
                        quantity,
                    })
                    .returning(CartItem::as_returning())
                    .get_result(conn)?,
            };
            Self::touch(conn, cart_id)?;
            Ok(item)
        })
    }

    pub fn set_item_quantity(
        &self,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, StoreError> {
        if quantity <= 0 {
            return Err(StoreError::InvalidInput(
                "Quantity must be positive".to_string(),
            ));
        }

        let mut conn = self.pool.get()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let item = diesel::update(cart_items::table.find(item_id))
                .set(cart_items::quantity.eq(quantity))
                .returning(CartItem::as_returning())
                .get_result::<CartItem>(conn)
                .optional()?
                .ok_or(StoreError::NotFound)?;
            Self::touch(conn, item.cart_id)?;
            Ok(item)
        })
    }

    pub fn remove_item(&self, item_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let item = cart_items::table
                .find(item_id)
                .select(CartItem::as_select())
                .first::<CartItem>(conn)
                .optional()?
                .ok_or(StoreError::NotFound)?;
            diesel::delete(cart_items::table.find(item_id)).execute(conn)?;
            Self::touch(conn, item.cart_id)
        })
    }

    pub fn items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(cart_items::table
            .filter(cart_items::cart_id.eq(cart_id))
            .select(CartItem::as_select())
            .load(&mut conn)?)
    }

    /// Drop the cart; its items go with it (ON DELETE CASCADE).
    pub fn delete(&self, cart_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(carts::table.find(cart_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn touch(conn: &mut PgConnection, cart_id: Uuid) -> Result<(), StoreError> {
        let updated = diesel::update(carts::table.find(cart_id))
            .set(carts::updated_at.eq(Utc::now()))
            .execute(conn)?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
