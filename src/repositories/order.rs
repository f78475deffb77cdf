use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::StoreError;
use crate::models::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use crate::schema::{order_items, orders};

#[derive(Debug, Clone)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// One line to snapshot onto the order. `unit_price_usd` is whatever the
/// caller charged, not a lookup against the live product price.
#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i32,
    pub unit_price_usd: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub user_id: Option<Uuid>,
    pub email: String,
    pub shipping: ShippingAddress,
    pub total_cost_usd: BigDecimal,
    pub shipping_cost_usd: BigDecimal,
    pub transaction_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub total: i64,
}

pub struct OrderRepository {
    pool: DbPool,
}

impl OrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the order and its item snapshots in one transaction. The id is
    /// a fresh random uuid.
    pub fn create(&self, request: CreateOrder) -> Result<Uuid, StoreError> {
        if request.items.is_empty() {
            return Err(StoreError::InvalidInput(
                "Order must contain at least one item".to_string(),
            ));
        }

        let mut conn = self.pool.get()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrder {
                    id: order_id,
                    user_id: request.user_id,
                    email: request.email.clone(),
                    shipping_address_street: request.shipping.street.clone(),
                    shipping_address_city: request.shipping.city.clone(),
                    shipping_address_state: request.shipping.state.clone(),
                    shipping_address_country: request.shipping.country.clone(),
                    shipping_zip_code: request.shipping.zip_code.clone(),
                    total_cost_usd: request.total_cost_usd.clone(),
                    shipping_cost_usd: request.shipping_cost_usd.clone(),
                    transaction_id: request.transaction_id.clone(),
                    status: request.status.as_str().to_string(),
                })
                .execute(conn)?;

            let new_items: Vec<NewOrderItem> = request
                .items
                .iter()
                .map(|item| NewOrderItem {
                    id: Uuid::new_v4(),
                    order_id,
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    unit_price_usd: item.unit_price_usd.clone(),
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<OrderDetails>, StoreError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(Order::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .select(OrderItem::as_select())
            .load(&mut conn)?;

        Ok(Some(OrderDetails { order, items }))
    }

    /// Order history for a user, newest first. Orders whose user reference
    /// was nulled by an account deletion no longer show up here.
    pub fn list_for_user(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<OrderPage, StoreError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, StoreError, _>(|conn| {
            let total: i64 = orders::table
                .filter(orders::user_id.eq(user_id))
                .count()
                .get_result(conn)?;

            let items = orders::table
                .filter(orders::user_id.eq(user_id))
                .select(Order::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(OrderPage { items, total })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::{CreateOrder, OrderItemInput, OrderRepository, ShippingAddress};
    use crate::errors::StoreError;
    use crate::models::order::OrderStatus;
    use crate::repositories::catalog::CatalogRepository;
    use crate::repositories::testutil::{insert_product, insert_user, setup_db};
    use crate::schema::{order_items, orders, users};

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn order_request(user_id: Option<Uuid>, items: Vec<OrderItemInput>) -> CreateOrder {
        CreateOrder {
            user_id,
            email: "jo@example.com".to_string(),
            shipping: ShippingAddress {
                street: "1600 Amphitheatre Parkway".to_string(),
                city: "Mountain View".to_string(),
                state: "CA".to_string(),
                country: "United States".to_string(),
                zip_code: "94043".to_string(),
            },
            total_cost_usd: decimal("64.96"),
            shipping_cost_usd: decimal("4.99"),
            transaction_id: "txn_4f7b1c".to_string(),
            status: OrderStatus::Paid,
            items,
        }
    }

    fn line(product_id: &str, quantity: i32, price: &str) -> OrderItemInput {
        OrderItemInput {
            product_id: product_id.to_string(),
            quantity,
            unit_price_usd: decimal(price),
        }
    }

    #[tokio::test]
    async fn create_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let user_id = insert_user(&pool, "jo@example.com");
        insert_product(&pool, "OLJCESPC7Z", 19, 990_000_000);
        let repo = OrderRepository::new(pool);

        let order_id = repo
            .create(order_request(
                Some(user_id),
                vec![line("OLJCESPC7Z", 3, "19.99")],
            ))
            .expect("create failed");

        let details = repo
            .find_by_id(order_id)
            .expect("find failed")
            .expect("order should exist");

        assert_eq!(details.order.id, order_id);
        assert_eq!(details.order.user_id, Some(user_id));
        assert_eq!(details.order.status, "PAID");
        assert_eq!(details.order.total_cost_usd, decimal("64.96"));
        assert_eq!(details.items.len(), 1);
        assert_eq!(details.items[0].quantity, 3);
        assert_eq!(details.items[0].total_price(), decimal("59.97"));
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = OrderRepository::new(pool);

        let result = repo
            .find_by_id(Uuid::new_v4())
            .expect("find should not error");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn create_rejects_an_empty_item_list() {
        let (_container, pool) = setup_db().await;
        let repo = OrderRepository::new(pool);

        let err = repo
            .create(order_request(None, vec![]))
            .expect_err("empty order must fail");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn deleting_an_order_removes_its_items() {
        let (_container, pool) = setup_db().await;
        insert_product(&pool, "OLJCESPC7Z", 19, 990_000_000);
        let repo = OrderRepository::new(pool.clone());
        let order_id = repo
            .create(order_request(None, vec![line("OLJCESPC7Z", 1, "19.99")]))
            .expect("create failed");

        let mut conn = pool.get().expect("Failed to get connection");
        diesel::delete(orders::table.find(order_id))
            .execute(&mut conn)
            .expect("delete failed");

        let remaining: i64 = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .count()
            .get_result(&mut conn)
            .expect("count failed");
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn a_purchased_product_cannot_be_deleted() {
        let (_container, pool) = setup_db().await;
        insert_product(&pool, "OLJCESPC7Z", 19, 990_000_000);
        let repo = OrderRepository::new(pool.clone());
        let catalog = CatalogRepository::new(pool.clone());
        let order_id = repo
            .create(order_request(None, vec![line("OLJCESPC7Z", 1, "19.99")]))
            .expect("create failed");

        let err = catalog
            .delete_product("OLJCESPC7Z")
            .expect_err("referenced product must not delete");
        assert!(matches!(err, StoreError::Constraint(_)));

        // Once the order (and with it the snapshot) is gone, deletion works.
        let mut conn = pool.get().expect("Failed to get connection");
        diesel::delete(orders::table.find(order_id))
            .execute(&mut conn)
            .expect("delete failed");
        catalog
            .delete_product("OLJCESPC7Z")
            .expect("unreferenced product should delete");
    }

    #[tokio::test]
    async fn deleting_the_user_keeps_the_order() {
        let (_container, pool) = setup_db().await;
        let user_id = insert_user(&pool, "jo@example.com");
        insert_product(&pool, "OLJCESPC7Z", 19, 990_000_000);
        let repo = OrderRepository::new(pool.clone());
        let order_id = repo
            .create(order_request(
                Some(user_id),
                vec![line("OLJCESPC7Z", 1, "19.99")],
            ))
            .expect("create failed");

        let mut conn = pool.get().expect("Failed to get connection");
        diesel::delete(users::table.find(user_id))
            .execute(&mut conn)
            .expect("delete user failed");

        let details = repo
            .find_by_id(order_id)
            .expect("find failed")
            .expect("order must survive user deletion");
        assert_eq!(details.order.user_id, None);
        assert_eq!(details.order.email, "jo@example.com");
    }

    #[tokio::test]
    async fn list_for_user_paginates() {
        let (_container, pool) = setup_db().await;
        let user_id = insert_user(&pool, "jo@example.com");
        let other_user = insert_user(&pool, "sam@example.com");
        insert_product(&pool, "OLJCESPC7Z", 19, 990_000_000);
        let repo = OrderRepository::new(pool);

        for _ in 0..5 {
            repo.create(order_request(
                Some(user_id),
                vec![line("OLJCESPC7Z", 1, "19.99")],
            ))
            .expect("create failed");
        }
        repo.create(order_request(
            Some(other_user),
            vec![line("OLJCESPC7Z", 1, "19.99")],
        ))
        .expect("create failed");

        let page1 = repo.list_for_user(user_id, 1, 3).expect("list failed");
        assert_eq!(page1.total, 5);
        assert_eq!(page1.items.len(), 3);

        let page2 = repo.list_for_user(user_id, 2, 3).expect("list failed");
        assert_eq!(page2.total, 5);
        assert_eq!(page2.items.len(), 2);
    }
}
