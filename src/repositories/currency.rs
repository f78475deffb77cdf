use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::errors::StoreError;
use crate::models::currency::{CurrencyConversion, NewCurrencyConversion};
use crate::schema::currency_conversions;

/// Cache of exchange rates relative to USD. Rows are written by whatever
/// refreshes the rates; this layer only stores and serves them.
pub struct CurrencyRepository {
    pool: DbPool,
}

impl CurrencyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh the rate for a 3-letter ISO 4217 code, bumping
    /// `last_updated`.
    pub fn upsert_rate(
        &self,
        code: &str,
        rate: BigDecimal,
    ) -> Result<CurrencyConversion, StoreError> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(StoreError::InvalidInput(format!(
                "Invalid currency code '{}'",
                code
            )));
        }

        let mut conn = self.pool.get()?;
        Ok(diesel::insert_into(currency_conversions::table)
            .values(&NewCurrencyConversion {
                code: code.to_string(),
                rate_relative_to_usd: rate.clone(),
            })
            .on_conflict(currency_conversions::code)
            .do_update()
            .set((
                currency_conversions::rate_relative_to_usd.eq(&rate),
                currency_conversions::last_updated.eq(diesel::dsl::now),
            ))
            .returning(CurrencyConversion::as_returning())
            .get_result(&mut conn)?)
    }

    pub fn get_rate(&self, code: &str) -> Result<Option<CurrencyConversion>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(currency_conversions::table
            .find(code)
            .select(CurrencyConversion::as_select())
            .first(&mut conn)
            .optional()?)
    }

    pub fn all_rates(&self) -> Result<Vec<CurrencyConversion>, StoreError> {
        let mut conn = self.pool.get()?;
        Ok(currency_conversions::table
            .select(CurrencyConversion::as_select())
            .order(currency_conversions::code.asc())
            .load(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::CurrencyRepository;
    use crate::errors::StoreError;
    use crate::repositories::testutil::setup_db;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let (_container, pool) = setup_db().await;
        let repo = CurrencyRepository::new(pool);

        repo.upsert_rate("EUR", decimal("0.9218435000"))
            .expect("upsert failed");

        let cached = repo
            .get_rate("EUR")
            .expect("get failed")
            .expect("rate should exist");
        assert_eq!(cached.code, "EUR");
        assert_eq!(cached.rate_relative_to_usd, decimal("0.9218435000"));
    }

    #[tokio::test]
    async fn upsert_replaces_the_rate() {
        let (_container, pool) = setup_db().await;
        let repo = CurrencyRepository::new(pool);

        repo.upsert_rate("JPY", decimal("149.3200000000"))
            .expect("upsert failed");
        let updated = repo
            .upsert_rate("JPY", decimal("151.0100000000"))
            .expect("upsert failed");

        assert_eq!(updated.rate_relative_to_usd, decimal("151.0100000000"));
        assert_eq!(repo.all_rates().expect("list failed").len(), 1);
    }

    #[tokio::test]
    async fn get_rate_returns_none_for_unknown_code() {
        let (_container, pool) = setup_db().await;
        let repo = CurrencyRepository::new(pool);

        assert!(repo.get_rate("CHF").expect("get failed").is_none());
    }

    #[tokio::test]
    async fn malformed_codes_are_rejected() {
        let (_container, pool) = setup_db().await;
        let repo = CurrencyRepository::new(pool);

        for code in ["eur", "EURO", "E", ""] {
            let err = repo
                .upsert_rate(code, decimal("1.0"))
                .expect_err("malformed code must fail");
            assert!(matches!(err, StoreError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn all_rates_sorts_by_code() {
        let (_container, pool) = setup_db().await;
        let repo = CurrencyRepository::new(pool);

        repo.upsert_rate("JPY", decimal("149.3200000000"))
            .expect("upsert failed");
        repo.upsert_rate("EUR", decimal("0.9218435000"))
            .expect("upsert failed");

        let codes: Vec<String> = repo
            .all_rates()
            .expect("list failed")
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, ["EUR", "JPY"]);
    }
}
