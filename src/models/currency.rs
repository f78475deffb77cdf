use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::currency_conversions;

/// Cached exchange rate relative to USD, keyed by ISO 4217 code.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = currency_conversions)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CurrencyConversion {
    pub code: String,
    pub rate_relative_to_usd: BigDecimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = currency_conversions)]
pub struct NewCurrencyConversion {
    pub code: String,
    pub rate_relative_to_usd: BigDecimal,
}
