use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: Uuid,
    pub name: String,
    pub ticker: String,
    pub quantity: f64,
    pub buy_price: f64,
    #[sqlx(rename = "user_id")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Holding {
    /// Position value at purchase price.
    pub fn value(&self) -> f64 {
        self.quantity * self.buy_price
    }
}

#[derive(Debug, Clone)]
pub struct NewHolding {
    pub name: String,
    pub ticker: String,
    pub quantity: f64,
    pub buy_price: f64,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct HoldingChanges {
    pub name: Option<String>,
    pub ticker: Option<String>,
    pub quantity: Option<f64>,
    pub buy_price: Option<f64>,
}

impl HoldingChanges {
    pub fn apply_to(self, holding: &mut Holding) {
        if let Some(name) = self.name {
            holding.name = name;
        }
        if let Some(ticker) = self.ticker {
            holding.ticker = ticker;
        }
        if let Some(quantity) = self.quantity {
            holding.quantity = quantity;
        }
        if let Some(buy_price) = self.buy_price {
            holding.buy_price = buy_price;
        }
    }
}
