//! Portfolio metrics computed from a single user's holdings.
//!
//! Everything here is pure: callers load the holdings and pass them in.
//! Values are taken at purchase price (`quantity * buy_price`); there is no
//! market data.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::database::models::Holding;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortfolioError {
    #[error("No stocks found for this user.")]
    EmptyPortfolio,

    #[error("Portfolio total value is zero or out of range; distribution is undefined.")]
    DegenerateAggregation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total_value: f64,
    pub top_holding: Holding,
    /// Ticker -> percentage of total value, two decimals (e.g. `"25.00"`)
    pub distribution: BTreeMap<String, String>,
}

/// Wire shape of `GET /api/stocks/dashboard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user_id: uuid::Uuid,
    pub total_value: f64,
    pub top_performing_stock: Holding,
    pub portfolio_distribution: BTreeMap<String, String>,
}

impl DashboardResponse {
    pub fn new(user_id: uuid::Uuid, dashboard: Dashboard) -> Self {
        Self {
            user_id,
            total_value: dashboard.total_value,
            top_performing_stock: dashboard.top_holding,
            portfolio_distribution: dashboard.distribution,
        }
    }
}

/// Sum of `quantity * buy_price`; 0 for no holdings.
pub fn total_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::value).sum()
}

/// [`total_value`] that refuses a sum which overflowed to infinity.
pub fn checked_total_value(holdings: &[Holding]) -> Result<f64, PortfolioError> {
    let total = total_value(holdings);
    if !total.is_finite() {
        return Err(PortfolioError::DegenerateAggregation);
    }
    Ok(total)
}

/// Two-decimal percentage with halves rounded away from zero, so an exact
/// `0.125` reads `"0.13"` rather than the round-half-even `"0.12"`.
fn format_share(share: f64) -> String {
    format!("{:.2}", (share * 100.0).round() / 100.0)
}

/// Summary metrics for the dashboard.
///
/// The top holding is the first one, in input order, with the largest value.
/// Holdings sharing a ticker are not merged: the last one in input order
/// decides that ticker's share.
pub fn dashboard(holdings: &[Holding]) -> Result<Dashboard, PortfolioError> {
    let mut top: Option<&Holding> = None;
    for holding in holdings {
        match top {
            // strict comparison keeps the earliest holding on ties
            Some(current) if holding.value() <= current.value() => {}
            _ => top = Some(holding),
        }
    }
    let top_holding = top.ok_or(PortfolioError::EmptyPortfolio)?.clone();

    let total = checked_total_value(holdings)?;
    if total == 0.0 {
        return Err(PortfolioError::DegenerateAggregation);
    }

    let mut distribution = BTreeMap::new();
    for holding in holdings {
        let share = holding.value() * 100.0 / total;
        distribution.insert(holding.ticker.clone(), format_share(share));
    }

    Ok(Dashboard {
        total_value: total,
        top_holding,
        distribution,
    })
}
