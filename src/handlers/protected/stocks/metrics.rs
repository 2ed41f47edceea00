use axum::{extract::State, Extension};
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::portfolio::{self, DashboardResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValueResponse {
    pub total_value: f64,
}

/// GET /api/stocks/portfolio-value - Sum of quantity * buyPrice, 0 when empty
///
/// 422 when the sum overflows.
pub async fn portfolio_value(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<PortfolioValueResponse> {
    let holdings = state.store.holdings().list_for_owner(user.id).await?;
    Ok(ApiResponse::success(PortfolioValueResponse {
        total_value: portfolio::checked_total_value(&holdings)?,
    }))
}

/// GET /api/stocks/dashboard - Total, top holding and per-ticker share
///
/// 404 when the caller has no holdings, 422 when they are all worth zero.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<DashboardResponse> {
    let holdings = state.store.holdings().list_for_owner(user.id).await?;
    let dashboard = portfolio::dashboard(&holdings)?;
    Ok(ApiResponse::success(DashboardResponse::new(user.id, dashboard)))
}
