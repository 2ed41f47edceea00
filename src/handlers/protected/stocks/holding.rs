use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{Holding, HoldingChanges, NewHolding};
use crate::error::ApiError;
use crate::handlers::validate::{
    finite_value, optional_amount, optional_text, required_amount, required_text,
};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHoldingRequest {
    pub name: Option<String>,
    pub ticker: Option<String>,
    pub quantity: Option<f64>,
    pub buy_price: Option<f64>,
}

/// Any subset of the editable fields. Unknown keys, including any attempt
/// to set an owner, are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHoldingRequest {
    pub name: Option<String>,
    pub ticker: Option<String>,
    pub quantity: Option<f64>,
    pub buy_price: Option<f64>,
}

impl TryFrom<CreateHoldingRequest> for NewHolding {
    type Error = ApiError;

    fn try_from(req: CreateHoldingRequest) -> Result<Self, Self::Error> {
        let holding = NewHolding {
            name: required_text("name", req.name)?,
            ticker: required_text("ticker", req.ticker)?,
            quantity: required_amount("quantity", req.quantity)?,
            buy_price: required_amount("buyPrice", req.buy_price)?,
        };
        finite_value(holding.quantity, holding.buy_price)?;
        Ok(holding)
    }
}

impl TryFrom<UpdateHoldingRequest> for HoldingChanges {
    type Error = ApiError;

    fn try_from(req: UpdateHoldingRequest) -> Result<Self, Self::Error> {
        let changes = HoldingChanges {
            name: optional_text("name", req.name)?,
            ticker: optional_text("ticker", req.ticker)?,
            quantity: optional_amount("quantity", req.quantity)?,
            buy_price: optional_amount("buyPrice", req.buy_price)?,
        };
        if let (Some(quantity), Some(buy_price)) = (changes.quantity, changes.buy_price) {
            finite_value(quantity, buy_price)?;
        }
        Ok(changes)
    }
}

/// A path id that is not a UUID cannot name any holding, so it is a 404
/// like any other miss.
fn parse_holding_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::stock_not_found())
}

/// GET /api/stocks - Caller's holdings, oldest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Holding>> {
    let holdings = state.store.holdings().list_for_owner(user.id).await?;
    Ok(ApiResponse::success(holdings))
}

/// POST /api/stocks - Add a holding owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateHoldingRequest>, JsonRejection>,
) -> ApiResult<Holding> {
    let Json(payload) = payload?;
    let new_holding = NewHolding::try_from(payload)?;

    let holding = state.store.holdings().create(user.id, new_holding).await?;
    tracing::info!("User {} added holding {} ({})", user.id, holding.id, holding.ticker);

    Ok(ApiResponse::created(holding))
}

/// PUT /api/stocks/:id - Change any of name, ticker, quantity, buyPrice
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateHoldingRequest>, JsonRejection>,
) -> ApiResult<Holding> {
    let id = parse_holding_id(&id)?;
    let Json(payload) = payload?;
    let changes = HoldingChanges::try_from(payload)?;
    let holdings = state.store.holdings();

    // A one-sided amount change is checked against the stored other side
    if changes.quantity.is_some() != changes.buy_price.is_some() {
        let current = holdings
            .find_for_owner(user.id, id)
            .await?
            .ok_or_else(ApiError::stock_not_found)?;
        finite_value(
            changes.quantity.unwrap_or(current.quantity),
            changes.buy_price.unwrap_or(current.buy_price),
        )?;
    }

    let holding = holdings
        .update_for_owner(user.id, id, changes)
        .await?
        .ok_or_else(ApiError::stock_not_found)?;

    tracing::info!("User {} updated holding {}", user.id, holding.id);
    Ok(ApiResponse::success(holding))
}

/// DELETE /api/stocks/:id - Remove one of the caller's holdings
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_holding_id(&id)?;

    if !state.store.holdings().delete_for_owner(user.id, id).await? {
        return Err(ApiError::stock_not_found());
    }

    tracing::info!("User {} deleted holding {}", user.id, id);
    Ok(ApiResponse::no_content())
}
