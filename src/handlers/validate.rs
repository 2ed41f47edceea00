// Field checks shared by the JSON handlers. Each failure is a 400.

use crate::error::ApiError;

/// Required string field: present and non-blank, returned trimmed.
pub fn required_text(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ApiError::validation(format!("`{}` is required", field))),
    }
}

/// Optional string field: if present it must be non-blank.
pub fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, ApiError> {
    value.map(|v| required_text(field, Some(v))).transpose()
}

/// Required numeric field: present, finite and not negative.
pub fn required_amount(field: &str, value: Option<f64>) -> Result<f64, ApiError> {
    let value = value.ok_or_else(|| ApiError::validation(format!("`{}` is required", field)))?;
    check_amount(field, value)
}

pub fn optional_amount(field: &str, value: Option<f64>) -> Result<Option<f64>, ApiError> {
    value.map(|v| check_amount(field, v)).transpose()
}

/// `quantity * buyPrice` must stay a finite number.
pub fn finite_value(quantity: f64, buy_price: f64) -> Result<(), ApiError> {
    if !(quantity * buy_price).is_finite() {
        return Err(ApiError::validation(
            "`quantity` * `buyPrice` is too large",
        ));
    }
    Ok(())
}

fn check_amount(field: &str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::validation(format!(
            "`{}` must be a non-negative number",
            field
        )));
    }
    Ok(value)
}
