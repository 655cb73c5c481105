use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::database::types::Numeric;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    pub id: i64,
    pub name: String,
    pub base_pay: Numeric,
    pub position_allowance: Numeric,
    /// Hourly overtime rate copied onto overtime entries when they are recorded.
    pub overtime_rate: Numeric,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionInput {
    pub name: String,
    pub base_pay: Numeric,
    #[serde(default)]
    pub position_allowance: Numeric,
    #[serde(default)]
    pub overtime_rate: Numeric,
}

impl PositionInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request("Position name is required"));
        }
        if !self.base_pay.is_positive() {
            return Err(AppError::bad_request("Base pay must be greater than zero"));
        }
        if self.position_allowance.is_negative() || self.overtime_rate.is_negative() {
            return Err(AppError::bad_request(
                "Allowance and overtime rate cannot be negative",
            ));
        }
        Ok(())
    }
}
