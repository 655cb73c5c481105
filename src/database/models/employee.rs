use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::database::types::Numeric;
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum EmployeeStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub nik: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub position_id: Option<i64>,
    pub join_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Employee joined with the pay scale of its current position.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub employee: Employee,
    pub position_name: Option<String>,
    pub base_pay: Option<Numeric>,
    pub position_allowance: Option<Numeric>,
    pub overtime_rate: Option<Numeric>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeInput {
    pub nik: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub position_id: Option<i64>,
    pub join_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nik.trim().is_empty() {
            return Err(AppError::bad_request("NIK is required"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request("Employee name is required"));
        }
        Ok(())
    }

    /// Position reference with `0` treated as unassigned.
    pub fn position(&self) -> Option<i64> {
        self.position_id.filter(|id| *id > 0)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmployeeListQuery {
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Deserialize)]
pub struct EmployeeSearchQuery {
    #[serde(default)]
    pub q: String,
}
