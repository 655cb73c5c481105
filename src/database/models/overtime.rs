use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::database::types::Numeric;
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum OvertimeStatus {
        #[default]
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// Outcome of reviewing an overtime entry. Pending is not a valid decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl From<ApprovalDecision> for OvertimeStatus {
    fn from(decision: ApprovalDecision) -> Self {
        match decision {
            ApprovalDecision::Approved => OvertimeStatus::Approved,
            ApprovalDecision::Rejected => OvertimeStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Overtime {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub total_hours: Numeric,
    /// Rate snapshot taken from the employee's position when the entry was recorded.
    pub hourly_rate: Numeric,
    pub total_amount: Numeric,
    pub note: String,
    pub status: OvertimeStatus,
    pub approved_by: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OvertimeDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub overtime: Overtime,
    pub employee_name: String,
    pub nik: String,
    pub position_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeInput {
    pub employee_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub total_hours: Numeric,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeUpdateInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub total_hours: Numeric,
    #[serde(default)]
    pub note: String,
    pub status: Option<OvertimeStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalInput {
    pub status: ApprovalDecision,
    pub approver_id: Option<i64>,
}

impl ApprovalInput {
    /// Approver reference with `0` treated as absent.
    pub fn approver(&self) -> Option<i64> {
        self.approver_id.filter(|id| *id > 0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateBackfillResult {
    pub message: String,
    pub updated: u64,
    pub total: u64,
}

pub fn require_positive_hours(hours: &Numeric) -> Result<(), AppError> {
    if !hours.is_positive() {
        return Err(AppError::bad_request("Total hours must be greater than zero"));
    }
    Ok(())
}
