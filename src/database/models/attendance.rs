use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::database::types::Period;
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum AttendanceStatus {
        #[default]
        Present => "present",
        Leave => "leave",
        Sick => "sick",
        Absent => "absent",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub time_in: String,
    pub time_out: String,
    pub status: AttendanceStatus,
    pub note: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attendance: Attendance,
    pub employee_name: String,
    pub nik: String,
    pub position_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceInput {
    pub employee_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub time_in: String,
    #[serde(default)]
    pub time_out: String,
    pub status: Option<AttendanceStatus>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceUpdateInput {
    pub time_in: Option<String>,
    pub time_out: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRangeQuery {
    /// Missing bounds fall back to the current calendar month.
    pub fn resolve(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        let current = Period::current();
        let start = self.start_date.unwrap_or_else(|| current.first_day());
        let end = self.end_date.unwrap_or_else(|| current.last_day());
        if start > end {
            return Err(AppError::bad_request("start_date must not be after end_date"));
        }
        Ok((start, end))
    }
}

/// Per-status day counts for one employee and period. Every key is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecap {
    pub present: i64,
    pub leave: i64,
    pub sick: i64,
    pub absent: i64,
}

impl AttendanceRecap {
    pub fn add(&mut self, status: AttendanceStatus, count: i64) {
        match status {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Leave => self.leave += count,
            AttendanceStatus::Sick => self.sick += count,
            AttendanceStatus::Absent => self.absent += count,
        }
    }

    pub fn from_counts(counts: impl IntoIterator<Item = (AttendanceStatus, i64)>) -> Self {
        let mut recap = AttendanceRecap::default();
        for (status, count) in counts {
            recap.add(status, count);
        }
        recap
    }

    pub fn total(&self) -> i64 {
        self.present + self.leave + self.sick + self.absent
    }
}
