use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::database::types::{Numeric, Period};
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum SalaryStatus {
        #[default]
        Pending => "pending",
        Paid => "paid",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Salary {
    pub id: i64,
    pub employee_id: i64,
    pub period_month: i32,
    pub period_year: i32,
    pub base_pay: Numeric,
    pub position_allowance: Numeric,
    pub transport_allowance: Numeric,
    pub meal_allowance: Numeric,
    pub overtime_amount: Numeric,
    pub deductions: Numeric,
    pub total: Numeric,
    pub status: SalaryStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Salary {
    pub fn period(&self) -> Period {
        Period::from_stored(self.period_month, self.period_year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalaryDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub salary: Salary,
    pub employee_name: String,
    pub nik: String,
    pub position_name: String,
}

/// The monetary parts of a salary row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryComponents {
    pub base_pay: Numeric,
    pub position_allowance: Numeric,
    pub transport_allowance: Numeric,
    pub meal_allowance: Numeric,
    pub overtime_amount: Numeric,
    pub deductions: Numeric,
}

impl SalaryComponents {
    /// Sum of the additive components minus deductions. Not clamped at zero.
    pub fn total(&self) -> Numeric {
        self.base_pay.clone()
            + self.position_allowance.clone()
            + self.transport_allowance.clone()
            + self.meal_allowance.clone()
            + self.overtime_amount.clone()
            - self.deductions.clone()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let parts = [
            &self.base_pay,
            &self.position_allowance,
            &self.transport_allowance,
            &self.meal_allowance,
            &self.overtime_amount,
            &self.deductions,
        ];
        if parts.iter().any(|value| value.is_negative()) {
            return Err(AppError::bad_request("Salary components cannot be negative"));
        }
        Ok(())
    }
}

/// A fully computed salary row ready to be written.
#[derive(Debug, Clone)]
pub struct NewSalary {
    pub employee_id: i64,
    pub period: Period,
    pub components: SalaryComponents,
    pub total: Numeric,
    pub status: SalaryStatus,
}

impl NewSalary {
    pub fn new(employee_id: i64, period: Period, components: SalaryComponents) -> Self {
        let total = components.total();
        Self {
            employee_id,
            period,
            components,
            total,
            status: SalaryStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalaryInput {
    #[serde(default)]
    pub employee_id: i64,
    pub period_month: u32,
    pub period_year: i32,
    #[serde(default)]
    pub base_pay: Numeric,
    #[serde(default)]
    pub position_allowance: Numeric,
    #[serde(default)]
    pub transport_allowance: Numeric,
    #[serde(default)]
    pub meal_allowance: Numeric,
    #[serde(default)]
    pub overtime_amount: Numeric,
    #[serde(default)]
    pub deductions: Numeric,
    pub status: Option<SalaryStatus>,
}

impl SalaryInput {
    pub fn components(&self) -> SalaryComponents {
        SalaryComponents {
            base_pay: self.base_pay.clone(),
            position_allowance: self.position_allowance.clone(),
            transport_allowance: self.transport_allowance.clone(),
            meal_allowance: self.meal_allowance.clone(),
            overtime_amount: self.overtime_amount.clone(),
            deductions: self.deductions.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalaryStatusInput {
    pub status: SalaryStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchInput {
    pub period_month: u32,
    pub period_year: i32,
    #[serde(default)]
    pub transport_allowance: Numeric,
    #[serde(default)]
    pub meal_allowance: Numeric,
}

/// Outcome of a batch run: what was created and which employees were skipped.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub message: String,
    pub created: usize,
    pub skipped_count: usize,
    pub skipped: Vec<String>,
    pub period: Period,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct OptionalPeriodQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}
