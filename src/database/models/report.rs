use serde::{Deserialize, Serialize};

use super::{SalaryDetail, SalaryStatus};
use crate::database::types::{Numeric, Period};

/// Totals across every salary row of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecap {
    pub month: u32,
    pub year: i32,
    pub total_employees: usize,
    pub total_base_pay: Numeric,
    pub total_allowances: Numeric,
    pub total_overtime: Numeric,
    pub total_deductions: Numeric,
    pub total_salary: Numeric,
    pub status_pending: usize,
    pub status_paid: usize,
}

impl SalaryRecap {
    pub fn from_rows(period: Period, rows: &[SalaryDetail]) -> Self {
        let salaries = rows.iter().map(|row| &row.salary);

        SalaryRecap {
            month: period.month(),
            year: period.year(),
            total_employees: rows.len(),
            total_base_pay: salaries.clone().map(|s| &s.base_pay).sum(),
            total_allowances: salaries
                .clone()
                .map(|s| {
                    s.position_allowance.clone()
                        + s.transport_allowance.clone()
                        + s.meal_allowance.clone()
                })
                .sum(),
            total_overtime: salaries.clone().map(|s| &s.overtime_amount).sum(),
            total_deductions: salaries.clone().map(|s| &s.deductions).sum(),
            total_salary: salaries.clone().map(|s| &s.total).sum(),
            status_pending: salaries
                .clone()
                .filter(|s| s.status == SalaryStatus::Pending)
                .count(),
            status_paid: salaries.filter(|s| s.status == SalaryStatus::Paid).count(),
        }
    }
}
