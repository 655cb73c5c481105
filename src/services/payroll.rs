use crate::config::Config;
use crate::database::models::{
    BatchInput, BatchResult, EmployeeDetail, NewSalary, SalaryComponents, SalaryDetail,
    SalaryInput,
};
use crate::database::repositories::{EmployeeRepository, OvertimeRepository, SalaryRepository};
use crate::database::types::{Numeric, Period};
use crate::error::AppError;

/// Salary computation, single creation and period batch generation.
#[derive(Clone)]
pub struct PayrollService {
    salary_repository: SalaryRepository,
    employee_repository: EmployeeRepository,
    overtime_repository: OvertimeRepository,
    period_bounds: (i32, i32),
}

impl PayrollService {
    pub fn new(
        salary_repository: SalaryRepository,
        employee_repository: EmployeeRepository,
        overtime_repository: OvertimeRepository,
        config: &Config,
    ) -> Self {
        Self {
            salary_repository,
            employee_repository,
            overtime_repository,
            period_bounds: config.period_bounds(),
        }
    }

    pub fn period(&self, month: u32, year: i32) -> Result<Period, AppError> {
        Period::new(month, year, self.period_bounds)
    }

    /// Sum of approved overtime for the employee within the period.
    pub async fn approved_overtime_total(
        &self,
        employee_id: i64,
        period: Period,
    ) -> Result<Numeric, AppError> {
        let total = self
            .overtime_repository
            .approved_total(employee_id, period.first_day(), period.last_day())
            .await?;

        Ok(total)
    }

    pub async fn create_salary(&self, input: SalaryInput) -> Result<SalaryDetail, AppError> {
        if input.employee_id <= 0 {
            return Err(AppError::bad_request("Employee is required"));
        }
        let period = self.period(input.period_month, input.period_year)?;
        let mut components = input.components();
        components.validate()?;

        if !self.employee_repository.exists(input.employee_id).await? {
            return Err(AppError::not_found("Employee not found"));
        }

        if self
            .salary_repository
            .exists_for_period(input.employee_id, period)
            .await?
        {
            return Err(AppError::conflict(format!(
                "Salary for {} already exists for this employee",
                period.label()
            )));
        }

        if components.overtime_amount.is_zero() {
            components.overtime_amount = self
                .approved_overtime_total(input.employee_id, period)
                .await?;
        }

        let salary = NewSalary::new(input.employee_id, period, components);
        let created = self.salary_repository.create(&salary).await?;
        log::info!(
            "Created salary {} for employee {} ({})",
            created.salary.id,
            input.employee_id,
            period.label()
        );

        Ok(created)
    }

    /// Full update. Every component is taken from the input and the total is recomputed.
    pub async fn update_salary(&self, id: i64, input: SalaryInput) -> Result<SalaryDetail, AppError> {
        let existing = self
            .salary_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Salary not found"))?;

        let employee_id = if input.employee_id > 0 {
            input.employee_id
        } else {
            existing.salary.employee_id
        };
        let period = self.period(input.period_month, input.period_year)?;
        let components = input.components();
        components.validate()?;

        if employee_id != existing.salary.employee_id
            && !self.employee_repository.exists(employee_id).await?
        {
            return Err(AppError::not_found("Employee not found"));
        }

        let mut salary = NewSalary::new(employee_id, period, components);
        salary.status = input.status.unwrap_or(existing.salary.status);

        self.salary_repository
            .update(id, &salary)
            .await?
            .ok_or_else(|| AppError::not_found("Salary not found"))
    }

    /// Creates a pending salary for every active employee that has none for the period.
    pub async fn generate_batch(&self, input: BatchInput) -> Result<BatchResult, AppError> {
        let period = self.period(input.period_month, input.period_year)?;
        if input.transport_allowance.is_negative() || input.meal_allowance.is_negative() {
            return Err(AppError::bad_request("Allowances cannot be negative"));
        }

        let employees = self.employee_repository.list_active().await?;
        let existing = self.salary_repository.employees_with_salary(period).await?;

        let mut skipped = Vec::new();
        let mut pending = Vec::new();
        for employee in employees {
            if existing.contains(&employee.employee.id) {
                skipped.push(employee.employee.name.clone());
                continue;
            }

            let overtime = match self.approved_overtime_total(employee.employee.id, period).await {
                Ok(total) => total,
                Err(e) => {
                    log::warn!(
                        "Overtime lookup failed for employee {}, using zero: {}",
                        employee.employee.id,
                        e
                    );
                    Numeric::zero()
                }
            };

            pending.push(NewSalary::new(
                employee.employee.id,
                period,
                batch_components(&employee, &input, overtime),
            ));
        }

        let created = if pending.is_empty() {
            0
        } else {
            self.salary_repository.create_batch(&pending).await?
        };

        log::info!(
            "Batch salary generation for {}: {} created, {} skipped",
            period.label(),
            created,
            skipped.len()
        );

        Ok(BatchResult {
            message: format!(
                "Generated {} salaries for {}, skipped {}",
                created,
                period.label(),
                skipped.len()
            ),
            created,
            skipped_count: skipped.len(),
            skipped,
            period,
        })
    }
}

/// Components of a generated row: pay scale from the employee's current
/// position (zero when unassigned) plus the uniform allowances of the batch.
fn batch_components(
    employee: &EmployeeDetail,
    input: &BatchInput,
    overtime_amount: Numeric,
) -> SalaryComponents {
    SalaryComponents {
        base_pay: employee.base_pay.clone().unwrap_or_default(),
        position_allowance: employee.position_allowance.clone().unwrap_or_default(),
        transport_allowance: input.transport_allowance.clone(),
        meal_allowance: input.meal_allowance.clone(),
        overtime_amount,
        deductions: Numeric::zero(),
    }
}
