use crate::database::models::{
    ApprovalInput, OvertimeDetail, OvertimeInput, OvertimeStatus, OvertimeUpdateInput,
    RateBackfillResult, require_positive_hours,
};
use crate::database::repositories::{
    EmployeeRepository, OvertimeRepository, overtime::OvertimeRecord,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct OvertimeService {
    overtime_repository: OvertimeRepository,
    employee_repository: EmployeeRepository,
}

impl OvertimeService {
    pub fn new(
        overtime_repository: OvertimeRepository,
        employee_repository: EmployeeRepository,
    ) -> Self {
        Self {
            overtime_repository,
            employee_repository,
        }
    }

    /// Records a pending entry, snapshotting the employee's current overtime rate.
    pub async fn create(&self, input: OvertimeInput) -> Result<OvertimeDetail, AppError> {
        require_positive_hours(&input.total_hours)?;

        let employee = self
            .employee_repository
            .find_by_id(input.employee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;

        let hourly_rate = employee.overtime_rate.unwrap_or_default();
        let total_amount = input.total_hours.clone() * hourly_rate.clone();

        let record = OvertimeRecord {
            employee_id: input.employee_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            total_hours: input.total_hours,
            hourly_rate,
            total_amount,
            note: input.note,
            status: OvertimeStatus::Pending,
        };

        let created = self.overtime_repository.create(&record).await?;
        Ok(created)
    }

    /// Rewrites the entry; the amount is recomputed from the stored rate snapshot.
    pub async fn update(
        &self,
        id: i64,
        input: OvertimeUpdateInput,
    ) -> Result<OvertimeDetail, AppError> {
        require_positive_hours(&input.total_hours)?;

        let existing = self
            .overtime_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Overtime not found"))?
            .overtime;

        let total_amount = input.total_hours.clone() * existing.hourly_rate.clone();
        let record = OvertimeRecord {
            employee_id: existing.employee_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            total_hours: input.total_hours,
            hourly_rate: existing.hourly_rate,
            total_amount,
            note: input.note,
            status: input.status.unwrap_or(existing.status),
        };

        self.overtime_repository
            .update(id, &record)
            .await?
            .ok_or_else(|| AppError::not_found("Overtime not found"))
    }

    /// Overwrites the status with the decision. Re-deciding is allowed.
    pub async fn approve(&self, id: i64, input: ApprovalInput) -> Result<OvertimeDetail, AppError> {
        let approver = input.approver();
        if let Some(approver_id) = approver {
            if !self.employee_repository.exists(approver_id).await? {
                return Err(AppError::bad_request("Approver does not exist"));
            }
        }

        let status = OvertimeStatus::from(input.status);
        let updated = self
            .overtime_repository
            .set_status(id, status, approver)
            .await?
            .ok_or_else(|| AppError::not_found("Overtime not found"))?;

        log::info!("Overtime {} marked {}", id, status);
        Ok(updated)
    }

    /// Fills in the rate of every entry recorded without one, using the
    /// employee's current position.
    pub async fn backfill_rates(&self) -> Result<RateBackfillResult, AppError> {
        let unrated = self.overtime_repository.list_unrated().await?;
        let total = unrated.len() as u64;

        let mut updated = 0;
        for entry in unrated {
            let rate = entry.current_rate.unwrap_or_default();
            if rate.is_zero() {
                continue;
            }
            let amount = entry.total_hours.clone() * rate.clone();
            self.overtime_repository
                .set_rate(entry.id, &rate, &amount)
                .await?;
            updated += 1;
        }

        log::info!("Overtime rate backfill updated {} of {} entries", updated, total);
        Ok(RateBackfillResult {
            message: format!("Recalculated {} of {} overtime entries", updated, total),
            updated,
            total,
        })
    }
}
