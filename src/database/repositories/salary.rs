use std::collections::HashSet;

use anyhow::{Result, anyhow};
use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::database::models::{NewSalary, SalaryDetail, SalaryStatus};
use crate::database::types::Period;

const SALARY_DETAIL_SELECT: &str = r#"
    SELECT
        s.id,
        s.employee_id,
        s.period_month,
        s.period_year,
        s.base_pay,
        s.position_allowance,
        s.transport_allowance,
        s.meal_allowance,
        s.overtime_amount,
        s.deductions,
        s.total,
        s.status,
        s.created_at,
        s.updated_at,
        e.name AS employee_name,
        e.nik,
        COALESCE(p.name, '-') AS position_name
    FROM
        salaries s
        JOIN employees e ON e.id = s.employee_id
        LEFT JOIN positions p ON p.id = e.position_id
"#;

const SALARY_INSERT: &str = r#"
    INSERT INTO
        salaries (
            employee_id,
            period_month,
            period_year,
            base_pay,
            position_allowance,
            transport_allowance,
            meal_allowance,
            overtime_amount,
            deductions,
            total,
            status,
            created_at,
            updated_at
        )
    VALUES
        (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    RETURNING
        id
"#;

#[derive(Clone)]
pub struct SalaryRepository {
    pool: SqlitePool,
}

impl SalaryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn exists_for_period(&self, employee_id: i64, period: Period) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                COUNT(*)
            FROM
                salaries
            WHERE
                employee_id = ?
                AND period_month = ?
                AND period_year = ?
        "#,
        )
        .bind(employee_id)
        .bind(i64::from(period.month()))
        .bind(period.year())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Employees that already have a salary row for the period.
    pub async fn employees_with_salary(&self, period: Period) -> Result<HashSet<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT employee_id FROM salaries WHERE period_month = ? AND period_year = ?",
        )
        .bind(i64::from(period.month()))
        .bind(period.year())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    pub async fn count_for_employee(&self, employee_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM salaries WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, salary: &NewSalary) -> Result<SalaryDetail> {
        let id = Self::insert(&self.pool, salary).await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Salary {} vanished after insert", id))
    }

    /// Inserts every row or none of them.
    pub async fn create_batch(&self, salaries: &[NewSalary]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for salary in salaries {
            Self::insert(&mut *tx, salary).await?;
        }
        tx.commit().await?;

        Ok(salaries.len())
    }

    async fn insert<'e, E>(executor: E, salary: &NewSalary) -> Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now().naive_utc();
        let parts = &salary.components;
        let id: i64 = sqlx::query_scalar(SALARY_INSERT)
            .bind(salary.employee_id)
            .bind(i64::from(salary.period.month()))
            .bind(salary.period.year())
            .bind(&parts.base_pay)
            .bind(&parts.position_allowance)
            .bind(&parts.transport_allowance)
            .bind(&parts.meal_allowance)
            .bind(&parts.overtime_amount)
            .bind(&parts.deductions)
            .bind(&salary.total)
            .bind(salary.status)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;

        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<SalaryDetail>> {
        let sql = format!("{} WHERE s.id = ?", SALARY_DETAIL_SELECT);
        let salary = sqlx::query_as::<_, SalaryDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(salary)
    }

    pub async fn list(&self) -> Result<Vec<SalaryDetail>> {
        let sql = format!(
            "{} ORDER BY s.period_year DESC, s.period_month DESC, e.name, s.id",
            SALARY_DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, SalaryDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Rows of one period ordered by employee name.
    pub async fn list_by_period(&self, period: Period) -> Result<Vec<SalaryDetail>> {
        let sql = format!(
            "{} WHERE s.period_month = ? AND s.period_year = ? ORDER BY e.name, s.id",
            SALARY_DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, SalaryDetail>(&sql)
            .bind(i64::from(period.month()))
            .bind(period.year())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Salary history of one employee, most recent period first.
    pub async fn list_by_employee(
        &self,
        employee_id: i64,
        period: Option<Period>,
    ) -> Result<Vec<SalaryDetail>> {
        let rows = match period {
            Some(period) => {
                let sql = format!(
                    r#"{}
                    WHERE
                        s.employee_id = ?
                        AND s.period_month = ?
                        AND s.period_year = ?
                    ORDER BY
                        s.period_year DESC,
                        s.period_month DESC
                    "#,
                    SALARY_DETAIL_SELECT
                );
                sqlx::query_as::<_, SalaryDetail>(&sql)
                    .bind(employee_id)
                    .bind(i64::from(period.month()))
                    .bind(period.year())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{} WHERE s.employee_id = ? ORDER BY s.period_year DESC, s.period_month DESC",
                    SALARY_DETAIL_SELECT
                );
                sqlx::query_as::<_, SalaryDetail>(&sql)
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Rewrites every column of the row, including its computed total.
    pub async fn update(&self, id: i64, salary: &NewSalary) -> Result<Option<SalaryDetail>> {
        let now = Utc::now().naive_utc();
        let parts = &salary.components;
        let result = sqlx::query(
            r#"
            UPDATE
                salaries
            SET
                employee_id = ?,
                period_month = ?,
                period_year = ?,
                base_pay = ?,
                position_allowance = ?,
                transport_allowance = ?,
                meal_allowance = ?,
                overtime_amount = ?,
                deductions = ?,
                total = ?,
                status = ?,
                updated_at = ?
            WHERE
                id = ?
        "#,
        )
        .bind(salary.employee_id)
        .bind(i64::from(salary.period.month()))
        .bind(salary.period.year())
        .bind(&parts.base_pay)
        .bind(&parts.position_allowance)
        .bind(&parts.transport_allowance)
        .bind(&parts.meal_allowance)
        .bind(&parts.overtime_amount)
        .bind(&parts.deductions)
        .bind(&salary.total)
        .bind(salary.status)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: SalaryStatus,
    ) -> Result<Option<SalaryDetail>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query("UPDATE salaries SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM salaries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
