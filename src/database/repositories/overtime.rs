use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::database::models::{OvertimeDetail, OvertimeStatus};
use crate::database::types::Numeric;

const OVERTIME_DETAIL_SELECT: &str = r#"
    SELECT
        o.id,
        o.employee_id,
        o.date,
        o.start_time,
        o.end_time,
        o.total_hours,
        o.hourly_rate,
        o.total_amount,
        o.note,
        o.status,
        o.approved_by,
        o.created_at,
        o.updated_at,
        e.name AS employee_name,
        e.nik,
        COALESCE(p.name, '-') AS position_name
    FROM
        overtime o
        JOIN employees e ON e.id = o.employee_id
        LEFT JOIN positions p ON p.id = e.position_id
"#;

/// Field values written by create and update.
#[derive(Debug, Clone)]
pub struct OvertimeRecord {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub total_hours: Numeric,
    pub hourly_rate: Numeric,
    pub total_amount: Numeric,
    pub note: String,
    pub status: OvertimeStatus,
}

/// Overtime row with no rate, alongside the rate its employee's position offers today.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnratedOvertime {
    pub id: i64,
    pub total_hours: Numeric,
    pub current_rate: Option<Numeric>,
}

#[derive(Clone)]
pub struct OvertimeRepository {
    pool: SqlitePool,
}

impl OvertimeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, record: &OvertimeRecord) -> Result<OvertimeDetail> {
        let now = Utc::now().naive_utc();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO
                overtime (
                    employee_id,
                    date,
                    start_time,
                    end_time,
                    total_hours,
                    hourly_rate,
                    total_amount,
                    note,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id
        "#,
        )
        .bind(record.employee_id)
        .bind(record.date)
        .bind(&record.start_time)
        .bind(&record.end_time)
        .bind(&record.total_hours)
        .bind(&record.hourly_rate)
        .bind(&record.total_amount)
        .bind(&record.note)
        .bind(record.status)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Overtime {} vanished after insert", id))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<OvertimeDetail>> {
        let sql = format!("{} WHERE o.id = ?", OVERTIME_DETAIL_SELECT);
        let overtime = sqlx::query_as::<_, OvertimeDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(overtime)
    }

    pub async fn list(&self) -> Result<Vec<OvertimeDetail>> {
        let sql = format!("{} ORDER BY o.date DESC, o.id DESC", OVERTIME_DETAIL_SELECT);
        let rows = sqlx::query_as::<_, OvertimeDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn list_by_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OvertimeDetail>> {
        let sql = format!(
            "{} WHERE o.date BETWEEN ? AND ? ORDER BY o.date DESC, o.id DESC",
            OVERTIME_DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, OvertimeDetail>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn list_by_employee(&self, employee_id: i64) -> Result<Vec<OvertimeDetail>> {
        let sql = format!(
            "{} WHERE o.employee_id = ? ORDER BY o.date DESC, o.id DESC",
            OVERTIME_DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, OvertimeDetail>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update(&self, id: i64, record: &OvertimeRecord) -> Result<Option<OvertimeDetail>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE
                overtime
            SET
                date = ?,
                start_time = ?,
                end_time = ?,
                total_hours = ?,
                total_amount = ?,
                note = ?,
                status = ?,
                updated_at = ?
            WHERE
                id = ?
        "#,
        )
        .bind(record.date)
        .bind(&record.start_time)
        .bind(&record.end_time)
        .bind(&record.total_hours)
        .bind(&record.total_amount)
        .bind(&record.note)
        .bind(record.status)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    pub async fn set_status(
        &self,
        id: i64,
        status: OvertimeStatus,
        approved_by: Option<i64>,
    ) -> Result<Option<OvertimeDetail>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            "UPDATE overtime SET status = ?, approved_by = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(approved_by)
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
        let result = sqlx::query("DELETE FROM overtime WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sum of approved overtime amounts for one employee dated within `[start, end]`.
    pub async fn approved_total(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Numeric> {
        let amounts: Vec<Numeric> = sqlx::query_scalar(
            r#"
            SELECT
                total_amount
            FROM
                overtime
            WHERE
                employee_id = ?
                AND status = ?
                AND date BETWEEN ? AND ?
        "#,
        )
        .bind(employee_id)
        .bind(OvertimeStatus::Approved)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(amounts.into_iter().sum())
    }

    pub async fn list_unrated(&self) -> Result<Vec<UnratedOvertime>> {
        let rows = sqlx::query_as::<_, UnratedOvertime>(
            r#"
            SELECT
                o.id,
                o.total_hours,
                p.overtime_rate AS current_rate
            FROM
                overtime o
                JOIN employees e ON e.id = o.employee_id
                LEFT JOIN positions p ON p.id = e.position_id
            WHERE
                CAST(o.hourly_rate AS REAL) = 0
            ORDER BY
                o.id
        "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn set_rate(&self, id: i64, hourly_rate: &Numeric, total_amount: &Numeric) -> Result<()> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            "UPDATE overtime SET hourly_rate = ?, total_amount = ?, updated_at = ? WHERE id = ?",
        )
        .bind(hourly_rate)
        .bind(total_amount)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
