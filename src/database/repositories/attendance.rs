use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::database::models::{
    AttendanceDetail, AttendanceInput, AttendanceRecap, AttendanceStatus, AttendanceUpdateInput,
};

const ATTENDANCE_DETAIL_SELECT: &str = r#"
    SELECT
        a.id,
        a.employee_id,
        a.date,
        a.time_in,
        a.time_out,
        a.status,
        a.note,
        a.created_at,
        a.updated_at,
        e.name AS employee_name,
        e.nik,
        COALESCE(p.name, '-') AS position_name
    FROM
        attendance a
        JOIN employees e ON e.id = a.employee_id
        LEFT JOIN positions p ON p.id = e.position_id
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &AttendanceInput) -> Result<AttendanceDetail> {
        let now = Utc::now().naive_utc();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO
                attendance (
                    employee_id,
                    date,
                    time_in,
                    time_out,
                    status,
                    note,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id
        "#,
        )
        .bind(input.employee_id)
        .bind(input.date)
        .bind(&input.time_in)
        .bind(&input.time_out)
        .bind(input.status.unwrap_or_default())
        .bind(&input.note)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Attendance {} vanished after insert", id))
    }

    pub async fn exists_for_day(&self, employee_id: i64, date: NaiveDate) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance WHERE employee_id = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceDetail>> {
        let sql = format!("{} WHERE a.id = ?", ATTENDANCE_DETAIL_SELECT);
        let attendance = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(attendance)
    }

    /// All rows dated within `[start, end]`, most recent first.
    pub async fn list_by_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceDetail>> {
        let sql = format!(
            "{} WHERE a.date BETWEEN ? AND ? ORDER BY a.date DESC, e.name, a.id",
            ATTENDANCE_DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn list_by_employee(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceDetail>> {
        let sql = format!(
            "{} WHERE a.employee_id = ? AND a.date BETWEEN ? AND ? ORDER BY a.date DESC, a.id",
            ATTENDANCE_DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update(
        &self,
        id: i64,
        input: &AttendanceUpdateInput,
    ) -> Result<Option<AttendanceDetail>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE
                attendance
            SET
                time_in = COALESCE(?, time_in),
                time_out = COALESCE(?, time_out),
                status = COALESCE(?, status),
                note = COALESCE(?, note),
                updated_at = ?
            WHERE
                id = ?
        "#,
        )
        .bind(input.time_in.as_deref())
        .bind(input.time_out.as_deref())
        .bind(input.status)
        .bind(input.note.as_deref())
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
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Per-status day counts for one employee between `start` and `end` inclusive.
    pub async fn recap(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AttendanceRecap> {
        let counts = sqlx::query_as::<_, (AttendanceStatus, i64)>(
            r#"
            SELECT
                status,
                COUNT(*)
            FROM
                attendance
            WHERE
                employee_id = ?
                AND date BETWEEN ? AND ?
            GROUP BY
                status
        "#,
        )
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(AttendanceRecap::from_counts(counts))
    }
}
