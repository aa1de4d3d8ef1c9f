use crate::model::attendance::{
    AttendanceChanges, AttendanceFilter, AttendanceRecord, AttendanceStatistics, NewAttendance,
};
use crate::model::staff::{NewStaff, StaffAccount, StaffChanges};
use crate::store::{
    AttendanceStore, StaffStore, StoreError, StoreResult, UNIQUE_STAFF_DATE, UNIQUE_STAFF_EMAIL,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, SubsecRound, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

const STAFF_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, created_at, updated_at";
const ATTENDANCE_COLUMNS: &str =
    "id, staff_id, date, check_in_time, check_out_time, status, created_at, updated_at";

/// sqlx/MySQL adapter. Ids are stored as BINARY(16); see
/// `migrations/0001_init.sql` for the constraints this relies on.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// TIMESTAMP(6) keeps microseconds only.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Turns constraint violations into port errors; everything else stays a
/// database error.
fn classify(err: sqlx::Error, unique: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate(unique);
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference;
        }
    }
    StoreError::Database(err)
}

fn push_filter(qb: &mut QueryBuilder<'_, MySql>, filter: &AttendanceFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(staff_id) = filter.staff_id {
        qb.push(" AND staff_id = ").push_bind(staff_id);
    }
    if let Some(start) = filter.start_date {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND date <= ").push_bind(end);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl StaffStore for MySqlStore {
    async fn insert_staff(&self, new: NewStaff) -> StoreResult<StaffAccount> {
        let ts = now();
        let account = StaffAccount {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            created_at: ts,
            updated_at: ts,
        };

        sqlx::query(
            r#"
            INSERT INTO staff
            (id, email, password_hash, first_name, last_name, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.role)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, UNIQUE_STAFF_EMAIL))?;

        Ok(account)
    }

    async fn find_staff(&self, id: Uuid) -> StoreResult<Option<StaffAccount>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?");
        Ok(sqlx::query_as::<_, StaffAccount>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_staff_by_email(&self, email: &str) -> StoreResult<Option<StaffAccount>> {
        // utf8mb4_bin collation on the column makes this case-sensitive.
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE email = ?");
        Ok(sqlx::query_as::<_, StaffAccount>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_staff(&self) -> StoreResult<Vec<StaffAccount>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY created_at DESC, seq DESC");
        Ok(sqlx::query_as::<_, StaffAccount>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_staff(&self, id: Uuid, changes: StaffChanges) -> StoreResult<Option<StaffAccount>> {
        let result = sqlx::query(
            r#"
            UPDATE staff SET
                email = COALESCE(?, email),
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                role = COALESCE(?, role),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.email)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.role)
        .bind(now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, UNIQUE_STAFF_EMAIL))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_staff(id).await
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE staff SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_staff(&self, id: Uuid) -> StoreResult<bool> {
        // The FK cascades as well; deleting inside one transaction keeps
        // the account and its rows together even without it.
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query("DELETE FROM attendance WHERE staff_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM staff WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        debug!(staff_id = %id, attendance_rows = rows, "Deleted staff account");
        Ok(true)
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn insert_attendance(&self, new: NewAttendance) -> StoreResult<AttendanceRecord> {
        let ts = now();
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            staff_id: new.staff_id,
            date: new.date,
            check_in_time: new.check_in_time,
            check_out_time: new.check_out_time,
            status: new.status,
            created_at: ts,
            updated_at: ts,
        };

        sqlx::query(
            r#"
            INSERT INTO attendance
            (id, staff_id, date, check_in_time, check_out_time, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id)
        .bind(record.staff_id)
        .bind(record.date)
        .bind(record.check_in_time)
        .bind(record.check_out_time)
        .bind(record.status)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, UNIQUE_STAFF_DATE))?;

        Ok(record)
    }

    async fn find_attendance(&self, id: Uuid) -> StoreResult<Option<AttendanceRecord>> {
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?");
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_attendance_for_day(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE staff_id = ? AND date = ?");
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(staff_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        let mut qb = QueryBuilder::<MySql>::new(format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY date DESC, created_at DESC, seq DESC");
        debug!(sql = %qb.sql(), ?filter, "Listing attendance");

        Ok(qb
            .build_query_as::<AttendanceRecord>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_attendance(
        &self,
        id: Uuid,
        changes: AttendanceChanges,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE attendance SET
                check_in_time = COALESCE(?, check_in_time),
                check_out_time = COALESCE(?, check_out_time),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.check_in_time)
        .bind(changes.check_out_time)
        .bind(changes.status)
        .bind(now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_attendance(id).await
    }

    async fn record_check_out(
        &self,
        id: Uuid,
        check_out: NaiveTime,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_out_time = ?, updated_at = ?
            WHERE id = ?
            AND check_in_time IS NOT NULL
            AND check_out_time IS NULL
            "#,
        )
        .bind(check_out)
        .bind(now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_attendance(id).await
    }

    async fn delete_attendance(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn attendance_statistics(
        &self,
        filter: &AttendanceFilter,
    ) -> StoreResult<AttendanceStatistics> {
        let mut qb = QueryBuilder::<MySql>::new(
            r#"
            SELECT
                COUNT(*),
                CAST(COALESCE(SUM(status = 'PRESENT'), 0) AS SIGNED),
                CAST(COALESCE(SUM(status = 'LATE'), 0) AS SIGNED),
                CAST(COALESCE(SUM(status = 'ABSENT'), 0) AS SIGNED)
            FROM attendance
            "#,
        );
        push_filter(&mut qb, filter);

        let (total, present, late, absent) = qb
            .build_query_as::<(i64, i64, i64, i64)>()
            .fetch_one(&self.pool)
            .await?;

        let count = |n: i64| u64::try_from(n).unwrap_or_default();
        Ok(AttendanceStatistics {
            total: count(total),
            present: count(present),
            late: count(late),
            absent: count(absent),
        })
    }
}
