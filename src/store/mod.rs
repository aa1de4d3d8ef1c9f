//! Storage port. The directory and ledger only see these traits; the
//! relational store (or [`memory::MemoryStore`] in tests) enforces the
//! uniqueness, foreign-key and cascade rules.

pub mod memory;
pub mod mysql;

use crate::model::attendance::{
    AttendanceChanges, AttendanceFilter, AttendanceRecord, AttendanceStatistics, NewAttendance,
};
use crate::model::staff::{NewStaff, StaffAccount, StaffChanges};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the constraint name.
    #[error("duplicate value violates {0}")]
    Duplicate(&'static str),

    /// The referenced staff account does not exist.
    #[error("referenced staff account does not exist")]
    MissingReference,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub const UNIQUE_STAFF_EMAIL: &str = "unique_staff_email";
pub const UNIQUE_STAFF_DATE: &str = "unique_staff_date";

#[async_trait]
pub trait StaffStore: Send + Sync {
    async fn insert_staff(&self, new: NewStaff) -> StoreResult<StaffAccount>;

    async fn find_staff(&self, id: Uuid) -> StoreResult<Option<StaffAccount>>;

    /// Exact, case-sensitive match.
    async fn find_staff_by_email(&self, email: &str) -> StoreResult<Option<StaffAccount>>;

    /// Newest account first.
    async fn list_staff(&self) -> StoreResult<Vec<StaffAccount>>;

    async fn update_staff(&self, id: Uuid, changes: StaffChanges) -> StoreResult<Option<StaffAccount>>;

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;

    /// Removes the account and all of its attendance rows atomically.
    async fn delete_staff(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the staff member already has
    /// a row for that date and [`StoreError::MissingReference`] when the staff
    /// member does not exist.
    async fn insert_attendance(&self, new: NewAttendance) -> StoreResult<AttendanceRecord>;

    async fn find_attendance(&self, id: Uuid) -> StoreResult<Option<AttendanceRecord>>;

    async fn find_attendance_for_day(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Date descending, then creation descending, ties newest insert first.
    async fn list_attendance(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>>;

    async fn update_attendance(
        &self,
        id: Uuid,
        changes: AttendanceChanges,
    ) -> StoreResult<Option<AttendanceRecord>>;

    /// Sets the check-out time only if the row has a check-in time and no
    /// check-out time yet. `None` means the row was not eligible.
    async fn record_check_out(
        &self,
        id: Uuid,
        check_out: NaiveTime,
    ) -> StoreResult<Option<AttendanceRecord>>;

    async fn delete_attendance(&self, id: Uuid) -> StoreResult<bool>;

    async fn attendance_statistics(&self, filter: &AttendanceFilter)
    -> StoreResult<AttendanceStatistics>;
}
