use crate::model::attendance::{
    AttendanceChanges, AttendanceFilter, AttendanceRecord, AttendanceStatistics, NewAttendance,
};
use crate::model::staff::{NewStaff, StaffAccount, StaffChanges};
use crate::store::{
    AttendanceStore, StaffStore, StoreError, StoreResult, UNIQUE_STAFF_DATE, UNIQUE_STAFF_EMAIL,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-process store. Every operation runs under one lock, so uniqueness
/// checks and cascades are atomic the same way they are in the database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    // Both vectors are kept in insertion order.
    staff: Vec<StaffAccount>,
    attendance: Vec<AttendanceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn attendance_count(&self) -> usize {
        self.inner.lock().await.attendance.len()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn insert_staff(&self, new: NewStaff) -> StoreResult<StaffAccount> {
        let mut tables = self.inner.lock().await;
        if tables.staff.iter().any(|s| s.email == new.email) {
            return Err(StoreError::Duplicate(UNIQUE_STAFF_EMAIL));
        }
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
        tables.staff.push(account.clone());
        Ok(account)
    }

    async fn find_staff(&self, id: Uuid) -> StoreResult<Option<StaffAccount>> {
        let tables = self.inner.lock().await;
        Ok(tables.staff.iter().find(|s| s.id == id).cloned())
    }

    async fn find_staff_by_email(&self, email: &str) -> StoreResult<Option<StaffAccount>> {
        let tables = self.inner.lock().await;
        Ok(tables.staff.iter().find(|s| s.email == email).cloned())
    }

    async fn list_staff(&self) -> StoreResult<Vec<StaffAccount>> {
        let tables = self.inner.lock().await;
        let mut accounts: Vec<_> = tables.staff.iter().rev().cloned().collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn update_staff(&self, id: Uuid, changes: StaffChanges) -> StoreResult<Option<StaffAccount>> {
        let mut tables = self.inner.lock().await;
        if let Some(email) = &changes.email {
            if tables.staff.iter().any(|s| s.id != id && &s.email == email) {
                return Err(StoreError::Duplicate(UNIQUE_STAFF_EMAIL));
            }
        }
        let Some(account) = tables.staff.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(first_name) = changes.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            account.last_name = last_name;
        }
        if let Some(role) = changes.role {
            account.role = role;
        }
        account.updated_at = now();
        Ok(Some(account.clone()))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut tables = self.inner.lock().await;
        match tables.staff.iter_mut().find(|s| s.id == id) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                account.updated_at = now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_staff(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.inner.lock().await;
        let before = tables.staff.len();
        tables.staff.retain(|s| s.id != id);
        if tables.staff.len() == before {
            return Ok(false);
        }
        tables.attendance.retain(|a| a.staff_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert_attendance(&self, new: NewAttendance) -> StoreResult<AttendanceRecord> {
        let mut tables = self.inner.lock().await;
        if !tables.staff.iter().any(|s| s.id == new.staff_id) {
            return Err(StoreError::MissingReference);
        }
        if tables
            .attendance
            .iter()
            .any(|a| a.staff_id == new.staff_id && a.date == new.date)
        {
            return Err(StoreError::Duplicate(UNIQUE_STAFF_DATE));
        }
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
        tables.attendance.push(record.clone());
        Ok(record)
    }

    async fn find_attendance(&self, id: Uuid) -> StoreResult<Option<AttendanceRecord>> {
        let tables = self.inner.lock().await;
        Ok(tables.attendance.iter().find(|a| a.id == id).cloned())
    }

    async fn find_attendance_for_day(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let tables = self.inner.lock().await;
        Ok(tables
            .attendance
            .iter()
            .find(|a| a.staff_id == staff_id && a.date == date)
            .cloned())
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        let tables = self.inner.lock().await;
        // Reverse insertion order first; the stable sort keeps it for ties.
        let mut records: Vec<_> = tables
            .attendance
            .iter()
            .rev()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(records)
    }

    async fn update_attendance(
        &self,
        id: Uuid,
        changes: AttendanceChanges,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let mut tables = self.inner.lock().await;
        let Some(record) = tables.attendance.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(t) = changes.check_in_time {
            record.check_in_time = Some(t);
        }
        if let Some(t) = changes.check_out_time {
            record.check_out_time = Some(t);
        }
        if let Some(status) = changes.status {
            record.status = status;
        }
        record.updated_at = now();
        Ok(Some(record.clone()))
    }

    async fn record_check_out(
        &self,
        id: Uuid,
        check_out: NaiveTime,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let mut tables = self.inner.lock().await;
        let eligible = tables
            .attendance
            .iter_mut()
            .find(|a| a.id == id && a.check_in_time.is_some() && a.check_out_time.is_none());
        Ok(eligible.map(|record| {
            record.check_out_time = Some(check_out);
            record.updated_at = now();
            record.clone()
        }))
    }

    async fn delete_attendance(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.inner.lock().await;
        let before = tables.attendance.len();
        tables.attendance.retain(|a| a.id != id);
        Ok(tables.attendance.len() != before)
    }

    async fn attendance_statistics(
        &self,
        filter: &AttendanceFilter,
    ) -> StoreResult<AttendanceStatistics> {
        let tables = self.inner.lock().await;
        Ok(AttendanceStatistics::tally(
            tables.attendance.iter().filter(|a| filter.matches(a)),
        ))
    }
}
