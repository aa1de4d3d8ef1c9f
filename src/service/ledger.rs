use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::model::attendance::{
    AttendanceChanges, AttendanceFilter, AttendanceRecord, AttendanceStatistics, AttendanceStatus,
    NewAttendance, TodayStatus,
};
use crate::store::{AttendanceStore, StaffStore, StoreError};
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Daily attendance: one row per staff member per date, opened by a
/// check-in (or an administrator) and closed by a check-out.
#[derive(Clone)]
pub struct AttendanceLedger {
    staff: Arc<dyn StaffStore>,
    attendance: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
}

impl AttendanceLedger {
    pub fn new(
        staff: Arc<dyn StaffStore>,
        attendance: Arc<dyn AttendanceStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            staff,
            attendance,
            clock,
        }
    }

    async fn require_staff(&self, staff_id: Uuid) -> Result<()> {
        match self.staff.find_staff(staff_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Staff member not found")),
        }
    }

    /// Opens today's (or `date`'s) record. The status is derived from the
    /// current time of day. The storage constraint decides between two
    /// concurrent check-ins.
    pub async fn check_in(&self, staff_id: Uuid, date: Option<NaiveDate>) -> Result<AttendanceRecord> {
        self.require_staff(staff_id).await?;

        let date = date.unwrap_or_else(|| self.clock.today());
        let check_in = self.clock.time_of_day();
        let status = AttendanceStatus::for_check_in(check_in);

        let record = self
            .attendance
            .insert_attendance(NewAttendance {
                staff_id,
                date,
                check_in_time: Some(check_in),
                check_out_time: None,
                status,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AppError::conflict("Attendance already recorded for today"),
                StoreError::MissingReference => AppError::not_found("Staff member not found"),
                other => other.into(),
            })?;

        info!(%staff_id, %date, %check_in, %status, "Checked in");
        Ok(record)
    }

    pub async fn check_out(&self, staff_id: Uuid, date: Option<NaiveDate>) -> Result<AttendanceRecord> {
        self.require_staff(staff_id).await?;

        let date = date.unwrap_or_else(|| self.clock.today());
        let existing = self
            .attendance
            .find_attendance_for_day(staff_id, date)
            .await?
            .ok_or_else(|| AppError::not_found("No check-in record found for today"))?;

        if existing.check_out_time.is_some() {
            return Err(AppError::conflict("Already checked out for today"));
        }
        if existing.check_in_time.is_none() {
            return Err(AppError::conflict("No check-in time recorded for this date"));
        }

        let check_out = self.clock.time_of_day();
        // Conditional update; losing a race with another check-out lands here.
        let record = self
            .attendance
            .record_check_out(existing.id, check_out)
            .await?
            .ok_or_else(|| AppError::conflict("Already checked out for today"))?;

        info!(%staff_id, %date, %check_out, "Checked out");
        Ok(record)
    }

    pub async fn today_status(&self, staff_id: Uuid) -> Result<TodayStatus> {
        self.require_staff(staff_id).await?;

        let record = self
            .attendance
            .find_attendance_for_day(staff_id, self.clock.today())
            .await?;
        Ok(TodayStatus::from_record(record))
    }

    pub async fn list(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        check_range(filter)?;
        debug!(?filter, "Listing attendance");
        Ok(self.attendance.list_attendance(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<AttendanceRecord> {
        self.attendance
            .find_attendance(id)
            .await?
            .ok_or_else(|| AppError::not_found("Attendance record not found"))
    }

    /// Administrative entry. The status is taken as given, not derived.
    pub async fn create_manual(&self, entry: NewAttendance) -> Result<AttendanceRecord> {
        check_times(entry.check_in_time, entry.check_out_time)?;
        self.require_staff(entry.staff_id).await?;

        let (staff_id, date) = (entry.staff_id, entry.date);
        let record = self
            .attendance
            .insert_attendance(entry)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AppError::conflict("Attendance already exists for this date"),
                StoreError::MissingReference => AppError::not_found("Staff member not found"),
                other => other.into(),
            })?;

        info!(%staff_id, %date, status = %record.status, "Attendance created manually");
        Ok(record)
    }

    pub async fn update_manual(&self, id: Uuid, changes: AttendanceChanges) -> Result<AttendanceRecord> {
        let existing = self.get(id).await?;
        check_times(
            changes.check_in_time.or(existing.check_in_time),
            changes.check_out_time.or(existing.check_out_time),
        )?;

        let record = self
            .attendance
            .update_attendance(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("Attendance record not found"))?;

        info!(attendance_id = %id, "Attendance updated");
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.attendance.delete_attendance(id).await? {
            return Err(AppError::not_found("Attendance record not found"));
        }
        info!(attendance_id = %id, "Attendance deleted");
        Ok(())
    }

    /// Counts over the same filter as [`list`](Self::list); `status` is ignored.
    pub async fn statistics(&self, filter: &AttendanceFilter) -> Result<AttendanceStatistics> {
        let filter = AttendanceFilter {
            status: None,
            ..filter.clone()
        };
        check_range(&filter)?;
        Ok(self.attendance.attendance_statistics(&filter).await?)
    }
}

fn check_range(filter: &AttendanceFilter) -> Result<()> {
    match (filter.start_date, filter.end_date) {
        (Some(start), Some(end)) if start > end => {
            Err(AppError::validation("startDate: must not be after endDate"))
        }
        _ => Ok(()),
    }
}

fn check_times(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Result<()> {
    if check_out.is_some() && check_in.is_none() {
        return Err(AppError::validation(
            "checkOutTime: requires a check-in time",
        ));
    }
    Ok(())
}
