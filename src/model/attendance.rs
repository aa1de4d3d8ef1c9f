use crate::model::format::{hms, ymd};
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Arrivals up to and including 09:00:00 count as on time.
pub const LATE_AFTER: (u32, u32, u32) = (9, 0, 0);

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Late,
    #[default]
    Absent,
}

impl AttendanceStatus {
    /// Status derived from a self-service check-in time.
    pub fn for_check_in(check_in: NaiveTime) -> Self {
        let (h, m, s) = LATE_AFTER;
        let threshold = h * 3600 + m * 60 + s;
        let arrived = (check_in.num_seconds_from_midnight(), check_in.nanosecond());
        if arrived <= (threshold, 0) {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Late
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "0b0c5d2e-8f43-4a57-a1f9-4d63f0d4b6a1",
    "staffId": "6f1c1f0e-3b2a-4c59-9a55-7c1f5f1f2a10",
    "date": "2024-01-10",
    "checkInTime": "08:30:00",
    "checkOutTime": null,
    "status": "PRESENT",
    "createdAt": "2024-01-10T08:30:00Z",
    "updatedAt": "2024-01-10T08:30:00Z"
}))]
pub struct AttendanceRecord {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub staff_id: Uuid,
    #[serde(with = "ymd")]
    #[schema(value_type = String, example = "2024-01-10")]
    pub date: NaiveDate,
    #[serde(with = "hms")]
    #[schema(value_type = Option<String>, example = "08:30:00")]
    pub check_in_time: Option<NaiveTime>,
    #[serde(with = "hms")]
    #[schema(value_type = Option<String>, example = "17:00:00")]
    pub check_out_time: Option<NaiveTime>,
    pub status: AttendanceStatus,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub status: AttendanceStatus,
}

/// Partial administrative update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AttendanceChanges {
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub status: Option<AttendanceStatus>,
}

/// Conjunctive filter; every bound is optional and date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub staff_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.staff_id.is_none_or(|id| record.staff_id == id)
            && self.start_date.is_none_or(|d| record.date >= d)
            && self.end_date.is_none_or(|d| record.date <= d)
            && self.status.is_none_or(|s| record.status == s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceStatistics {
    #[schema(example = 20)]
    pub total: u64,
    #[schema(example = 15)]
    pub present: u64,
    #[schema(example = 3)]
    pub late: u64,
    #[schema(example = 2)]
    pub absent: u64,
}

impl AttendanceStatistics {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        records
            .into_iter()
            .fold(AttendanceStatistics::default(), |mut stats, record| {
                stats.total += 1;
                match record.status {
                    AttendanceStatus::Present => stats.present += 1,
                    AttendanceStatus::Late => stats.late += 1,
                    AttendanceStatus::Absent => stats.absent += 1,
                }
                stats
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayStatus {
    pub has_checked_in: bool,
    pub has_checked_out: bool,
    pub attendance: Option<AttendanceRecord>,
}

impl TodayStatus {
    pub fn from_record(record: Option<AttendanceRecord>) -> Self {
        TodayStatus {
            has_checked_in: record.is_some(),
            has_checked_out: record
                .as_ref()
                .is_some_and(|r| r.check_out_time.is_some()),
            attendance: record,
        }
    }
}
