use crate::auth::auth::AuthUser;
use crate::auth::policy::{self, Action};
use crate::error::AppError;
use crate::model::attendance::{
    AttendanceChanges, AttendanceFilter, AttendanceRecord, AttendanceStatistics, AttendanceStatus,
    NewAttendance, TodayStatus,
};
use crate::model::format::{hms, ymd, ymd_opt};
use crate::response;
use crate::service::AttendanceLedger;
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Body of check-in/check-out. The whole body is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DayRequest {
    #[serde(default, deserialize_with = "ymd_opt::deserialize")]
    #[schema(value_type = Option<String>, example = "2024-01-10")]
    pub date: Option<NaiveDate>,
}

impl DayRequest {
    fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(DayRequest::default());
        }
        serde_json::from_slice(body).map_err(|e| AppError::validation(format!("date: {e}")))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Only honoured for administrators
    #[param(value_type = Option<String>)]
    pub staff_id: Option<Uuid>,
    /// Inclusive lower bound, YYYY-MM-DD
    #[serde(default, deserialize_with = "ymd_opt::deserialize")]
    #[param(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound, YYYY-MM-DD
    #[serde(default, deserialize_with = "ymd_opt::deserialize")]
    #[param(value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[param(value_type = Option<String>)]
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatisticsQuery {
    /// Only honoured for administrators
    #[param(value_type = Option<String>)]
    pub staff_id: Option<Uuid>,
    #[serde(default, deserialize_with = "ymd_opt::deserialize")]
    #[param(value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "ymd_opt::deserialize")]
    #[param(value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendance {
    #[schema(value_type = String, example = "6f1c1f0e-3b2a-4c59-9a55-7c1f5f1f2a10")]
    pub staff_id: Uuid,
    #[serde(with = "ymd")]
    #[schema(value_type = String, example = "2024-01-10")]
    pub date: NaiveDate,
    #[serde(default, with = "hms")]
    #[schema(value_type = Option<String>, example = "08:45:00")]
    pub check_in_time: Option<NaiveTime>,
    #[serde(default, with = "hms")]
    #[schema(value_type = Option<String>, example = "17:30:00")]
    pub check_out_time: Option<NaiveTime>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendance {
    #[serde(default, with = "hms")]
    #[schema(value_type = Option<String>, example = "08:45:00")]
    pub check_in_time: Option<NaiveTime>,
    #[serde(default, with = "hms")]
    #[schema(value_type = Option<String>, example = "17:30:00")]
    pub check_out_time: Option<NaiveTime>,
    pub status: Option<AttendanceStatus>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body(content = DayRequest, description = "Optional; date defaults to today"),
    responses(
        (status = 201, description = "Checked in successfully", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Staff member not found"),
        (status = 409, description = "Attendance already recorded for today", body = Object, example = json!({
            "success": false,
            "message": "Attendance already recorded for today",
            "error": "CONFLICT"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let day = DayRequest::from_body(&body)?;
    policy::authorize(&auth, Action::RecordAttendance { staff_id: auth.staff_id })?;

    let record = ledger.check_in(auth.staff_id, day.date).await?;
    Ok(response::created(record, "Checked in successfully"))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body(content = DayRequest, description = "Optional; date defaults to today"),
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No check-in record found for today"),
        (status = 409, description = "Already checked out for today")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let day = DayRequest::from_body(&body)?;
    policy::authorize(&auth, Action::RecordAttendance { staff_id: auth.staff_id })?;

    let record = ledger.check_out(auth.staff_id, day.date).await?;
    Ok(response::ok_with_message(record, "Checked out successfully"))
}

/// Today's attendance state of the caller
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Tri-state for today", body = TodayStatus),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::RecordAttendance { staff_id: auth.staff_id })?;
    let status = ledger.today_status(auth.staff_id).await?;
    Ok(response::ok(status))
}

/// Attendance counts by status
#[utoipa::path(
    get,
    path = "/api/attendance/statistics",
    params(StatisticsQuery),
    responses(
        (status = 200, description = "Counts over the filtered records", body = AttendanceStatistics),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn statistics(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<StatisticsQuery>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::QueryAttendance)?;
    let query = query.into_inner();

    let filter = AttendanceFilter {
        staff_id: policy::scoped_staff_filter(&auth, query.staff_id),
        start_date: query.start_date,
        end_date: query.end_date,
        status: None,
    };

    let stats = ledger.statistics(&filter).await?;
    Ok(response::ok(stats))
}

/// Manual attendance entry (admin)
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance record created successfully", body = AttendanceRecord),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Staff member not found"),
        (status = 409, description = "Attendance already exists for this date")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn create_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    payload: web::Json<CreateAttendance>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::ManageAttendance)?;
    let payload = payload.into_inner();

    let record = ledger
        .create_manual(NewAttendance {
            staff_id: payload.staff_id,
            date: payload.date,
            check_in_time: payload.check_in_time,
            check_out_time: payload.check_out_time,
            status: payload.status,
        })
        .await?;
    Ok(response::created(record, "Attendance record created successfully"))
}

/// List attendance
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Records, newest date first", body = [AttendanceRecord]),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::QueryAttendance)?;
    let query = query.into_inner();

    let filter = AttendanceFilter {
        staff_id: policy::scoped_staff_filter(&auth, query.staff_id),
        start_date: query.start_date,
        end_date: query.end_date,
        status: query.status,
    };

    let records = ledger.list(&filter).await?;
    Ok(response::ok(records))
}

/// Get attendance by ID
#[utoipa::path(
    get,
    path = "/api/attendance/{attendance_id}",
    params(("attendance_id", Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record", body = AttendanceRecord),
        (status = 403, description = "Record belongs to someone else"),
        (status = 404, description = "Attendance record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn get_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let record = ledger.get(path.into_inner()).await?;
    policy::authorize(&auth, Action::ViewAttendance { owner: record.staff_id })?;
    Ok(response::ok(record))
}

/// Update attendance (admin)
#[utoipa::path(
    put,
    path = "/api/attendance/{attendance_id}",
    params(("attendance_id", Path, description = "Attendance record ID")),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Attendance record updated successfully", body = AttendanceRecord),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn update_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::ManageAttendance)?;
    let payload = payload.into_inner();

    let record = ledger
        .update_manual(
            path.into_inner(),
            AttendanceChanges {
                check_in_time: payload.check_in_time,
                check_out_time: payload.check_out_time,
                status: payload.status,
            },
        )
        .await?;
    Ok(response::ok_with_message(record, "Attendance record updated successfully"))
}

/// Delete attendance (admin)
#[utoipa::path(
    delete,
    path = "/api/attendance/{attendance_id}",
    params(("attendance_id", Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record deleted successfully"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::ManageAttendance)?;
    ledger.delete(path.into_inner()).await?;
    Ok(response::message("Attendance record deleted successfully"))
}
