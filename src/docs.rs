use crate::api::attendance::{CreateAttendance, DayRequest, UpdateAttendance};
use crate::api::staff::{CreateStaff, UpdatePassword, UpdateStaff};
use crate::auth::handlers::LoginRequest;
use crate::model::attendance::{AttendanceRecord, AttendanceStatistics, AttendanceStatus, TodayStatus};
use crate::model::role::Role;
use crate::model::staff::{StaffProfile, StaffStatistics};
use crate::service::credentials::LoginResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Staff Attendance API",
        version = "0.1.0",
        description = r#"
## Staff directory and daily attendance

- **Staff** : administrators create, update and remove staff accounts
- **Attendance** : one record per staff member per day, self-service check-in/check-out,
  status `PRESENT` up to 09:00:00 and `LATE` after, `ABSENT` for admin-entered days
- **Statistics** : head-count by role and attendance totals per status

Every response uses the envelope `{success, data?, message?, error?}`.
Protected endpoints require `Authorization: Bearer <token>` from `POST /api/auth/login`.
Dates are `YYYY-MM-DD`, times `HH:MM:SS`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::me,

        crate::api::staff::create_staff,
        crate::api::staff::list_staff,
        crate::api::staff::staff_statistics,
        crate::api::staff::get_staff,
        crate::api::staff::update_staff,
        crate::api::staff::update_password,
        crate::api::staff::delete_staff,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::statistics,
        crate::api::attendance::create_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            Role,
            StaffProfile,
            StaffStatistics,
            CreateStaff,
            UpdateStaff,
            UpdatePassword,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceStatistics,
            TodayStatus,
            DayRequest,
            CreateAttendance,
            UpdateAttendance
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Login and current identity"),
        (name = "Staff", description = "Staff directory (administrators)"),
        (name = "Attendance", description = "Daily attendance ledger"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
