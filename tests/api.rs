#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::{Ctx, PASSWORD, hms};
use staff_attendance::model::role::Role;

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn health_is_public() {
    let ctx = Ctx::new();
    let app = app!(ctx);

    let (status, body) = send!(app, test::TestRequest::get().uri("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK" }));
}

#[actix_web::test]
async fn login_returns_token_and_profile_without_secret() {
    let ctx = Ctx::new();
    ctx.add("alice@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "alice@example.com", "password": PASSWORD }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["role"], "STAFF");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let (status, me) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["firstName"], "Test");
}

#[actix_web::test]
async fn login_failures_do_not_reveal_accounts() {
    let ctx = Ctx::new();
    ctx.add("alice@example.com", Role::Staff).await;
    let app = app!(ctx);

    for (email, password) in [("alice@example.com", "wrong-password"), ("ghost@example.com", PASSWORD)] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": email, "password": password }))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Invalid credentials", "error": "UNAUTHORIZED" })
        );
    }

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "not-an-email", "password": "" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn protected_routes_require_a_valid_token() {
    let ctx = Ctx::new();
    let app = app!(ctx);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/attendance/today"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/staff")
            .insert_header(("Authorization", "Bearer not.a.token"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[actix_web::test]
async fn check_in_then_check_out_same_day() {
    let ctx = Ctx::new();
    let (alice, alice_auth) = ctx.add("alice@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", alice_auth.clone()))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Checked in successfully");
    assert_eq!(body["data"]["staffId"], alice.to_string());
    assert_eq!(body["data"]["date"], "2024-01-10");
    assert_eq!(body["data"]["checkInTime"], "08:30:00");
    assert_eq!(body["data"]["checkOutTime"], Value::Null);
    assert_eq!(body["data"]["status"], "PRESENT");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", alice_auth.clone()))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    ctx.clock.set_time(hms(17, 0, 0));
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-out")
            .insert_header(("Authorization", alice_auth.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Checked out successfully");
    assert_eq!(body["data"]["checkOutTime"], "17:00:00");
    assert_eq!(body["data"]["status"], "PRESENT");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-out")
            .insert_header(("Authorization", alice_auth.clone()))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance/today")
            .insert_header(("Authorization", alice_auth))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hasCheckedIn"], true);
    assert_eq!(body["data"]["hasCheckedOut"], true);
    assert_eq!(body["data"]["attendance"]["checkInTime"], "08:30:00");
}

#[actix_web::test]
async fn nine_oclock_sharp_is_present_one_second_later_is_late() {
    let ctx = Ctx::new();
    let (_, on_time) = ctx.add("on-time@example.com", Role::Staff).await;
    let (_, late) = ctx.add("late@example.com", Role::Staff).await;
    let app = app!(ctx);

    ctx.clock.set_time(hms(9, 0, 0));
    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", on_time))
    );
    assert_eq!(body["data"]["status"], "PRESENT");

    ctx.clock.set_time(hms(9, 0, 1));
    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", late))
    );
    assert_eq!(body["data"]["status"], "LATE");
    assert_eq!(body["data"]["checkInTime"], "09:00:01");
}

#[actix_web::test]
async fn check_in_accepts_explicit_date_and_rejects_malformed_one() {
    let ctx = Ctx::new();
    let (_, auth) = ctx.add("alice@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({ "date": "2024-01-09" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["date"], "2024-01-09");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", auth))
            .set_json(json!({ "date": "2024-1-9" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn admin_entered_absence_blocks_self_service() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let (bob, bob_auth) = ctx.add("bob@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance")
            .insert_header(("Authorization", admin.clone()))
            .set_json(json!({ "staffId": bob, "date": "2024-01-10", "status": "ABSENT" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Attendance record created successfully");
    assert_eq!(body["data"]["checkInTime"], Value::Null);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", bob_auth.clone()))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-out")
            .insert_header(("Authorization", bob_auth))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance")
            .insert_header(("Authorization", admin))
            .set_json(json!({ "staffId": bob, "date": "2024-01-10", "status": "PRESENT" }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn manual_entry_rejects_check_out_without_check_in() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let (bob, _) = ctx.add("bob@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance")
            .insert_header(("Authorization", admin))
            .set_json(json!({
                "staffId": bob,
                "date": "2024-01-10",
                "checkOutTime": "17:00:00",
                "status": "PRESENT"
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn staff_filters_are_narrowed_to_self() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let (alice, alice_auth) = ctx.add("alice@example.com", Role::Staff).await;
    let (bob, bob_auth) = ctx.add("bob@example.com", Role::Staff).await;
    let app = app!(ctx);

    for auth in [&alice_auth, &bob_auth] {
        let _ = send!(
            app,
            test::TestRequest::post()
                .uri("/api/attendance/check-in")
                .insert_header(("Authorization", auth.clone()))
        );
    }

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance?staffId={bob}"))
            .insert_header(("Authorization", alice_auth.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["staffId"], alice.to_string());

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/statistics?staffId={bob}"))
            .insert_header(("Authorization", alice_auth))
    );
    assert_eq!(body["data"], json!({ "total": 1, "present": 1, "late": 0, "absent": 0 }));

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance?staffId={bob}"))
            .insert_header(("Authorization", admin.clone()))
    );
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["staffId"], bob.to_string());

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance")
            .insert_header(("Authorization", admin))
    );
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn staff_cannot_read_someone_elses_record() {
    let ctx = Ctx::new();
    let (_, alice_auth) = ctx.add("alice@example.com", Role::Staff).await;
    let (_, bob_auth) = ctx.add("bob@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", bob_auth.clone()))
    );
    let record = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/{record}"))
            .insert_header(("Authorization", alice_auth))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/{record}"))
            .insert_header(("Authorization", bob_auth))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], record);
}

#[actix_web::test]
async fn staff_role_is_denied_admin_operations() {
    let ctx = Ctx::new();
    let (alice, alice_auth) = ctx.add("alice@example.com", Role::Staff).await;
    let app = app!(ctx);

    let denied = [
        test::TestRequest::get().uri("/api/staff"),
        test::TestRequest::get().uri("/api/staff/statistics"),
        test::TestRequest::get().uri(&format!("/api/staff/{alice}")),
        test::TestRequest::delete().uri(&format!("/api/staff/{alice}")),
        test::TestRequest::post().uri("/api/staff").set_json(json!({
            "email": "eve@example.com",
            "password": PASSWORD,
            "firstName": "Eve",
            "lastName": "Adams"
        })),
        test::TestRequest::post().uri("/api/attendance").set_json(json!({
            "staffId": alice,
            "date": "2024-01-10",
            "status": "PRESENT"
        })),
    ];
    for req in denied {
        let (status, body) = send!(app, req.insert_header(("Authorization", alice_auth.clone())));
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Insufficient permissions");
    }
}

#[actix_web::test]
async fn admin_manages_staff_directory() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let app = app!(ctx);

    let new_staff = json!({
        "email": "carol@example.com",
        "password": PASSWORD,
        "firstName": "Carol",
        "lastName": "Diaz"
    });
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/staff")
            .insert_header(("Authorization", admin.clone()))
            .set_json(new_staff.clone())
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Staff member created successfully");
    assert_eq!(body["data"]["role"], "STAFF");
    assert!(body["data"].get("passwordHash").is_none());
    let carol = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/staff")
            .insert_header(("Authorization", admin.clone()))
            .set_json(new_staff)
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/staff/{carol}"))
            .insert_header(("Authorization", admin.clone()))
            .set_json(json!({ "role": "ADMIN" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "ADMIN");
    assert_eq!(body["data"]["firstName"], "Carol");

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/staff/{carol}"))
            .insert_header(("Authorization", admin.clone()))
            .set_json(json!({}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/staff/statistics")
            .insert_header(("Authorization", admin.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "total": 2, "admins": 2, "staff": 0 }));

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/staff")
            .insert_header(("Authorization", admin.clone()))
    );
    let emails: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, ["carol@example.com", "admin@example.com"]);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/staff/not-a-uuid")
            .insert_header(("Authorization", admin))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn password_change_rules() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let (alice, alice_auth) = ctx.add("alice@example.com", Role::Staff).await;
    let (bob, _) = ctx.add("bob@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/staff/{bob}/password"))
            .insert_header(("Authorization", alice_auth.clone()))
            .set_json(json!({ "currentPassword": PASSWORD, "newPassword": "another-secret" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/staff/{alice}/password"))
            .insert_header(("Authorization", alice_auth.clone()))
            .set_json(json!({ "newPassword": "another-secret" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/staff/{alice}/password"))
            .insert_header(("Authorization", alice_auth))
            .set_json(json!({ "currentPassword": PASSWORD, "newPassword": "another-secret" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Password updated successfully" }));

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/staff/{bob}/password"))
            .insert_header(("Authorization", admin))
            .set_json(json!({ "newPassword": "reset-by-admin" }))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "bob@example.com", "password": "reset-by-admin" }))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn deleting_staff_removes_their_attendance() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let (alice, alice_auth) = ctx.add("alice@example.com", Role::Staff).await;
    let (_, bob_auth) = ctx.add("bob@example.com", Role::Staff).await;
    let app = app!(ctx);

    for auth in [&alice_auth, &bob_auth] {
        let _ = send!(
            app,
            test::TestRequest::post()
                .uri("/api/attendance/check-in")
                .insert_header(("Authorization", auth.clone()))
        );
    }
    assert_eq!(ctx.store.attendance_count().await, 2);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/staff/{alice}"))
            .insert_header(("Authorization", admin.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Staff member deleted successfully");
    assert_eq!(ctx.store.attendance_count().await, 1);

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance?staffId={alice}"))
            .insert_header(("Authorization", admin))
    );
    assert_eq!(body["data"], json!([]));

    // The token outlives the account.
    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", alice_auth))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found");
}

#[actix_web::test]
async fn statistics_partition_the_filtered_records() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let (alice, _) = ctx.add("alice@example.com", Role::Staff).await;
    let app = app!(ctx);

    for (date, status) in [
        ("2024-01-08", "PRESENT"),
        ("2024-01-09", "LATE"),
        ("2024-01-10", "ABSENT"),
        ("2024-01-11", "PRESENT"),
    ] {
        let (code, _) = send!(
            app,
            test::TestRequest::post()
                .uri("/api/attendance")
                .insert_header(("Authorization", admin.clone()))
                .set_json(json!({ "staffId": alice, "date": date, "status": status }))
        );
        assert_eq!(code, StatusCode::CREATED);
    }

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance/statistics")
            .insert_header(("Authorization", admin.clone()))
    );
    assert_eq!(body["data"], json!({ "total": 4, "present": 2, "late": 1, "absent": 1 }));

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance/statistics?startDate=2024-01-09&endDate=2024-01-10")
            .insert_header(("Authorization", admin.clone()))
    );
    assert_eq!(body["data"], json!({ "total": 2, "present": 0, "late": 1, "absent": 1 }));

    let (_, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance?status=PRESENT")
            .insert_header(("Authorization", admin.clone()))
    );
    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, ["2024-01-11", "2024-01-08"]);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance?startDate=2024-01-11&endDate=2024-01-09")
            .insert_header(("Authorization", admin.clone()))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/attendance?startDate=01/09/2024")
            .insert_header(("Authorization", admin))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn admin_updates_and_deletes_records() {
    let ctx = Ctx::new();
    let (_, admin) = ctx.add("admin@example.com", Role::Admin).await;
    let (_, alice_auth) = ctx.add("alice@example.com", Role::Staff).await;
    let app = app!(ctx);

    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/attendance/check-in")
            .insert_header(("Authorization", alice_auth))
    );
    let record = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/attendance/{record}"))
            .insert_header(("Authorization", admin.clone()))
            .set_json(json!({ "checkOutTime": "18:15:00", "status": "LATE" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Attendance record updated successfully");
    assert_eq!(body["data"]["checkInTime"], "08:30:00");
    assert_eq!(body["data"]["checkOutTime"], "18:15:00");
    assert_eq!(body["data"]["status"], "LATE");

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/attendance/{record}"))
            .insert_header(("Authorization", admin.clone()))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/attendance/{record}"))
            .insert_header(("Authorization", admin))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Attendance record not found");
}

#[actix_web::test]
async fn unknown_route_answers_with_envelope() {
    let ctx = Ctx::new();
    let app = app!(ctx);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/nowhere"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "NOT_FOUND");
}
