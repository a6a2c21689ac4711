use api_lib::adapters::MemoryAdapter;
use api_lib::web::rest::{
    generate_schedule_handler, health_handler, week_schedule_handler, ApiDoc,
    GenerateScheduleRequest, WeekQuery,
};
use api_lib::web::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use shift_scheduler_core::{
    Assignment, AvailabilityWindow, EngineOptions, Employee, LimitCheck, ScheduleService,
    ShiftRequirement,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn employee(name: &str, limit: i32) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        weekly_hour_limit: limit,
    }
}

fn monday_window(employee: &Employee) -> AvailabilityWindow {
    AvailabilityWindow {
        employee_id: employee.id,
        day_of_week: 1,
        start_time: time(8),
        end_time: time(18),
    }
}

/// Employee A (limit 40) and B (limit 4), both free Monday 08-18, and a
/// Monday 09-17 shift needing two people.
async fn monday_store() -> (Arc<MemoryAdapter>, Employee, Employee) {
    let store = Arc::new(MemoryAdapter::new());
    let a = employee("A", 40);
    let b = employee("B", 4);
    store.add_employee(a.clone(), true).await;
    store.add_employee(b.clone(), true).await;
    store.add_availability(monday_window(&a)).await;
    store.add_availability(monday_window(&b)).await;
    store
        .add_requirement(ShiftRequirement {
            id: Uuid::new_v4(),
            day_of_week: 1,
            start_time: time(9),
            end_time: time(17),
            required_count: 2,
        })
        .await;
    (store, a, b)
}

fn state_over(store: &Arc<MemoryAdapter>) -> Arc<AppState> {
    Arc::new(AppState::with_defaults(store.clone(), store.clone()))
}

fn request(start_date: &str) -> Json<GenerateScheduleRequest> {
    Json(GenerateScheduleRequest {
        start_date: start_date.to_string(),
    })
}

#[tokio::test]
async fn generate_reports_count_and_conflicts() {
    let (store, a, _) = monday_store().await;

    let Json(body) = generate_schedule_handler(State(state_over(&store)), Ok(request("2024-01-10")))
        .await
        .unwrap();

    assert!(body.success);
    assert_eq!(body.assignments_count, 1);
    assert_eq!(body.conflicts, vec!["Unable to fill shift on 2024-01-08 at 09:00"]);
    assert_eq!(body.week_start, date(2024, 1, 7));
    assert_eq!(body.week_end, date(2024, 1, 13));

    let stored = store.assignments().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].employee_id, a.id);
    assert_eq!(stored[0].date, date(2024, 1, 8));
}

#[tokio::test]
async fn pre_assignment_limit_check_seats_both_employees() {
    let (store, a, b) = monday_store().await;
    let scheduler = ScheduleService::new(store.clone(), store.clone()).with_options(EngineOptions {
        limit_check: LimitCheck::PreAssignment,
        ..EngineOptions::default()
    });
    let state = Arc::new(AppState::with_scheduler(scheduler));

    let Json(body) = generate_schedule_handler(State(state), Ok(request("2024-01-08")))
        .await
        .unwrap();

    assert_eq!(body.assignments_count, 2);
    assert!(body.conflicts.is_empty());
    let seated: Vec<Uuid> = store.assignments().await.iter().map(|x| x.employee_id).collect();
    assert_eq!(seated, vec![a.id, b.id]);
}

#[tokio::test]
async fn inactive_employees_are_never_scheduled() {
    let store = Arc::new(MemoryAdapter::new());
    let retired = employee("Retired", 40);
    store.add_employee(retired.clone(), false).await;
    store.add_availability(monday_window(&retired)).await;
    store
        .add_requirement(ShiftRequirement {
            id: Uuid::new_v4(),
            day_of_week: 1,
            start_time: time(9),
            end_time: time(12),
            required_count: 1,
        })
        .await;

    let Json(body) = generate_schedule_handler(State(state_over(&store)), Ok(request("2024-01-08")))
        .await
        .unwrap();

    assert_eq!(body.assignments_count, 0);
    assert_eq!(body.conflicts.len(), 1);
}

#[tokio::test]
async fn regenerating_keeps_other_weeks() {
    let (store, _, _) = monday_store().await;
    let previous_week = Assignment {
        id: Uuid::new_v4(),
        employee_id: Uuid::new_v4(),
        shift_requirement_id: Uuid::new_v4(),
        date: date(2024, 1, 1),
    };
    store.add_assignment(previous_week.clone()).await;
    let state = state_over(&store);

    for _ in 0..2 {
        let Json(body) = generate_schedule_handler(State(state.clone()), Ok(request("2024-01-07")))
            .await
            .unwrap();
        assert_eq!(body.assignments_count, 1);
    }

    let stored = store.assignments().await;
    assert_eq!(stored.len(), 2);
    assert!(stored.contains(&previous_week));

    let Json(week) = week_schedule_handler(
        State(state),
        Query(WeekQuery {
            start_date: "2024-01-12".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(week.week_start, date(2024, 1, 7));
    assert_eq!(week.assignments.len(), 1);
    assert_eq!(week.assignments[0].date, date(2024, 1, 8));
}

#[tokio::test]
async fn invalid_dates_are_bad_requests() {
    let (store, _, _) = monday_store().await;

    let (status, Json(body)) =
        generate_schedule_handler(State(state_over(&store)), Ok(request("13/01/2024")))
            .await
            .unwrap_err();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.error.contains("13/01/2024"));
    assert!(store.assignments().await.is_empty());
}

#[tokio::test]
async fn load_failures_become_server_errors() {
    let (store, _, _) = monday_store().await;
    store.fail_loads(true);

    let (status, Json(body)) =
        generate_schedule_handler(State(state_over(&store)), Ok(request("2024-01-08")))
            .await
            .unwrap_err();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Failed to load scheduling data");
}

#[tokio::test]
async fn write_failures_become_server_errors() {
    let (store, _, _) = monday_store().await;
    store.fail_writes(true);

    let (status, Json(body)) =
        generate_schedule_handler(State(state_over(&store)), Ok(request("2024-01-08")))
            .await
            .unwrap_err();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Failed to save generated schedule");
    assert!(store.assignments().await.is_empty());
}

#[tokio::test]
async fn responses_serialize_in_camel_case() {
    let (store, _, _) = monday_store().await;

    let Json(body) = generate_schedule_handler(State(state_over(&store)), Ok(request("2024-01-08")))
        .await
        .unwrap();
    let json = serde_json::to_value(&body).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["assignmentsCount"], 1);
    assert_eq!(json["weekStart"], "2024-01-07");
    assert_eq!(json["conflicts"][0], "Unable to fill shift on 2024-01-08 at 09:00");
}

#[tokio::test]
async fn health_and_openapi_document() {
    assert_eq!(health_handler().await, "ok");

    let doc = ApiDoc::openapi().to_json().unwrap();
    assert!(doc.contains("/schedules/generate"));
    assert!(doc.contains("GenerateScheduleResponse"));
}
