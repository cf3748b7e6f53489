mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;

fn booking(name: &str, guests: i64, date: &str) -> serde_json::Value {
    json!({"Name": name, "No_of_guests": guests, "BookingDate": date})
}

#[tokio::test]
async fn test_bookings_viewset_requires_login() {
    let app = TestApp::new().await;

    let response = app.get("/api/bookings/", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let token = app.token_for("guest", false).await;
    let response = app.get("/api/bookings/", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_bookings_viewset_crud() {
    let app = TestApp::new().await;
    let token = app.token_for("guest", false).await;

    let created = app
        .post(
            "/api/bookings/",
            Some(&token),
            booking("Ana", 4, "2024-06-10T19:30:00Z"),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    let id = created.body["id"].as_i64().unwrap();
    assert_eq!(
        created.body,
        json!({"id": id, "Name": "Ana", "No_of_guests": 4, "BookingDate": "2024-06-10T19:30:00Z"})
    );

    let url = format!("/api/bookings/{id}/");
    let patched = app.patch(&url, Some(&token), json!({"No_of_guests": 6})).await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["No_of_guests"], 6);
    assert_eq!(patched.body["Name"], "Ana");

    let deleted = app.delete(&url, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = app.get(&url, Some(&token)).await;
    assert_eq!(gone.body, json!({"detail": "No Booking matches the given query."}));
}

#[tokio::test]
async fn test_booking_dates_are_normalized_to_utc() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/generic/bookings/",
            None,
            booking("Luis", 2, "2024-06-10T21:30:00+02:00"),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["BookingDate"], "2024-06-10T19:30:00Z");

    let response = app
        .post(
            "/api/generic/bookings/",
            None,
            booking("Marta", 3, "2024-06-11 20:00"),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["BookingDate"], "2024-06-11T20:00:00Z");
}

#[tokio::test]
async fn test_class_bookings_are_open() {
    let app = TestApp::new().await;

    let created = app
        .post(
            "/api/class/bookings/",
            None,
            booking("Sofia", 2, "2024-07-01T13:00:00Z"),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();

    let replaced = app
        .put(
            &format!("/api/class/bookings/{id}/"),
            None,
            booking("Sofia R.", 3, "2024-07-01T14:00:00Z"),
        )
        .await;
    assert_eq!(replaced.status, StatusCode::OK);
    assert_eq!(replaced.body["Name"], "Sofia R.");

    let listed = app.get("/api/class/bookings/", None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);

    let patched = app
        .patch(&format!("/api/class/bookings/{id}/"), None, json!({"Name": "X"}))
        .await;
    assert_eq!(patched.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_double_booking_is_accepted() {
    let app = TestApp::new().await;
    let slot = "2024-08-01T20:00:00Z";
    for name in ["First", "Second"] {
        let response = app
            .post("/api/generic/bookings/", None, booking(name, 2, slot))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    let listed = app.get("/api/generic/bookings/", None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_booking_validation() {
    let app = TestApp::new().await;
    let response = app
        .post(
            "/api/generic/bookings/",
            None,
            json!({"Name": "Ana", "No_of_guests": 3000000000i64, "BookingDate": "tomorrow"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["No_of_guests"],
        json!(["Ensure this value is less than or equal to 2147483647."])
    );
    assert!(
        response.body["BookingDate"][0]
            .as_str()
            .unwrap()
            .starts_with("Datetime has wrong format.")
    );

    let response = app.post("/api/generic/bookings/", None, json!([1])).await;
    assert_eq!(
        response.body,
        json!({"non_field_errors": ["Invalid data. Expected a dictionary, but got list."]})
    );
}

#[tokio::test]
async fn test_bookings_search_and_order() {
    let app = TestApp::new().await;
    for (name, date) in [
        ("Late Party", "2024-09-02T21:00:00Z"),
        ("Early Lunch", "2024-09-01T12:00:00Z"),
        ("late dinner", "2024-09-01T21:00:00Z"),
    ] {
        app.post("/api/generic/bookings/", None, booking(name, 2, date))
            .await;
    }

    let all = app.get("/api/generic/bookings/", None).await;
    let names: Vec<&str> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["Name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Early Lunch", "late dinner", "Late Party"]);

    let found = app.get("/api/generic/bookings/?search=late", None).await;
    assert_eq!(found.body.as_array().unwrap().len(), 2);
}
