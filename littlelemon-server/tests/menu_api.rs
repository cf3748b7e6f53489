mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::{Value, json};

async fn seed_menu(app: &TestApp, token: &str) {
    for (title, price, inventory) in [
        ("Greek Salad", "12.50", 10),
        ("Bruschetta", "5.99", 20),
        ("Lemon Dessert", "6.00", 5),
    ] {
        let response = app
            .post(
                "/api/menu/",
                Some(token),
                json!({"Title": title, "Price": price, "Inventory": inventory}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    }
}

#[tokio::test]
async fn test_menu_list_returns_fixture_items() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", true).await;
    seed_menu(&app, &admin).await;

    let response = app.get("/api/menu/", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let items = response.body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    let titles: Vec<&str> = items.iter().map(|i| i["Title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Bruschetta", "Greek Salad", "Lemon Dessert"]);

    let salad = &items[1];
    assert_eq!(salad["Price"], "12.50");
    assert_eq!(salad["Inventory"], 10);
    assert!(salad["id"].is_i64());
}

#[tokio::test]
async fn test_menu_write_requires_staff() {
    let app = TestApp::new().await;
    let payload = json!({"Title": "Soup", "Price": "4.00", "Inventory": 3});

    let response = app.post("/api/menu/", None, payload.clone()).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers["www-authenticate"], "Token");
    assert_eq!(
        response.body,
        json!({"detail": "Authentication credentials were not provided."})
    );

    let customer = app.token_for("customer", false).await;
    let response = app.post("/api/menu/", Some(&customer), payload).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.body,
        json!({"detail": "You do not have permission to perform this action."})
    );
}

#[tokio::test]
async fn test_menu_crud_cycle() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", true).await;

    let created = app
        .post(
            "/api/menu/",
            Some(&admin),
            json!({"Title": "Pasta", "Price": 9.5, "Inventory": 7}),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["Price"], "9.50");
    let id = created.body["id"].as_i64().unwrap();
    let url = format!("/api/menu/{id}/");

    let fetched = app.get(&url, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);

    let patched = app.patch(&url, Some(&admin), json!({"Inventory": 0})).await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["Inventory"], 0);
    assert_eq!(patched.body["Title"], "Pasta");

    let replaced = app
        .put(
            &url,
            Some(&admin),
            json!({"Title": "Pasta al limone", "Price": "11", "Inventory": 4}),
        )
        .await;
    assert_eq!(replaced.status, StatusCode::OK);
    assert_eq!(
        replaced.body,
        json!({"id": id, "Title": "Pasta al limone", "Price": "11.00", "Inventory": 4})
    );

    let deleted = app.delete(&url, Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, Value::Null);

    let gone = app.get(&url, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body, json!({"detail": "No Menu matches the given query."}));
}

#[tokio::test]
async fn test_menu_validation_errors() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", true).await;

    let response = app
        .post(
            "/api/menu/",
            Some(&admin),
            json!({"Title": "", "Price": "1.234", "Inventory": "many"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "Title": ["This field may not be blank."],
            "Price": ["Ensure that there are no more than 2 decimal places."],
            "Inventory": ["A valid integer is required."],
        })
    );

    let response = app.post("/api/menu/", Some(&admin), json!({})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["Title"], json!(["This field is required."]));
    assert_eq!(response.body["Price"], json!(["This field is required."]));
}

#[tokio::test]
async fn test_put_requires_every_field() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", true).await;
    seed_menu(&app, &admin).await;

    let response = app.put("/api/menu/1/", Some(&admin), json!({"Inventory": 2})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["Title"], json!(["This field is required."]));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let app = TestApp::new().await;
    let request = http::Request::post("/api/mixin/menu/")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"Title\": "))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["detail"]
            .as_str()
            .unwrap()
            .starts_with("JSON parse error - ")
    );
}

#[tokio::test]
async fn test_unknown_and_non_integer_ids_are_not_found() {
    let app = TestApp::new().await;
    for uri in ["/api/menu/99/", "/api/menu/abc/", "/api/mixin/menu/99"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.body, json!({"detail": "No Menu matches the given query."}));
    }
}

#[tokio::test]
async fn test_update_of_missing_object_is_not_found_before_validation() {
    let app = TestApp::new().await;
    let response = app.put("/api/mixin/menu/42/", None, json!({})).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_readonly_menu_rejects_writes() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", true).await;
    seed_menu(&app, &admin).await;

    let listed = app.get("/api/menu-readonly/", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 3);

    let response = app
        .post(
            "/api/menu-readonly/",
            Some(&admin),
            json!({"Title": "Soup", "Price": "4.00", "Inventory": 3}),
        )
        .await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);

    let response = app.delete("/api/menu-readonly/1/", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_mixin_menu_is_open_without_patch() {
    let app = TestApp::new().await;
    let created = app
        .post(
            "/api/mixin/menu/",
            None,
            json!({"Title": "Olives", "Price": "3.50", "Inventory": 30}),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();

    let response = app
        .patch(&format!("/api/mixin/menu/{id}/"), None, json!({"Inventory": 1}))
        .await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);

    let response = app.delete(&format!("/api/mixin/menu/{id}/"), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_menu_search() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", true).await;
    seed_menu(&app, &admin).await;

    let response = app.get("/api/menu/?search=LEMON", None).await;
    let items = response.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["Title"], "Lemon Dessert");
}

#[tokio::test]
async fn test_menu_pagination() {
    let app = TestApp::with_page_size(2).await;
    let admin = app.token_for("admin", true).await;
    seed_menu(&app, &admin).await;

    let first = app.get("/api/menu/", None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["count"], 3);
    assert_eq!(first.body["previous"], Value::Null);
    assert_eq!(first.body["next"], "http://testserver/api/menu/?page=2");
    assert_eq!(first.body["results"].as_array().unwrap().len(), 2);

    let second = app.get("/api/menu/?page=2", None).await;
    assert_eq!(second.body["next"], Value::Null);
    assert_eq!(second.body["previous"], "http://testserver/api/menu/");
    assert_eq!(second.body["results"][0]["Title"], "Lemon Dessert");

    let beyond = app.get("/api/menu/?page=3", None).await;
    assert_eq!(beyond.status, StatusCode::NOT_FOUND);
    assert_eq!(beyond.body, json!({"detail": "Invalid page."}));
}
