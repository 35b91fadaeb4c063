use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use emenu_api::{build_router, AppState};
use emenu_core::repositories::{DishRepository, MenuRepository};
use emenu_core::{DishDraft, MenuDraft};
use emenu_infrastructure::InMemoryStore;
use emenu_security::JwtService;

const SECRET: &str = "integration-test-secret-0123456789abcdef";
const PASSWORD: &str = "correct horse battery";

struct TestApp {
    router: Router,
    store: Arc<InMemoryStore>,
    token: String,
}

async fn setup() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        store.clone(),
        JwtService::new(SECRET, 3600),
    );
    state
        .auth
        .create_user("chef", "", "", "chef@example.com", PASSWORD)
        .await
        .unwrap();
    let token = state.auth.login("chef", PASSWORD).await.unwrap().access_token;

    TestApp {
        router: build_router(state),
        store,
        token,
    }
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 9, day, 12, 0, 0).unwrap()
}

/// September and August menus with two dishes each, October with five, plus one empty menu.
async fn seed_menus(store: &InMemoryStore) {
    let mut ids = Vec::new();
    for n in 1..=7 {
        let draft = DishDraft::new(
            format!("Dish {}", n),
            String::new(),
            Decimal::new(1000 + n, 2),
            Duration::from_secs(600),
            n % 2 == 0,
        )
        .unwrap();
        ids.push(DishRepository::create(store, &draft, at(1)).await.unwrap().id);
    }

    let menus = [
        ("September Menu", ids[0..2].to_vec(), 12),
        ("August Menu", ids[2..4].to_vec(), 12),
        ("October Menu", ids[2..7].to_vec(), 13),
        ("Empty Menu", vec![], 14),
    ];
    for (name, dish_ids, day) in menus {
        let draft = MenuDraft::new(name.to_string(), String::new(), dish_ids).unwrap();
        MenuRepository::create(store, &draft, at(day)).await.unwrap();
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_public(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_root_lists_entry_points() {
    let app = setup().await;
    let (status, body) = get_public(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["public-menus"], "/public/menu/");
    assert_eq!(body["data"]["private-dishes"], "/private/dishes/");
    assert_eq!(body["data"]["docs"], "/docs/");
}

#[tokio::test]
async fn test_public_list_excludes_empty_menus() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (status, body) = get_public(&app, "/public/menu/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(names(&body), vec!["September Menu", "August Menu", "October Menu"]);
    assert_eq!(body["data"][0]["dishes"], json!(["Dish 1", "Dish 2"]));
}

#[tokio::test]
async fn test_public_list_ordering() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (_, body) = get_public(&app, "/public/menu/?ordering=-dishes__count,name").await;
    assert_eq!(names(&body), vec!["October Menu", "August Menu", "September Menu"]);

    let (_, body) = get_public(&app, "/public/menu/?ordering=name").await;
    assert_eq!(names(&body), vec!["August Menu", "October Menu", "September Menu"]);
}

#[tokio::test]
async fn test_public_list_filters() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (_, body) = get_public(&app, "/public/menu/?name=August%20Menu").await;
    assert_eq!(names(&body), vec!["August Menu"]);

    let (_, body) = get_public(&app, "/public/menu/?date_added__gte=2021-09-13").await;
    assert_eq!(names(&body), vec!["October Menu"]);

    let (_, body) = get_public(&app, "/public/menu/?price__lt=10&name=").await;
    assert_eq!(names(&body).len(), 3);
}

#[tokio::test]
async fn test_unknown_ordering_key_is_rejected() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (status, body) = get_public(&app, "/public/menu/?ordering=price").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_QUERY");
    assert_eq!(body["error"]["field"], "ordering");
}

#[tokio::test]
async fn test_malformed_date_names_the_expression() {
    let app = setup().await;
    let (status, body) = get_public(&app, "/public/menu/?date_added__lt=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "date_added__lt");
}

#[tokio::test]
async fn test_public_list_pagination() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (_, body) = get_public(&app, "/public/menu/?page=2&page_size=2").await;
    assert_eq!(names(&body), vec!["October Menu"]);
}

#[tokio::test]
async fn test_public_detail_includes_full_dishes() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (status, body) = get_public(&app, "/public/menu/1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["url"], "/public/menu/1/");
    assert_eq!(body["data"]["dishes"][0]["price"], "10.01");
    assert_eq!(body["data"]["dishes"][0]["preparation_time"], "00:10:00");

    let (status, _) = get_public(&app, "/public/menu/999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_private_routes_require_token() {
    let app = setup().await;

    let (status, body) = send(&app, Method::GET, "/private/menu/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/private/dishes/", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_private_list_includes_empty_menus() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (status, body) = send(&app, Method::GET, "/private/menu/", Some(&app.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
    assert_eq!(body["data"][3]["dishes"], json!([]));
}

#[tokio::test]
async fn test_login_endpoint() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api-auth/login",
        None,
        Some(json!({"username": "chef", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");

    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    let (status, _) = send(&app, Method::GET, "/private/dishes/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api-auth/login",
        None,
        Some(json!({"username": "chef", "password": "wrong password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_dish() {
    let app = setup().await;
    let before = Utc::now();

    let (status, body) = send(
        &app,
        Method::POST,
        "/private/dishes/",
        Some(&app.token),
        Some(json!({
            "name": "Risotto",
            "description": "Arborio rice, parmesan",
            "price": "9.9",
            "preparation_time": "00:35:00",
            "is_vegan": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let dish = &body["data"];
    assert_eq!(dish["price"], "9.90");
    assert_eq!(dish["preparation_time"], "00:35:00");
    assert_eq!(dish["url"], format!("/private/dishes/{}/", dish["pk"]));

    let modified: DateTime<Utc> = dish["date_modified"].as_str().unwrap().parse().unwrap();
    assert!(modified >= before);
    assert!(modified - before < chrono::Duration::seconds(60));
    assert_eq!(dish["date_added"], dish["date_modified"]);
}

#[tokio::test]
async fn test_invalid_dish_is_rejected() {
    let app = setup().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/private/dishes/",
        Some(&app.token),
        Some(json!({"name": "Soup", "price": "1.234", "preparation_time": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "price");
}

#[tokio::test]
async fn test_undecodable_dish_field_is_named() {
    let app = setup().await;
    let cases = [
        (json!({"name": "Soup", "price": "abc", "preparation_time": "00:10:00"}), "price"),
        (json!({"name": "Soup", "price": "4.50", "preparation_time": "soon"}), "preparation_time"),
        (json!({"price": "4.50", "preparation_time": "00:10:00"}), "name"),
    ];
    for (payload, field) in cases {
        let (status, body) = send(&app, Method::POST, "/private/dishes/", Some(&app.token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], field);
    }
}

#[tokio::test]
async fn test_create_menu_with_new_name() {
    let app = setup().await;
    seed_menus(&app.store).await;
    let payload = json!({
        "name": "Another September Menu",
        "description": "Seasonal dishes",
        "dishes": []
    });

    let before = Utc::now();
    let (status, body) = send(&app, Method::POST, "/private/menu/", Some(&app.token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let menu = &body["data"];
    assert_eq!(menu["name"], "Another September Menu");
    assert_eq!(menu["url"], format!("/private/menu/{}/", menu["pk"]));
    let modified: DateTime<Utc> = menu["date_modified"].as_str().unwrap().parse().unwrap();
    assert!(modified >= before);
    assert!(Utc::now() - modified < chrono::Duration::seconds(60));

    let (status, body) = send(&app, Method::POST, "/private/menu/", Some(&app.token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "name");
}

#[tokio::test]
async fn test_duplicate_menu_name_is_rejected() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/private/menu/",
        Some(&app.token),
        Some(json!({"name": "August Menu", "dishes": [1]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "name");
}

#[tokio::test]
async fn test_menu_with_unknown_dish_is_rejected() {
    let app = setup().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/private/menu/",
        Some(&app.token),
        Some(json!({"name": "Lunch", "dishes": [42]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "dishes");
}

#[tokio::test]
async fn test_patch_menu_keeps_dishes() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/private/menu/3/",
        Some(&app.token),
        Some(json!({"name": "OctoberFEST Menu"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "OctoberFEST Menu");
    assert_eq!(body["data"]["dishes"].as_array().unwrap().len(), 5);
    assert_ne!(body["data"]["date_modified"], body["data"]["date_added"]);
}

#[tokio::test]
async fn test_delete_dish_then_get_is_not_found() {
    let app = setup().await;
    seed_menus(&app.store).await;

    let (status, _) = send(&app, Method::DELETE, "/private/dishes/1/", Some(&app.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/private/dishes/1/", Some(&app.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (_, body) = send(&app, Method::GET, "/private/menu/1/", Some(&app.token), None).await;
    assert_eq!(body["data"]["dishes"], json!([2]));
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = setup().await;
    let (status, _) = get_public(&app, "/public/menu/abc/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
