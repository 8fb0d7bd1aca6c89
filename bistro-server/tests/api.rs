//! End-to-end tests against the real router and an in-memory database

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use bistro_server::auth::{Claims, IdentityPayload, JwtConfig, JwtService};
use bistro_server::core::DbConfig;
use bistro_server::db::DbService;
use bistro_server::db::repository::UserRepository;
use bistro_server::{Config, ServerState, build_app};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

async fn setup() -> (Router, ServerState) {
    let config = Config {
        http_port: 0,
        db: DbConfig::memory(),
        jwt: JwtConfig::new(SECRET),
        environment: "test".into(),
    };
    let db = DbService::memory().await.expect("in-memory database").db;
    let state = ServerState::new(config, db);
    (build_app(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn token_for(state: &ServerState, email: &str) -> String {
    state
        .get_jwt_service()
        .generate_token(IdentityPayload::new(email))
        .unwrap()
}

async fn sign_in(app: &Router, email: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({
            "name": email,
            "email": email,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "updatedLocal": "1/1/2024"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn make_admin_directly(state: &ServerState, email: &str) {
    state
        .db
        .query("UPDATE users SET role = 'admin' WHERE email = $email")
        .bind(("email", email.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
}

async fn user_count(app: &Router, admin_token: &str) -> usize {
    let (status, body) = send(app, Method::GET, "/users", Some(admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().len()
}

// ========== Liveness ==========

#[tokio::test]
async fn root_reports_running() {
    let (app, _) = setup().await;
    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Server is running".into()));
}

#[tokio::test]
async fn health_checks_database() {
    let (app, _) = setup().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (app, _) = setup().await;
    let request = Request::builder()
        .uri("/menu")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

// ========== Token issuance ==========

#[tokio::test]
async fn jwt_carries_email_and_one_hour_expiry() {
    let (app, state) = setup().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/jwt",
        None,
        Some(json!({"email": "a@x.com", "name": "Alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let claims = state.get_jwt_service().validate_token(token).unwrap();
    let now = chrono::Utc::now().timestamp();

    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.extra["name"], "Alice");
    assert!((now + 3590..=now + 3600).contains(&claims.exp));
}

#[tokio::test]
async fn jwt_without_email_is_rejected() {
    let (app, _) = setup().await;
    let (status, body) = send(&app, Method::POST, "/jwt", None, Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
    assert!(body["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn malformed_bodies_use_error_envelope() {
    let (app, _) = setup().await;

    let (status, body) = send(&app, Method::POST, "/users", None, Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::POST, "/carts", None, Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
}

// ========== Authentication / authorization ==========

#[tokio::test]
async fn admin_route_without_token_is_401_and_does_not_mutate() {
    let (app, state) = setup().await;
    let created = sign_in(&app, "victim@x.com").await;
    let id = created["insertedId"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{id}"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unauthorized access");

    sign_in(&app, "boss@x.com").await;
    make_admin_directly(&state, "boss@x.com").await;
    let admin = token_for(&state, "boss@x.com");
    assert_eq!(user_count(&app, &admin).await, 2);
}

#[tokio::test]
async fn garbage_and_foreign_tokens_are_401() {
    let (app, _) = setup().await;

    let (status, _) = send(&app, Method::GET, "/users", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = JwtService::with_config(JwtConfig::new("some-other-secret"))
        .generate_token(IdentityPayload::new("a@x.com"))
        .unwrap();
    let (status, body) = send(&app, Method::GET, "/users", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unauthorized access");
}

#[tokio::test]
async fn expired_token_is_401() {
    let (app, _) = setup().await;
    let mut config = JwtConfig::new(SECRET);
    config.expiration_minutes = -10;
    let expired = JwtService::with_config(config)
        .generate_token(IdentityPayload::new("a@x.com"))
        .unwrap();

    let (status, body) = send(&app, Method::GET, "/users", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn token_expired_seconds_ago_is_401() {
    let (app, state) = setup().await;
    sign_in(&app, "a@x.com").await;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        email: "a@x.com".into(),
        extra: Default::default(),
        exp: now - 30,
        iat: now - 3630,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) =
        send(&app, Method::GET, "/users/admin/a@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1003);

    // Same identity with a live token still works
    let live = token_for(&state, "a@x.com");
    let (status, _) = send(&app, Method::GET, "/users/admin/a@x.com", Some(&live), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bearer_scheme_is_case_insensitive() {
    let (app, state) = setup().await;
    let token = token_for(&state, "a@x.com");

    let request = Request::builder()
        .uri("/carts?email=a@x.com")
        .header(header::AUTHORIZATION, format!("bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_route_with_non_admin_token_is_403() {
    let (app, state) = setup().await;
    sign_in(&app, "a@x.com").await;
    let token = token_for(&state, "a@x.com");

    let (status, body) = send(&app, Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "forbidden access");

    // A token for an email with no user record is no better
    let ghost = token_for(&state, "ghost@x.com");
    let (status, _) = send(&app, Method::GET, "/users", Some(&ghost), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_list_promote_and_delete() {
    let (app, state) = setup().await;
    sign_in(&app, "boss@x.com").await;
    make_admin_directly(&state, "boss@x.com").await;
    let admin = token_for(&state, "boss@x.com");

    let created = sign_in(&app, "cook@x.com").await;
    let id = created["insertedId"].as_str().unwrap().to_string();

    let (status, users) = send(&app, Method::GET, "/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0]["_id"].as_str().unwrap().starts_with("users:"));

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/admin/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"acknowledged": true, "matchedCount": 1, "modifiedCount": 1, "upsertedId": null})
    );

    // The promoted user now passes the role guard on the very next request
    let cook = token_for(&state, "cook@x.com");
    let (status, body) = send(
        &app,
        Method::GET,
        "/users/admin/cook@x.com",
        Some(&cook),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"admin": true}));

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"acknowledged": true, "deletedCount": 1}));
    assert_eq!(user_count(&app, &admin).await, 1);
}

#[tokio::test]
async fn admin_status_of_another_email_is_403() {
    let (app, state) = setup().await;
    sign_in(&app, "a@x.com").await;
    let token = token_for(&state, "a@x.com");

    let (status, body) =
        send(&app, Method::GET, "/users/admin/a@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"admin": false}));

    let (status, body) =
        send(&app, Method::GET, "/users/admin/b@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "forbidden access");
}

// ========== User upsert ==========

#[tokio::test]
async fn repeated_sign_in_reports_existing_user() {
    let (app, state) = setup().await;

    let first = sign_in(&app, "a@x.com").await;
    assert_eq!(first["acknowledged"], true);
    assert!(first["insertedId"].as_str().unwrap().starts_with("users:"));

    for _ in 0..2 {
        let again = sign_in(&app, "a@x.com").await;
        let items = again.as_array().expect("two-element array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], json!({"message": "User already exists", "insertedId": null}));
        assert_eq!(items[1]["matchedCount"], 1);
    }

    sign_in(&app, "boss@x.com").await;
    make_admin_directly(&state, "boss@x.com").await;
    let admin = token_for(&state, "boss@x.com");
    assert_eq!(user_count(&app, &admin).await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_sign_ins_settle_without_errors() {
    let (app, state) = setup().await;

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            send(
                &app,
                Method::POST,
                "/users",
                None,
                Some(json!({"email": "race@x.com", "updatedLocal": "now"})),
            )
            .await
        }));
    }

    let mut inserted = 0;
    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "body: {body}");
        if body.is_object() {
            assert!(body["insertedId"].as_str().unwrap().starts_with("users:"));
            inserted += 1;
        } else {
            assert_eq!(body[0]["message"], "User already exists");
            assert_eq!(body[1]["matchedCount"], 1);
        }
    }
    assert_eq!(inserted, 1);

    let users = UserRepository::new(state.db.clone()).find_all().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn sign_in_cannot_self_promote() {
    let (app, state) = setup().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({"email": "m@x.com", "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = token_for(&state, "m@x.com");
    let (status, _) = send(&app, Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ========== Carts ==========

#[tokio::test]
async fn cart_add_list_remove() {
    let (app, state) = setup().await;
    let token = token_for(&state, "a@x.com");

    let (status, inserted) = send(
        &app,
        Method::POST,
        "/carts",
        None,
        Some(json!({
            "menuId": "menu:soup",
            "email": "a@x.com",
            "name": "Soup",
            "price": 4.5,
            "quantity": 3,
            "category": "soup"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = inserted["insertedId"].as_str().unwrap().to_string();

    send(
        &app,
        Method::POST,
        "/carts",
        None,
        Some(json!({"menuId": "menu:pizza", "email": "b@x.com", "name": "Pizza"})),
    )
    .await;

    let (status, items) = send(&app, Method::GET, "/carts?email=a@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["_id"], id.as_str());
    assert_eq!(items[0]["menuId"], "menu:soup");
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[0]["category"], "soup");
    assert!(items[0].get("id").is_none());

    let (status, body) = send(&app, Method::DELETE, &format!("/carts/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"acknowledged": true, "deletedCount": 1}));

    let (_, items) = send(&app, Method::GET, "/carts?email=a@x.com", Some(&token), None).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cart_of_another_email_is_forbidden() {
    let (app, state) = setup().await;
    let token = token_for(&state, "a@x.com");

    let (status, _) = send(&app, Method::GET, "/carts?email=a@x.com", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/carts?email=b@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "forbidden access");

    let (status, _) = send(&app, Method::GET, "/carts", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_id_of_another_table_is_404() {
    let (app, _) = setup().await;
    let (status, _) = send(&app, Method::DELETE, "/carts/users:someone", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ========== Public reads and collection dump ==========

#[tokio::test]
async fn menu_and_reviews_are_public() {
    let (app, state) = setup().await;
    state
        .db
        .query("CREATE menu:soup SET name = 'Soup', recipe = 'Hot', category = 'soup', price = 4.5")
        .query("CREATE reviews:r1 SET name = 'Ann', details = 'Great', rating = 5")
        .await
        .unwrap()
        .check()
        .unwrap();

    let (status, menu) = send(&app, Method::GET, "/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu[0]["_id"], "menu:soup");
    assert_eq!(menu[0]["price"], 4.5);

    let (status, reviews) = send(&app, Method::GET, "/reviews", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews[0]["rating"], 5.0);
}

#[tokio::test]
async fn menu_returns_documents_as_stored() {
    let (app, state) = setup().await;
    state
        .db
        .query("CREATE menu:a SET name = 'Soup', tags = ['hot', 'vegan'], legacyId = 'L-7'")
        .query("CREATE menu:b SET name = 'Salad', price = '12'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let (status, menu) = send(&app, Method::GET, "/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let menu = menu.as_array().unwrap();
    assert_eq!(menu.len(), 2);

    let soup = menu.iter().find(|m| m["_id"] == "menu:a").unwrap();
    assert_eq!(soup["tags"], json!(["hot", "vegan"]));
    assert_eq!(soup["legacyId"], "L-7");

    let salad = menu.iter().find(|m| m["_id"] == "menu:b").unwrap();
    assert_eq!(salad["price"], "12");
}

#[tokio::test]
async fn collection_dump_applies_per_collection_guards() {
    let (app, state) = setup().await;
    sign_in(&app, "a@x.com").await;
    sign_in(&app, "boss@x.com").await;
    make_admin_directly(&state, "boss@x.com").await;
    let user = token_for(&state, "a@x.com");
    let admin = token_for(&state, "boss@x.com");

    let (status, body) = send(&app, Method::GET, "/m?c=menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    let (status, _) = send(&app, Method::GET, "/m?c=users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/m?c=users", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/m?c=users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, "/m?c=secrets", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/m", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
