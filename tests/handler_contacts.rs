mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde_json::{Value, json};
use sqlx::PgPool;

fn contact_body(first_name: &str, email: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Doe",
        "email": email,
        "phone_number": "+380 (50) 123-45-67",
        "birthday": "1990-05-17",
        "additional_data": "met at a conference"
    })
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

/// `days_from_today` days ahead of today, moved into 1992 (a leap year, so
/// every month/day exists).
fn birthday_in(days_from_today: i64) -> NaiveDate {
    (Utc::now().date_naive() + Duration::days(days_from_today))
        .with_year(1992)
        .unwrap()
}

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_contact_success(pool: PgPool) {
    common::create_user(&pool, "owner@example.com", true).await;
    let server = common::make_server(pool);

    let response = server
        .post("/contacts")
        .authorization_bearer(common::access_token("owner@example.com"))
        .json(&contact_body("John", "john@example.com"))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert!(body["id"].is_i64());
    assert_eq!(body["first_name"], "John");
    assert_eq!(body["birthday"], "1990-05-17");
    assert_eq!(body["additional_data"], "met at a conference");
}

#[sqlx::test]
async fn test_create_contact_requires_auth(pool: PgPool) {
    let server = common::make_server(pool);

    server
        .post("/contacts")
        .json(&contact_body("John", "john@example.com"))
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_create_contact_duplicate_email(pool: PgPool) {
    let user_id = common::create_user(&pool, "owner@example.com", true).await;
    common::create_contact(
        &pool,
        user_id,
        "John",
        "Doe",
        "john@example.com",
        common::date(1990, 5, 17),
    )
    .await;
    let server = common::make_server(pool);

    let response = server
        .post("/contacts")
        .authorization_bearer(common::access_token("owner@example.com"))
        .json(&contact_body("Johnny", "JOHN@example.com"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[sqlx::test]
async fn test_same_email_allowed_for_different_owners(pool: PgPool) {
    let other = common::create_user(&pool, "other@example.com", true).await;
    common::create_contact(
        &pool,
        other,
        "John",
        "Doe",
        "john@example.com",
        common::date(1990, 5, 17),
    )
    .await;
    common::create_user(&pool, "owner@example.com", true).await;
    let server = common::make_server(pool);

    server
        .post("/contacts")
        .authorization_bearer(common::access_token("owner@example.com"))
        .json(&contact_body("John", "john@example.com"))
        .await
        .assert_status(StatusCode::CREATED);
}

#[sqlx::test]
async fn test_create_contact_validation(pool: PgPool) {
    common::create_user(&pool, "owner@example.com", true).await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    let mut bad_phone = contact_body("John", "john@example.com");
    bad_phone["phone_number"] = json!("call me maybe");

    let response = server
        .post("/contacts")
        .authorization_bearer(&token)
        .json(&bad_phone)
        .await;
    response.assert_status_bad_request();
    assert!(response.json::<Value>()["error"]["details"]["phone_number"].is_array());

    server
        .post("/contacts")
        .authorization_bearer(&token)
        .json(&contact_body("John", "not-an-email"))
        .await
        .assert_status_bad_request();
}

#[sqlx::test]
async fn test_create_contact_rejects_whitespace_only_fields(pool: PgPool) {
    common::create_user(&pool, "owner@example.com", true).await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    let mut blank_name = contact_body("John", "john@example.com");
    blank_name["first_name"] = json!("   ");

    let response = server
        .post("/contacts")
        .authorization_bearer(&token)
        .json(&blank_name)
        .await;
    response.assert_status_bad_request();
    assert!(response.json::<Value>()["error"]["details"]["first_name"].is_array());

    let mut blank_phone = contact_body("John", "john@example.com");
    blank_phone["phone_number"] = json!("     ");

    let response = server
        .post("/contacts")
        .authorization_bearer(&token)
        .json(&blank_phone)
        .await;
    response.assert_status_bad_request();
    assert!(response.json::<Value>()["error"]["details"]["phone_number"].is_array());

    let contacts = server
        .get("/contacts")
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(contacts, json!([]));
}

#[sqlx::test]
async fn test_create_contact_rate_limited(pool: PgPool) {
    common::create_user(&pool, "owner@example.com", true).await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    // test_config allows 5 creations per minute
    for i in 0..5 {
        server
            .post("/contacts")
            .authorization_bearer(&token)
            .json(&contact_body("John", &format!("john{i}@example.com")))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server
        .post("/contacts")
        .authorization_bearer(&token)
        .json(&contact_body("John", "john5@example.com"))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<Value>()["error"]["code"], "rate_limited");
}

// ─── READ ────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_contacts_pagination(pool: PgPool) {
    let user_id = common::create_user(&pool, "owner@example.com", true).await;
    let mut created = Vec::new();
    for i in 0..3 {
        created.push(
            common::create_contact(
                &pool,
                user_id,
                "John",
                "Doe",
                &format!("john{i}@example.com"),
                common::date(1990, 1, 1),
            )
            .await,
        );
    }
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    let all = server.get("/contacts").authorization_bearer(&token).await;
    all.assert_status_ok();
    assert_eq!(ids(&all.json::<Value>()), created);

    let page = server
        .get("/contacts")
        .authorization_bearer(&token)
        .add_query_param("skip", 1)
        .add_query_param("limit", 1)
        .await;
    page.assert_status_ok();
    assert_eq!(ids(&page.json::<Value>()), vec![created[1]]);

    server
        .get("/contacts")
        .authorization_bearer(&token)
        .add_query_param("limit", 0)
        .await
        .assert_status_bad_request();
}

#[sqlx::test]
async fn test_contacts_are_isolated_between_owners(pool: PgPool) {
    let other = common::create_user(&pool, "other@example.com", true).await;
    let foreign = common::create_contact(
        &pool,
        other,
        "Jane",
        "Roe",
        "jane@example.com",
        common::date(1985, 3, 3),
    )
    .await;
    common::create_user(&pool, "owner@example.com", true).await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    let list = server.get("/contacts").authorization_bearer(&token).await;
    assert!(ids(&list.json::<Value>()).is_empty());

    let path = format!("/contacts/{foreign}");
    server
        .get(&path)
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
    server
        .put(&path)
        .authorization_bearer(&token)
        .json(&json!({ "first_name": "Hacked" }))
        .await
        .assert_status_not_found();
    server
        .delete(&path)
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_get_missing_contact(pool: PgPool) {
    common::create_user(&pool, "owner@example.com", true).await;
    let server = common::make_server(pool);

    let response = server
        .get("/contacts/999999")
        .authorization_bearer(common::access_token("owner@example.com"))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["message"], "Contact not found");
}

// ─── UPDATE / DELETE ─────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_update_contact_ignores_blank_fields(pool: PgPool) {
    let user_id = common::create_user(&pool, "owner@example.com", true).await;
    let id = common::create_contact(
        &pool,
        user_id,
        "John",
        "Doe",
        "john@example.com",
        common::date(1990, 5, 17),
    )
    .await;
    let server = common::make_server(pool);

    let response = server
        .put(&format!("/contacts/{id}"))
        .authorization_bearer(common::access_token("owner@example.com"))
        .json(&json!({ "first_name": "", "last_name": "Smith", "birthday": "1991-06-01" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["first_name"], "John");
    assert_eq!(body["last_name"], "Smith");
    assert_eq!(body["birthday"], "1991-06-01");
    assert_eq!(body["email"], "john@example.com");
}

#[sqlx::test]
async fn test_update_contact_email_conflict(pool: PgPool) {
    let user_id = common::create_user(&pool, "owner@example.com", true).await;
    common::create_contact(
        &pool,
        user_id,
        "John",
        "Doe",
        "john@example.com",
        common::date(1990, 5, 17),
    )
    .await;
    let jane = common::create_contact(
        &pool,
        user_id,
        "Jane",
        "Doe",
        "jane@example.com",
        common::date(1990, 5, 17),
    )
    .await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    server
        .put(&format!("/contacts/{jane}"))
        .authorization_bearer(&token)
        .json(&json!({ "email": "john@example.com" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    // Re-submitting the contact's own address is not a conflict.
    server
        .put(&format!("/contacts/{jane}"))
        .authorization_bearer(&token)
        .json(&json!({ "email": "jane@example.com" }))
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_delete_contact(pool: PgPool) {
    let user_id = common::create_user(&pool, "owner@example.com", true).await;
    let id = common::create_contact(
        &pool,
        user_id,
        "John",
        "Doe",
        "john@example.com",
        common::date(1990, 5, 17),
    )
    .await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");
    let path = format!("/contacts/{id}");

    let response = server.delete(&path).authorization_bearer(&token).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], id);

    server
        .get(&path)
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}

// ─── SEARCH / BIRTHDAYS ──────────────────────────────────────────────────────

#[sqlx::test]
async fn test_search_contacts(pool: PgPool) {
    let user_id = common::create_user(&pool, "owner@example.com", true).await;
    let john = common::create_contact(
        &pool,
        user_id,
        "John",
        "Doe",
        "john@example.com",
        common::date(1990, 1, 1),
    )
    .await;
    let jane = common::create_contact(
        &pool,
        user_id,
        "Jane",
        "Smith",
        "jane@work.org",
        common::date(1990, 1, 1),
    )
    .await;
    let percent = common::create_contact(
        &pool,
        user_id,
        "Fifty%",
        "Off",
        "sale@example.com",
        common::date(1990, 1, 1),
    )
    .await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    let search = |query: &'static str| {
        server
            .get("/contacts/search")
            .authorization_bearer(&token)
            .add_query_param("query", query)
    };

    assert_eq!(ids(&search("JOHN").await.json::<Value>()), vec![john]);
    assert_eq!(ids(&search("smi").await.json::<Value>()), vec![jane]);
    assert_eq!(ids(&search("work.org").await.json::<Value>()), vec![jane]);
    assert_eq!(ids(&search("%").await.json::<Value>()), vec![percent]);
    assert!(ids(&search("   ").await.json::<Value>()).is_empty());
}

#[sqlx::test]
async fn test_upcoming_birthdays(pool: PgPool) {
    let user_id = common::create_user(&pool, "owner@example.com", true).await;
    let today = common::create_contact(
        &pool,
        user_id,
        "Today",
        "Doe",
        "today@example.com",
        birthday_in(0),
    )
    .await;
    let soon = common::create_contact(
        &pool,
        user_id,
        "Soon",
        "Doe",
        "soon@example.com",
        birthday_in(3),
    )
    .await;
    let later = common::create_contact(
        &pool,
        user_id,
        "Later",
        "Doe",
        "later@example.com",
        birthday_in(30),
    )
    .await;
    common::create_contact(
        &pool,
        user_id,
        "Past",
        "Doe",
        "past@example.com",
        birthday_in(-3),
    )
    .await;
    let server = common::make_server(pool);
    let token = common::access_token("owner@example.com");

    let week = server
        .get("/contacts/birthdays")
        .authorization_bearer(&token)
        .await;
    week.assert_status_ok();
    assert_eq!(ids(&week.json::<Value>()), vec![today, soon]);

    let month = server
        .get("/contacts/birthdays")
        .authorization_bearer(&token)
        .add_query_param("days", 45)
        .await;
    assert_eq!(ids(&month.json::<Value>()), vec![today, soon, later]);

    server
        .get("/contacts/birthdays")
        .authorization_bearer(&token)
        .add_query_param("days", 400)
        .await
        .assert_status_bad_request();
}
