//! End-to-end HTTP flow against an in-process server.
//!
//! Requires `DATABASE_URL`; returns early when it is not set.

mod common;

use common::*;
use serde_json::{json, Value};
use seller_backoffice::transport;

async fn spawn_server() -> Option<(String, sqlx::PgPool)> {
    let db = test_db().await?;
    let pool = db.pool().clone();
    let router = transport::http::create_router(transport::http::AppState::new(db));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Some((format!("http://{}", addr), pool))
}

fn profile_json(status_id: i32, name: &str) -> Value {
    json!({
        "seller_status_id": status_id,
        "seller_type_id": 1,
        "name_kr": name,
        "name_en": "http shop",
        "site_url": "https://shop.example.com",
        "center_number": "1588-0000",
        "weekday_start_time": "10:00:00",
        "weekday_end_time": "19:00:00"
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_seller_http_flow() -> Result<(), Box<dyn std::error::Error>> {
    let Some((base_url, pool)) = spawn_server().await else {
        return Ok(());
    };
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let operator = create_account(&pool).await;
    let login = unique("http");
    let name = unique("상점");

    let health = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status(), 200);

    // --- register ---
    let resp = client
        .post(format!("{}/sellers", base_url))
        .json(&json!({
            "login_id": login,
            "profile": profile_json(2, &name),
            "managers": [{ "name": "Kim", "contact_number": "010-1234-5678", "email": null, "ranking": 1 }]
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let body = resp.json::<Value>().await?;
    assert!(body["success"].as_bool().unwrap_or(false));
    let seller_id = body["data"]["seller_id"].as_i64().unwrap();
    let v1 = body["data"]["version_id"].as_i64().unwrap();

    // --- read current ---
    let body = client
        .get(format!("{}/sellers/{}", base_url, seller_id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["version"]["version_id"], json!(v1));
    assert_eq!(body["data"]["version"]["seller_status_name"], json!("Pending onboarding"));
    assert_eq!(body["data"]["version"]["name_kr"], json!(name));
    assert_eq!(body["data"]["version"]["weekday_start_time"], json!("10:00:00"));
    assert_eq!(body["data"]["managers"][0]["name"], json!("Kim"));
    assert_eq!(
        body["data"]["actions"],
        json!(["Approve onboarding", "Reject onboarding"])
    );

    // --- revise: header required ---
    let revise = json!({
        "previous_version_id": v1,
        "profile": profile_json(2, &name),
        "managers": []
    });
    let resp = client
        .put(format!("{}/sellers/{}", base_url, seller_id))
        .json(&revise)
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    // unknown operator account
    let resp = client
        .put(format!("{}/sellers/{}", base_url, seller_id))
        .header("x-account-no", (i64::MAX - 5).to_string())
        .json(&revise)
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .put(format!("{}/sellers/{}", base_url, seller_id))
        .header("x-account-no", operator.to_string())
        .json(&revise)
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let v2 = resp.json::<Value>().await?["data"]["version_id"].as_i64().unwrap();
    assert!(v2 > v1);

    // same base version again -> conflict
    let resp = client
        .put(format!("{}/sellers/{}", base_url, seller_id))
        .header("x-account-no", operator.to_string())
        .json(&revise)
        .send()
        .await?;
    assert_eq!(resp.status(), 409);

    // malformed body
    let resp = client
        .put(format!("{}/sellers/{}", base_url, seller_id))
        .header("x-account-no", operator.to_string())
        .header("content-type", "application/json")
        .body("{\"previous_version_id\": ")
        .send()
        .await?;
    assert_eq!(resp.status(), 422);

    // --- status action ---
    let resp = client
        .post(format!("{}/sellers/{}/actions", base_url, seller_id))
        .header("x-account-no", operator.to_string())
        .json(&json!({ "action": "Lift suspension" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/sellers/{}/actions", base_url, seller_id))
        .header("x-account-no", operator.to_string())
        .json(&json!({ "action": "Request suspension" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["data"]["status"], json!("Suspended"));

    // --- versions ---
    let body = client
        .get(format!("{}/sellers/{}/versions", base_url, seller_id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let spans = body["data"].as_array().unwrap();
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0]["close_time"], spans[1]["start_time"]);
    assert_eq!(spans[1]["close_time"], spans[2]["start_time"]);

    // --- listing ---
    let body = client
        .get(format!("{}/sellers", base_url))
        .query(&[("login_id", login.as_str()), ("limit", "-3"), ("name_en", "")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["seller_status"], json!("Suspended"));
    assert_eq!(
        rows[0]["actions"],
        json!(["Lift suspension", "Process termination request"])
    );

    // last representable day still answers
    let resp = client
        .get(format!("{}/sellers", base_url))
        .query(&[("login_id", login.as_str()), ("created_to", "+262142-12-31")])
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await?["data"].as_array().map(Vec::len), Some(1));

    let resp = client
        .get(format!("{}/sellers?created_from=not-a-date", base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), 422);

    // --- search ---
    let body = client
        .get(format!("{}/sellers/search", base_url))
        .query(&[("keyword", name.as_str())])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"][0]["seller_id"], json!(seller_id));

    let resp = client
        .get(format!("{}/sellers/search", base_url))
        .query(&[("keyword", " ")])
        .send()
        .await?;
    assert_eq!(resp.status(), 400);

    // --- not found ---
    let resp = client
        .get(format!("{}/sellers/{}", base_url, i64::MAX - 1))
        .send()
        .await?;
    assert_eq!(resp.status(), 404);

    Ok(())
}
