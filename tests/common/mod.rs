#![allow(dead_code)]

use seller_backoffice::domain::seller::{NewManager, ProfileFields, SellerId, SellerProfile};
use seller_backoffice::DatabaseService;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Connects to `DATABASE_URL` and bootstraps the schema. `None` (with a notice)
/// when no database is configured.
pub async fn test_db() -> Option<DatabaseService> {
    dotenv::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };
    let db = DatabaseService::connect(&url, 5)
        .await
        .expect("connect to DATABASE_URL");
    db.apply_schema().await.expect("apply schema");
    Some(db)
}

/// Identifier unique across test runs and parallel tests.
pub fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}{}{}", prefix, nanos % 1_000_000_000_000, n)
}

pub fn profile(status_id: i32, name: &str) -> SellerProfile {
    SellerProfile {
        seller_status_id: status_id,
        seller_type_id: 1,
        app_user_handle: None,
        fields: ProfileFields {
            name_kr: Some(name.to_string()),
            name_en: Some(format!("{} en", name)),
            site_url: Some("https://shop.example.com".into()),
            center_number: Some("02-000-0000".into()),
            ..Default::default()
        },
    }
}

pub fn manager(ranking: i16, name: &str, contact_number: &str) -> NewManager {
    NewManager {
        name: Some(name.to_string()),
        contact_number: contact_number.to_string(),
        email: Some(format!("{}@example.com", ranking)),
        ranking,
    }
}

/// Operator account usable as a modifier.
pub async fn create_account(pool: &PgPool) -> i64 {
    sqlx::query_scalar("INSERT INTO accounts (login_id) VALUES ($1) RETURNING account_no")
        .bind(unique("op"))
        .fetch_one(pool)
        .await
        .expect("insert account")
}

/// Seller identity without any version.
pub async fn create_bare_seller(pool: &PgPool) -> SellerId {
    let account_no = create_account(pool).await;
    sqlx::query_scalar(
        "INSERT INTO seller_accounts (account_id) VALUES ($1) RETURNING seller_account_no",
    )
    .bind(account_no)
    .fetch_one(pool)
    .await
    .expect("insert seller account")
}

pub async fn create_app_user(pool: &PgPool) -> String {
    let handle = unique("app");
    sqlx::query("INSERT INTO app_users (app_id) VALUES ($1)")
        .bind(&handle)
        .execute(pool)
        .await
        .expect("insert app user");
    handle
}

pub async fn version_count(pool: &PgPool, seller_id: SellerId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM seller_infos WHERE seller_account_id = $1")
        .bind(seller_id)
        .fetch_one(pool)
        .await
        .expect("count versions")
}

pub async fn history_count(pool: &PgPool, seller_id: SellerId) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM seller_status_change_histories WHERE seller_account_id = $1",
    )
    .bind(seller_id)
    .fetch_one(pool)
    .await
    .expect("count status changes")
}

pub async fn manager_count(pool: &PgPool, seller_id: SellerId) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM manager_infos m
         INNER JOIN seller_infos si ON si.seller_info_no = m.seller_info_id
         WHERE si.seller_account_id = $1",
    )
    .bind(seller_id)
    .fetch_one(pool)
    .await
    .expect("count managers")
}

/// Makes every status-log insert for `seller_id` fail until
/// [`allow_status_log_for`] drops the trigger again.
pub async fn reject_status_log_for(pool: &PgPool, seller_id: SellerId) {
    let function = format!(
        "CREATE OR REPLACE FUNCTION reject_status_log_{id}() RETURNS trigger
         LANGUAGE plpgsql AS $$
         BEGIN
             IF NEW.seller_account_id = {id} THEN
                 RAISE EXCEPTION 'status log rejected for seller {id}';
             END IF;
             RETURN NEW;
         END $$",
        id = seller_id
    );
    let trigger = format!(
        "CREATE TRIGGER reject_status_log_{id}
         BEFORE INSERT ON seller_status_change_histories
         FOR EACH ROW EXECUTE FUNCTION reject_status_log_{id}()",
        id = seller_id
    );
    for statement in [function, trigger] {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .expect("install status log trigger");
    }
}

pub async fn allow_status_log_for(pool: &PgPool, seller_id: SellerId) {
    let statements = [
        format!(
            "DROP TRIGGER IF EXISTS reject_status_log_{id} ON seller_status_change_histories",
            id = seller_id
        ),
        format!("DROP FUNCTION IF EXISTS reject_status_log_{id}()", id = seller_id),
    ];
    for statement in statements {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .expect("drop status log trigger");
    }
}
