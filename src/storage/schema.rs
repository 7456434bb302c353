//! Relational schema for the seller back office and its seeded lookup rows.

use crate::domain::seller::{SellerStatus, OPEN_CLOSE_TIME_SQL};
use sqlx::PgPool;

/// Serializes concurrent bootstraps (several instances, parallel tests).
const SCHEMA_LOCK_ID: i64 = 5_120_001;

/// `(product_sort_no, name)`
pub const PRODUCT_SORTS: &[(i32, &str)] = &[(1, "Fashion"), (2, "Beauty")];

/// `(seller_type_no, name, product_sort_id)`
pub const SELLER_TYPES: &[(i32, &str, i32)] = &[
    (1, "Shopping mall", 1),
    (2, "Market", 1),
    (3, "Road shop", 1),
    (4, "Designer brand", 1),
    (5, "General brand", 1),
    (6, "National brand", 1),
    (7, "Beauty", 2),
];

fn table_statements() -> Vec<String> {
    vec![
        "CREATE TABLE IF NOT EXISTS accounts (
            account_no BIGSERIAL PRIMARY KEY,
            login_id VARCHAR(45) NOT NULL UNIQUE,
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS seller_accounts (
            seller_account_no BIGSERIAL PRIMARY KEY,
            account_id BIGINT NOT NULL REFERENCES accounts(account_no),
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS product_sorts (
            product_sort_no INTEGER PRIMARY KEY,
            name VARCHAR(45) NOT NULL
        )"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS seller_statuses (
            status_no INTEGER PRIMARY KEY,
            name VARCHAR(45) NOT NULL UNIQUE
        )"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS seller_types (
            seller_type_no INTEGER PRIMARY KEY,
            name VARCHAR(45) NOT NULL,
            product_sort_id INTEGER NOT NULL REFERENCES product_sorts(product_sort_no)
        )"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS app_users (
            app_user_no BIGSERIAL PRIMARY KEY,
            app_id VARCHAR(45) NOT NULL UNIQUE,
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE
        )"
        .to_string(),
        format!(
            "CREATE TABLE IF NOT EXISTS seller_infos (
                seller_info_no BIGSERIAL PRIMARY KEY,
                seller_account_id BIGINT NOT NULL REFERENCES seller_accounts(seller_account_no),
                seller_status_id INTEGER NOT NULL REFERENCES seller_statuses(status_no),
                seller_type_id INTEGER NOT NULL REFERENCES seller_types(seller_type_no),
                product_sort_id INTEGER NOT NULL REFERENCES product_sorts(product_sort_no),
                app_user_id BIGINT REFERENCES app_users(app_user_no),
                name_kr VARCHAR(45) NOT NULL,
                name_en VARCHAR(45) NOT NULL,
                profile_image_url VARCHAR(500),
                ceo_name VARCHAR(45),
                company_name VARCHAR(45),
                business_number VARCHAR(45),
                certificate_image_url VARCHAR(500),
                online_business_number VARCHAR(45),
                online_business_image_url VARCHAR(500),
                background_image_url VARCHAR(500),
                short_description VARCHAR(200),
                long_description TEXT,
                site_url VARCHAR(200) NOT NULL,
                kakao_id VARCHAR(45),
                insta_id VARCHAR(45),
                center_number VARCHAR(45) NOT NULL,
                zip_code VARCHAR(10),
                address VARCHAR(200),
                detail_address VARCHAR(200),
                weekday_start_time TIME,
                weekday_end_time TIME,
                weekend_start_time TIME,
                weekend_end_time TIME,
                bank_name VARCHAR(45),
                bank_holder_name VARCHAR(45),
                account_number VARCHAR(45),
                modifier BIGINT REFERENCES accounts(account_no),
                start_time TIMESTAMPTZ NOT NULL DEFAULT now(),
                close_time TIMESTAMPTZ NOT NULL DEFAULT {sentinel},
                updated_at TIMESTAMPTZ
            )",
            sentinel = OPEN_CLOSE_TIME_SQL
        ),
        // Tables created before the modifier reference existed only gain it for new rows.
        "DO $$
         BEGIN
             IF NOT EXISTS (
                 SELECT 1 FROM pg_constraint WHERE conname = 'seller_infos_modifier_fkey'
             ) THEN
                 ALTER TABLE seller_infos
                     ADD CONSTRAINT seller_infos_modifier_fkey
                     FOREIGN KEY (modifier) REFERENCES accounts(account_no) NOT VALID;
             END IF;
         END $$"
            .to_string(),
        "CREATE INDEX IF NOT EXISTS seller_infos_seller_close_idx
            ON seller_infos (seller_account_id, close_time)"
            .to_string(),
        "CREATE TABLE IF NOT EXISTS manager_infos (
            manager_info_no BIGSERIAL PRIMARY KEY,
            seller_info_id BIGINT NOT NULL REFERENCES seller_infos(seller_info_no),
            name VARCHAR(45),
            contact_number VARCHAR(45) NOT NULL,
            email VARCHAR(100),
            ranking SMALLINT NOT NULL CHECK (ranking BETWEEN 1 AND 3),
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            UNIQUE (seller_info_id, ranking)
        )"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS seller_status_change_histories (
            history_no BIGSERIAL PRIMARY KEY,
            seller_account_id BIGINT NOT NULL REFERENCES seller_accounts(seller_account_no),
            seller_info_id BIGINT NOT NULL REFERENCES seller_infos(seller_info_no),
            changed_time TIMESTAMPTZ NOT NULL,
            seller_status_id INTEGER NOT NULL REFERENCES seller_statuses(status_no),
            modifier BIGINT NOT NULL REFERENCES accounts(account_no)
        )"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS products (
            product_no BIGSERIAL PRIMARY KEY,
            seller_account_id BIGINT NOT NULL REFERENCES seller_accounts(seller_account_no),
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"
        .to_string(),
    ]
}

/// Creates missing tables and seeds lookup rows. Safe to run repeatedly.
pub async fn apply(pool: &PgPool) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_ID)
        .execute(&mut *tx)
        .await?;

    for statement in table_statements() {
        sqlx::query(&statement).execute(&mut *tx).await?;
    }

    for (no, name) in PRODUCT_SORTS {
        sqlx::query(
            "INSERT INTO product_sorts (product_sort_no, name) VALUES ($1, $2)
             ON CONFLICT (product_sort_no) DO NOTHING",
        )
        .bind(*no)
        .bind(*name)
        .execute(&mut *tx)
        .await?;
    }

    for status in SellerStatus::ALL {
        sqlx::query(
            "INSERT INTO seller_statuses (status_no, name) VALUES ($1, $2)
             ON CONFLICT (status_no) DO NOTHING",
        )
        .bind(status.id())
        .bind(status.name())
        .execute(&mut *tx)
        .await?;
    }

    for (no, name, sort) in SELLER_TYPES {
        sqlx::query(
            "INSERT INTO seller_types (seller_type_no, name, product_sort_id) VALUES ($1, $2, $3)
             ON CONFLICT (seller_type_no) DO NOTHING",
        )
        .bind(*no)
        .bind(*name)
        .bind(*sort)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("Seller schema is up to date");
    Ok(())
}

/// Number of seeded status rows present; used by readiness checks.
pub async fn seeded_status_count(pool: &PgPool) -> anyhow::Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seller_statuses WHERE status_no = ANY($1)")
        .bind(SellerStatus::ALL.iter().map(|s| s.id()).collect::<Vec<i32>>())
        .fetch_one(pool)
        .await?;
    Ok(count)
}
