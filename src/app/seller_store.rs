//! The seller store.
//!
//! Seller profiles are versioned: writes never overwrite a `seller_infos` row. A
//! revision inserts the new version and its managers, then retires the previous
//! version by copying the new row's `start_time` into its `close_time`, and finally
//! logs a status change when the status moved. All of it happens in one
//! transaction; any failure rolls the whole revision back.

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::seller::{
    actions_for_status_name, contains_pattern, open_close_time, validate_managers, AccountId,
    ManagerInfo, NameMatch, NewManager, Page, SellerAction, SellerDetail, SellerId,
    SellerInfoVersion, SellerListFilter, SellerProfile, SellerStatus, SellerSummary,
    SellerTypeOption, StatusChange, VersionId, VersionSpan,
};
use crate::storage::list_query::build_listing_query;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};

/// Profile columns shared by `seller_infos` inserts, copies and reads, in bind order.
const PROFILE_COLUMNS: &str = "name_kr, name_en, profile_image_url, ceo_name, company_name, \
     business_number, certificate_image_url, online_business_number, online_business_image_url, \
     background_image_url, short_description, long_description, site_url, kakao_id, insta_id, \
     center_number, zip_code, address, detail_address, weekday_start_time, weekday_end_time, \
     weekend_start_time, weekend_end_time, bank_name, bank_holder_name, account_number";

/// Most hits returned by a name search.
pub const NAME_SEARCH_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, FromRow)]
struct InsertedVersion {
    version_id: VersionId,
    start_time: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SellerStore {
    pool: PgPool,
}

impl SellerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Signs up a seller: account, seller account and the first profile version, in
    /// one transaction. The first version always starts as "Pending onboarding".
    pub async fn register_seller(
        &self,
        login_id: &str,
        profile: &SellerProfile,
        managers: &[NewManager],
    ) -> StoreResult<(SellerId, VersionId)> {
        if login_id.trim().is_empty() {
            return Err(StoreError::validation("login_id cannot be blank"));
        }
        let mut profile = profile.clone();
        profile.seller_status_id = SellerStatus::PendingOnboarding.id();
        profile.validate()?;
        validate_managers(managers)?;
        let app_user_id = self.resolve_references(&profile).await?;

        let mut tx = self.pool.begin().await?;
        let outcome: StoreResult<_> = async {
            let account_no: i64 =
                sqlx::query_scalar("INSERT INTO accounts (login_id) VALUES ($1) RETURNING account_no")
                    .bind(login_id)
                    .fetch_one(&mut *tx)
                    .await?;
            let seller_id: SellerId = sqlx::query_scalar(
                "INSERT INTO seller_accounts (account_id) VALUES ($1) RETURNING seller_account_no",
            )
            .bind(account_no)
            .fetch_one(&mut *tx)
            .await?;
            let version_id =
                create_initial_in_tx(&mut tx, seller_id, &profile, app_user_id, managers).await?;
            Ok((seller_id, version_id))
        }
        .await;
        let (seller_id, version_id) = finish(tx, outcome, "register_seller").await?;

        tracing::info!(seller_id, version_id, login_id, "Registered seller");
        Ok((seller_id, version_id))
    }

    /// Inserts the first, open-ended version of an existing seller together with its
    /// managers.
    pub async fn create_initial_version(
        &self,
        seller_id: SellerId,
        profile: &SellerProfile,
        managers: &[NewManager],
    ) -> StoreResult<VersionId> {
        profile.validate()?;
        validate_managers(managers)?;
        let app_user_id = self.resolve_references(profile).await?;

        let mut tx = self.pool.begin().await?;
        let outcome = create_initial_in_tx(&mut tx, seller_id, profile, app_user_id, managers).await;
        let version_id = finish(tx, outcome, "create_initial_version").await?;

        tracing::info!(seller_id, version_id, "Created initial seller version");
        Ok(version_id)
    }

    /// Replaces the current version `previous_version_id` with a new snapshot.
    ///
    /// References are resolved before the transaction opens, so a bad app-user
    /// handle or modifier account leaves no trace. The previous version is retired
    /// with a conditional update; if it is no longer the open version of this seller
    /// the revision fails with [`StoreError::ConcurrentModification`].
    pub async fn revise_version(
        &self,
        seller_id: SellerId,
        previous_version_id: VersionId,
        profile: &SellerProfile,
        managers: &[NewManager],
        modifier: AccountId,
    ) -> StoreResult<VersionId> {
        profile.validate()?;
        validate_managers(managers)?;
        let app_user_id = self.resolve_references(profile).await?;
        self.ensure_account(modifier).await?;

        let mut tx = self.pool.begin().await?;
        let outcome: StoreResult<_> = async {
            let new = insert_version(&mut tx, seller_id, profile, app_user_id, Some(modifier)).await?;
            insert_managers(&mut tx, new.version_id, managers).await?;
            let previous_status =
                retire_previous(&mut tx, seller_id, previous_version_id, new.version_id).await?;
            if previous_status != profile.seller_status_id {
                record_status_change(
                    &mut tx,
                    seller_id,
                    new.version_id,
                    profile.seller_status_id,
                    modifier,
                )
                .await?;
            }
            Ok(new)
        }
        .await;
        let new = finish(tx, outcome, "revise_version").await?;

        tracing::info!(
            seller_id,
            previous_version_id,
            version_id = new.version_id,
            start_time = %new.start_time,
            modifier,
            "Revised seller info"
        );
        Ok(new.version_id)
    }

    /// Moves the seller to the status `action` leads to, as a new version that
    /// copies the current profile and managers.
    pub async fn apply_status_action(
        &self,
        seller_id: SellerId,
        action: SellerAction,
        modifier: AccountId,
    ) -> StoreResult<VersionId> {
        let target = action.target_status();
        self.ensure_account(modifier).await?;

        let mut tx = self.pool.begin().await?;
        let outcome: StoreResult<_> = async {
            let current: Option<(VersionId, i32)> = sqlx::query_as(
                "SELECT seller_info_no, seller_status_id FROM seller_infos
                 WHERE seller_account_id = $1 AND close_time = $2
                 FOR UPDATE",
            )
            .bind(seller_id)
            .bind(open_close_time())
            .fetch_optional(&mut *tx)
            .await?;
            let (previous_version_id, status_id) = current
                .ok_or_else(|| StoreError::NotFound(format!("Current version of seller {}", seller_id)))?;

            let status = SellerStatus::from_id(status_id).ok_or_else(|| {
                StoreError::validation(format!("seller {} has unknown status id {}", seller_id, status_id))
            })?;
            if !status.allows(action) {
                return Err(StoreError::validation(format!(
                    "'{}' is not allowed while the seller is '{}'",
                    action.label(),
                    status.name()
                )));
            }

            let new = copy_version(&mut tx, previous_version_id, target.id(), modifier).await?;
            copy_managers(&mut tx, previous_version_id, new.version_id).await?;
            let previous_status =
                retire_previous(&mut tx, seller_id, previous_version_id, new.version_id).await?;
            if previous_status != target.id() {
                record_status_change(&mut tx, seller_id, new.version_id, target.id(), modifier)
                    .await?;
            }
            Ok(new)
        }
        .await;
        let new = finish(tx, outcome, "apply_status_action").await?;

        tracing::info!(
            seller_id,
            version_id = new.version_id,
            action = action.label(),
            status = target.name(),
            modifier,
            "Applied seller status action"
        );
        Ok(new.version_id)
    }

    /// Current version with managers, status history and selectable seller types.
    pub async fn get_current_version(&self, seller_id: SellerId) -> StoreResult<SellerDetail> {
        let sql = format!(
            "SELECT si.seller_info_no AS version_id, si.seller_account_id AS seller_id,
                    si.start_time, si.close_time,
                    si.seller_status_id, ss.name AS seller_status_name,
                    si.seller_type_id, st.name AS seller_type_name, si.product_sort_id,
                    a.login_id, si.app_user_id, au.app_id AS app_user_handle, si.modifier,
                    {profile}
             FROM seller_infos si
             INNER JOIN seller_accounts sa ON sa.seller_account_no = si.seller_account_id
             INNER JOIN seller_statuses ss ON ss.status_no = si.seller_status_id
             INNER JOIN seller_types st ON st.seller_type_no = si.seller_type_id
             LEFT JOIN accounts a ON a.account_no = sa.account_id AND a.is_deleted = FALSE
             LEFT JOIN app_users au ON au.app_user_no = si.app_user_id AND au.is_deleted = FALSE
             WHERE si.seller_account_id = $1 AND si.close_time = $2 AND sa.is_deleted = FALSE",
            profile = PROFILE_COLUMNS
        );
        let version: SellerInfoVersion = sqlx::query_as(&sql)
            .bind(seller_id)
            .bind(open_close_time())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Current version of seller {}", seller_id)))?;

        let managers: Vec<ManagerInfo> = sqlx::query_as(
            "SELECT manager_info_no, name, contact_number, email, ranking
             FROM manager_infos
             WHERE seller_info_id = $1 AND is_deleted = FALSE
             ORDER BY ranking
             LIMIT 3",
        )
        .bind(version.version_id)
        .fetch_all(&self.pool)
        .await?;

        let status_history: Vec<StatusChange> = sqlx::query_as(
            "SELECT h.seller_info_id AS version_id, h.changed_time, h.seller_status_id,
                    ss.name AS seller_status_name, h.modifier, a.login_id AS modifier_login_id
             FROM seller_status_change_histories h
             INNER JOIN seller_statuses ss ON ss.status_no = h.seller_status_id
             LEFT JOIN accounts a ON a.account_no = h.modifier AND a.is_deleted = FALSE
             WHERE h.seller_account_id = $1
             ORDER BY h.changed_time, h.history_no",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        let seller_types: Vec<SellerTypeOption> = sqlx::query_as(
            "SELECT seller_type_no, name AS seller_type_name
             FROM seller_types
             WHERE product_sort_id = $1
             ORDER BY seller_type_no",
        )
        .bind(version.product_sort_id)
        .fetch_all(&self.pool)
        .await?;

        let actions = actions_for_status_name(Some(version.seller_status_name.as_str()));
        tracing::debug!(seller_id, version_id = version.version_id, "Loaded current seller version");

        Ok(SellerDetail {
            version,
            managers,
            status_history,
            seller_types,
            actions,
        })
    }

    /// One page of current sellers matching `filter`, each with its allowed actions.
    /// Negative `limit`/`offset` fall back to 10/0.
    pub async fn list_versions_filtered(
        &self,
        filter: &SellerListFilter,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<SellerSummary>> {
        let page = Page::clamped(Some(limit), Some(offset));
        let mut qb = build_listing_query(filter, page);
        let mut sellers: Vec<SellerSummary> = qb.build_query_as().fetch_all(&self.pool).await?;
        for seller in &mut sellers {
            seller.actions = actions_for_status_name(Some(seller.seller_status.as_str()));
        }
        tracing::debug!(count = sellers.len(), limit = page.limit, offset = page.offset, "Listed sellers");
        Ok(sellers)
    }

    /// Up to ten current sellers whose Korean name contains `keyword`.
    pub async fn search_by_name(&self, keyword: &str) -> StoreResult<Vec<NameMatch>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(StoreError::validation("keyword cannot be blank"));
        }
        let matches: Vec<NameMatch> = sqlx::query_as(
            "SELECT si.seller_info_no AS version_id, si.seller_account_id AS seller_id,
                    si.profile_image_url, si.name_kr
             FROM seller_infos si
             INNER JOIN seller_accounts sa ON sa.seller_account_no = si.seller_account_id
             WHERE si.close_time = $1 AND sa.is_deleted = FALSE AND si.name_kr LIKE $2
             ORDER BY si.name_kr, si.seller_info_no
             LIMIT $3",
        )
        .bind(open_close_time())
        .bind(contains_pattern(keyword))
        .bind(NAME_SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        if matches.is_empty() {
            return Err(StoreError::NotFound(format!("Seller named like '{}'", keyword)));
        }
        Ok(matches)
    }

    /// The whole version chain of a seller, oldest first.
    pub async fn list_version_history(&self, seller_id: SellerId) -> StoreResult<Vec<VersionSpan>> {
        let spans: Vec<VersionSpan> = sqlx::query_as(
            "SELECT si.seller_info_no AS version_id, si.start_time, si.close_time,
                    si.seller_status_id, ss.name AS seller_status_name, si.modifier
             FROM seller_infos si
             INNER JOIN seller_statuses ss ON ss.status_no = si.seller_status_id
             WHERE si.seller_account_id = $1
             ORDER BY si.start_time, si.seller_info_no",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        if spans.is_empty() {
            return Err(StoreError::NotFound(format!("Versions of seller {}", seller_id)));
        }
        Ok(spans)
    }

    /// Fails with [`StoreError::ReferenceNotFound`] unless `account_no` is a live account.
    async fn ensure_account(&self, account_no: AccountId) -> StoreResult<()> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT account_no FROM accounts WHERE account_no = $1 AND is_deleted = FALSE",
        )
        .bind(account_no)
        .fetch_optional(&self.pool)
        .await?;
        match found {
            Some(_) => Ok(()),
            None => Err(StoreError::ReferenceNotFound {
                entity: "account",
                value: account_no.to_string(),
            }),
        }
    }

    /// Checks status, type and app-user references; returns the app user's id.
    async fn resolve_references(&self, profile: &SellerProfile) -> StoreResult<Option<i64>> {
        let status: Option<i32> =
            sqlx::query_scalar("SELECT status_no FROM seller_statuses WHERE status_no = $1")
                .bind(profile.seller_status_id)
                .fetch_optional(&self.pool)
                .await?;
        if status.is_none() {
            return Err(StoreError::ReferenceNotFound {
                entity: "seller status",
                value: profile.seller_status_id.to_string(),
            });
        }

        let seller_type: Option<i32> =
            sqlx::query_scalar("SELECT seller_type_no FROM seller_types WHERE seller_type_no = $1")
                .bind(profile.seller_type_id)
                .fetch_optional(&self.pool)
                .await?;
        if seller_type.is_none() {
            return Err(StoreError::ReferenceNotFound {
                entity: "seller type",
                value: profile.seller_type_id.to_string(),
            });
        }

        let Some(handle) = profile.app_user_handle.as_deref() else {
            return Ok(None);
        };
        let app_user_no: Option<i64> = sqlx::query_scalar(
            "SELECT app_user_no FROM app_users WHERE app_id = $1 AND is_deleted = FALSE",
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;
        match app_user_no {
            Some(no) => Ok(Some(no)),
            None => Err(StoreError::ReferenceNotFound {
                entity: "app user",
                value: handle.to_string(),
            }),
        }
    }
}

/// Commits on success. On failure rolls back and returns the operation's error.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    outcome: StoreResult<T>,
    operation: &'static str,
) -> StoreResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(operation, error = %rollback_err, "Rollback failed");
            }
            tracing::warn!(operation, error = %err, "Transaction rolled back");
            Err(err)
        }
    }
}

async fn create_initial_in_tx(
    conn: &mut PgConnection,
    seller_id: SellerId,
    profile: &SellerProfile,
    app_user_id: Option<i64>,
    managers: &[NewManager],
) -> StoreResult<VersionId> {
    // Row lock on the seller serializes concurrent first-version inserts.
    let seller: Option<SellerId> = sqlx::query_scalar(
        "SELECT seller_account_no FROM seller_accounts
         WHERE seller_account_no = $1 AND is_deleted = FALSE
         FOR UPDATE",
    )
    .bind(seller_id)
    .fetch_optional(&mut *conn)
    .await?;
    if seller.is_none() {
        return Err(StoreError::NotFound(format!("Seller {}", seller_id)));
    }

    let open: Option<VersionId> = sqlx::query_scalar(
        "SELECT seller_info_no FROM seller_infos WHERE seller_account_id = $1 AND close_time = $2",
    )
    .bind(seller_id)
    .bind(open_close_time())
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(version_id) = open {
        return Err(StoreError::validation(format!(
            "seller {} already has current version {}",
            seller_id, version_id
        )));
    }

    let new = insert_version(&mut *conn, seller_id, profile, app_user_id, None).await?;
    insert_managers(&mut *conn, new.version_id, managers).await?;
    Ok(new.version_id)
}

async fn insert_version(
    conn: &mut PgConnection,
    seller_id: SellerId,
    profile: &SellerProfile,
    app_user_id: Option<i64>,
    modifier: Option<AccountId>,
) -> StoreResult<InsertedVersion> {
    let sql = format!(
        "INSERT INTO seller_infos (
            seller_account_id, seller_status_id, seller_type_id, product_sort_id, app_user_id,
            {profile}, modifier
        ) VALUES (
            $1, $2, $3, (SELECT product_sort_id FROM seller_types WHERE seller_type_no = $3), $4,
            $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
            $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31
        )
        RETURNING seller_info_no AS version_id, start_time",
        profile = PROFILE_COLUMNS
    );
    let f = &profile.fields;
    let inserted: InsertedVersion = sqlx::query_as(&sql)
        .bind(seller_id)
        .bind(profile.seller_status_id)
        .bind(profile.seller_type_id)
        .bind(app_user_id)
        .bind(&f.name_kr)
        .bind(&f.name_en)
        .bind(&f.profile_image_url)
        .bind(&f.ceo_name)
        .bind(&f.company_name)
        .bind(&f.business_number)
        .bind(&f.certificate_image_url)
        .bind(&f.online_business_number)
        .bind(&f.online_business_image_url)
        .bind(&f.background_image_url)
        .bind(&f.short_description)
        .bind(&f.long_description)
        .bind(&f.site_url)
        .bind(&f.kakao_id)
        .bind(&f.insta_id)
        .bind(&f.center_number)
        .bind(&f.zip_code)
        .bind(&f.address)
        .bind(&f.detail_address)
        .bind(f.weekday_start_time)
        .bind(f.weekday_end_time)
        .bind(f.weekend_start_time)
        .bind(f.weekend_end_time)
        .bind(&f.bank_name)
        .bind(&f.bank_holder_name)
        .bind(&f.account_number)
        .bind(modifier)
        .fetch_one(&mut *conn)
        .await?;
    Ok(inserted)
}

/// New version that repeats `source_version_id`'s profile under a different status.
async fn copy_version(
    conn: &mut PgConnection,
    source_version_id: VersionId,
    status_id: i32,
    modifier: AccountId,
) -> StoreResult<InsertedVersion> {
    let sql = format!(
        "INSERT INTO seller_infos (
            seller_account_id, seller_status_id, seller_type_id, product_sort_id, app_user_id,
            {profile}, modifier
        )
        SELECT seller_account_id, $2, seller_type_id, product_sort_id, app_user_id,
               {profile}, $3
        FROM seller_infos
        WHERE seller_info_no = $1
        RETURNING seller_info_no AS version_id, start_time",
        profile = PROFILE_COLUMNS
    );
    let inserted: InsertedVersion = sqlx::query_as(&sql)
        .bind(source_version_id)
        .bind(status_id)
        .bind(modifier)
        .fetch_one(&mut *conn)
        .await?;
    Ok(inserted)
}

async fn insert_managers(
    conn: &mut PgConnection,
    version_id: VersionId,
    managers: &[NewManager],
) -> StoreResult<()> {
    for manager in managers {
        sqlx::query(
            "INSERT INTO manager_infos (seller_info_id, name, contact_number, email, ranking)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(version_id)
        .bind(&manager.name)
        .bind(&manager.contact_number)
        .bind(&manager.email)
        .bind(manager.ranking)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn copy_managers(
    conn: &mut PgConnection,
    source_version_id: VersionId,
    version_id: VersionId,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO manager_infos (seller_info_id, name, contact_number, email, ranking)
         SELECT $1, name, contact_number, email, ranking
         FROM manager_infos
         WHERE seller_info_id = $2 AND is_deleted = FALSE",
    )
    .bind(version_id)
    .bind(source_version_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Closes the previous version at exactly the new version's start time and returns
/// its status id. Only succeeds while the previous version is still open, belongs
/// to `seller_id` and started before the new one.
async fn retire_previous(
    conn: &mut PgConnection,
    seller_id: SellerId,
    previous_version_id: VersionId,
    new_version_id: VersionId,
) -> StoreResult<i32> {
    let previous_status: Option<i32> = sqlx::query_scalar(
        "WITH new_version AS (
             SELECT start_time FROM seller_infos WHERE seller_info_no = $1
         )
         UPDATE seller_infos
         SET close_time = (SELECT start_time FROM new_version),
             updated_at = (SELECT start_time FROM new_version)
         WHERE seller_info_no = $2
           AND seller_account_id = $3
           AND close_time = $4
           AND start_time < (SELECT start_time FROM new_version)
         RETURNING seller_status_id",
    )
    .bind(new_version_id)
    .bind(previous_version_id)
    .bind(seller_id)
    .bind(open_close_time())
    .fetch_optional(&mut *conn)
    .await?;

    previous_status.ok_or_else(|| {
        tracing::warn!(seller_id, previous_version_id, "Previous seller version is no longer current");
        StoreError::ConcurrentModification {
            seller_id,
            previous_version_id,
        }
    })
}

async fn record_status_change(
    conn: &mut PgConnection,
    seller_id: SellerId,
    version_id: VersionId,
    status_id: i32,
    modifier: AccountId,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO seller_status_change_histories (
            seller_account_id, seller_info_id, changed_time, seller_status_id, modifier
        ) VALUES (
            $1, $2, (SELECT start_time FROM seller_infos WHERE seller_info_no = $2), $3, $4
        )",
    )
    .bind(seller_id)
    .bind(version_id)
    .bind(status_id)
    .bind(modifier)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
