//! SQL assembly for the filtered seller listing.
//!
//! Every filter value goes through `push_bind`; only fixed SQL fragments are pushed
//! as text.

use crate::domain::seller::{contains_pattern, open_close_time, Page, SellerListFilter};
use chrono::{Duration, NaiveTime};
use sqlx::{Postgres, QueryBuilder};

const LISTING_SELECT: &str = "SELECT
        sa.seller_account_no AS seller_id,
        si.seller_info_no AS version_id,
        a.login_id,
        si.name_kr,
        si.name_en,
        si.app_user_id,
        si.seller_status_id,
        ss.name AS seller_status,
        st.name AS seller_type_name,
        si.site_url,
        sa.created_at,
        m.name AS manager_name,
        m.contact_number AS manager_contact_number,
        m.email AS manager_email,
        (SELECT COUNT(*) FROM products p
          WHERE p.seller_account_id = sa.seller_account_no AND p.is_deleted = FALSE) AS product_count
    FROM seller_accounts sa
    INNER JOIN seller_infos si ON si.seller_account_id = sa.seller_account_no
    LEFT JOIN accounts a ON a.account_no = sa.account_id
    INNER JOIN seller_statuses ss ON ss.status_no = si.seller_status_id
    INNER JOIN seller_types st ON st.seller_type_no = si.seller_type_id
    LEFT JOIN manager_infos m
      ON m.seller_info_id = si.seller_info_no AND m.ranking = 1 AND m.is_deleted = FALSE
    WHERE sa.is_deleted = FALSE AND si.close_time = ";

/// Builds the listing query for `filter` restricted to current versions.
pub fn build_listing_query(filter: &SellerListFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(LISTING_SELECT);
    qb.push_bind(open_close_time());

    if let Some(seller_id) = filter.seller_id {
        qb.push(" AND sa.seller_account_no = ").push_bind(seller_id);
    }
    if let Some(login_id) = &filter.login_id {
        qb.push(" AND a.login_id = ").push_bind(login_id.clone());
    }
    if let Some(name_kr) = &filter.name_kr {
        qb.push(" AND si.name_kr = ").push_bind(name_kr.clone());
    }
    if let Some(name_en) = &filter.name_en {
        qb.push(" AND si.name_en = ").push_bind(name_en.clone());
    }
    if let Some(app_user_id) = filter.app_user_id {
        qb.push(" AND si.app_user_id = ").push_bind(app_user_id);
    }
    if let Some(manager_name) = &filter.manager_name {
        qb.push(" AND m.name = ").push_bind(manager_name.clone());
    }
    if let Some(contact) = &filter.manager_contact_number {
        qb.push(" AND m.contact_number LIKE ")
            .push_bind(contains_pattern(contact));
    }
    if let Some(email) = &filter.manager_email {
        qb.push(" AND m.email = ").push_bind(email.clone());
    }
    if let Some(status) = &filter.seller_status {
        qb.push(" AND ss.name = ").push_bind(status.clone());
    }
    if let Some(type_name) = &filter.seller_type_name {
        qb.push(" AND st.name = ").push_bind(type_name.clone());
    }
    if let Some(from) = filter.created_from {
        let start = from.and_time(NaiveTime::MIN).and_utc();
        qb.push(" AND sa.created_at >= ").push_bind(start);
    }
    // Inclusive of the whole `to` day. The last representable day has no next
    // midnight and bounds nothing.
    let end = filter
        .created_to
        .and_then(|to| to.and_time(NaiveTime::MIN).checked_add_signed(Duration::days(1)));
    if let Some(end) = end {
        qb.push(" AND sa.created_at < ").push_bind(end.and_utc());
    }

    qb.push(" ORDER BY sa.seller_account_no DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);
    qb
}
