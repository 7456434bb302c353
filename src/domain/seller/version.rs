//! Versioned seller profile records.
//!
//! A seller's profile is never edited in place: each change inserts a new
//! `seller_infos` row valid over `[start_time, close_time)` and retires the previous
//! one by setting its `close_time` to the new row's `start_time`. The row that is
//! still "open" carries [`open_close_time`] as its close time.

use crate::domain::error::{StoreError, StoreResult};
use crate::domain::seller::status::SellerAction;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use utoipa::ToSchema;

pub type SellerId = i64;
pub type VersionId = i64;
pub type AccountId = i64;

/// Most contacts a single version may carry.
pub const MAX_MANAGERS: usize = 3;

/// SQL literal of the open sentinel, used for column defaults.
pub const OPEN_CLOSE_TIME_SQL: &str = "'2037-12-31 23:59:59+00'";

const OPEN_CLOSE_TIME_EPOCH: i64 = 2_145_916_799;

/// Close time of the currently active version (2037-12-31 23:59:59 UTC).
pub fn open_close_time() -> DateTime<Utc> {
    DateTime::from_timestamp(OPEN_CLOSE_TIME_EPOCH, 0).unwrap_or_default()
}

/// Free-form profile attributes carried by every version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfileFields {
    pub name_kr: Option<String>,
    pub name_en: Option<String>,
    pub profile_image_url: Option<String>,
    pub ceo_name: Option<String>,
    pub company_name: Option<String>,
    pub business_number: Option<String>,
    pub certificate_image_url: Option<String>,
    pub online_business_number: Option<String>,
    pub online_business_image_url: Option<String>,
    pub background_image_url: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub site_url: Option<String>,
    pub kakao_id: Option<String>,
    pub insta_id: Option<String>,
    pub center_number: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub detail_address: Option<String>,
    #[schema(value_type = Option<String>, example = "10:00:00")]
    pub weekday_start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub weekday_end_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub weekend_start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub weekend_end_time: Option<NaiveTime>,
    pub bank_name: Option<String>,
    pub bank_holder_name: Option<String>,
    pub account_number: Option<String>,
}

impl ProfileFields {
    fn required(&self) -> [(&'static str, &Option<String>); 4] {
        [
            ("name_kr", &self.name_kr),
            ("name_en", &self.name_en),
            ("site_url", &self.site_url),
            ("center_number", &self.center_number),
        ]
    }

    pub fn validate(&self) -> StoreResult<()> {
        let missing: Vec<&str> = self
            .required()
            .into_iter()
            .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::validation(format!(
                "missing required profile fields: {}",
                missing.join(", ")
            )));
        }

        let hours = [
            ("weekday", self.weekday_start_time, self.weekday_end_time),
            ("weekend", self.weekend_start_time, self.weekend_end_time),
        ];
        for (label, start, end) in hours {
            match (start, end) {
                (Some(_), None) | (None, Some(_)) => {
                    return Err(StoreError::validation(format!(
                        "{} business hours need both a start and an end",
                        label
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// A full profile snapshot supplied for a new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SellerProfile {
    pub seller_status_id: i32,
    pub seller_type_id: i32,
    /// Public handle of the linked app user; must exist when present.
    #[serde(default)]
    pub app_user_handle: Option<String>,
    #[serde(flatten)]
    pub fields: ProfileFields,
}

impl SellerProfile {
    pub fn validate(&self) -> StoreResult<()> {
        if let Some(handle) = &self.app_user_handle {
            if handle.trim().is_empty() {
                return Err(StoreError::validation("app_user_handle cannot be blank"));
            }
        }
        self.fields.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewManager {
    pub name: Option<String>,
    pub contact_number: String,
    pub email: Option<String>,
    /// 1 is the primary contact.
    pub ranking: i16,
}

pub fn validate_managers(managers: &[NewManager]) -> StoreResult<()> {
    if managers.len() > MAX_MANAGERS {
        return Err(StoreError::validation(format!(
            "at most {} managers are allowed, got {}",
            MAX_MANAGERS,
            managers.len()
        )));
    }
    let mut seen = HashSet::new();
    for manager in managers {
        if !(1..=MAX_MANAGERS as i16).contains(&manager.ranking) {
            return Err(StoreError::validation(format!(
                "manager ranking must be between 1 and {}, got {}",
                MAX_MANAGERS, manager.ranking
            )));
        }
        if !seen.insert(manager.ranking) {
            return Err(StoreError::validation(format!(
                "duplicate manager ranking {}",
                manager.ranking
            )));
        }
        if manager.contact_number.trim().is_empty() {
            return Err(StoreError::validation("manager contact_number cannot be blank"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct ManagerInfo {
    pub manager_info_no: i64,
    pub name: Option<String>,
    pub contact_number: String,
    pub email: Option<String>,
    pub ranking: i16,
}

/// A stored version joined with its lookup names.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SellerInfoVersion {
    pub version_id: i64,
    pub seller_id: i64,
    #[schema(value_type = String)]
    pub start_time: DateTime<Utc>,
    #[schema(value_type = String)]
    pub close_time: DateTime<Utc>,
    pub seller_status_id: i32,
    pub seller_status_name: String,
    pub seller_type_id: i32,
    pub seller_type_name: String,
    pub product_sort_id: i32,
    pub login_id: Option<String>,
    pub app_user_id: Option<i64>,
    pub app_user_handle: Option<String>,
    pub modifier: Option<i64>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: ProfileFields,
}

impl SellerInfoVersion {
    pub fn is_current(&self) -> bool {
        self.close_time == open_close_time()
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StatusChange {
    pub version_id: i64,
    #[schema(value_type = String)]
    pub changed_time: DateTime<Utc>,
    pub seller_status_id: i32,
    pub seller_status_name: String,
    pub modifier: i64,
    pub modifier_login_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct SellerTypeOption {
    pub seller_type_no: i32,
    pub seller_type_name: String,
}

/// Everything an operator sees for one seller: the current version, its contacts,
/// the status audit trail and the seller types selectable for its product sort.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SellerDetail {
    pub version: SellerInfoVersion,
    pub managers: Vec<ManagerInfo>,
    pub status_history: Vec<StatusChange>,
    pub seller_types: Vec<SellerTypeOption>,
    pub actions: Vec<SellerAction>,
}

/// One link of a seller's version chain.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct VersionSpan {
    pub version_id: i64,
    #[schema(value_type = String)]
    pub start_time: DateTime<Utc>,
    #[schema(value_type = String)]
    pub close_time: DateTime<Utc>,
    pub seller_status_id: i32,
    pub seller_status_name: String,
    pub modifier: Option<i64>,
}

/// Checks that spans sorted by start time form a gapless chain ending in the open
/// sentinel. Returns the index of the first broken link.
pub fn first_chain_break(spans: &[VersionSpan]) -> Option<usize> {
    for (i, pair) in spans.windows(2).enumerate() {
        if pair[0].close_time != pair[1].start_time || pair[0].start_time >= pair[1].start_time {
            return Some(i);
        }
    }
    match spans.last() {
        Some(last) if last.close_time != open_close_time() => Some(spans.len() - 1),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct NameMatch {
    pub version_id: i64,
    pub seller_id: i64,
    pub profile_image_url: Option<String>,
    pub name_kr: String,
}
