//! Listing filters and page bounds for the seller listing.

use crate::domain::seller::status::SellerAction;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Optional listing filters. Every present value is AND-ed; text filters are exact
/// matches except `manager_contact_number`, which matches a substring.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SellerListFilter {
    pub seller_id: Option<i64>,
    pub login_id: Option<String>,
    pub name_kr: Option<String>,
    pub name_en: Option<String>,
    pub app_user_id: Option<i64>,
    pub manager_name: Option<String>,
    pub manager_email: Option<String>,
    pub manager_contact_number: Option<String>,
    /// Status name, e.g. `Onboarded`.
    pub seller_status: Option<String>,
    pub seller_type_name: Option<String>,
    /// First account-creation day included (YYYY-MM-DD).
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub created_from: Option<NaiveDate>,
    /// Last account-creation day included (YYYY-MM-DD).
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub created_to: Option<NaiveDate>,
}

impl SellerListFilter {
    /// Blank strings in a query string mean "no filter".
    pub fn normalized(mut self) -> Self {
        for slot in [
            &mut self.login_id,
            &mut self.name_kr,
            &mut self.name_en,
            &mut self.manager_name,
            &mut self.manager_email,
            &mut self.manager_contact_number,
            &mut self.seller_status,
            &mut self.seller_type_name,
        ] {
            if slot.as_deref().map_or(false, |s| s.trim().is_empty()) {
                *slot = None;
            }
        }
        self
    }
}

/// Page bounds after clamping. Negative inputs fall back to the defaults; there is
/// no upper bound on `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const DEFAULT_OFFSET: i64 = 0;

    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l >= 0 => l,
            _ => Self::DEFAULT_LIMIT,
        };
        let offset = match offset {
            Some(o) if o >= 0 => o,
            _ => Self::DEFAULT_OFFSET,
        };
        Page { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::clamped(None, None)
    }
}

/// Escapes `LIKE` metacharacters so user text only ever matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%text%` pattern for substring matches.
pub fn contains_pattern(raw: &str) -> String {
    format!("%{}%", escape_like(raw))
}

/// One row of the seller listing.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SellerSummary {
    pub seller_id: i64,
    pub version_id: i64,
    pub login_id: Option<String>,
    pub name_kr: String,
    pub name_en: String,
    pub app_user_id: Option<i64>,
    pub seller_status_id: i32,
    pub seller_status: String,
    pub seller_type_name: String,
    pub site_url: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    pub manager_name: Option<String>,
    pub manager_contact_number: Option<String>,
    pub manager_email: Option<String>,
    pub product_count: i64,
    #[sqlx(skip)]
    pub actions: Vec<SellerAction>,
}
