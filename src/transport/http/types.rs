use crate::app::database_service::DatabaseService;
use crate::app::seller_store::SellerStore;
use crate::domain::seller::{NewManager, SellerAction, SellerProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub db_service: Arc<DatabaseService>,
    pub sellers: SellerStore,
}

impl AppState {
    pub fn new(db_service: DatabaseService) -> Self {
        let sellers = db_service.seller_store();
        Self {
            db_service: Arc::new(db_service),
            sellers,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterSellerRequest {
    pub login_id: String,
    /// The status id is ignored; new sellers start as "Pending onboarding".
    pub profile: SellerProfile,
    #[serde(default)]
    pub managers: Vec<NewManager>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ReviseSellerRequest {
    /// Version the edit was based on; must still be the current one.
    pub previous_version_id: i64,
    pub profile: SellerProfile,
    #[serde(default)]
    pub managers: Vec<NewManager>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct StatusActionRequest {
    pub action: SellerAction,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page size (default 10; negative values fall back to the default).
    pub limit: Option<i64>,
    /// Rows to skip (default 0).
    pub offset: Option<i64>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub keyword: String,
}
