use crate::domain::seller::{
    ManagerInfo, NameMatch, NewManager, ProfileFields, SellerAction, SellerDetail,
    SellerInfoVersion, SellerListFilter, SellerProfile, SellerStatus, SellerSummary,
    SellerTypeOption, StatusChange, VersionSpan,
};
use crate::transport::http::handlers::{health, sellers};
use crate::transport::http::types::{
    ApiResponse, AppState, RegisterSellerRequest, ReviseSellerRequest, StatusActionRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        sellers::register_seller_handler,
        sellers::list_sellers_handler,
        sellers::search_sellers_handler,
        sellers::get_seller_handler,
        sellers::revise_seller_handler,
        sellers::list_versions_handler,
        sellers::apply_action_handler
    ),
    components(schemas(
        ApiResponse,
        RegisterSellerRequest,
        ReviseSellerRequest,
        StatusActionRequest,
        SellerProfile,
        ProfileFields,
        NewManager,
        ManagerInfo,
        SellerStatus,
        SellerAction,
        SellerInfoVersion,
        StatusChange,
        SellerTypeOption,
        SellerDetail,
        SellerListFilter,
        SellerSummary,
        VersionSpan,
        NameMatch
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/sellers",
            post(sellers::register_seller_handler).get(sellers::list_sellers_handler),
        )
        .route("/sellers/search", get(sellers::search_sellers_handler))
        .route(
            "/sellers/:seller_id",
            get(sellers::get_seller_handler).put(sellers::revise_seller_handler),
        )
        .route("/sellers/:seller_id/versions", get(sellers::list_versions_handler))
        .route("/sellers/:seller_id/actions", post(sellers::apply_action_handler))
        .with_state(app_state)
}
