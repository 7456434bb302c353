use crate::domain::seller::{SellerId, SellerListFilter};
use crate::transport::http::handlers::common::{
    error_response, ok_response, unprocessable, ActingAccount,
};
use crate::transport::http::types::{
    AppState, PageParams, RegisterSellerRequest, ReviseSellerRequest, SearchParams,
    StatusActionRequest,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

fn seller_id_from(path: Result<Path<SellerId>, PathRejection>) -> Result<SellerId, Response> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(e) => Err(unprocessable(format!("Invalid seller id: {}", e)).into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/sellers",
    request_body = RegisterSellerRequest,
    responses(
        (status = 201, description = "Seller registered with its first version", body = ApiResponse),
        (status = 400, description = "Validation failed or unknown reference", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn register_seller_handler(
    State(state): State<AppState>,
    request: Result<Json<RegisterSellerRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return unprocessable(format!("Invalid JSON body: {}", e)).into_response(),
    };

    match state
        .sellers
        .register_seller(&request.login_id, &request.profile, &request.managers)
        .await
    {
        Ok((seller_id, version_id)) => ok_response(
            StatusCode::CREATED,
            &serde_json::json!({ "seller_id": seller_id, "version_id": version_id }),
        ),
        Err(e) => error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/sellers",
    params(SellerListFilter, PageParams),
    responses(
        (status = 200, description = "One page of current sellers, newest seller first", body = ApiResponse),
        (status = 422, description = "Invalid query string", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_sellers_handler(
    State(state): State<AppState>,
    filter: Result<Query<SellerListFilter>, QueryRejection>,
    page: Result<Query<PageParams>, QueryRejection>,
) -> impl IntoResponse {
    let (Query(filter), Query(page)) = match (filter, page) {
        (Ok(f), Ok(p)) => (f, p),
        (Err(e), _) | (_, Err(e)) => {
            return unprocessable(format!("Invalid query string: {}", e)).into_response()
        }
    };

    let limit = page.limit.unwrap_or(-1);
    let offset = page.offset.unwrap_or(-1);
    match state
        .sellers
        .list_versions_filtered(&filter.normalized(), limit, offset)
        .await
    {
        Ok(sellers) => ok_response(StatusCode::OK, &sellers),
        Err(e) => error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/sellers/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Up to 10 sellers whose Korean name contains the keyword", body = ApiResponse),
        (status = 400, description = "Blank keyword", body = ApiResponse),
        (status = 404, description = "No seller matched", body = ApiResponse)
    )
)]
pub async fn search_sellers_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(v) => v,
        Err(e) => return unprocessable(format!("Invalid query string: {}", e)).into_response(),
    };

    match state.sellers.search_by_name(&params.keyword).await {
        Ok(matches) => ok_response(StatusCode::OK, &matches),
        Err(e) => error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/sellers/{seller_id}",
    params(("seller_id" = i64, Path, description = "Seller account number")),
    responses(
        (status = 200, description = "Current version, managers, status history and actions", body = ApiResponse),
        (status = 404, description = "Seller has no current version", body = ApiResponse)
    )
)]
pub async fn get_seller_handler(
    State(state): State<AppState>,
    path: Result<Path<SellerId>, PathRejection>,
) -> impl IntoResponse {
    let seller_id = match seller_id_from(path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.sellers.get_current_version(seller_id).await {
        Ok(detail) => ok_response(StatusCode::OK, &detail),
        Err(e) => error_response(e).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/sellers/{seller_id}",
    params(
        ("seller_id" = i64, Path, description = "Seller account number"),
        ("x-account-no" = i64, Header, description = "Account number of the acting operator")
    ),
    request_body = ReviseSellerRequest,
    responses(
        (status = 200, description = "New version created", body = ApiResponse),
        (status = 400, description = "Validation failed, unknown reference or missing header", body = ApiResponse),
        (status = 409, description = "previous_version_id is no longer current", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn revise_seller_handler(
    State(state): State<AppState>,
    path: Result<Path<SellerId>, PathRejection>,
    ActingAccount(modifier): ActingAccount,
    request: Result<Json<ReviseSellerRequest>, JsonRejection>,
) -> impl IntoResponse {
    let seller_id = match seller_id_from(path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return unprocessable(format!("Invalid JSON body: {}", e)).into_response(),
    };

    match state
        .sellers
        .revise_version(
            seller_id,
            request.previous_version_id,
            &request.profile,
            &request.managers,
            modifier,
        )
        .await
    {
        Ok(version_id) => ok_response(
            StatusCode::OK,
            &serde_json::json!({ "seller_id": seller_id, "version_id": version_id }),
        ),
        Err(e) => error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/sellers/{seller_id}/versions",
    params(("seller_id" = i64, Path, description = "Seller account number")),
    responses(
        (status = 200, description = "Every version of the seller, oldest first", body = ApiResponse),
        (status = 404, description = "Seller has no versions", body = ApiResponse)
    )
)]
pub async fn list_versions_handler(
    State(state): State<AppState>,
    path: Result<Path<SellerId>, PathRejection>,
) -> impl IntoResponse {
    let seller_id = match seller_id_from(path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.sellers.list_version_history(seller_id).await {
        Ok(spans) => ok_response(StatusCode::OK, &spans),
        Err(e) => error_response(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/sellers/{seller_id}/actions",
    params(
        ("seller_id" = i64, Path, description = "Seller account number"),
        ("x-account-no" = i64, Header, description = "Account number of the acting operator")
    ),
    request_body = StatusActionRequest,
    responses(
        (status = 200, description = "Status changed as a new version", body = ApiResponse),
        (status = 400, description = "Action not allowed for the current status", body = ApiResponse),
        (status = 404, description = "Seller has no current version", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn apply_action_handler(
    State(state): State<AppState>,
    path: Result<Path<SellerId>, PathRejection>,
    ActingAccount(modifier): ActingAccount,
    request: Result<Json<StatusActionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let seller_id = match seller_id_from(path) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return unprocessable(format!("Invalid JSON body: {}", e)).into_response(),
    };

    match state
        .sellers
        .apply_status_action(seller_id, request.action, modifier)
        .await
    {
        Ok(version_id) => ok_response(
            StatusCode::OK,
            &serde_json::json!({
                "seller_id": seller_id,
                "version_id": version_id,
                "status": request.action.target_status(),
            }),
        ),
        Err(e) => error_response(e).into_response(),
    }
}
