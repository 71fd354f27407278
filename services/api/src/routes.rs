//! API service routes

use auth::{
    middleware::{auth_middleware, require_role},
    models::{AuthUser, Role},
};
use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    dispatcher::{DataPayload, DataView},
    error::ApiResult,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    let data_routes = Router::new()
        .route("/data/common", get(common_data))
        .route(
            "/data/employee",
            get(employee_data).layer(middleware::from_fn_with_state(
                Role::employee(),
                require_role,
            )),
        )
        .route(
            "/data/manager",
            get(manager_data).layer(middleware::from_fn_with_state(
                Role::manager(),
                require_role,
            )),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    let auth_routes = auth::routes::create_router(state.auth.clone());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(data_routes)
        .with_state(state)
        .merge(auth_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Root endpoint
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "data": "Payroll dashboard API"
    }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "dashboard-api"
    }))
}

/// Placeholder data for any authenticated caller
pub async fn common_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<DataPayload>> {
    let payload = state
        .dispatcher
        .run_for_role(&DataView::Common, &user)
        .await?;
    Ok(Json(payload))
}

/// Daily pay and hours of the calling employee
pub async fn employee_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<DataPayload>> {
    let payload = state
        .dispatcher
        .run_for_role(&DataView::Role(Role::employee()), &user)
        .await?;
    Ok(Json(payload))
}

/// Pay totals across all staff
pub async fn manager_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<DataPayload>> {
    let payload = state
        .dispatcher
        .run_for_role(&DataView::Role(Role::manager()), &user)
        .await?;
    Ok(Json(payload))
}
