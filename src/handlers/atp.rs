use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    errors::ServiceError,
    services::promising::{AtpCheckOutcome, AtpContext},
    AppState,
};

/// Supply position submitted for an availability check.
///
/// The date travels as a string so malformed values surface as a validation
/// error naming the field instead of a serializer rejection. Omitted supply
/// quantities default to zero.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schema(example = json!({
    "materialId": "MAT-1002",
    "materialName": "Forged crankshaft blank",
    "onHand": 8000.0,
    "incoming": 2000.0,
    "reserved": 5000.0,
    "safetyStock": 3000.0,
    "requestedQty": 5000.0,
    "requestedDate": "2026-10-08"
}))]
pub struct AtpCheckRequest {
    #[validate(length(min = 1))]
    pub material_id: String,

    #[serde(default)]
    pub material_name: String,

    #[serde(default)]
    pub on_hand: f64,

    #[serde(default)]
    pub incoming: f64,

    #[serde(default)]
    pub reserved: f64,

    #[serde(default)]
    pub safety_stock: f64,

    #[serde(default)]
    pub requested_qty: f64,

    /// Requested delivery date as an ISO calendar date, e.g. `2026-10-08`
    #[validate(length(min = 1))]
    pub requested_date: String,
}

impl AtpCheckRequest {
    fn into_context(self) -> Result<AtpContext, ServiceError> {
        let requested_date = NaiveDate::parse_from_str(&self.requested_date, "%Y-%m-%d")
            .map_err(|_| {
                ServiceError::ValidationError(format!(
                    "requestedDate must be a calendar date in YYYY-MM-DD format (got '{}')",
                    self.requested_date
                ))
            })?;

        Ok(AtpContext {
            material_id: self.material_id,
            material_name: self.material_name,
            on_hand: self.on_hand,
            incoming: self.incoming,
            reserved: self.reserved,
            safety_stock: self.safety_stock,
            requested_qty: self.requested_qty,
            requested_date,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtpListResponse {
    pub atp_results: Vec<AtpCheckOutcome>,
    pub total: usize,
}

/// List availability for every demo supply position
#[utoipa::path(
    get,
    path = "/api/v1/atp",
    summary = "List ATP results",
    description = "Run an availability check over every demo supply position",
    responses(
        (status = 200, description = "ATP results computed", body = AtpListResponse,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "atp"
)]
pub async fn list_atp(State(state): State<AppState>) -> Result<Json<AtpListResponse>, ServiceError> {
    let outcomes = state
        .promising_service
        .check_all(&state.seed_contexts)
        .await?;
    let total = outcomes.len();
    Ok(Json(AtpListResponse {
        atp_results: outcomes,
        total,
    }))
}

/// Availability for a single demo material
#[utoipa::path(
    get,
    path = "/api/v1/atp/{material_id}",
    summary = "Get ATP by material",
    description = "Run an availability check for one demo supply position",
    params(
        ("material_id" = String, Path, description = "Material identifier, e.g. MAT-1002"),
    ),
    responses(
        (status = 200, description = "ATP result computed", body = AtpCheckOutcome,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 404, description = "Unknown material", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "atp"
)]
pub async fn get_atp(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> Result<Json<AtpCheckOutcome>, ServiceError> {
    let context = state
        .seed_contexts
        .iter()
        .find(|context| context.material_id == material_id)
        .cloned()
        .ok_or_else(|| {
            ServiceError::NotFound(format!("material {} in the demo catalog", material_id))
        })?;

    let outcome = state.promising_service.check(context).await?;
    Ok(Json(outcome))
}

/// Check availability for a submitted supply position
#[utoipa::path(
    post,
    path = "/api/v1/atp/check",
    summary = "Check ATP",
    description = "Run an availability check for a submitted supply position and demand",
    request_body = AtpCheckRequest,
    responses(
        (status = 200, description = "ATP result computed", body = AtpCheckOutcome,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid quantities or date", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "atp"
)]
pub async fn check_atp(
    State(state): State<AppState>,
    Json(request): Json<AtpCheckRequest>,
) -> Result<Json<AtpCheckOutcome>, ServiceError> {
    request.validate()?;
    let context = request.into_context()?;
    let outcome = state.promising_service.check(context).await?;
    Ok(Json(outcome))
}

pub fn atp_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_atp))
        .route("/check", post(check_atp))
        .route("/:material_id", get(get_atp))
}
