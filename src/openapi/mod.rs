use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Promise API",
        version = "0.1.0",
        description = r#"
# Order Promising API

Availability checks (ATP) with capable-to-promise date estimation for
materials carried under a safety stock policy.

## Promise calculation

Each check starts from the raw supply position:

```
raw = onHand + incoming - reserved - safetyStock
```

The request is answered with one of three statuses:

- **available**: the raw position covers the requested quantity; the promise
  date is the requested date
- **partial**: some stock is free but not enough; the promise date is shifted
  by whole days of assumed production capacity until the shortfall is covered
- **unavailable**: nothing is free to promise; the promise date is shifted the
  same way

The reported `availableQty` is clamped at zero, but status and date decisions
always see the signed raw position.

## Error handling

Errors use a consistent envelope with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "requestedQty must be a finite, non-negative quantity (got -1)",
  "request_id": "b3e1...",
  "timestamp": "2026-10-08T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "atp", description = "Availability and promise date endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::atp::list_atp,
        crate::handlers::atp::get_atp,
        crate::handlers::atp::check_atp,

        // Health intentionally omitted from OpenAPI paths for now
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,

            // Promising types
            crate::services::promising::AtpContext,
            crate::services::promising::AtpStatus,
            crate::services::promising::AtpBreakdown,
            crate::services::promising::AtpResult,
            crate::services::promising::AtpCheckOutcome,
            crate::handlers::atp::AtpCheckRequest,
            crate::handlers::atp::AtpListResponse,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
