use crate::tracing::RequestId;
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Header name for the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn header_value(request_id: &RequestId) -> HeaderValue {
    // Request IDs are either generated UUIDs or copied from a header that
    // already passed to_str, so they only contain valid header characters.
    HeaderValue::from_str(request_id.as_str())
        .expect("request ID contains only valid header characters")
}

/// Ensures every request carries an ID, reusing a client-supplied
/// `x-request-id` when present.
///
/// The ID is stored in the request extensions, scoped into the task-local
/// used by error responses, and echoed back on the response. Span creation
/// is left to the HTTP trace layer.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestId::new)
        .unwrap_or_default();

    request
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value(&request_id));
    request.extensions_mut().insert(request_id.clone());

    let mut response = crate::tracing::scope_request_id(request_id.clone(), async move {
        next.run(request).await
    })
    .await;

    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value(&request_id));

    response
}
