use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use bridge_core::{REQUEST_ID_HEADER, RequestContext};
use http::HeaderValue;

/// Middleware that gives every request a `RequestContext` with a fresh id
///
/// The id is echoed back in the `x-request-id` response header so clients
/// can quote it when reporting problems.
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let context = RequestContext::new(parts.clone());
    let request_id = context.request_id;

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
