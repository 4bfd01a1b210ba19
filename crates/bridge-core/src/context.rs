use http::HeaderName;
use uuid::Uuid;

/// Header carrying the per-request identifier on responses
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Runtime context for a single bridge request
///
/// Built by the server middleware and handed to the dispatcher and the
/// upstream client. Nothing in here outlives the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP request parts (method, URI, headers, extensions)
    pub parts: http::request::Parts,
    /// Identifier used to correlate log lines for this request
    pub request_id: Uuid,
}

impl RequestContext {
    /// Create a context for the given request parts with a fresh id
    pub fn new(parts: http::request::Parts) -> Self {
        Self {
            parts,
            request_id: Uuid::new_v4(),
        }
    }

    /// Create a minimal context for non-HTTP use (tests, embedding)
    ///
    /// Contains empty headers and a fresh request id
    pub fn empty() -> Self {
        let (parts, ()) = http::Request::builder()
            .method(http::Method::GET)
            .uri("/")
            .body(())
            .expect("valid minimal request")
            .into_parts();

        Self::new(parts)
    }
}
