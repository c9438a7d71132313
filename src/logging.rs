//! Middleware for logging requests and responses.

use std::time::Instant;

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of characters of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest body the middleware will buffer for logging.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level along with
/// the response status and how long the request took.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Bodies that are not text, such as images, are passed through untouched
/// and only the request line or status is logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let (parts, body) = request.into_parts();
    let request = if is_text(&parts.headers) {
        let Some(bytes) = read_body(body).await else {
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        };
        log_request(&parts, &String::from_utf8_lossy(&bytes));
        Request::from_parts(parts, Body::from(bytes))
    } else {
        log_request(&parts, "<binary>");
        Request::from_parts(parts, body)
    };

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    if !is_text(&parts.headers) {
        log_response(&parts, "<binary>", start);
        return Response::from_parts(parts, body);
    }

    let Some(bytes) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_response(&parts, &String::from_utf8_lossy(&bytes), start);

    Response::from_parts(parts, Body::from(bytes))
}

/// Whether a body with these headers is text that is worth logging.
///
/// A missing content type is treated as text, e.g. empty redirects and bodiless requests.
fn is_text(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return true;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/")
        || mime == "application/x-www-form-urlencoded"
        || mime == "application/json"
}

async fn read_body(body: Body) -> Option<Bytes> {
    to_bytes(body, MAX_BODY_BYTES)
        .await
        .inspect_err(|error| tracing::error!("could not read body for logging: {error}"))
        .ok()
}

/// The first `limit` characters of `text`, or `None` if `text` is already short enough.
fn truncate(text: &str, limit: usize) -> Option<&str> {
    text.char_indices()
        .nth(limit)
        .map(|(byte_index, _)| &text[..byte_index])
}

fn log_request(parts: &request::Parts, body: &str) {
    let method = &parts.method;
    let uri = &parts.uri;

    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(head) => {
            tracing::info!("Received request: {method} {uri}\nbody: {head}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {method} {uri}\nbody: {body:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &str, start: Instant) {
    let status = parts.status;
    let elapsed = start.elapsed();

    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(head) => {
            tracing::info!("Sending response: {status} in {elapsed:?}\nbody: {head}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {status} in {elapsed:?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{
        Router,
        http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE},
        middleware,
        routing::{get, post},
    };
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, is_text, logging_middleware, truncate};

    fn headers_with_content_type(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate("hello", 5), None);
        assert_eq!(truncate("", LOG_BODY_LENGTH_LIMIT), None);
    }

    #[test]
    fn long_text_is_truncated() {
        assert_eq!(truncate("hello world", 5), Some("hello"));
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate("ééééé", 2), Some("éé"));
    }

    #[tokio::test]
    async fn passes_body_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        let response = server.post("/echo").text(body.clone()).await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), body);
    }

    #[test]
    fn detects_text_content_types() {
        assert!(is_text(&HeaderMap::new()));
        assert!(is_text(&headers_with_content_type("text/html; charset=utf-8")));
        assert!(is_text(&headers_with_content_type(
            "application/x-www-form-urlencoded"
        )));
        assert!(!is_text(&headers_with_content_type("image/png")));
        assert!(!is_text(&headers_with_content_type("application/octet-stream")));
    }

    #[tokio::test]
    async fn binary_response_is_unchanged() {
        let bytes: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0xff, 0xfe, 0x00, 0x80];
        let expected = bytes.clone();
        let app = Router::new()
            .route(
                "/favicon.png",
                get(move || async move { ([(CONTENT_TYPE, "image/png")], bytes) }),
            )
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get("/favicon.png").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.as_bytes().to_vec(), expected);
    }
}
