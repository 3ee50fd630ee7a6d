use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

use crate::connectors::Headers;

pub const AUTH_FAILED_MESSAGE: &str = "Service authentication failed";

/// JSON response under construction.
///
/// Content responses default to 200, error responses to 400.
pub struct JsonResponse<T> {
    content: T,
    status: StatusCode,
    headers: Headers,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            status: StatusCode::OK,
            headers: Headers::new(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn finish(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        for (name, value) in self.headers {
            builder.insert_header((name, value));
        }
        builder.json(self.content)
    }
}

impl JsonResponse<serde_json::Value> {
    pub fn error(message: &str) -> Self {
        Self::new(json!({ "error": message })).status(StatusCode::BAD_REQUEST)
    }
}

pub fn json<T: Serialize>(content: T, status: StatusCode, headers: Headers) -> HttpResponse {
    JsonResponse::new(content).status(status).headers(headers).finish()
}

/// `{"error": message}` with the given status.
pub fn json_error(message: &str, status: StatusCode, headers: Headers) -> HttpResponse {
    JsonResponse::error(message)
        .status(status)
        .headers(headers)
        .finish()
}

/// Canned rejection for callers that failed service authentication.
pub fn auth_failed() -> HttpResponse {
    json_error(AUTH_FAILED_MESSAGE, StatusCode::FORBIDDEN, Headers::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn auth_failed_is_forbidden_with_fixed_message() {
        let resp = auth_failed();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(resp).await,
            json!({"error": "Service authentication failed"})
        );
    }

    #[actix_web::test]
    async fn json_applies_status_and_headers() {
        let mut headers = Headers::new();
        headers.insert("X-Request-Id".to_string(), "abc".to_string());

        let resp = json(json!({"id": 1}), StatusCode::CREATED, headers);

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc");
        assert_eq!(body_json(resp).await, json!({"id": 1}));
    }

    #[actix_web::test]
    async fn error_builder_defaults_to_bad_request() {
        let resp = JsonResponse::error("nope").finish();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({"error": "nope"}));

        let resp = JsonResponse::new(json!([])).finish();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
