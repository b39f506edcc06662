pub mod event;
pub mod health;
pub mod user;
pub mod ws;

use axum::{extract::DefaultBodyLimit, Router};
use registry::AppRegistry;

// Event images arrive inline as base64 data URIs, well past the extractor
// default cap.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Everything except the health probes lives under `/api`.
pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(event::build_event_routers())
        .merge(user::build_user_routers())
        .merge(ws::build_ws_routers());

    Router::new()
        .nest("/api", router)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Json;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct ImagePayload {
        image_url: String,
    }

    async fn accept(Json(_req): Json<ImagePayload>) -> StatusCode {
        StatusCode::CREATED
    }

    #[tokio::test]
    async fn a_multi_megabyte_image_body_fits_within_the_limit() {
        let app = Router::new()
            .route("/", post(accept))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

        // Roughly a 3 MB data URI, larger than axum's 2 MB default.
        let image = format!(
            r#"{{"image_url":"data:image/png;base64,{}"}}"#,
            "A".repeat(3 * 1024 * 1024)
        );
        let response = app
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(image))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
