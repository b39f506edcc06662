use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use kernel::model::{auth::AccessToken, id::UserId, user::User};
use registry::AppRegistry;
use shared::error::AppError;

/// `axum::Json` with the rejection routed through `AppError`, so missing or
/// malformed body fields answer with 400 and a JSON message.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: serde::Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Resolved caller identity: the bearer token plus the user it belongs to.
pub struct AuthorizedUser {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }

    pub fn is_guest(&self) -> bool {
        self.user.is_guest
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::UnauthenticatedError)?;
        let access_token = AccessToken(bearer.token().to_string());

        let user_id = registry
            .auth_repository()
            .fetch_user_id_from_token(&access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        let user = registry
            .user_repository()
            .find_current_user(user_id)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        // Guest accounts are time limited; an expired one is as good as no
        // account at all.
        if user.is_guest {
            if let Some(expiry) = user.guest_expiry {
                if expiry < Utc::now() {
                    return Err(AppError::UnauthenticatedError);
                }
            }
        }

        Ok(Self { access_token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::post,
        Router,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct NewThing {
        name: String,
        capacity: i32,
    }

    async fn create_thing(Json(_req): Json<NewThing>) -> StatusCode {
        StatusCode::CREATED
    }

    fn app() -> Router {
        Router::new().route("/", post(create_thing))
    }

    async fn body_message(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn incomplete_body_answers_bad_request_with_a_json_message() {
        let response = app()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"only half"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_message(response).await;
        assert_eq!(json["message"], "All fields are required");
    }

    #[tokio::test]
    async fn malformed_body_answers_bad_request() {
        let response = app()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json at all"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_message(response).await;
        assert!(json["message"].is_string());
    }
}
