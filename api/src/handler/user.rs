use crate::{
    extractor::{AuthorizedUser, Json},
    model::user::{AuthResponse, CreateUserRequest, LoginRequest, UserResponse},
};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use garde::Validate;
use kernel::model::{auth::event::CreateToken, user::event::CreateGuestUser};
use rand::{distributions::Alphanumeric, Rng};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;

    let user = registry.user_repository().create(req.into()).await?;
    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user.user_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.user_id,
            name: user.name,
            email: user.email,
            is_guest: false,
            access_token: access_token.0,
        }),
    ))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user_id = registry
        .auth_repository()
        .verify_user(&req.email, &req.password)
        .await?;
    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user_id))
        .await?;
    let user = registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .ok_or(AppError::UnauthenticatedError)?;

    Ok(Json(AuthResponse {
        id: user.user_id,
        name: user.name,
        email: user.email,
        is_guest: user.is_guest,
        access_token: access_token.0,
    }))
}

pub async fn logout(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<serde_json::Value>> {
    registry
        .auth_repository()
        .delete_token(user.access_token)
        .await?;
    Ok(Json(
        serde_json::json!({ "message": "Logged out successfully" }),
    ))
}

pub async fn guest_login(State(registry): State<AppRegistry>) -> AppResult<Json<AuthResponse>> {
    let guest_number = rand::thread_rng().gen_range(1000..10000);
    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    let user = registry
        .user_repository()
        .create_guest(CreateGuestUser {
            name: format!("Guest{guest_number}"),
            email: format!("guest{guest_number}@temp.com"),
            password,
            guest_expiry: Utc::now() + Duration::hours(registry.guest_ttl_hours()),
        })
        .await?;
    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user.user_id))
        .await?;

    Ok(Json(AuthResponse {
        id: user.user_id,
        name: user.name,
        email: user.email,
        is_guest: true,
        access_token: access_token.0,
    }))
}

pub async fn check_auth(user: AuthorizedUser) -> Json<UserResponse> {
    Json(user.user.into())
}
