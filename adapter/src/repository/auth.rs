use std::sync::Arc;

use crate::{database::ConnectionPool, redis::RedisClient};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

fn auth_key(token: &AccessToken) -> String {
    format!("token:{}", token.0)
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let Some(value) = self.kv.get(&auth_key(access_token)).await? else {
            return Ok(None);
        };
        Ok(Some(value.parse()?))
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row: Option<(UserId, String)> =
            sqlx::query_as("SELECT user_id, password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        // The same message regardless of which half failed.
        let Some((user_id, password_hash)) = row else {
            return Err(AppError::UnprocessableEntity("Invalid credentials".into()));
        };

        let valid =
            bcrypt::verify(password, &password_hash).map_err(AppError::VerifyPasswordError)?;
        if !valid {
            return Err(AppError::UnprocessableEntity("Invalid credentials".into()));
        }

        Ok(user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let access_token = AccessToken(token);
        self.kv
            .set_ex(
                &auth_key(&access_token),
                &event.user_id.to_string(),
                self.ttl,
            )
            .await?;
        Ok(access_token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        self.kv.delete(&auth_key(&access_token)).await
    }
}
