use crate::model::{
    id::UserId,
    user::{
        event::{CreateGuestUser, CreateUser},
        User,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn create_guest(&self, event: CreateGuestUser) -> AppResult<User>;
    /// Returns the user with `events_created` / `events_attending` resolved.
    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>>;
}
