use crate::model::{
    event::{
        event::{CreateEvent, DeleteEvent, JoinEvent, LeaveEvent, UpdateEvent},
        Event,
    },
    id::EventId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Stores a new event with an empty attendee list and returns it populated.
    async fn create(&self, event: CreateEvent) -> AppResult<Event>;
    /// All events, ascending by date, populated.
    async fn find_all(&self) -> AppResult<Vec<Event>>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    /// Creator-only full update of the mutable fields.
    async fn update(&self, event: UpdateEvent) -> AppResult<Event>;
    /// Creator-only delete; attendee relationships go away in the same transaction.
    async fn delete(&self, event: DeleteEvent) -> AppResult<()>;
    /// Appends the user to the attendee list, enforcing the capacity bound
    /// and the no-duplicates rule atomically.
    async fn join(&self, event: JoinEvent) -> AppResult<Event>;
    /// Removes the user from the attendee list, preserving the order of the rest.
    async fn leave(&self, event: LeaveEvent) -> AppResult<Event>;
}
