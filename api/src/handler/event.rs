use crate::{
    extractor::{AuthorizedUser, Json},
    model::event::{
        CreateEventRequest, CreateEventRequestWithUser, EventResponse, UpdateEventRequest,
        UpdateEventRequestWithIds,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    event::event::{DeleteEvent, JoinEvent, LeaveEvent},
    id::EventId,
};
use kernel::realtime::RealtimeMessage;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

// Mutating operations are closed to guest accounts; reads stay open.
fn reject_guest(user: &AuthorizedUser) -> AppResult<()> {
    if user.is_guest() {
        return Err(AppError::GuestAccountForbidden);
    }
    Ok(())
}

pub async fn register_event(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<impl IntoResponse> {
    reject_guest(&user)?;
    req.validate(&())?;

    // Store the image first; its durable URL goes into the event record.
    let image_url = registry.image_store().upload(&req.image_url).await?;

    let event = registry
        .event_repository()
        .create(CreateEventRequestWithUser::new(req, image_url, user.id()).into())
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

pub async fn show_event_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<EventResponse>>> {
    registry
        .event_repository()
        .find_all()
        .await
        .map(|events| events.into_iter().map(EventResponse::from).collect())
        .map(Json)
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    registry
        .event_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(event.into())),
            None => Err(AppError::EntityNotFound("Event not found".into())),
        })
}

pub async fn update_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    reject_guest(&user)?;
    req.validate(&())?;

    let current = registry
        .event_repository()
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("Event not found".into()))?;
    if current.creator.user_id != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    // Only re-upload when the client sent a new image reference.
    let image_url = if req.image_url != current.image_url {
        registry.image_store().upload(&req.image_url).await?
    } else {
        current.image_url
    };

    let event = registry
        .event_repository()
        .update(UpdateEventRequestWithIds::new(event_id, user.id(), image_url, req).into())
        .await?;

    registry
        .broadcaster()
        .publish(event_id, RealtimeMessage::EventUpdate(event.clone()));

    Ok(Json(event.into()))
}

pub async fn delete_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<serde_json::Value>> {
    reject_guest(&user)?;

    registry
        .event_repository()
        .delete(DeleteEvent {
            event_id,
            requested_user: user.id(),
        })
        .await?;

    Ok(Json(
        serde_json::json!({ "message": "Event deleted successfully" }),
    ))
}

pub async fn join_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    reject_guest(&user)?;

    let event = registry
        .event_repository()
        .join(JoinEvent::new(event_id, user.id()))
        .await?;

    // Fan out only after the write has committed.
    let broadcaster = registry.broadcaster();
    broadcaster.publish(event_id, RealtimeMessage::EventUpdate(event.clone()));
    broadcaster.publish(
        event_id,
        RealtimeMessage::UserJoined {
            event_id,
            user_id: user.id(),
            name: user.user.name.clone(),
            timestamp: Utc::now(),
        },
    );

    Ok(Json(event.into()))
}

pub async fn leave_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    reject_guest(&user)?;

    let event = registry
        .event_repository()
        .leave(LeaveEvent::new(event_id, user.id()))
        .await?;

    let broadcaster = registry.broadcaster();
    broadcaster.publish(event_id, RealtimeMessage::EventUpdate(event.clone()));
    broadcaster.publish(
        event_id,
        RealtimeMessage::UserLeft {
            event_id,
            user_id: user.id(),
            name: user.user.name.clone(),
        },
    );

    Ok(Json(event.into()))
}
