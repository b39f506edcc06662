use crate::handler::event::{
    delete_event, join_event, leave_event, register_event, show_event, show_event_list,
    update_event,
};
use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

pub fn build_event_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/", post(register_event).get(show_event_list))
        .route(
            "/:event_id",
            get(show_event).put(update_event).delete(delete_event),
        )
        .route("/:event_id/join", post(join_event))
        .route("/:event_id/leave", post(leave_event));

    Router::new().nest("/events", routers)
}
