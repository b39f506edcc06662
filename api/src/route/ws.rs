use crate::handler::ws::ws_upgrade;
use axum::{routing::get, Router};
use registry::AppRegistry;

pub fn build_ws_routers() -> Router<AppRegistry> {
    Router::new().route("/ws", get(ws_upgrade))
}
