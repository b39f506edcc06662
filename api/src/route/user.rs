use crate::handler::user::{check_auth, guest_login, login, logout, register_user};
use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

pub fn build_user_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/guest", post(guest_login))
        .route("/check", get(check_auth));

    Router::new().nest("/user", routers)
}
