use crate::api_state::ApiContext;
use crate::auth::handlers::get_me;
use axum::{Router, routing::get};

pub fn auth_protected_router() -> Router<ApiContext> {
    Router::new().route("/auth/me", get(get_me))
}
