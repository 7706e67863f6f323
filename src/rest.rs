use axum::{
    http::Uri,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    error::AppError,
    handlers::{comments, posts, users},
    AppState,
};

/// Builds the HTTP surface. Routes whose handlers take an `AuthUser`
/// require a bearer token; everything else is public.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(users::register))
        .route("/api/login", post(users::login))
        .route("/api/users/:id", get(users::get_user))
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/:id",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/api/users-posts/:user_id/posts", get(posts::list_user_posts))
        .route(
            "/api/posts-comments/:post_id/comments",
            get(comments::list_post_comments).post(comments::create_comment),
        )
        .route("/api/comments/:id", delete(comments::delete_comment))
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
